//! Orientation state of a placed mast and its persisted form.
//!
//! The state is two string-valued block properties, `axis` and `flush_side`.
//! Literals are mapped explicitly in both directions; nothing depends on the
//! declaration order of the enums.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use sails_blocks::{BlockState, BlockType, RegistryError, Shape};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::direction::Direction;

pub const AXIS_PROP: &str = "axis";
pub const FLUSH_SIDE_PROP: &str = "flush_side";

/// Long dimension the mast runs along.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "z")]
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub const fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    #[inline]
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Axis::Y)
    }
}

impl FromStr for Axis {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(StateError::UnknownAxis(other.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal face the mast is pushed flush against, if any.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlushSide {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "north")]
    North,
    #[serde(rename = "south")]
    South,
    #[serde(rename = "east")]
    East,
    #[serde(rename = "west")]
    West,
}

impl FlushSide {
    pub const ALL: [FlushSide; 5] = [
        FlushSide::None,
        FlushSide::North,
        FlushSide::South,
        FlushSide::East,
        FlushSide::West,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FlushSide::None => "none",
            FlushSide::North => "north",
            FlushSide::South => "south",
            FlushSide::East => "east",
            FlushSide::West => "west",
        }
    }

    /// Side named by a horizontal direction; `None` for up/down.
    pub const fn of_direction(dir: Direction) -> Option<FlushSide> {
        match dir {
            Direction::North => Some(FlushSide::North),
            Direction::South => Some(FlushSide::South),
            Direction::East => Some(FlushSide::East),
            Direction::West => Some(FlushSide::West),
            Direction::Up | Direction::Down => None,
        }
    }

    /// Axis a mast must run along to sit flush on this side.
    pub const fn required_axis(self) -> Option<Axis> {
        match self {
            FlushSide::North | FlushSide::South => Some(Axis::X),
            FlushSide::East | FlushSide::West => Some(Axis::Z),
            FlushSide::None => None,
        }
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, FlushSide::None)
    }
}

impl FromStr for FlushSide {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(FlushSide::None),
            "north" => Ok(FlushSide::North),
            "south" => Ok(FlushSide::South),
            "east" => Ok(FlushSide::East),
            "west" => Ok(FlushSide::West),
            other => Err(StateError::UnknownFlushSide(other.to_string())),
        }
    }
}

impl fmt::Display for FlushSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted state that cannot be turned back into a valid orientation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("unknown axis literal `{0}`")]
    UnknownAxis(String),
    #[error("unknown flush side literal `{0}`")]
    UnknownFlushSide(String),
    #[error("missing state property `{0}`")]
    MissingProperty(String),
    #[error("flush side `{flush_side}` cannot be combined with axis `{axis}`")]
    InvalidCombination { axis: Axis, flush_side: FlushSide },
    #[error("block `{0}` is not a mast")]
    NotAMast(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Immutable (axis, flush side) pair.
///
/// Values built through [`OrientationState::new`] may violate the flush/axis
/// rule; [`enforce`](OrientationState::enforce) repairs them and
/// [`validate`](OrientationState::validate) reports them. Everything the
/// placement pipeline returns is already enforced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrientationState {
    axis: Axis,
    flush_side: FlushSide,
}

impl Default for OrientationState {
    fn default() -> Self {
        Self::VERTICAL
    }
}

impl OrientationState {
    pub const VERTICAL: OrientationState = OrientationState {
        axis: Axis::Y,
        flush_side: FlushSide::None,
    };

    pub const fn new(axis: Axis, flush_side: FlushSide) -> Self {
        Self { axis, flush_side }
    }

    #[inline]
    pub const fn axis(self) -> Axis {
        self.axis
    }

    #[inline]
    pub const fn flush_side(self) -> FlushSide {
        self.flush_side
    }

    #[must_use]
    pub const fn with_axis(self, axis: Axis) -> Self {
        Self { axis, ..self }
    }

    #[must_use]
    pub const fn with_flush_side(self, flush_side: FlushSide) -> Self {
        Self { flush_side, ..self }
    }

    /// Forces the axis to agree with a non-none flush side. Idempotent.
    #[must_use]
    pub const fn enforce(self) -> Self {
        match self.flush_side.required_axis() {
            Some(axis) => self.with_axis(axis),
            None => self,
        }
    }

    #[inline]
    pub const fn is_consistent(self) -> bool {
        match self.flush_side.required_axis() {
            Some(axis) => axis as u8 == self.axis as u8,
            None => true,
        }
    }

    pub fn validate(self) -> Result<Self, StateError> {
        if self.is_consistent() {
            Ok(self)
        } else {
            Err(StateError::InvalidCombination {
                axis: self.axis,
                flush_side: self.flush_side,
            })
        }
    }

    /// Every state the rules can produce (7 of the 15 combinations).
    pub fn all_valid() -> impl Iterator<Item = OrientationState> {
        Axis::ALL.into_iter().flat_map(|axis| {
            FlushSide::ALL
                .into_iter()
                .map(move |flush| OrientationState::new(axis, flush))
                .filter(|s| s.is_consistent())
        })
    }

    pub fn to_props(self) -> HashMap<String, String> {
        HashMap::from([
            (AXIS_PROP.to_string(), self.axis.as_str().to_string()),
            (
                FLUSH_SIDE_PROP.to_string(),
                self.flush_side.as_str().to_string(),
            ),
        ])
    }

    /// Parses the two persisted literals. Unknown literals and combinations
    /// that break the flush/axis rule are errors, never coerced.
    pub fn from_props(props: &HashMap<String, String>) -> Result<Self, StateError> {
        let axis = props
            .get(AXIS_PROP)
            .ok_or_else(|| StateError::MissingProperty(AXIS_PROP.to_string()))?
            .parse::<Axis>()?;
        let flush_side = props
            .get(FLUSH_SIDE_PROP)
            .ok_or_else(|| StateError::MissingProperty(FLUSH_SIDE_PROP.to_string()))?
            .parse::<FlushSide>()?;
        OrientationState::new(axis, flush_side).validate()
    }

    /// Packs into the block's state bits using the property names its mast
    /// shape declares.
    pub fn to_block_state(self, ty: &BlockType) -> Result<BlockState, StateError> {
        let (axis_from, flush_from) = mast_props(ty)?;
        let props = HashMap::from([
            (axis_from.to_string(), self.axis.as_str().to_string()),
            (flush_from.to_string(), self.flush_side.as_str().to_string()),
        ]);
        Ok(ty.try_pack_state(&props)?)
    }

    pub fn from_block_state(ty: &BlockType, state: BlockState) -> Result<Self, StateError> {
        let (axis_from, flush_from) = mast_props(ty)?;
        let axis = ty
            .state_prop_value(state, axis_from)
            .ok_or_else(|| StateError::MissingProperty(axis_from.to_string()))?
            .parse::<Axis>()?;
        let flush_side = ty
            .state_prop_value(state, flush_from)
            .ok_or_else(|| StateError::MissingProperty(flush_from.to_string()))?
            .parse::<FlushSide>()?;
        OrientationState::new(axis, flush_side).validate()
    }
}

fn mast_props(ty: &BlockType) -> Result<(&str, &str), StateError> {
    match &ty.shape {
        Shape::Mast {
            axis_from,
            flush_from,
        } => Ok((axis_from.as_str(), flush_from.as_str())),
        _ => Err(StateError::NotAMast(ty.name.clone())),
    }
}

impl fmt::Display for OrientationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axis={}, flush_side={}", self.axis, self.flush_side)
    }
}
