//! Placement-time orientation inference.
//!
//! Stages run in a fixed order: axis from the clicked face and player facing,
//! then the flush side (crouch trigger first, neighbor chain second), then the
//! flush/axis rule is re-applied. Neighbor reads are the only world access.

use std::collections::HashMap;

use thiserror::Error;

use crate::direction::{BlockPos, CANONICAL_SCAN_ORDER, Direction, Facing};
use crate::orientation::{Axis, FlushSide, OrientationState, StateError};

/// What occupies a neighboring cell, as far as placement cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Mast,
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Neighbor {
    pub kind: ObjectKind,
    pub state: OrientationState,
}

impl Neighbor {
    pub const fn mast(state: OrientationState) -> Self {
        Self {
            kind: ObjectKind::Mast,
            state,
        }
    }
}

/// Read access to already-placed neighbors.
pub trait NeighborLookup {
    /// `Ok(None)` for cells that hold nothing with an orientation. A stored
    /// orientation that fails to decode is an error, not an empty cell.
    fn state_at(&self, pos: BlockPos) -> Result<Option<Neighbor>, StateError>;
}

/// World with nothing placed.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoNeighbors;

impl NeighborLookup for NoNeighbors {
    fn state_at(&self, _pos: BlockPos) -> Result<Option<Neighbor>, StateError> {
        Ok(None)
    }
}

impl NeighborLookup for HashMap<BlockPos, Neighbor> {
    fn state_at(&self, pos: BlockPos) -> Result<Option<Neighbor>, StateError> {
        Ok(self.get(&pos).copied())
    }
}

impl<T: NeighborLookup + ?Sized> NeighborLookup for &T {
    fn state_at(&self, pos: BlockPos) -> Result<Option<Neighbor>, StateError> {
        (**self).state_at(pos)
    }
}

/// Input captured when the player tries to place a mast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementContext {
    /// Face of the existing block that was clicked.
    pub face: Direction,
    /// Cell the new mast will occupy.
    pub pos: BlockPos,
    pub facing: Facing,
    pub crouching: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("placement refused: {0}")]
    Refused(String),
    #[error("neighbor at {pos} has corrupt orientation: {source}")]
    CorruptNeighbor {
        pos: BlockPos,
        #[source]
        source: StateError,
    },
}

/// Default axis before any flush rule applies.
///
/// Clicking a top or bottom face stands the mast up. Otherwise it is laid
/// across the player's line of sight rather than along the clicked face.
///
/// # Panics
/// If `facing_axis` is `Y`; a player's horizontal facing never is.
pub fn resolve_axis(face: Direction, facing_axis: Axis) -> Axis {
    assert!(
        facing_axis.is_horizontal(),
        "player facing axis must be horizontal"
    );
    if face.is_vertical() {
        Axis::Y
    } else if facing_axis == Axis::X {
        Axis::Z
    } else {
        Axis::X
    }
}

/// Which rule produced the flush side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlushSource {
    None,
    Crouch,
    Chain { from: Direction },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlushInference {
    pub flush_side: FlushSide,
    /// Axis the flush side forces, if one was found.
    pub axis: Option<Axis>,
    pub source: FlushSource,
}

impl FlushInference {
    const NONE: FlushInference = FlushInference {
        flush_side: FlushSide::None,
        axis: None,
        source: FlushSource::None,
    };

    fn found(flush_side: FlushSide, source: FlushSource) -> Self {
        Self {
            flush_side,
            axis: flush_side.required_axis(),
            source,
        }
    }
}

/// Crouch-clicking a side face makes the mast flush with that side.
pub fn direct_flush(face: Direction, crouching: bool) -> Option<FlushSide> {
    if !crouching {
        return None;
    }
    FlushSide::of_direction(face)
}

/// First mast neighbor, in canonical order, that is flush against something.
pub fn chain_flush(
    pos: BlockPos,
    world: &impl NeighborLookup,
) -> Result<Option<(Direction, FlushSide)>, PlacementError> {
    for dir in CANONICAL_SCAN_ORDER {
        // Cells past the grid edge hold nothing
        let Some(npos) = pos.offset(dir) else {
            continue;
        };
        let neighbor = world
            .state_at(npos)
            .map_err(|source| PlacementError::CorruptNeighbor { pos: npos, source })?;
        let Some(n) = neighbor else {
            continue;
        };
        if n.kind == ObjectKind::Mast && !n.state.flush_side().is_none() {
            log::trace!(
                "mast at {} inherits flush_side={} from {} neighbor",
                pos,
                n.state.flush_side(),
                dir
            );
            return Ok(Some((dir, n.state.flush_side())));
        }
    }
    Ok(None)
}

/// Crouch trigger first; the neighbor chain only when that left no flush
/// side. The chain also runs for top/bottom clicks.
pub fn infer_flush(
    face: Direction,
    crouching: bool,
    pos: BlockPos,
    world: &impl NeighborLookup,
) -> Result<FlushInference, PlacementError> {
    if let Some(side) = direct_flush(face, crouching) {
        return Ok(FlushInference::found(side, FlushSource::Crouch));
    }
    match chain_flush(pos, world)? {
        Some((from, side)) => Ok(FlushInference::found(side, FlushSource::Chain { from })),
        None => Ok(FlushInference::NONE),
    }
}

/// Full pipeline for one placement attempt.
pub fn resolve_placement(
    ctx: &PlacementContext,
    world: &impl NeighborLookup,
) -> Result<OrientationState, PlacementError> {
    let axis = resolve_axis(ctx.face, ctx.facing.axis());
    let flush = infer_flush(ctx.face, ctx.crouching, ctx.pos, world)?;
    let state = OrientationState::new(flush.axis.unwrap_or(axis), flush.flush_side).enforce();
    log::debug!(
        "resolved mast at {} face={} facing={:?} crouch={} -> {} ({:?})",
        ctx.pos,
        ctx.face,
        ctx.facing,
        ctx.crouching,
        state,
        flush.source
    );
    Ok(state)
}
