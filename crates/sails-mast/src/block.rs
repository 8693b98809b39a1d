//! Per-kind block behavior hooks and the mast's implementation of them.

use sails_blocks::{BlockType, Shape};
use sails_geom::Aabb;
use thiserror::Error;

use crate::notify::{PlacementMode, PlacementNotifier, notify_placed};
use crate::orientation::{AXIS_PROP, Axis, FLUSH_SIDE_PROP, FlushSide, OrientationState};
use crate::resolve::{NeighborLookup, PlacementContext, PlacementError, resolve_placement};
use crate::shape::shape_of;

/// A state property and its allowed literals, in persisted order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

/// Hooks the engine calls for a block kind.
pub trait BlockBehavior {
    type State: Copy;

    fn declare_properties(&self) -> &'static [PropertyDecl];

    fn resolve_placement_state(
        &self,
        ctx: &PlacementContext,
        world: &dyn NeighborLookup,
    ) -> Result<Self::State, PlacementError>;

    fn compute_shape(&self, state: Self::State) -> Aabb;

    /// Called after the state has been written to the world.
    fn on_placed(
        &self,
        actor: &str,
        state: Self::State,
        mode: PlacementMode,
        notifier: &mut dyn PlacementNotifier,
    );
}

const AXIS_VALUES: [&str; 3] = [Axis::X.as_str(), Axis::Y.as_str(), Axis::Z.as_str()];
const FLUSH_VALUES: [&str; 5] = [
    FlushSide::None.as_str(),
    FlushSide::North.as_str(),
    FlushSide::South.as_str(),
    FlushSide::East.as_str(),
    FlushSide::West.as_str(),
];

const MAST_PROPERTIES: [PropertyDecl; 2] = [
    PropertyDecl {
        name: AXIS_PROP,
        values: &AXIS_VALUES,
    },
    PropertyDecl {
        name: FLUSH_SIDE_PROP,
        values: &FLUSH_VALUES,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("block `{0}` does not use the mast shape")]
    NotAMast(String),
    #[error("block `{block}` is missing state property `{prop}`")]
    MissingProperty { block: String, prop: String },
    #[error("block `{block}` property `{prop}` does not allow `{value}`")]
    MissingValue {
        block: String,
        prop: String,
        value: String,
    },
}

#[derive(Copy, Clone, Debug)]
pub struct MastBlock {
    pub notify_placer: bool,
}

impl Default for MastBlock {
    fn default() -> Self {
        Self {
            notify_placer: true,
        }
    }
}

impl MastBlock {
    /// Checks that a registered block type can persist every mast state.
    /// The shape may rename the two properties; the literals must all be there.
    pub fn check_block_type(&self, ty: &BlockType) -> Result<(), SchemaError> {
        let Shape::Mast {
            axis_from,
            flush_from,
        } = &ty.shape
        else {
            return Err(SchemaError::NotAMast(ty.name.clone()));
        };
        for (decl, prop) in self
            .declare_properties()
            .iter()
            .zip([axis_from.as_str(), flush_from.as_str()])
        {
            let Some(allowed) = ty.prop_values(prop) else {
                return Err(SchemaError::MissingProperty {
                    block: ty.name.clone(),
                    prop: prop.to_string(),
                });
            };
            if let Some(value) = decl
                .values
                .iter()
                .find(|v| !allowed.iter().any(|a| a.as_str() == **v))
            {
                return Err(SchemaError::MissingValue {
                    block: ty.name.clone(),
                    prop: prop.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl BlockBehavior for MastBlock {
    type State = OrientationState;

    fn declare_properties(&self) -> &'static [PropertyDecl] {
        &MAST_PROPERTIES
    }

    fn resolve_placement_state(
        &self,
        ctx: &PlacementContext,
        world: &dyn NeighborLookup,
    ) -> Result<OrientationState, PlacementError> {
        resolve_placement(ctx, &world)
    }

    fn compute_shape(&self, state: OrientationState) -> Aabb {
        shape_of(state)
    }

    fn on_placed(
        &self,
        actor: &str,
        state: OrientationState,
        mode: PlacementMode,
        notifier: &mut dyn PlacementNotifier,
    ) {
        if self.notify_placer {
            notify_placed(notifier, actor, state, mode);
        }
    }
}
