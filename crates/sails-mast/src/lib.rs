//! Mast orientation: placement inference, persisted state, and geometry.
#![forbid(unsafe_code)]

pub mod block;
pub mod direction;
pub mod notify;
pub mod orientation;
pub mod resolve;
pub mod shape;

pub use block::{BlockBehavior, MastBlock, PropertyDecl, SchemaError};
pub use direction::{BlockPos, CANONICAL_SCAN_ORDER, Direction, Facing};
pub use notify::{PlacementMode, PlacementNotifier};
pub use orientation::{Axis, FlushSide, OrientationState, StateError};
pub use resolve::{
    Neighbor, NeighborLookup, ObjectKind, PlacementContext, PlacementError, resolve_placement,
};
pub use shape::shape_for;
