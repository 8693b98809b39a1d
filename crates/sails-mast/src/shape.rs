//! Fixed collision/selection boxes for each mast orientation.
//!
//! The unshifted horizontal boxes keep a long-standing mapping: axis `X`
//! selects the box that is long along Z and axis `Z` the box long along X.
//! Flush boxes are a quarter block thick and hug the face they are flush
//! against. Vertical masts ignore the flush side.

use sails_geom::Aabb;

use crate::orientation::{Axis, FlushSide, OrientationState};

pub const VERTICAL: Aabb = Aabb::from_sixteenths([6, 0, 6], [10, 16, 10]);

pub const X_AXIS_BASE: Aabb = Aabb::from_sixteenths([6, 6, 0], [10, 10, 16]);
pub const Z_AXIS_BASE: Aabb = Aabb::from_sixteenths([0, 6, 6], [16, 10, 10]);

pub const FLUSH_NORTH: Aabb = Aabb::from_sixteenths([0, 6, 0], [16, 10, 4]);
pub const FLUSH_SOUTH: Aabb = Aabb::from_sixteenths([0, 6, 12], [16, 10, 16]);
pub const FLUSH_WEST: Aabb = Aabb::from_sixteenths([0, 6, 0], [4, 10, 16]);
pub const FLUSH_EAST: Aabb = Aabb::from_sixteenths([12, 6, 0], [16, 10, 16]);

/// Table lookup; total over every (axis, flush side) pair, including the
/// combinations placement never produces.
pub const fn shape_for(axis: Axis, flush_side: FlushSide) -> Aabb {
    match (axis, flush_side) {
        (Axis::Y, _) => VERTICAL,
        (Axis::X, FlushSide::North) => FLUSH_NORTH,
        (Axis::X, FlushSide::South) => FLUSH_SOUTH,
        (Axis::X, _) => X_AXIS_BASE,
        (Axis::Z, FlushSide::East) => FLUSH_EAST,
        (Axis::Z, FlushSide::West) => FLUSH_WEST,
        (Axis::Z, _) => Z_AXIS_BASE,
    }
}

#[inline]
pub const fn shape_of(state: OrientationState) -> Aabb {
    shape_for(state.axis(), state.flush_side())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_combination_yields_a_box_inside_the_cell() {
        for axis in Axis::ALL {
            for flush in FlushSide::ALL {
                let b = shape_for(axis, flush);
                assert!(Aabb::UNIT.contains_box(b), "{axis:?}/{flush:?}");
                let e = b.extents();
                assert!(e.x > 0.0 && e.y > 0.0 && e.z > 0.0);
            }
        }
    }

    #[test]
    fn vertical_ignores_flush() {
        for flush in FlushSide::ALL {
            assert_eq!(shape_for(Axis::Y, flush), VERTICAL);
        }
    }

    #[test]
    fn mismatched_flush_falls_back_to_base() {
        assert_eq!(shape_for(Axis::X, FlushSide::East), X_AXIS_BASE);
        assert_eq!(shape_for(Axis::X, FlushSide::None), X_AXIS_BASE);
        assert_eq!(shape_for(Axis::Z, FlushSide::North), Z_AXIS_BASE);
        assert_eq!(shape_for(Axis::Z, FlushSide::None), Z_AXIS_BASE);
    }

    #[test]
    fn flush_boxes_touch_their_face() {
        assert_eq!(FLUSH_NORTH.min.z, 0.0);
        assert_eq!(FLUSH_SOUTH.max.z, 1.0);
        assert_eq!(FLUSH_WEST.min.x, 0.0);
        assert_eq!(FLUSH_EAST.max.x, 1.0);
        // Base boxes keep the historical long dimension
        assert_eq!(X_AXIS_BASE.extents().z, 1.0);
        assert_eq!(Z_AXIS_BASE.extents().x, 1.0);
    }
}
