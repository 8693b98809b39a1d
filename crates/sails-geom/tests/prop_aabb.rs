use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;
use sails_geom::{Aabb, Vec3};

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}
fn vapprox_abs_rel(a: Vec3, b: Vec3, atol: f32, rtol: f32) -> bool {
    approx_abs_rel(a.x, b.x, atol, rtol)
        && approx_abs_rel(a.y, b.y, atol, rtol)
        && approx_abs_rel(a.z, b.z, atol, rtol)
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e3)
}
fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}
fn arb_sixteenths_box() -> impl Strategy<Value = Aabb> {
    (
        (0u8..=16, 0u8..=16, 0u8..=16),
        (0u8..=16, 0u8..=16, 0u8..=16),
    )
        .prop_map(|((ax, ay, az), (bx, by, bz))| {
            Aabb::from_sixteenths(
                [ax.min(bx), ay.min(by), az.min(bz)],
                [ax.max(bx), ay.max(by), az.max(bz)],
            )
        })
}

proptest! {
    // Any box built from in-range sixteenths stays inside the block cell
    #[test]
    fn sixteenths_box_fits_unit(b in arb_sixteenths_box()) {
        prop_assert!(Aabb::UNIT.contains_box(b));
    }

    // Translation moves both corners and keeps the extents
    #[test]
    fn translation_preserves_extents(b in arb_sixteenths_box(), t in arb_vec3()) {
        let m = b.translated(t);
        prop_assert!(vapprox_abs_rel(m.extents(), b.extents(), 1e-3, 1e-4));
        prop_assert!(vapprox_abs_rel(m.min, b.min + t, 1e-3, 1e-4));
        prop_assert!(vapprox_abs_rel(m.max, b.max + t, 1e-3, 1e-4));
    }

    // Containment is reflexive for ordered boxes
    #[test]
    fn contains_self(b in arb_sixteenths_box()) {
        prop_assert!(b.contains_box(b));
    }
}
