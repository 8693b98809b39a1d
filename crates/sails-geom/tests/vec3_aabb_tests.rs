use sails_geom::{Aabb, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_constants() {
    assert!(vec3_approx_eq(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.0), 1e-6));
    assert!(vec3_approx_eq(Vec3::ONE, Vec3::new(1.0, 1.0, 1.0), 1e-6));
}

#[test]
fn vec3_normalized_has_unit_length() {
    let v = Vec3::new(3.0, 0.0, 4.0).normalized();
    assert!(approx_eq(v.length(), 1.0, 1e-6));
    assert!(vec3_approx_eq(v, Vec3::new(0.6, 0.0, 0.8), 1e-6));
    // Zero stays zero instead of producing NaN
    assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
}

#[test]
fn sixteenths_match_fractional_box() {
    let post = Aabb::from_sixteenths([6, 0, 6], [10, 16, 10]);
    assert!(vec3_approx_eq(post.min, Vec3::new(0.375, 0.0, 0.375), 1e-6));
    assert!(vec3_approx_eq(post.max, Vec3::new(0.625, 1.0, 0.625), 1e-6));
    assert!(vec3_approx_eq(post.extents(), Vec3::new(0.25, 1.0, 0.25), 1e-6));
}

#[test]
fn unit_contains_its_sub_boxes() {
    let slab = Aabb::from_sixteenths([0, 0, 0], [16, 8, 16]);
    assert!(Aabb::UNIT.contains_box(slab));
    assert!(Aabb::UNIT.contains_box(Aabb::UNIT));
    assert!(!slab.contains_box(Aabb::UNIT));
}

#[test]
fn translated_moves_both_corners() {
    let b = Aabb::from_sixteenths([0, 6, 0], [16, 10, 4]).translated(Vec3::new(2.0, -1.0, 5.0));
    assert!(vec3_approx_eq(b.min, Vec3::new(2.0, -0.625, 5.0), 1e-6));
    assert!(vec3_approx_eq(b.max, Vec3::new(3.0, -0.375, 5.25), 1e-6));
}
