//! Minimal geometry types shared by the block and placement crates.
#![forbid(unsafe_code)]

use core::ops::{Add, Div, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    #[cfg_attr(test, proptest(strategy = "-1.0e3f32..1.0e3f32"))]
    pub x: f32,
    #[cfg_attr(test, proptest(strategy = "-1.0e3f32..1.0e3f32"))]
    pub y: f32,
    #[cfg_attr(test, proptest(strategy = "-1.0e3f32..1.0e3f32"))]
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The full block cell.
    pub const UNIT: Aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box given in sixteenths of a block, the way block models express it.
    #[inline]
    pub const fn from_sixteenths(min: [u8; 3], max: [u8; 3]) -> Self {
        const S: f32 = 16.0;
        Self {
            min: Vec3::new(min[0] as f32 / S, min[1] as f32 / S, min[2] as f32 / S),
            max: Vec3::new(max[0] as f32 / S, max[1] as f32 / S, max[2] as f32 / S),
        }
    }

    #[inline]
    pub fn extents(self) -> Vec3 {
        self.max - self.min
    }

    /// True when `other` lies entirely inside this box (touching faces count).
    #[inline]
    pub fn contains_box(self, other: Aabb) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.min.z >= self.min.z
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
            && other.max.z <= self.max.z
    }

    /// Box moved by `offset`, e.g. from cell-local to world space.
    #[inline]
    pub fn translated(self, offset: Vec3) -> Aabb {
        Aabb::new(self.min + offset, self.max + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        let d = a - b;
        d.x.abs() < 1e-3 && d.y.abs() < 1e-3 && d.z.abs() < 1e-3
    }

    proptest! {
        #[test]
        fn translated_cell_box_keeps_its_size(corner in any::<Vec3>(), offset in any::<Vec3>()) {
            let b = Aabb::new(corner, corner + Vec3::ONE);
            let moved = b.translated(offset);
            prop_assert_eq!(moved.min, corner + offset);
            prop_assert!(close(moved.extents(), Vec3::ONE));
        }

        #[test]
        fn normalized_is_unit_or_zero(v in any::<Vec3>()) {
            let n = v.normalized();
            if v.length() > 1e-3 {
                prop_assert!((n.length() - 1.0).abs() < 1e-4);
            } else {
                prop_assert!(n.length() <= 1.0 + 1e-4);
            }
        }
    }
}
