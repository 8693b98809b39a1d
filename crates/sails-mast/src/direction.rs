use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::orientation::Axis;

/// Integer block coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Neighboring cell, or `None` past the edge of the `i32` grid.
    #[inline]
    pub const fn offset(self, dir: Direction) -> Option<BlockPos> {
        let (dx, dy, dz) = dir.offset();
        match (
            self.x.checked_add(dx),
            self.y.checked_add(dy),
            self.z.checked_add(dz),
        ) {
            (Some(x), Some(y), Some(z)) => Some(BlockPos::new(x, y, z)),
            _ => None,
        }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six block faces. North is -Z, west is -X.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

/// Order in which neighbors are searched for a flush side to inherit. The
/// first qualifying neighbor wins, so this order decides ties.
pub const CANONICAL_SCAN_ORDER: [Direction; 6] = [
    Direction::Down,
    Direction::Up,
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

impl Direction {
    #[inline]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::Down => (0, -1, 0),
            Direction::Up => (0, 1, 0),
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::West => (-1, 0, 0),
            Direction::East => (1, 0, 0),
        }
    }

    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub const fn axis(self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Index into [`CANONICAL_SCAN_ORDER`].
    ///
    /// # Panics
    /// On indices past 5; callers hand in engine-side face ids, which are
    /// always in range.
    pub const fn from_index(i: u8) -> Direction {
        assert!(i < 6, "face index out of range");
        CANONICAL_SCAN_ORDER[i as usize]
    }

    /// Face whose outward normal is the given unit vector.
    pub const fn from_normal(nx: i32, ny: i32, nz: i32) -> Option<Direction> {
        match (nx, ny, nz) {
            (0, -1, 0) => Some(Direction::Down),
            (0, 1, 0) => Some(Direction::Up),
            (0, 0, -1) => Some(Direction::North),
            (0, 0, 1) => Some(Direction::South),
            (-1, 0, 0) => Some(Direction::West),
            (1, 0, 0) => Some(Direction::East),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "down" => Ok(Direction::Down),
            "up" => Ok(Direction::Up),
            "north" => Ok(Direction::North),
            "south" => Ok(Direction::South),
            "west" => Ok(Direction::West),
            "east" => Ok(Direction::East),
            other => Err(format!("unknown direction `{other}`")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal direction a player looks toward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    North,
    South,
    West,
    East,
}

impl Facing {
    /// Facing from yaw in degrees: 0 looks south (+Z), 90 west, 180 north, 270 east.
    pub fn from_yaw(yaw_deg: f32) -> Self {
        let d = yaw_deg.rem_euclid(360.0);
        if !(45.0..315.0).contains(&d) {
            Facing::South
        } else if (45.0..135.0).contains(&d) {
            Facing::West
        } else if (135.0..225.0).contains(&d) {
            Facing::North
        } else {
            Facing::East
        }
    }

    pub const fn direction(self) -> Direction {
        match self {
            Facing::North => Direction::North,
            Facing::South => Direction::South,
            Facing::West => Direction::West,
            Facing::East => Direction::East,
        }
    }

    /// World axis the player looks along; never `Y`.
    #[inline]
    pub const fn axis(self) -> Axis {
        self.direction().axis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_order_is_down_up_north_south_west_east() {
        let names: Vec<&str> = CANONICAL_SCAN_ORDER.iter().map(|d| d.as_str()).collect();
        assert_eq!(names, ["down", "up", "north", "south", "west", "east"]);
    }

    #[test]
    fn offsets_cancel_with_opposite() {
        let p = BlockPos::new(4, -2, 9);
        for d in CANONICAL_SCAN_ORDER {
            assert_eq!(p.offset(d).and_then(|n| n.offset(d.opposite())), Some(p));
            let (x, y, z) = d.offset();
            assert_eq!(Direction::from_normal(x, y, z), Some(d));
        }
        assert_eq!(Direction::from_normal(1, 1, 0), None);
    }

    #[test]
    fn offset_past_grid_edge_is_none() {
        let max = BlockPos::new(i32::MAX, 0, 0);
        assert_eq!(max.offset(Direction::East), None);
        assert_eq!(max.offset(Direction::West), Some(BlockPos::new(i32::MAX - 1, 0, 0)));
        let min = BlockPos::new(0, i32::MIN, i32::MIN);
        assert_eq!(min.offset(Direction::Down), None);
        assert_eq!(min.offset(Direction::North), None);
        assert_eq!(min.offset(Direction::Up), Some(BlockPos::new(0, i32::MIN + 1, i32::MIN)));
    }

    #[test]
    fn yaw_quadrants() {
        assert_eq!(Facing::from_yaw(0.0), Facing::South);
        assert_eq!(Facing::from_yaw(-30.0), Facing::South);
        assert_eq!(Facing::from_yaw(90.0), Facing::West);
        assert_eq!(Facing::from_yaw(180.0), Facing::North);
        assert_eq!(Facing::from_yaw(-90.0), Facing::East);
        assert_eq!(Facing::North.axis(), Axis::Z);
        assert_eq!(Facing::East.axis(), Axis::X);
    }

    #[test]
    #[should_panic(expected = "face index out of range")]
    fn face_index_precondition() {
        let _ = Direction::from_index(6);
    }
}
