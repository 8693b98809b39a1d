//! Scripted placement sessions for the sandbox.
//!
//! ```toml
//! [[block]]
//! name = "planks"
//! pos = [0, 63, 0]
//!
//! [[place]]
//! actor = "steve"
//! pos = [0, 64, 0]
//! face = "up"
//! facing = "north"
//!
//! [[place]]
//! actor = "alex"
//! ray = { origin = [0.5, 65.5, 3.5], dir = [0.0, 0.0, -1.0] }
//! yaw = 180.0
//! crouch = true
//! preview = true
//! ```

use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use sails_geom::Vec3;
use sails_mast::{BlockPos, Direction, Facing};

#[derive(Deserialize, Debug, Default)]
pub struct Scenario {
    #[serde(default, rename = "block")]
    pub blocks: Vec<BlockSpec>,
    #[serde(default, rename = "place")]
    pub placements: Vec<PlaceSpec>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockSpec {
    pub name: String,
    pub pos: [i32; 3],
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlaceSpec {
    #[serde(default = "default_actor")]
    pub actor: String,
    #[serde(default)]
    pub tick: Option<u64>,
    // Either an explicit target cell + clicked face, or a ray to pick them
    #[serde(default)]
    pub pos: Option<[i32; 3]>,
    #[serde(default)]
    pub face: Option<Direction>,
    #[serde(default)]
    pub ray: Option<RaySpec>,
    // Either a facing or a yaw in degrees
    #[serde(default)]
    pub facing: Option<Facing>,
    #[serde(default)]
    pub yaw: Option<f32>,
    #[serde(default)]
    pub crouch: bool,
    #[serde(default)]
    pub preview: bool,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct RaySpec {
    pub origin: [f32; 3],
    pub dir: [f32; 3],
}

fn default_actor() -> String {
    "player".to_string()
}

/// Where a placement aims, once the entry is known to be unambiguous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Cell { pos: BlockPos, face: Direction },
    Ray { origin: Vec3, dir: Vec3 },
}

impl PlaceSpec {
    pub fn target(&self) -> Result<Target, String> {
        match (self.pos, self.face, self.ray) {
            (Some([x, y, z]), Some(face), None) => Ok(Target::Cell {
                pos: BlockPos::new(x, y, z),
                face,
            }),
            (None, None, Some(r)) => Ok(Target::Ray {
                origin: Vec3::new(r.origin[0], r.origin[1], r.origin[2]),
                dir: Vec3::new(r.dir[0], r.dir[1], r.dir[2]),
            }),
            _ => Err(format!(
                "placement by `{}` needs either `pos` + `face` or `ray`",
                self.actor
            )),
        }
    }

    pub fn facing(&self) -> Result<Facing, String> {
        match (self.facing, self.yaw) {
            (Some(f), None) => Ok(f),
            (None, Some(yaw)) => Ok(Facing::from_yaw(yaw)),
            _ => Err(format!(
                "placement by `{}` needs exactly one of `facing` or `yaw`",
                self.actor
            )),
        }
    }
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let sc: Scenario = toml::from_str(s)?;
        for p in &sc.placements {
            p.target()?;
            p.facing()?;
        }
        Ok(sc)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
