use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

// Sandbox config file (assets/sails.toml)
#[derive(Deserialize, Debug, Clone)]
pub struct SandboxConfig {
    #[serde(default = "default_blocks_path")]
    pub blocks_path: String,
    // Registry name of the block that uses mast placement
    #[serde(default = "default_mast_block")]
    pub mast_block: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: i32,
    #[serde(default)]
    pub placement: PlacementConfig,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            blocks_path: default_blocks_path(),
            mast_block: default_mast_block(),
            chunk_size: default_chunk_size(),
            placement: PlacementConfig::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlacementConfig {
    #[serde(default = "default_notify_placer")]
    pub notify_placer: bool,
    // Max ray length in blocks when a placement is picked by ray
    #[serde(default = "default_reach")]
    pub reach: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            notify_placer: default_notify_placer(),
            reach: default_reach(),
        }
    }
}

fn default_blocks_path() -> String {
    "assets/blocks.toml".to_string()
}
fn default_mast_block() -> String {
    "mast".to_string()
}
fn default_chunk_size() -> i32 {
    32
}
fn default_notify_placer() -> bool {
    true
}
fn default_reach() -> f32 {
    8.0
}

impl SandboxConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: SandboxConfig = toml::from_str(s)?;
        if cfg.chunk_size <= 0 {
            return Err(format!("chunk_size must be positive, got {}", cfg.chunk_size).into());
        }
        Ok(cfg)
    }

    /// Missing file means defaults; a file that fails to parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, Box<dyn Error>> {
        if !path.exists() {
            log::warn!("sandbox config missing: {}; using defaults", path.display());
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&s)?;
        log::info!("sandbox config loaded from {}", path.display());
        Ok(cfg)
    }
}
