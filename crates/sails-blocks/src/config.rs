use serde::Deserialize;
use std::collections::HashMap;

// Top-level blocks config file
#[derive(Deserialize, Debug)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub solid: Option<bool>,

    #[serde(default)]
    pub shape: Option<ShapeConfig>,

    #[serde(default)]
    pub state_schema: Option<HashMap<String, Vec<String>>>,
}

// Shape config supports either a simple string ("cube") or a detailed table
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ShapeConfig {
    Simple(String),
    Detailed(ShapeDetailed),
}

#[derive(Deserialize, Debug, Clone)]
pub struct ShapeDetailed {
    pub kind: String,
    #[serde(default)]
    pub axis: Option<PropertyFrom>,
    #[serde(default)]
    pub flush: Option<PropertyFrom>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PropertyFrom {
    pub from: String,
}
