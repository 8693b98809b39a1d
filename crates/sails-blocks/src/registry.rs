use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use thiserror::Error;

use super::config::{BlocksConfig, PropertyFrom, ShapeConfig, ShapeDetailed};
use super::types::{Block, BlockId, BlockState, Shape};

/// Failures of the strict state packing path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("block `{block}` has no state property `{prop}`")]
    UnknownProperty { block: String, prop: String },
    #[error("block `{block}` property `{prop}` does not allow value `{value}`")]
    UnknownValue {
        block: String,
        prop: String,
        value: String,
    },
    #[error("block `{block}` state {state:#06x} has no valid value for `{prop}`")]
    CorruptState {
        block: String,
        prop: String,
        state: BlockState,
    },
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn load_from_path(blocks_path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let blocks_toml = fs::read_to_string(blocks_path)?;
        Self::from_toml_str(&blocks_toml)
    }

    pub fn from_toml_str(blocks_toml: &str) -> Result<Self, Box<dyn Error>> {
        let blocks_cfg: BlocksConfig = toml::from_str(blocks_toml)?;
        Self::from_config(blocks_cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            if reg.by_name.contains_key(&def.name) {
                return Err(format!("block `{}` declared twice", def.name).into());
            }
            if let Some(prev) = reg.get(id).filter(|t| !t.name.is_empty()) {
                return Err(format!(
                    "block `{}` reuses id {} already taken by `{}`",
                    def.name, id, prev.name
                )
                .into());
            }
            let solid = def.solid.unwrap_or(true);
            let shape = compile_shape(def.shape);
            let state_schema = def.state_schema.unwrap_or_default();
            let (state_fields, prop_index) = compute_state_layout(&state_schema);
            let total_bits: u32 = state_fields.iter().map(|f| f.bits).sum();
            if total_bits > BlockState::BITS {
                return Err(format!(
                    "block `{}` state schema needs {} bits (max {})",
                    def.name,
                    total_bits,
                    BlockState::BITS
                )
                .into());
            }
            log::debug!(
                "registered block `{}` id={} shape={:?} state_bits={}",
                def.name,
                id,
                shape,
                total_bits
            );

            let ty = BlockType {
                id,
                name: def.name,
                solid,
                shape,
                state_fields,
                prop_index,
            };
            if reg.blocks.len() <= id as usize {
                reg.blocks
                    .resize(id as usize + 1, BlockType::placeholder(id));
            }
            reg.by_name.insert(ty.name.clone(), id);
            reg.blocks[id as usize] = ty;
        }
        Ok(reg)
    }

    pub fn make_block_by_name(
        &self,
        name: &str,
        props: Option<&HashMap<String, String>>,
    ) -> Option<Block> {
        let id = self.id_by_name(name)?;
        let state = if let Some(p) = props {
            self.get(id).map(|ty| ty.pack_state(p)).unwrap_or(0)
        } else {
            0
        };
        Some(Block { id, state })
    }
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
    pub shape: Shape,
    // Precomputed, sorted layout for fast state packing/unpacking
    pub state_fields: Vec<StateField>,
    pub prop_index: HashMap<String, usize>,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            solid: false,
            shape: Shape::None,
            state_fields: Vec::new(),
            prop_index: HashMap::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StateField {
    pub name: String,
    pub values: Vec<String>,
    pub bits: u32,
    pub offset: u32,
}

impl StateField {
    #[inline]
    fn mask(&self) -> u32 {
        if self.bits >= 32 {
            u32::MAX
        } else {
            (1u32 << self.bits) - 1
        }
    }
}

fn compile_shape(shape: Option<ShapeConfig>) -> Shape {
    use super::config::ShapeConfig::*;
    match shape.unwrap_or(Simple("cube".into())) {
        Simple(k) => match k.as_str() {
            "cube" => Shape::Cube,
            "mast" => Shape::Mast {
                axis_from: "axis".into(),
                flush_from: "flush_side".into(),
            },
            _ => Shape::None,
        },
        Detailed(ShapeDetailed { kind, axis, flush }) => match kind.as_str() {
            "cube" => Shape::Cube,
            "mast" => Shape::Mast {
                axis_from: axis
                    .map(|p: PropertyFrom| p.from)
                    .unwrap_or_else(|| "axis".to_string()),
                flush_from: flush
                    .map(|p| p.from)
                    .unwrap_or_else(|| "flush_side".to_string()),
            },
            _ => Shape::None,
        },
    }
}

fn compute_state_layout(
    schema: &HashMap<String, Vec<String>>,
) -> (Vec<StateField>, HashMap<String, usize>) {
    let mut keys: Vec<&String> = schema.keys().collect();
    keys.sort();
    let mut offset: u32 = 0;
    let mut fields: Vec<StateField> = Vec::with_capacity(keys.len());
    for k in keys.into_iter() {
        let vals = schema.get(k).cloned().unwrap_or_default();
        let vlen = vals.len() as u32;
        let bits: u32 = if vlen <= 1 {
            0
        } else {
            32 - (vlen - 1).leading_zeros()
        };
        fields.push(StateField {
            name: k.to_string(),
            values: vals,
            bits,
            offset,
        });
        offset = offset.saturating_add(bits);
    }
    let mut index: HashMap<String, usize> = HashMap::with_capacity(fields.len());
    for (i, f) in fields.iter().enumerate() {
        index.insert(f.name.clone(), i);
    }
    (fields, index)
}

impl BlockType {
    pub fn is_solid(&self, _state: BlockState) -> bool {
        self.solid
    }

    pub fn is_mast(&self) -> bool {
        matches!(self.shape, Shape::Mast { .. })
    }

    /// Allowed literals for `prop`, in schema order.
    pub fn prop_values(&self, prop: &str) -> Option<&[String]> {
        let &i = self.prop_index.get(prop)?;
        Some(self.state_fields[i].values.as_slice())
    }

    pub fn state_prop_value<'a>(&'a self, state: BlockState, prop: &str) -> Option<&'a str> {
        if self.state_fields.is_empty() {
            return None;
        }
        let &i = self.prop_index.get(prop)?;
        let f = &self.state_fields[i];
        if f.bits == 0 {
            return f.values.first().map(|s| s.as_str());
        }
        let idx: usize = (((state as u32) >> f.offset) & f.mask()) as usize;
        f.values.get(idx).map(|s| s.as_str())
    }

    /// Lenient packing: unknown or missing values fall back to the first allowed value.
    pub fn pack_state(&self, props: &HashMap<String, String>) -> BlockState {
        if self.state_fields.is_empty() {
            return 0;
        }
        let mut acc: u32 = 0;
        for f in &self.state_fields {
            if f.bits == 0 {
                continue;
            }
            let sel_idx: u32 = match props.get(&f.name) {
                Some(val) => f.values.iter().position(|s| s == val).unwrap_or(0) as u32,
                None => 0,
            };
            acc |= (sel_idx & f.mask()) << f.offset;
        }
        acc as BlockState
    }

    /// Strict packing for persisted state: every given property must exist and
    /// carry an allowed literal. Omitted properties take their first value.
    pub fn try_pack_state(
        &self,
        props: &HashMap<String, String>,
    ) -> Result<BlockState, RegistryError> {
        for (prop, value) in props {
            let Some(&i) = self.prop_index.get(prop) else {
                return Err(RegistryError::UnknownProperty {
                    block: self.name.clone(),
                    prop: prop.clone(),
                });
            };
            if !self.state_fields[i].values.iter().any(|v| v == value) {
                return Err(RegistryError::UnknownValue {
                    block: self.name.clone(),
                    prop: prop.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(self.pack_state(props))
    }

    /// Reads every property back out. Bit patterns past the end of a value
    /// list are reported rather than clamped.
    pub fn try_unpack_state(
        &self,
        state: BlockState,
    ) -> Result<HashMap<String, String>, RegistryError> {
        let mut out = HashMap::with_capacity(self.state_fields.len());
        for f in &self.state_fields {
            let Some(v) = self.state_prop_value(state, &f.name) else {
                return Err(RegistryError::CorruptState {
                    block: self.name.clone(),
                    prop: f.name.clone(),
                    state,
                });
            };
            out.insert(f.name.clone(), v.to_string());
        }
        Ok(out)
    }
}
