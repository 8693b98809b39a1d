//! Persistent world edits and the neighbor view placement reads from.
#![forbid(unsafe_code)]

use hashbrown::HashMap;
use sails_blocks::{Block, BlockRegistry};
use sails_mast::{BlockPos, Neighbor, NeighborLookup, ObjectKind, OrientationState, StateError};

#[derive(Default, Debug, Clone, Copy)]
pub struct EditStoreStats {
    pub chunk_entries: usize,
    pub block_edits: usize,
}

/// Chunk-aware store of every block written since the world was created.
pub struct EditStore {
    sx: i32,
    sy: i32,
    sz: i32,
    // Map per-chunk: key=(cx,cy,cz) -> map of world coords -> Block
    inner: HashMap<(i32, i32, i32), HashMap<(i32, i32, i32), Block>>,
}

impl EditStore {
    pub fn new(sx: i32, sy: i32, sz: i32) -> Self {
        Self {
            sx,
            sy,
            sz,
            inner: HashMap::new(),
        }
    }

    pub fn stats(&self) -> EditStoreStats {
        let chunk_entries = self.inner.len();
        let block_edits = self.inner.values().map(|m| m.len()).sum();
        EditStoreStats {
            chunk_entries,
            block_edits,
        }
    }

    #[inline]
    fn chunk_key(&self, wx: i32, wy: i32, wz: i32) -> (i32, i32, i32) {
        (
            wx.div_euclid(self.sx),
            wy.div_euclid(self.sy),
            wz.div_euclid(self.sz),
        )
    }

    pub fn get(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        let k = self.chunk_key(wx, wy, wz);
        self.inner
            .get(&k)
            .and_then(|m| m.get(&(wx, wy, wz)).copied())
    }

    pub fn set(&mut self, wx: i32, wy: i32, wz: i32, b: Block) {
        let k = self.chunk_key(wx, wy, wz);
        let entry = self.inner.entry(k).or_default();
        entry.insert((wx, wy, wz), b);
    }

    #[inline]
    pub fn get_at(&self, pos: BlockPos) -> Option<Block> {
        self.get(pos.x, pos.y, pos.z)
    }

    #[inline]
    pub fn set_at(&mut self, pos: BlockPos, b: Block) {
        self.set(pos.x, pos.y, pos.z, b);
    }

    /// Snapshot of all edits for a specific chunk, sorted by world coords
    pub fn snapshot_for_chunk(&self, cx: i32, cy: i32, cz: i32) -> Vec<((i32, i32, i32), Block)> {
        let mut out: Vec<_> = self
            .inner
            .get(&(cx, cy, cz))
            .map(|m| m.iter().map(|(k, v)| (*k, *v)).collect())
            .unwrap_or_default();
        out.sort_by_key(|(k, _)| *k);
        out
    }

    /// Every edit in the world, sorted by world coords
    pub fn snapshot_all(&self) -> Vec<((i32, i32, i32), Block)> {
        let mut out: Vec<_> = self
            .inner
            .values()
            .flat_map(|m| m.iter().map(|(k, v)| (*k, *v)))
            .collect();
        out.sort_by_key(|(k, _)| *k);
        out
    }
}

/// Read-only view pairing stored blocks with the registry that decodes them.
pub struct WorldView<'a> {
    pub edits: &'a EditStore,
    pub reg: &'a BlockRegistry,
}

impl<'a> WorldView<'a> {
    pub fn new(edits: &'a EditStore, reg: &'a BlockRegistry) -> Self {
        Self { edits, reg }
    }

    /// Decoded orientation of the mast at `pos`, if a mast is there.
    pub fn mast_at(&self, pos: BlockPos) -> Result<Option<OrientationState>, StateError> {
        let Some(b) = self.edits.get_at(pos) else {
            return Ok(None);
        };
        match self.reg.get(b.id) {
            Some(ty) if ty.is_mast() => OrientationState::from_block_state(ty, b.state).map(Some),
            _ => Ok(None),
        }
    }
}

impl NeighborLookup for WorldView<'_> {
    fn state_at(&self, pos: BlockPos) -> Result<Option<Neighbor>, StateError> {
        match self.mast_at(pos) {
            Ok(Some(state)) => Ok(Some(Neighbor {
                kind: ObjectKind::Mast,
                state,
            })),
            Ok(None) => Ok(None),
            Err(e) => {
                log::warn!("corrupt mast state at {}: {}", pos, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> EditStore {
        EditStore::new(32, 32, 32)
    }

    #[test]
    fn negative_coords_land_in_negative_chunks() {
        let mut store = make_store();
        let b = Block { id: 2, state: 5 };
        store.set(-1, 0, -33, b);
        assert_eq!(store.get(-1, 0, -33), Some(b));
        assert_eq!(store.snapshot_for_chunk(-1, 0, -2), vec![((-1, 0, -33), b)]);
        assert!(store.snapshot_for_chunk(0, 0, 0).is_empty());
    }

    #[test]
    fn overwrite_keeps_single_entry() {
        let mut store = make_store();
        store.set(4, 5, 6, Block { id: 1, state: 0 });
        store.set(4, 5, 6, Block { id: 1, state: 3 });
        store.set(40, 5, 6, Block { id: 1, state: 0 });
        let stats = store.stats();
        assert_eq!(stats.block_edits, 2);
        assert_eq!(stats.chunk_entries, 2);
        assert_eq!(store.get(4, 5, 6), Some(Block { id: 1, state: 3 }));
        let all = store.snapshot_all();
        assert_eq!(all[0].0, (4, 5, 6));
        assert_eq!(all[1].0, (40, 5, 6));
    }
}
