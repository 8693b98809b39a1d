use std::collections::{BTreeMap, VecDeque};

use sails_blocks::Block;
use sails_mast::{BlockPos, Facing, OrientationState, PlacementMode};

use crate::scenario::Target;

pub enum Event {
    // Time housekeeping
    Tick,

    // A solid block written directly, e.g. scenery from a scenario
    BlockSet { pos: BlockPos, block: Block },

    // Input-derived intents; ray targets are picked when handled
    PlacementRequested {
        actor: String,
        target: Target,
        facing: Facing,
        crouching: bool,
        mode: PlacementMode,
    },

    // Results
    MastPlaced {
        actor: String,
        pos: BlockPos,
        block: Block,
        state: OrientationState,
    },
    PlacementRefused { actor: String, reason: String },
}

pub struct EventEnvelope {
    pub id: u64,
    pub tick: u64,
    pub kind: Event,
}

pub struct EventQueue {
    // map of tick -> FIFO queue of events
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    pub now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self { by_tick: BTreeMap::new(), now: 0, next_id: 1 }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, kind: Event) -> u64 {
        self.emit_at(self.now, kind)
    }

    pub fn emit_at(&mut self, tick: u64, kind: Event) -> u64 {
        let id = self.alloc_id();
        // Events for past ticks run on the current one
        let tick = tick.max(self.now);
        let env = EventEnvelope { id, tick, kind };
        self.by_tick.entry(tick).or_default().push_back(env);
        id
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        self.by_tick.get_mut(&self.now).and_then(|q| q.pop_front())
    }

    pub fn advance_tick(&mut self) {
        // clean empty current bucket
        if self.by_tick.get(&self.now).is_some_and(|q| q.is_empty()) {
            self.by_tick.remove(&self.now);
        }
        self.now = self.now.wrapping_add(1);
    }

    pub fn is_empty(&self) -> bool {
        self.by_tick.values().all(|q| q.is_empty())
    }
}
