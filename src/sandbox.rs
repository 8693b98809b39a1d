use std::error::Error;

use sails_blocks::{Block, BlockId, BlockRegistry};
use sails_edit::{EditStore, WorldView};
use sails_geom::Vec3;
use sails_mast::notify::Outbox;
use sails_mast::{
    BlockBehavior, BlockPos, Direction, Facing, MastBlock, OrientationState, PlacementContext,
    PlacementError, PlacementMode,
};

use crate::config::SandboxConfig;
use crate::event::{Event, EventQueue};
use crate::raycast;
use crate::scenario::{Scenario, Target};

/// One resolved placement, kept for the end-of-run report.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementRecord {
    pub tick: u64,
    pub actor: String,
    pub pos: BlockPos,
    pub state: OrientationState,
    pub mode: PlacementMode,
}

/// Single-threaded world: every read and write happens inside `run`.
pub struct Sandbox {
    pub cfg: SandboxConfig,
    pub reg: BlockRegistry,
    pub edits: EditStore,
    pub queue: EventQueue,
    pub mast: MastBlock,
    pub mast_id: BlockId,
    pub outbox: Outbox,
    pub records: Vec<PlacementRecord>,
    pub refusals: Vec<(String, String)>,
}

impl Sandbox {
    pub fn new(cfg: SandboxConfig, reg: BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let mast_id = reg
            .id_by_name(&cfg.mast_block)
            .ok_or_else(|| format!("mast block `{}` is not registered", cfg.mast_block))?;
        let mast = MastBlock {
            notify_placer: cfg.placement.notify_placer,
        };
        if let Some(ty) = reg.get(mast_id) {
            mast.check_block_type(ty)?;
        }
        let edits = EditStore::new(cfg.chunk_size, cfg.chunk_size, cfg.chunk_size);
        Ok(Self {
            cfg,
            reg,
            edits,
            queue: EventQueue::new(),
            mast,
            mast_id,
            outbox: Outbox::default(),
            records: Vec::new(),
            refusals: Vec::new(),
        })
    }

    /// Queues a scenario: scenery on tick 0, then one placement per tick
    /// unless a placement names its own tick.
    pub fn load_scenario(&mut self, sc: &Scenario) -> Result<(), Box<dyn Error>> {
        for b in &sc.blocks {
            let block = self
                .reg
                .make_block_by_name(&b.name, None)
                .ok_or_else(|| format!("unknown block `{}` in scenario", b.name))?;
            let [x, y, z] = b.pos;
            self.queue.emit_at(
                0,
                Event::BlockSet {
                    pos: BlockPos::new(x, y, z),
                    block,
                },
            );
        }
        for (i, p) in sc.placements.iter().enumerate() {
            let tick = p.tick.unwrap_or(i as u64 + 1);
            let actor = p.actor.clone();
            let ev = match (p.target(), p.facing()) {
                (Ok(target), Ok(facing)) => Event::PlacementRequested {
                    actor,
                    target,
                    facing,
                    crouching: p.crouch,
                    mode: if p.preview {
                        PlacementMode::Preview
                    } else {
                        PlacementMode::Authoritative
                    },
                },
                (Err(reason), _) | (_, Err(reason)) => Event::PlacementRefused { actor, reason },
            };
            self.queue.emit_at(tick, ev);
        }
        Ok(())
    }

    /// Picks ray targets against the world as it stands now.
    fn placement_context(
        &self,
        target: Target,
        facing: Facing,
        crouching: bool,
    ) -> Result<PlacementContext, String> {
        let (pos, face) = match target {
            Target::Cell { pos, face } => (pos, face),
            Target::Ray { origin, dir } => self.pick(origin, dir)?,
        };
        Ok(PlacementContext {
            face,
            pos,
            facing,
            crouching,
        })
    }

    fn pick(&self, origin: Vec3, dir: Vec3) -> Result<(BlockPos, Direction), String> {
        let hit = raycast::raycast_first_hit_with_face(
            origin,
            dir,
            self.cfg.placement.reach,
            |x, y, z| self.solid_at(BlockPos::new(x, y, z)),
        )
        .ok_or_else(|| "nothing within reach".to_string())?;
        let face = Direction::from_normal(hit.nx, hit.ny, hit.nz)
            .ok_or_else(|| "ray starts inside a solid block".to_string())?;
        Ok((BlockPos::new(hit.px, hit.py, hit.pz), face))
    }

    fn solid_at(&self, pos: BlockPos) -> bool {
        self.edits
            .get_at(pos)
            .and_then(|b| self.reg.get(b.id).map(|t| t.is_solid(b.state)))
            .unwrap_or(false)
    }

    /// Drains the queue tick by tick.
    pub fn run(&mut self) {
        while !self.queue.is_empty() {
            self.queue.emit_now(Event::Tick);
            while let Some(env) = self.queue.pop_ready() {
                Self::log_event(env.tick, &env.kind);
                self.handle_event(env.tick, env.kind);
            }
            self.queue.advance_tick();
        }
        let stats = self.edits.stats();
        log::info!(
            "run finished at tick {}: {} block edit(s) in {} chunk(s)",
            self.queue.now,
            stats.block_edits,
            stats.chunk_entries
        );
    }

    fn handle_event(&mut self, tick: u64, ev: Event) {
        match ev {
            Event::Tick => {}
            Event::BlockSet { pos, block } => self.edits.set_at(pos, block),
            Event::PlacementRequested {
                actor,
                target,
                facing,
                crouching,
                mode,
            } => match self.placement_context(target, facing, crouching) {
                Ok(ctx) => self.handle_placement_requested(tick, actor, ctx, mode),
                Err(reason) => {
                    self.queue.emit_now(Event::PlacementRefused { actor, reason });
                }
            },
            Event::MastPlaced { actor, state, .. } => {
                self.mast
                    .on_placed(&actor, state, PlacementMode::Authoritative, &mut self.outbox);
            }
            Event::PlacementRefused { actor, reason } => {
                log::warn!("placement by {} refused: {}", actor, reason);
                self.refusals.push((actor, reason));
            }
        }
    }

    fn handle_placement_requested(
        &mut self,
        tick: u64,
        actor: String,
        ctx: PlacementContext,
        mode: PlacementMode,
    ) {
        let resolved = self.resolve(&ctx);
        let state = match resolved {
            Ok(state) => state,
            Err(e) => {
                self.queue.emit_now(Event::PlacementRefused {
                    actor,
                    reason: e.to_string(),
                });
                return;
            }
        };
        self.records.push(PlacementRecord {
            tick,
            actor: actor.clone(),
            pos: ctx.pos,
            state,
            mode,
        });
        if mode == PlacementMode::Preview {
            log::debug!(
                "preview for {} at {}: {} shape={:?}",
                actor,
                ctx.pos,
                state,
                self.mast.compute_shape(state)
            );
            return;
        }
        let packed = self
            .reg
            .get(self.mast_id)
            .ok_or_else(|| "mast block missing from registry".to_string())
            .and_then(|ty| state.to_block_state(ty).map_err(|e| e.to_string()));
        match packed {
            Ok(bits) => {
                let block = Block {
                    id: self.mast_id,
                    state: bits,
                };
                self.edits.set_at(ctx.pos, block);
                self.queue.emit_now(Event::MastPlaced {
                    actor,
                    pos: ctx.pos,
                    block,
                    state,
                });
            }
            Err(reason) => {
                self.queue.emit_now(Event::PlacementRefused { actor, reason });
            }
        }
    }

    fn resolve(&self, ctx: &PlacementContext) -> Result<OrientationState, PlacementError> {
        if self.edits.get_at(ctx.pos).is_some_and(|b| b != Block::AIR) {
            return Err(PlacementError::Refused(format!("{} is occupied", ctx.pos)));
        }
        let view = WorldView::new(&self.edits, &self.reg);
        self.mast.resolve_placement_state(ctx, &view)
    }

    fn log_event(tick: u64, ev: &Event) {
        match ev {
            Event::Tick => {
                log::trace!(target: "events", "[tick {}] Tick", tick);
            }
            Event::BlockSet { pos, block } => {
                log::debug!(target: "events", "[tick {}] BlockSet {} block={:?}", tick, pos, block);
            }
            Event::PlacementRequested { actor, target, facing, crouching, mode } => {
                log::info!(target: "events", "[tick {}] PlacementRequested {:?} by {} target={:?} facing={:?} crouch={}",
                    tick, mode, actor, target, facing, crouching);
            }
            Event::MastPlaced { actor, pos, state, .. } => {
                log::info!(target: "events", "[tick {}] MastPlaced by {} at {} {}", tick, actor, pos, state);
            }
            Event::PlacementRefused { actor, reason } => {
                log::info!(target: "events", "[tick {}] PlacementRefused {}: {}", tick, actor, reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sails_mast::{Axis, FlushSide};

    const BLOCKS: &str = r#"
        [[blocks]]
        name = "air"
        id = 0
        solid = false
        shape = "none"

        [[blocks]]
        name = "planks"
        id = 1

        [[blocks]]
        name = "mast"
        id = 2
        shape = "mast"
        [blocks.state_schema]
        axis = ["x", "y", "z"]
        flush_side = ["none", "north", "south", "east", "west"]
    "#;

    fn sandbox(cfg: SandboxConfig) -> Sandbox {
        let reg = BlockRegistry::from_toml_str(BLOCKS).unwrap();
        Sandbox::new(cfg, reg).unwrap()
    }

    fn run(sc: &str, cfg: SandboxConfig) -> Sandbox {
        let mut sb = sandbox(cfg);
        sb.load_scenario(&Scenario::from_toml_str(sc).unwrap()).unwrap();
        sb.run();
        sb
    }

    #[test]
    fn chain_of_masts_inherits_flush() {
        let sb = run(
            r#"
            [[place]]
            actor = "steve"
            pos = [0, 64, 0]
            face = "east"
            facing = "north"
            crouch = true

            [[place]]
            actor = "steve"
            pos = [1, 64, 0]
            face = "up"
            facing = "north"
            "#,
            SandboxConfig::default(),
        );
        let states: Vec<_> = sb.records.iter().map(|r| r.state).collect();
        assert_eq!(
            states,
            vec![
                OrientationState::new(Axis::Z, FlushSide::East),
                OrientationState::new(Axis::Z, FlushSide::East),
            ]
        );
        let view = WorldView::new(&sb.edits, &sb.reg);
        assert_eq!(
            view.mast_at(BlockPos::new(1, 64, 0)),
            Ok(Some(OrientationState::new(Axis::Z, FlushSide::East)))
        );
        assert_eq!(sb.outbox.messages.len(), 2);
        assert_eq!(sb.outbox.messages[1].1, "Mast placed: axis=z, flush_side=east");
    }

    #[test]
    fn preview_neither_writes_nor_notifies() {
        let sb = run(
            r#"
            [[place]]
            pos = [0, 64, 0]
            face = "north"
            facing = "south"
            crouch = true
            preview = true
            "#,
            SandboxConfig::default(),
        );
        assert_eq!(sb.records.len(), 1);
        assert_eq!(sb.records[0].mode, PlacementMode::Preview);
        assert_eq!(sb.records[0].state, OrientationState::new(Axis::X, FlushSide::North));
        assert!(sb.edits.get(0, 64, 0).is_none());
        assert!(sb.outbox.messages.is_empty());
    }

    #[test]
    fn notifications_can_be_disabled() {
        let mut cfg = SandboxConfig::default();
        cfg.placement.notify_placer = false;
        let sb = run(
            r#"
            [[place]]
            pos = [0, 64, 0]
            face = "up"
            facing = "south"
            "#,
            cfg,
        );
        assert_eq!(sb.records.len(), 1);
        assert!(sb.outbox.messages.is_empty());
    }

    #[test]
    fn ray_picks_clicked_face_and_target_cell() {
        let sb = run(
            r#"
            [[block]]
            name = "planks"
            pos = [0, 64, 0]

            [[place]]
            actor = "alex"
            ray = { origin = [0.5, 64.5, 3.5], dir = [0.0, 0.0, -1.0] }
            yaw = 180.0
            crouch = true
            "#,
            SandboxConfig::default(),
        );
        // Ray hits the south face of the planks; crouching makes it flush south
        assert_eq!(sb.records.len(), 1);
        assert_eq!(sb.records[0].pos, BlockPos::new(0, 64, 1));
        assert_eq!(sb.records[0].state, OrientationState::new(Axis::X, FlushSide::South));
    }

    #[test]
    fn ray_stops_at_mast_placed_on_earlier_tick() {
        let sb = run(
            r#"
            [[block]]
            name = "planks"
            pos = [0, 64, 0]

            [[place]]
            pos = [0, 64, 1]
            face = "south"
            facing = "north"
            crouch = true

            [[place]]
            ray = { origin = [0.5, 64.5, 3.5], dir = [0.0, 0.0, -1.0] }
            yaw = 180.0
            "#,
            SandboxConfig::default(),
        );
        assert!(sb.refusals.is_empty());
        assert_eq!(sb.records.len(), 2);
        // Second ray hits the first mast, not the planks behind it
        assert_eq!(sb.records[1].pos, BlockPos::new(0, 64, 2));
        assert_eq!(sb.records[1].state, OrientationState::new(Axis::X, FlushSide::South));
    }

    #[test]
    fn occupied_target_and_missed_ray_are_refused() {
        let sb = run(
            r#"
            [[block]]
            name = "planks"
            pos = [0, 64, 0]

            [[place]]
            pos = [0, 64, 0]
            face = "up"
            facing = "north"

            [[place]]
            ray = { origin = [0.5, 80.5, 0.5], dir = [0.0, 1.0, 0.0] }
            facing = "north"
            "#,
            SandboxConfig::default(),
        );
        assert!(sb.records.is_empty());
        assert_eq!(sb.refusals.len(), 2);
        assert!(sb.refusals[0].1.contains("occupied"));
        assert_eq!(sb.refusals[1].1, "nothing within reach");
    }

    #[test]
    fn unregistered_mast_block_is_a_config_error() {
        let reg = BlockRegistry::from_toml_str(BLOCKS).unwrap();
        let mut cfg = SandboxConfig::default();
        cfg.mast_block = "spar".into();
        assert!(Sandbox::new(cfg, reg).is_err());
    }
}
