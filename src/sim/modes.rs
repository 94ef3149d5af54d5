//! Per-mode rules: how many targets, how they die and how they come back
//!
//! The director only produces [`SpawnPlan`]s. [`execute`] is the single
//! place where new targets are created.

use glam::Vec3;

use super::placement::{self, PlacementStrategy};
use super::state::{Effect, GameMode, GameState, Species, Target};
use crate::consts::*;

/// How a hit turns into damage and points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageModel {
    /// Every hit kills
    Lethal,
    /// Head kills instantly, body takes one hp
    PartBased,
    /// Continuous damage ticks, head counts double
    Tracking,
}

/// What replaces a dead target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnPolicy {
    /// One new target at a freshly sampled position
    Fresh,
    /// One new target, with a trail from the old position
    Teleport,
    /// A whole new cluster once the last one is gone
    ClusterReseed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Scattered,
    /// Spawns follow a drifting point (last spawn or cluster origin)
    MovingCluster,
    /// Spawns snap to fixed anchors (grid or spider center)
    FixedGraph,
}

/// Immutable rule set for one mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeConfig {
    pub strategy: PlacementStrategy,
    pub initial_spawn: u32,
    pub max_hp: u32,
    pub damage: DamageModel,
    pub lifetime_ms: Option<f64>,
    pub respawn: RespawnPolicy,
    pub layout: Layout,
    pub species: Species,
}

impl ModeConfig {
    pub fn for_mode(mode: GameMode) -> Self {
        let species = mode.species();
        let strategy = PlacementStrategy::for_mode(mode);

        let (initial_spawn, damage, respawn, layout) = match mode {
            GameMode::GridShot => (4, DamageModel::Lethal, RespawnPolicy::Fresh, Layout::FixedGraph),
            GameMode::SpiderShot => (1, DamageModel::Lethal, RespawnPolicy::Fresh, Layout::FixedGraph),
            GameMode::MicroShot => (4, DamageModel::Lethal, RespawnPolicy::Fresh, Layout::MovingCluster),
            GameMode::BlinkShot => (
                BLINK_CLUSTER_SIZE,
                DamageModel::Lethal,
                RespawnPolicy::ClusterReseed,
                Layout::MovingCluster,
            ),
            GameMode::HumanStrafe => (1, DamageModel::PartBased, RespawnPolicy::Teleport, Layout::Scattered),
            GameMode::Tracking => (1, DamageModel::Tracking, RespawnPolicy::Teleport, Layout::Scattered),
            GameMode::Standard | GameMode::Marathon => {
                (4, DamageModel::Lethal, RespawnPolicy::Fresh, Layout::Scattered)
            }
        };

        Self {
            strategy,
            initial_spawn,
            max_hp: species.max_hp(),
            damage,
            lifetime_ms: (species == Species::Blink).then_some(BLINK_LIFETIME_MS),
            respawn,
            layout,
            species,
        }
    }
}

/// Spawns to perform
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpawnPlan {
    pub count: u32,
    /// Re-randomize the cluster origin before spawning. Only modes with a
    /// [`Layout::MovingCluster`] layout have an origin to move.
    pub reseed_cluster: bool,
    /// Draw a teleport trail from here to each new target
    pub teleport_from: Option<Vec3>,
}

impl SpawnPlan {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn fresh(count: u32) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    fn cluster() -> Self {
        Self {
            count: BLINK_CLUSTER_SIZE,
            reseed_cluster: true,
            teleport_from: None,
        }
    }
}

pub fn on_mode_enter(mode: GameMode) -> SpawnPlan {
    let config = ModeConfig::for_mode(mode);
    match config.respawn {
        RespawnPolicy::ClusterReseed => SpawnPlan::cluster(),
        _ => SpawnPlan::fresh(config.initial_spawn),
    }
}

/// Plan after `target` died. `live_count` excludes the dead target.
pub fn on_death(mode: GameMode, target: &Target, live_count: usize) -> SpawnPlan {
    match ModeConfig::for_mode(mode).respawn {
        RespawnPolicy::ClusterReseed if live_count == 0 => SpawnPlan::cluster(),
        RespawnPolicy::ClusterReseed => SpawnPlan::none(),
        RespawnPolicy::Teleport => SpawnPlan {
            count: 1,
            reseed_cluster: false,
            teleport_from: Some(target.position),
        },
        RespawnPolicy::Fresh => SpawnPlan::fresh(1),
    }
}

/// Plan after `target` ran out of lifetime. `live_count` excludes it.
pub fn on_expire(mode: GameMode, _target: &Target, live_count: usize) -> SpawnPlan {
    let config = ModeConfig::for_mode(mode);
    if config.lifetime_ms.is_none() {
        return SpawnPlan::none();
    }
    match config.respawn {
        RespawnPolicy::ClusterReseed if live_count == 0 => SpawnPlan::cluster(),
        RespawnPolicy::ClusterReseed => SpawnPlan::none(),
        _ => SpawnPlan::fresh(1),
    }
}

/// Carry out a plan for the active mode. Returns the ids that spawned;
/// placements that find no room are skipped.
pub fn execute(state: &mut GameState, plan: &SpawnPlan) -> Vec<u32> {
    let config = ModeConfig::for_mode(state.session.active_mode);
    if plan.reseed_cluster && config.layout == Layout::MovingCluster {
        state.history.randomize_cluster(&mut state.rng);
    }

    let mut spawned = Vec::new();
    for _ in 0..plan.count {
        let existing = state.live_positions();
        let Some(position) = placement::place(
            config.strategy,
            &existing,
            state.settings.target_size,
            &mut state.history,
            &mut state.rng,
        ) else {
            continue;
        };

        let id = state.session.next_target_id();
        let mut target = Target::new(id, position, config.species, state.sim_time_ms);
        state.motion.register(&mut target, &mut state.rng);

        if let Some(from) = plan.teleport_from {
            let effect_id = state.session.next_effect_id();
            let color = state.settings.enemy_outline_color.clone();
            state
                .effects
                .push(Effect::teleport_trail(effect_id, from, position, &color));
        }

        state.targets.push(target);
        spawned.push(id);
    }
    spawned
}

/// Switch the active behavior mode: wipe the field and run its initial plan
pub fn enter_mode(state: &mut GameState, mode: GameMode) -> Vec<u32> {
    state.clear_field();
    state.session.active_mode = mode;
    log::info!("Active mode: {}", mode.as_str());
    execute(state, &on_mode_enter(mode))
}
