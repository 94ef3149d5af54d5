//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Time only through explicit `dt`
//! - Stable iteration order (by target id)
//! - No rendering, audio backend or platform dependencies

pub mod clock;
pub mod combat;
pub mod hitbox;
pub mod modes;
pub mod motion;
pub mod placement;
pub mod state;
pub mod tick;

pub use clock::{ClockEvent, ClockSignal, SessionClock};
pub use combat::{HitOutcome, assess, resolve_hit, resolve_miss};
pub use hitbox::raycast;
pub use modes::{DamageModel, Layout, ModeConfig, RespawnPolicy, SpawnPlan, enter_mode};
pub use motion::{MotionParams, MotionState, MotionTable};
pub use placement::{PlacementHistory, PlacementStrategy, place};
pub use state::{
    Effect, EffectKind, GameMode, GamePhase, GameState, HitPart, RayHit, Session, SessionStats,
    Species, Target, TargetView,
};
pub use tick::{
    TickInput, go_home, pointer_lock_lost, restart_session, resume, start_session, tick,
};
