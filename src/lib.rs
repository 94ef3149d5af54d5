//! LiteAim - first-person aim trainer core
//!
//! Core modules:
//! - `sim`: Target spawning, combat resolution, motion and session clock
//! - `settings`: Flat settings record shared with the frontend
//! - `crosshair`: Crosshair share-code decoder
//! - `audio`: Sound effect kinds, tone recipes and the audio sink seam

pub mod audio;
pub mod crosshair;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, AudioSink, NullAudio, SoundEffect};
pub use crosshair::{CrosshairPatch, ImportError, import_crosshair_code, parse_crosshair_code};
pub use settings::{Language, Settings, SettingsError};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Depth every target spawns at (in front of the camera)
    pub const SPAWN_DEPTH: f32 = -12.0;
    /// Minimum xy spacing between targets at target size 1.0
    pub const MIN_SPACING: f32 = 1.3;

    /// Placement attempts before giving up
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 150;
    /// First attempt of the relaxed stage
    pub const RELAXED_STAGE_START: u32 = 60;
    /// First attempt of the full-canvas fallback stage
    pub const FALLBACK_STAGE_START: u32 = 120;

    /// Hit points per species
    pub const SPHERE_HP: u32 = 1;
    pub const HUMAN_HP: u32 = 2;
    pub const TRACKING_HP: u32 = 50;

    /// Points for a kill (or a head tick in tracking)
    pub const KILL_POINTS: u32 = 100;
    /// Points for a body tick in tracking
    pub const TRACKING_BODY_POINTS: u32 = 50;
    /// Nominal damage of an instakill headshot
    pub const HEADSHOT_DAMAGE: u32 = 100;

    /// Blink target lifetime (ms)
    pub const BLINK_LIFETIME_MS: f64 = 1100.0;
    /// Final window of a blink lifetime in which the target shrinks (ms)
    pub const BLINK_SHRINK_MS: f64 = 200.0;
    /// Targets spawned per blink cluster
    pub const BLINK_CLUSTER_SIZE: u32 = 3;

    /// Tracking target physics (units, seconds)
    pub const GRAVITY: f32 = 35.0;
    pub const JUMP_IMPULSE: f32 = 14.0;
    pub const GROUND_LEVEL: f32 = -2.0;
    pub const STRAFE_BOUND: f32 = 16.0;
    pub const STRAFE_SPEED: f32 = 10.0;
    pub const INITIAL_STRAFE_SPEED: f32 = 8.0;
    /// Jump chance per reference frame while grounded
    pub const JUMP_CHANCE: f32 = 0.003;
    /// Chance per reference frame to restart a stalled strafe
    pub const RESTART_CHANCE: f32 = 0.05;
    /// Frame rate the per-frame chances were tuned at
    pub const REFERENCE_FPS: f32 = 60.0;

    /// Session timing
    pub const COUNTDOWN_START: u32 = 3;
    pub const COUNTDOWN_STEP_MS: f64 = 1000.0;
    pub const DURATION_STEP_MS: f64 = 100.0;
    pub const MARATHON_SWITCH_MS: f64 = 15_000.0;
    /// Auto-fire interval while the trigger is held in tracking
    pub const TRACKING_FIRE_INTERVAL_MS: f64 = 60.0;

    /// Effect lifetimes
    pub const EXPLOSION_LIFE: f32 = 0.8;
    pub const TRAIL_START_OPACITY: f32 = 0.6;
    pub const TRAIL_FADE_RATE: f32 = 2.5;

    /// Explosion tint for headshot kills
    pub const HEADSHOT_COLOR: &str = "#fbbf24";
}

/// Drop the depth axis of a world position
#[inline]
pub fn xy(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.y)
}

/// Squared distance between two positions ignoring depth
#[inline]
pub fn xy_distance_sq(a: Vec3, b: Vec3) -> f32 {
    xy(a).distance_squared(xy(b))
}

/// Convert a per-frame probability tuned at `REFERENCE_FPS` into the
/// probability for a frame of `dt` seconds
#[inline]
pub fn chance_for_dt(per_frame: f32, dt: f32) -> f32 {
    1.0 - (1.0 - per_frame).powf(dt * consts::REFERENCE_FPS)
}
