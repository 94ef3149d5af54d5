//! Game state and core simulation types
//!
//! Everything the frame driver mutates lives on [`GameState`]. Rendering and
//! audio only ever see it read-only through [`GameState::render_view`] and
//! [`GameState::effects`].

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SessionClock;
use super::motion::MotionTable;
use super::placement::PlacementHistory;
use crate::consts::*;
use crate::settings::Settings;

/// Selectable training modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    Standard,
    #[default]
    GridShot,
    SpiderShot,
    MicroShot,
    BlinkShot,
    HumanStrafe,
    Tracking,
    /// Cycles through the other behavior modes every 15 seconds
    Marathon,
}

impl GameMode {
    /// Behavior modes Marathon picks from
    pub const MARATHON_ROTATION: [GameMode; 6] = [
        GameMode::GridShot,
        GameMode::MicroShot,
        GameMode::SpiderShot,
        GameMode::BlinkShot,
        GameMode::HumanStrafe,
        GameMode::Tracking,
    ];

    pub fn is_marathon(self) -> bool {
        self == GameMode::Marathon
    }

    /// Target archetype spawned while this mode is the active behavior
    pub fn species(self) -> Species {
        match self {
            GameMode::BlinkShot => Species::Blink,
            GameMode::HumanStrafe => Species::Human,
            GameMode::Tracking => Species::Tracking,
            _ => Species::Sphere,
        }
    }

    /// Parse a mode name as typed on a command line ("gridshot", "human_strafe", ...)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "standard" => Some(GameMode::Standard),
            "grid" | "gridshot" => Some(GameMode::GridShot),
            "spider" | "spidershot" => Some(GameMode::SpiderShot),
            "micro" | "microshot" => Some(GameMode::MicroShot),
            "blink" | "blinkshot" => Some(GameMode::BlinkShot),
            "human" | "humanstrafe" => Some(GameMode::HumanStrafe),
            "tracking" => Some(GameMode::Tracking),
            "marathon" => Some(GameMode::Marathon),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Standard => "Standard",
            GameMode::GridShot => "Gridshot",
            GameMode::SpiderShot => "Spidershot",
            GameMode::MicroShot => "Microshot",
            GameMode::BlinkShot => "Blinkshot",
            GameMode::HumanStrafe => "Human Strafe",
            GameMode::Tracking => "Tracking",
            GameMode::Marathon => "Marathon",
        }
    }
}

/// Behavioral/visual archetype of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    /// Bobbing sphere (Standard, Grid, Spider, Micro)
    Sphere,
    /// Sphere with a fixed lifetime (Blink)
    Blink,
    /// Static humanoid with head and body zones
    Human,
    /// Strafing, jumping humanoid
    Tracking,
}

impl Species {
    pub fn max_hp(self) -> u32 {
        match self {
            Species::Sphere | Species::Blink => SPHERE_HP,
            Species::Human => HUMAN_HP,
            Species::Tracking => TRACKING_HP,
        }
    }

    /// Humanoids expose separate head and body hit zones
    pub fn is_humanoid(self) -> bool {
        matches!(self, Species::Human | Species::Tracking)
    }
}

/// Which zone of a target the hit-scan ray intersected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitPart {
    Head,
    Body,
    Sphere,
}

/// Intersection reported for the ray from screen center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RayHit {
    pub target_id: u32,
    pub part: HitPart,
}

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Menu,
    /// 3..1 before play starts
    Countdown,
    Playing,
    /// Entered when the aim lock is lost
    Paused,
    /// Duration ran out
    Finished,
}

/// One live target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub position: Vec3,
    /// Spawn position; bob animations oscillate around it
    pub anchor: Vec3,
    pub hp: u32,
    pub max_hp: u32,
    /// Only tracking targets carry a velocity
    pub velocity: Option<Vec3>,
    /// Simulation time at spawn (ms)
    pub spawn_time_ms: f64,
    pub species: Species,
}

impl Target {
    pub fn new(id: u32, position: Vec3, species: Species, spawn_time_ms: f64) -> Self {
        let max_hp = species.max_hp();
        Self {
            id,
            position,
            anchor: position,
            hp: max_hp,
            max_hp,
            velocity: (species == Species::Tracking).then_some(Vec3::ZERO),
            spawn_time_ms,
            species,
        }
    }

    /// Subtract damage, saturating at zero. Returns true if this was lethal.
    pub fn apply_damage(&mut self, damage: u32) -> bool {
        self.hp = self.hp.saturating_sub(damage);
        self.hp == 0
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Kind-specific payload of a transient visual effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    Explosion { position: Vec3 },
    TeleportTrail { start: Vec3, end: Vec3 },
}

/// Cosmetic effect handed to the renderer; not gameplay relevant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: u32,
    pub kind: EffectKind,
    pub color: String,
    /// Explosions: seconds left. Trails: current opacity.
    pub life: f32,
}

impl Effect {
    pub fn explosion(id: u32, position: Vec3, color: &str) -> Self {
        Self {
            id,
            kind: EffectKind::Explosion { position },
            color: color.to_string(),
            life: EXPLOSION_LIFE,
        }
    }

    pub fn teleport_trail(id: u32, start: Vec3, end: Vec3, color: &str) -> Self {
        Self {
            id,
            kind: EffectKind::TeleportTrail { start, end },
            color: color.to_string(),
            life: TRAIL_START_OPACITY,
        }
    }

    /// Age the effect. Returns false once it should be dropped.
    pub fn decay(&mut self, dt: f32) -> bool {
        let rate = match self.kind {
            EffectKind::Explosion { .. } => 1.0,
            EffectKind::TeleportTrail { .. } => TRAIL_FADE_RATE,
        };
        self.life = (self.life - dt * rate).max(0.0);
        self.life > 0.0
    }
}

/// Running score and accuracy for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u64,
    pub total_clicks: u32,
    pub hits: u32,
    pub misses: u32,
    /// Percent, 100 when nothing has been fired yet
    pub accuracy: f32,
    pub start_ms: f64,
    pub end_ms: f64,
    /// Selected mode (Marathon stays Marathon)
    pub mode: GameMode,
}

impl SessionStats {
    pub fn new(mode: GameMode, start_ms: f64) -> Self {
        Self {
            score: 0,
            total_clicks: 0,
            hits: 0,
            misses: 0,
            accuracy: 100.0,
            start_ms,
            end_ms: 0.0,
            mode,
        }
    }

    pub fn record_hit(&mut self, points: u32) {
        self.hits += 1;
        self.total_clicks += 1;
        self.score += u64::from(points);
        self.recompute_accuracy();
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.total_clicks += 1;
        self.recompute_accuracy();
    }

    fn recompute_accuracy(&mut self) {
        self.accuracy = if self.total_clicks > 0 {
            self.hits as f32 / self.total_clicks as f32 * 100.0
        } else {
            100.0
        };
    }
}

/// Mode selection, counters and id allocation for the current session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub selected_mode: GameMode,
    /// Mode whose rules currently apply; differs from `selected_mode` only
    /// under Marathon
    pub active_mode: GameMode,
    pub stats: SessionStats,
    next_target_id: u32,
    next_effect_id: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            selected_mode: GameMode::GridShot,
            active_mode: GameMode::GridShot,
            stats: SessionStats::new(GameMode::GridShot, 0.0),
            next_target_id: 0,
            next_effect_id: 0,
        }
    }
}

impl Session {
    /// Allocate a target id (never reused)
    pub fn next_target_id(&mut self) -> u32 {
        let id = self.next_target_id;
        self.next_target_id += 1;
        id
    }

    /// Allocate an effect id (never reused)
    pub fn next_effect_id(&mut self) -> u32 {
        let id = self.next_effect_id;
        self.next_effect_id += 1;
        id
    }
}

/// Per-frame snapshot of one target for the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetView {
    pub id: u32,
    pub position: Vec3,
    pub hp: u32,
    pub max_hp: u32,
    pub species: Species,
    /// Spawn/shrink animation scale (0-1), multiply by target size
    pub scale: f32,
    /// Damage flash intensity (0-1)
    pub flash: f32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Single random source for placement, AI and Marathon picks
    pub rng: Pcg32,
    pub settings: Settings,
    pub session: Session,
    pub clock: SessionClock,
    /// Live targets (sorted by id)
    pub targets: Vec<Target>,
    pub effects: Vec<Effect>,
    pub history: PlacementHistory,
    pub motion: MotionTable,
    /// Simulation time (ms); only advances while playing
    pub sim_time_ms: f64,
    /// Time of the last tracking auto-fire shot while the trigger is held
    pub last_auto_fire_ms: Option<f64>,
}

impl GameState {
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            session: Session::default(),
            clock: SessionClock::new(),
            targets: Vec::new(),
            effects: Vec::new(),
            history: PlacementHistory::default(),
            motion: MotionTable::default(),
            sim_time_ms: 0.0,
            last_auto_fire_ms: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.clock.phase()
    }

    pub fn target(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Positions of every live target, for placement spacing checks
    pub fn live_positions(&self) -> Vec<Vec3> {
        self.targets.iter().map(|t| t.position).collect()
    }

    /// Drop all targets, effects, motion side state and placement history
    pub fn clear_field(&mut self) {
        self.targets.clear();
        self.effects.clear();
        self.motion.clear();
        self.history.reset();
        self.last_auto_fire_ms = None;
    }

    /// Ordered list of targets with their animation state
    pub fn render_view(&self) -> Vec<TargetView> {
        self.targets
            .iter()
            .map(|t| {
                let (scale, flash) = self
                    .motion
                    .get(t.id)
                    .map(|m| (m.scale, m.flash))
                    .unwrap_or((1.0, 0.0));
                TargetView {
                    id: t.id,
                    position: t.position,
                    hp: t.hp,
                    max_hp: t.max_hp,
                    species: t.species,
                    scale,
                    flash,
                }
            })
            .collect()
    }

    /// Ensure targets and effects are sorted by id for stable iteration
    pub fn normalize_order(&mut self) {
        self.targets.sort_by_key(|t| t.id);
        self.effects.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_defaults_to_100() {
        let stats = SessionStats::new(GameMode::GridShot, 0.0);
        assert_eq!(stats.total_clicks, 0);
        assert_eq!(stats.accuracy, 100.0);
    }

    #[test]
    fn test_accuracy_tracks_hits_and_misses() {
        let mut stats = SessionStats::new(GameMode::GridShot, 0.0);
        stats.record_hit(100);
        stats.record_miss();
        stats.record_hit(0);
        stats.record_miss();
        assert_eq!(stats.hits + stats.misses, stats.total_clicks);
        assert_eq!(stats.score, 100);
        assert!((stats.accuracy - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_damage_saturates_at_zero() {
        let mut target = Target::new(0, Vec3::ZERO, Species::Human, 0.0);
        assert_eq!(target.hp, 2);
        assert!(target.apply_damage(HEADSHOT_DAMAGE));
        assert_eq!(target.hp, 0);
        assert!(!target.is_alive());
    }

    #[test]
    fn test_only_tracking_has_velocity() {
        assert!(Target::new(0, Vec3::ZERO, Species::Tracking, 0.0).velocity.is_some());
        assert!(Target::new(1, Vec3::ZERO, Species::Sphere, 0.0).velocity.is_none());
        assert!(Target::new(2, Vec3::ZERO, Species::Human, 0.0).velocity.is_none());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut session = Session::default();
        let a = session.next_target_id();
        let b = session.next_target_id();
        assert!(b > a);
        assert_eq!(session.next_effect_id(), 0);
        assert_eq!(session.next_effect_id(), 1);
    }

    #[test]
    fn test_trail_fades_faster_than_explosion() {
        let mut trail = Effect::teleport_trail(0, Vec3::ZERO, Vec3::X, "#ffff00");
        let mut boom = Effect::explosion(1, Vec3::ZERO, "#06b6d4");
        assert!(!trail.decay(0.25));
        assert!(boom.decay(0.25));
        assert!(!boom.decay(1.0));
    }

    #[test]
    fn test_mode_from_name() {
        assert_eq!(GameMode::from_name("Human_Strafe"), Some(GameMode::HumanStrafe));
        assert_eq!(GameMode::from_name("gridshot"), Some(GameMode::GridShot));
        assert_eq!(GameMode::from_name("blink-shot"), Some(GameMode::BlinkShot));
        assert_eq!(GameMode::from_name("flickshot"), None);
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&GameMode::HumanStrafe).unwrap();
        assert_eq!(json, "\"HUMAN_STRAFE\"");
        let back: GameMode = serde_json::from_str("\"BLINK_SHOT\"").unwrap();
        assert_eq!(back, GameMode::BlinkShot);
    }
}
