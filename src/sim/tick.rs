//! Per-frame simulation tick
//!
//! Frame driver that applies player commands, advances the session clock,
//! moves targets and resolves fire. Variable `dt`, seeded RNG, stable
//! iteration order.

use rand::Rng;

use super::clock::ClockSignal;
use super::combat::{resolve_hit, resolve_miss};
use super::modes::{self, enter_mode};
use super::motion::{self, MotionParams};
use super::state::{GameMode, GamePhase, GameState, RayHit, SessionStats};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a session in this mode (from the menu or results screen)
    pub start: Option<GameMode>,
    /// Restart the current session in the same mode
    pub restart: bool,
    /// Resume after a pause (aim lock regained)
    pub resume: bool,
    /// Back to the menu
    pub go_home: bool,
    /// Aim lock was lost
    pub lock_lost: bool,
    /// Trigger went down this frame
    pub trigger_pressed: bool,
    /// Trigger is down (tracking auto-fire)
    pub trigger_held: bool,
    /// What the center ray hits this frame, as reported by the renderer
    pub aim: Option<RayHit>,
}

/// Begin a session in `mode`. Accepted from the menu and results screen.
pub fn start_session(state: &mut GameState, mode: GameMode) -> bool {
    if !matches!(state.phase(), GamePhase::Menu | GamePhase::Finished) {
        return false;
    }
    state.session.selected_mode = mode;
    begin_countdown(state);
    true
}

/// Re-enter the countdown with zeroed stats and the same selected mode
pub fn restart_session(state: &mut GameState) -> bool {
    if !state.clock.can_restart() {
        return false;
    }
    begin_countdown(state);
    true
}

/// PAUSED -> PLAYING. Seeds the field if the pause interrupted the
/// countdown before any target spawned.
pub fn resume(state: &mut GameState) -> bool {
    if !state.clock.resume() {
        return false;
    }
    log::info!("Resumed");
    if state.targets.is_empty() {
        let mode = state.session.active_mode;
        enter_mode(state, mode);
    }
    true
}

pub fn go_home(state: &mut GameState) -> bool {
    if state.phase() == GamePhase::Menu {
        return false;
    }
    state.clock.go_home();
    state.clear_field();
    log::info!("Back to menu");
    true
}

pub fn pointer_lock_lost(state: &mut GameState) -> bool {
    if !state.clock.lock_lost() {
        return false;
    }
    state.last_auto_fire_ms = None;
    log::info!("Paused (aim lock lost)");
    true
}

fn begin_countdown(state: &mut GameState) {
    let selected = state.session.selected_mode;
    state.clock.start(selected.is_marathon(), state.settings.duration);
    state.session.stats = SessionStats::new(selected, state.sim_time_ms);
    state.session.active_mode = if selected.is_marathon() {
        GameMode::GridShot
    } else {
        selected
    };
    state.clear_field();
    log::info!("Countdown: {}", selected.as_str());
}

fn finish_session(state: &mut GameState) {
    state.clock.finish();
    state.session.stats.end_ms = state.sim_time_ms;
    state.last_auto_fire_ms = None;
    let stats = &state.session.stats;
    log::info!(
        "Finished {}: score {}, accuracy {:.1}% ({} / {})",
        stats.mode.as_str(),
        stats.score,
        stats.accuracy,
        stats.hits,
        stats.total_clicks
    );
}

fn switch_marathon_mode(state: &mut GameState) {
    let rotation = GameMode::MARATHON_ROTATION;
    let next = rotation[state.rng.random_range(0..rotation.len())];
    log::info!("Marathon switch: {} -> {}", state.session.active_mode.as_str(), next.as_str());
    enter_mode(state, next);
}

fn apply_clock_signals(state: &mut GameState, dt_ms: f64) -> bool {
    let mut changed = false;
    for event in state.clock.advance(dt_ms) {
        if !state.clock.accepts(&event) {
            log::debug!("dropping stale clock signal {:?}", event.signal);
            continue;
        }
        changed = true;
        match event.signal {
            ClockSignal::CountdownTick { remaining } => {
                log::debug!("Countdown {}", remaining);
            }
            ClockSignal::Started => {
                log::info!("Playing");
                state.session.stats.start_ms = state.sim_time_ms;
                let mode = state.session.active_mode;
                enter_mode(state, mode);
            }
            ClockSignal::Finished => finish_session(state),
            ClockSignal::MarathonSwitch => switch_marathon_mode(state),
        }
    }
    changed
}

/// Remove a blink target whose lifetime ran out, count it as a miss and
/// run the expiry plan
fn expire_target(state: &mut GameState, id: u32) {
    let Some(index) = state.targets.iter().position(|t| t.id == id) else {
        return;
    };
    let target = state.targets.remove(index);
    state.motion.remove(id);
    state.session.stats.record_miss();
    log::debug!("target {} expired", id);

    let plan = modes::on_expire(state.session.active_mode, &target, state.targets.len());
    modes::execute(state, &plan);
}

/// One tracking auto-fire shot against the current aim. A ray that found a
/// target no longer live is dropped without touching the stats.
fn fire_tracking(state: &mut GameState, aim: Option<RayHit>, audio: &mut dyn AudioSink) {
    match aim {
        Some(hit) => {
            resolve_hit(state, hit, audio);
            audio.play(SoundEffect::BodyHit, 0.5);
        }
        None => {
            resolve_miss(state);
        }
    }
}

/// One trigger press in any other mode
fn fire_once(state: &mut GameState, aim: Option<RayHit>, audio: &mut dyn AudioSink) {
    audio.play(SoundEffect::Shoot, 1.0);
    match aim {
        Some(hit) => {
            resolve_hit(state, hit, audio);
        }
        None => {
            resolve_miss(state);
        }
    }
}

fn handle_fire(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioSink) -> bool {
    if state.session.active_mode == GameMode::Tracking {
        if !(input.trigger_held || input.trigger_pressed) {
            state.last_auto_fire_ms = None;
            return false;
        }
        let due = state
            .last_auto_fire_ms
            .is_none_or(|last| state.sim_time_ms - last >= TRACKING_FIRE_INTERVAL_MS);
        if !due {
            return false;
        }
        state.last_auto_fire_ms = Some(state.sim_time_ms);
        fire_tracking(state, input.aim, audio);
        return true;
    }

    if input.trigger_pressed {
        fire_once(state, input.aim, audio);
        return true;
    }
    false
}

/// Advance the game by one frame of `dt` seconds.
///
/// Returns true if anything observable changed.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, audio: &mut dyn AudioSink) -> bool {
    let mut changed = false;

    // Commands
    if let Some(mode) = input.start {
        changed |= start_session(state, mode);
    }
    if input.restart {
        changed |= restart_session(state);
    }
    if input.resume {
        changed |= resume(state);
    }
    if input.go_home {
        changed |= go_home(state);
    }
    if input.lock_lost {
        changed |= pointer_lock_lost(state);
    }

    // Clock
    let dt_ms = f64::from(dt) * 1000.0;
    let was_playing = state.phase() == GamePhase::Playing;
    if was_playing {
        state.sim_time_ms += dt_ms;
    }
    changed |= apply_clock_signals(state, dt_ms);

    if state.phase() == GamePhase::Playing {
        // Motion and expiry
        let params = MotionParams {
            tracking_jump: state.settings.tracking_jump,
        };
        let expired = motion::update(
            &mut state.targets,
            &mut state.motion,
            params,
            state.sim_time_ms,
            dt,
            &mut state.rng,
        );
        changed |= !state.targets.is_empty();
        for id in expired {
            expire_target(state, id);
        }

        changed |= handle_fire(state, input, audio);
    }

    // Effects
    if !state.effects.is_empty() {
        state.effects.retain_mut(|e| e.decay(dt));
        changed = true;
    }

    state.normalize_order();
    changed
}
