//! Per-frame motion for live targets
//!
//! One update pass dispatches on [`Species`]. Anything a species needs
//! beyond the shared [`Target`] record (spawn scale, damage flash, strafe
//! timer) lives in a [`MotionTable`] keyed by target id.

use std::collections::BTreeMap;

use glam::Vec3;
use rand::Rng;

use super::state::{Species, Target};
use crate::chance_for_dt;
use crate::consts::*;

/// Scale-in rate for sphere targets (per second)
const SPHERE_GROW_RATE: f32 = 12.0;
/// Scale-in rate for blink targets (per second)
const BLINK_GROW_RATE: f32 = 15.0;
/// Flash decay rates (per second)
const HUMAN_FLASH_DECAY: f32 = 5.0;
const TRACKING_FLASH_DECAY: f32 = 10.0;

/// Strafe decision timer for a tracking target
#[derive(Debug, Clone, PartialEq)]
pub struct StrafeAi {
    /// Simulation time (seconds) of the next direction decision
    pub next_turn_s: f64,
    pub grounded: bool,
}

/// Animation and AI side state for one target
#[derive(Debug, Clone, PartialEq)]
pub struct MotionState {
    /// 0..1 spawn scale, shrinks back to 0 at the end of a blink lifetime
    pub scale: f32,
    /// 0..1 white flash after taking damage
    pub flash: f32,
    /// Blink expiry already reported
    pub expired: bool,
    pub strafe: Option<StrafeAi>,
}

/// Motion side table, keyed by target id
#[derive(Debug, Clone, Default)]
pub struct MotionTable {
    states: BTreeMap<u32, MotionState>,
}

impl MotionTable {
    /// Start tracking a freshly spawned target. Tracking targets get their
    /// initial strafe direction here.
    pub fn register<R: Rng>(&mut self, target: &mut Target, rng: &mut R) {
        let strafe = if target.species == Species::Tracking {
            let dir = random_sign(rng);
            target.velocity = Some(Vec3::new(dir * INITIAL_STRAFE_SPEED, 0.0, 0.0));
            Some(StrafeAi {
                next_turn_s: 0.0,
                grounded: false,
            })
        } else {
            None
        };

        self.states.insert(
            target.id,
            MotionState {
                scale: 0.0,
                flash: 0.0,
                expired: false,
                strafe,
            },
        );
    }

    pub fn remove(&mut self, id: u32) {
        self.states.remove(&id);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn get(&self, id: u32) -> Option<&MotionState> {
        self.states.get(&id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Kick off the white damage flash
    pub fn on_damaged(&mut self, id: u32) {
        if let Some(state) = self.states.get_mut(&id) {
            state.flash = 1.0;
        }
    }
}

/// Settings that influence motion
#[derive(Debug, Clone, Copy)]
pub struct MotionParams {
    /// Tracking targets may jump
    pub tracking_jump: bool,
}

/// Advance every live target by `dt` seconds.
///
/// Returns the ids of blink targets whose lifetime ran out this frame. Each
/// id is reported once; removing it is up to the caller.
pub fn update<R: Rng>(
    targets: &mut [Target],
    table: &mut MotionTable,
    params: MotionParams,
    now_ms: f64,
    dt: f32,
    rng: &mut R,
) -> Vec<u32> {
    let now_s = now_ms / 1000.0;
    let mut expired = Vec::new();

    for target in targets.iter_mut() {
        let Some(state) = table.states.get_mut(&target.id) else {
            continue;
        };

        match target.species {
            Species::Sphere => {
                state.scale = (state.scale + dt * SPHERE_GROW_RATE).min(1.0);
                bob(target, now_s, 2.0, 0.1);
            }
            Species::Blink => {
                if update_blink(target, state, now_ms, dt) {
                    expired.push(target.id);
                }
                bob(target, now_s, 2.0, 0.1);
            }
            Species::Human => {
                state.scale = 1.0;
                state.flash = (state.flash - dt * HUMAN_FLASH_DECAY).max(0.0);
                bob(target, now_s, 3.0, 0.05);
            }
            Species::Tracking => {
                state.scale = 1.0;
                state.flash = (state.flash - dt * TRACKING_FLASH_DECAY).max(0.0);
                update_tracking(target, state, params, now_s, dt, rng);
            }
        }
    }

    expired
}

/// Vertical sine bob around the spawn anchor, phase-shifted by id
fn bob(target: &mut Target, now_s: f64, frequency: f64, amplitude: f32) {
    let phase = (now_s * frequency + f64::from(target.id)).sin() as f32;
    target.position.y = target.anchor.y + phase * amplitude;
}

/// Scale animation and lifetime for a blink target. Returns true on the
/// frame its lifetime runs out.
fn update_blink(target: &Target, state: &mut MotionState, now_ms: f64, dt: f32) -> bool {
    if state.expired {
        return false;
    }

    let elapsed = now_ms - target.spawn_time_ms;
    if elapsed > BLINK_LIFETIME_MS - BLINK_SHRINK_MS {
        let remaining = BLINK_LIFETIME_MS - elapsed;
        state.scale = (remaining / BLINK_SHRINK_MS).max(0.0) as f32;
    } else {
        state.scale = (state.scale + dt * BLINK_GROW_RATE).min(1.0);
    }

    if elapsed > BLINK_LIFETIME_MS {
        state.expired = true;
        return true;
    }
    false
}

/// Gravity, bounds and strafe/jump AI for a tracking target
fn update_tracking<R: Rng>(
    target: &mut Target,
    state: &mut MotionState,
    params: MotionParams,
    now_s: f64,
    dt: f32,
    rng: &mut R,
) {
    let mut velocity = target.velocity.unwrap_or(Vec3::ZERO);

    velocity.y -= GRAVITY * dt;
    target.position += velocity * dt;

    let mut grounded = false;
    if target.position.y <= GROUND_LEVEL {
        target.position.y = GROUND_LEVEL;
        velocity.y = 0.0;
        grounded = true;
    }

    if target.position.x > STRAFE_BOUND {
        target.position.x = STRAFE_BOUND;
        velocity.x = -velocity.x.abs();
    } else if target.position.x < -STRAFE_BOUND {
        target.position.x = -STRAFE_BOUND;
        velocity.x = velocity.x.abs();
    }

    if grounded && params.tracking_jump && rng.random::<f32>() < chance_for_dt(JUMP_CHANCE, dt) {
        velocity.y = JUMP_IMPULSE;
        grounded = false;
    }

    if let Some(ai) = state.strafe.as_mut() {
        ai.grounded = grounded;
        if now_s > ai.next_turn_s {
            ai.next_turn_s = now_s + 0.5 + rng.random::<f64>() * 1.5;
            if rng.random::<f32>() < 0.2 {
                velocity.x = 0.0;
            } else {
                let speed = STRAFE_SPEED * (0.8 + rng.random::<f32>() * 0.4);
                velocity.x = random_sign(rng) * speed;
            }
        } else if velocity.x.abs() < 0.1 && rng.random::<f32>() < chance_for_dt(RESTART_CHANCE, dt) {
            velocity.x = random_sign(rng) * STRAFE_SPEED;
        }
    }

    target.velocity = Some(velocity);
}

fn random_sign<R: Rng>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}
