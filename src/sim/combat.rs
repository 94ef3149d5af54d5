//! Hit and miss resolution
//!
//! [`assess`] is the pure damage/points table; [`resolve_hit`] applies it to
//! the live target, scores it, plays the matching sound and handles death
//! (explosion, removal, respawn plan).

use super::hitbox::head_center;
use super::modes::{self, DamageModel, ModeConfig};
use super::state::{Effect, GamePhase, GameState, HitPart, RayHit};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;

/// What a single hit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub points_awarded: u32,
    pub target_died: bool,
    /// Nominal damage; a headshot instakill reports 100 even though hp
    /// saturates at zero
    pub damage_applied: u32,
    pub part: HitPart,
}

/// Damage and points for one hit before it is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub damage: u32,
    pub lethal: bool,
    pub points: u32,
}

/// Damage table for a hit on `part` of a target with `hp` left
pub fn assess(model: DamageModel, part: HitPart, hp: u32) -> Assessment {
    match model {
        DamageModel::Tracking => {
            let (damage, points) = match part {
                HitPart::Head => (2, KILL_POINTS),
                HitPart::Body | HitPart::Sphere => (1, TRACKING_BODY_POINTS),
            };
            Assessment {
                damage,
                lethal: hp <= damage,
                points,
            }
        }
        DamageModel::PartBased => match part {
            HitPart::Head => Assessment {
                damage: HEADSHOT_DAMAGE,
                lethal: true,
                points: KILL_POINTS,
            },
            HitPart::Body | HitPart::Sphere => {
                let lethal = hp <= 1;
                Assessment {
                    damage: 1,
                    lethal,
                    // Wounding a human scores nothing
                    points: if lethal { KILL_POINTS } else { 0 },
                }
            }
        },
        DamageModel::Lethal => Assessment {
            damage: hp.max(1),
            lethal: true,
            points: KILL_POINTS,
        },
    }
}

/// Apply a hit on a live target.
///
/// Returns `None` (and changes nothing) when the session is not playing or
/// the id is not live.
pub fn resolve_hit(state: &mut GameState, hit: RayHit, audio: &mut dyn AudioSink) -> Option<HitOutcome> {
    if state.phase() != GamePhase::Playing {
        log::debug!("ignoring hit on {} outside play", hit.target_id);
        return None;
    }
    let Some(index) = state.targets.iter().position(|t| t.id == hit.target_id) else {
        log::debug!("ignoring hit on unknown target {}", hit.target_id);
        return None;
    };

    let mode = state.session.active_mode;
    let config = ModeConfig::for_mode(mode);

    let target = &mut state.targets[index];
    let a = assess(config.damage, hit.part, target.hp);
    let died = target.apply_damage(a.damage);
    let position = target.position;

    state.session.stats.record_hit(a.points);
    play_hit_sound(config.damage, hit.part, died, audio);

    if !died {
        state.motion.on_damaged(hit.target_id);
        return Some(HitOutcome {
            points_awarded: a.points,
            target_died: false,
            damage_applied: a.damage,
            part: hit.part,
        });
    }

    let (explosion_at, color) = if hit.part == HitPart::Head {
        (
            head_center(position, state.settings.target_size),
            HEADSHOT_COLOR.to_string(),
        )
    } else {
        (position, state.settings.target_color.clone())
    };
    let effect_id = state.session.next_effect_id();
    state
        .effects
        .push(Effect::explosion(effect_id, explosion_at, &color));

    let dead = state.targets.remove(index);
    state.motion.remove(dead.id);
    let plan = modes::on_death(mode, &dead, state.targets.len());
    modes::execute(state, &plan);

    Some(HitOutcome {
        points_awarded: a.points,
        target_died: true,
        damage_applied: a.damage,
        part: hit.part,
    })
}

/// Count a shot that hit nothing. Returns false outside play.
pub fn resolve_miss(state: &mut GameState) -> bool {
    if state.phase() != GamePhase::Playing {
        return false;
    }
    state.session.stats.record_miss();
    true
}

fn play_hit_sound(model: DamageModel, part: HitPart, died: bool, audio: &mut dyn AudioSink) {
    if model == DamageModel::Tracking {
        if part == HitPart::Head {
            audio.play(SoundEffect::Headshot, 0.5);
        }
        if died {
            audio.play(SoundEffect::Hit, 1.0);
        }
        return;
    }

    let effect = match (part, died) {
        (HitPart::Head, true) => SoundEffect::Headshot,
        (_, true) => SoundEffect::Hit,
        (_, false) => SoundEffect::BodyHit,
    };
    audio.play(effect, 1.0);
}
