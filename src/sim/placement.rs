//! Spawn placement with rejection sampling
//!
//! Every mode draws candidates from its own distribution and rejects any
//! candidate closer than `1.3 * target_size` (in the xy plane) to a live
//! target. Cluster-style modes relax their distribution in stages so a
//! crowded field still finds room before the attempt budget runs out.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::GameMode;
use crate::consts::*;
use crate::xy;

/// Grid anchor columns and rows for Gridshot
const GRID_COLUMNS: [f32; 5] = [-6.0, -3.0, 0.0, 3.0, 6.0];
const GRID_ROWS: [f32; 3] = [-3.0, 0.0, 3.0];

/// Candidate distribution used by a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStrategy {
    /// Uniform over the whole wall
    Scatter,
    /// Jittered 5x3 grid anchors
    Grid,
    /// Alternate between the center and a ring around it
    Spider,
    /// Small hops around the previous spawn
    Micro,
    /// Jitter around a cluster origin
    Cluster,
    /// Ground line for human strafe
    Strafe,
    /// Ground line for tracking
    Tracking,
}

impl PlacementStrategy {
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::GridShot => PlacementStrategy::Grid,
            GameMode::SpiderShot => PlacementStrategy::Spider,
            GameMode::MicroShot => PlacementStrategy::Micro,
            GameMode::BlinkShot => PlacementStrategy::Cluster,
            GameMode::HumanStrafe => PlacementStrategy::Strafe,
            GameMode::Tracking => PlacementStrategy::Tracking,
            GameMode::Standard | GameMode::Marathon => PlacementStrategy::Scatter,
        }
    }
}

/// Retry stage of a placement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementStage {
    Tight,
    Relaxed,
    Fallback,
}

impl PlacementStage {
    pub fn for_attempt(attempt: u32) -> Self {
        if attempt < RELAXED_STAGE_START {
            PlacementStage::Tight
        } else if attempt < FALLBACK_STAGE_START {
            PlacementStage::Relaxed
        } else {
            PlacementStage::Fallback
        }
    }
}

/// Spatial memory carried between spawns of one mode session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementHistory {
    /// Last accepted spawn (Microshot locality)
    pub last_position: Vec2,
    /// Anchor Blinkshot targets are jittered around
    pub cluster_origin: Vec2,
    /// Next Spidershot spawn goes to the center
    pub spider_center_next: bool,
}

impl Default for PlacementHistory {
    fn default() -> Self {
        Self {
            last_position: Vec2::ZERO,
            cluster_origin: Vec2::ZERO,
            spider_center_next: true,
        }
    }
}

impl PlacementHistory {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Move the Blinkshot cluster somewhere new on the wall
    pub fn randomize_cluster<R: Rng>(&mut self, rng: &mut R) {
        self.cluster_origin = Vec2::new(
            (rng.random::<f32>() - 0.5) * 16.0,
            rng.random::<f32>() * 8.0 - 4.0,
        );
    }
}

/// Find a spawn position that keeps clear of every existing target.
///
/// Returns `None` when all attempts collide; the caller simply skips this
/// spawn.
pub fn place<R: Rng>(
    strategy: PlacementStrategy,
    existing: &[Vec3],
    target_size: f32,
    history: &mut PlacementHistory,
    rng: &mut R,
) -> Option<Vec3> {
    let min_distance = MIN_SPACING * target_size;
    let min_distance_sq = min_distance * min_distance;

    for attempt in 0..MAX_PLACEMENT_ATTEMPTS {
        let stage = PlacementStage::for_attempt(attempt);
        let candidate = sample_candidate(strategy, stage, target_size, history, rng);

        let clear = existing
            .iter()
            .all(|p| xy(*p).distance_squared(candidate) >= min_distance_sq);
        if !clear {
            continue;
        }

        if strategy == PlacementStrategy::Spider {
            history.spider_center_next = !history.spider_center_next;
        }
        history.last_position = candidate;
        return Some(Vec3::new(candidate.x, candidate.y, SPAWN_DEPTH));
    }

    log::debug!(
        "placement exhausted after {} attempts ({:?}, {} live, size {})",
        MAX_PLACEMENT_ATTEMPTS,
        strategy,
        existing.len(),
        target_size
    );
    None
}

/// Draw one candidate from the strategy's distribution for this stage
pub fn sample_candidate<R: Rng>(
    strategy: PlacementStrategy,
    stage: PlacementStage,
    target_size: f32,
    history: &PlacementHistory,
    rng: &mut R,
) -> Vec2 {
    match strategy {
        PlacementStrategy::Grid => {
            let col = GRID_COLUMNS[rng.random_range(0..GRID_COLUMNS.len())];
            let row = GRID_ROWS[rng.random_range(0..GRID_ROWS.len())];
            Vec2::new(col + centered(rng, 0.2), row + centered(rng, 0.2))
        }
        PlacementStrategy::Spider => {
            if history.spider_center_next {
                Vec2::ZERO
            } else {
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                let dist = 4.0 + rng.random::<f32>() * 5.0;
                // Ellipse: flattened vertically to fit the view
                Vec2::new(angle.cos() * dist, angle.sin() * dist * 0.6)
            }
        }
        PlacementStrategy::Micro => {
            let range = target_size.max(1.0);
            let last = history.last_position;
            let p = match stage {
                PlacementStage::Tight => {
                    Vec2::new(last.x + centered(rng, 3.0 * range), last.y + centered(rng, 2.0 * range))
                }
                PlacementStage::Relaxed => {
                    Vec2::new(last.x + centered(rng, 6.0 * range), last.y + centered(rng, 4.0 * range))
                }
                PlacementStage::Fallback => full_wall(rng),
            };
            Vec2::new(p.x.clamp(-10.0, 10.0), p.y.clamp(-5.0, 5.0))
        }
        PlacementStrategy::Cluster => {
            let origin = history.cluster_origin;
            let p = match stage {
                PlacementStage::Tight => {
                    // Big targets need a wider "tight" cluster to fit at all
                    let spread = 3.0 * (target_size * 0.8).max(1.0);
                    Vec2::new(origin.x + centered(rng, spread), origin.y + centered(rng, spread))
                }
                PlacementStage::Relaxed => {
                    Vec2::new(origin.x + centered(rng, 10.0), origin.y + centered(rng, 8.0))
                }
                PlacementStage::Fallback => {
                    Vec2::new(centered(rng, 28.0), rng.random::<f32>() * 8.0 - 4.0)
                }
            };
            Vec2::new(p.x.clamp(-14.0, 14.0), p.y.clamp(-7.0, 7.0))
        }
        PlacementStrategy::Strafe => Vec2::new(centered(rng, 16.0), -1.0),
        PlacementStrategy::Tracking => Vec2::new(centered(rng, 12.0), -1.0),
        PlacementStrategy::Scatter => full_wall(rng),
    }
}

/// Uniform sample in `[-span/2, span/2)`
#[inline]
fn centered<R: Rng>(rng: &mut R, span: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * span
}

/// Uniform over the standard play area: x in ±9, y in [-4, 4)
fn full_wall<R: Rng>(rng: &mut R) -> Vec2 {
    Vec2::new(centered(rng, 18.0), rng.random::<f32>() * 8.0 - 4.0)
}
