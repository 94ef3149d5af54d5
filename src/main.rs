//! LiteAim headless runner
//!
//! Plays a short scripted session against the simulation with a simple aim
//! bot and logs the result. Useful for eyeballing mode behavior and for
//! reproducing a seed.
//!
//! Usage: `liteaim [mode] [seed] [seconds]`. Settings JSON may be passed in
//! the `LITEAIM_SETTINGS` environment variable.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec3;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use liteaim::sim::hitbox::{head_center, raycast};
    use liteaim::sim::{GameMode, GamePhase, GameState, Species, TickInput, tick};
    use liteaim::{AudioManager, Settings, SoundEffect};

    /// Simulation step (60 Hz)
    const SIM_DT: f32 = 1.0 / 60.0;
    /// Frames between bot shots in click modes
    const SHOT_INTERVAL: u32 = 20;
    /// Chance a bot shot is pulled off target
    const BOT_MISS_CHANCE: f32 = 0.2;

    struct Bot {
        rng: Pcg32,
        cooldown: u32,
    }

    impl Bot {
        fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
                cooldown: 0,
            }
        }

        /// Camera ray toward the oldest live target, sometimes at its head
        fn aim(&mut self, state: &GameState) -> Option<Vec3> {
            let target = state.targets().first()?;
            let mut point = match target.species {
                Species::Human | Species::Tracking if self.rng.random_bool(0.3) => {
                    head_center(target.position, state.settings.target_size)
                }
                _ => target.position,
            };
            if self.rng.random::<f32>() < BOT_MISS_CHANCE {
                point.x += 3.0;
            }
            Some(point.normalize_or_zero())
        }

        fn input(&mut self, state: &GameState) -> TickInput {
            if state.phase() != GamePhase::Playing {
                return TickInput::default();
            }
            let tracking = state.session.active_mode == GameMode::Tracking;
            let fire = if tracking {
                true
            } else if self.cooldown == 0 {
                self.cooldown = SHOT_INTERVAL;
                true
            } else {
                self.cooldown -= 1;
                false
            };

            let size = state.settings.target_size;
            let aim = self
                .aim(state)
                .and_then(|dir| raycast(state.targets(), &state.motion, Vec3::ZERO, dir, size));

            TickInput {
                trigger_pressed: fire && !tracking,
                trigger_held: fire && tracking,
                aim,
                ..Default::default()
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let mode = args
            .next()
            .map(|name| {
                GameMode::from_name(&name).unwrap_or_else(|| {
                    log::warn!("Unknown mode '{}', using Gridshot", name);
                    GameMode::GridShot
                })
            })
            .unwrap_or(GameMode::GridShot);
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345_u64);
        let seconds = args.next().and_then(|s| s.parse().ok()).unwrap_or(10_u32);

        let saved = std::env::var("LITEAIM_SETTINGS").ok();
        let mut settings = Settings::load_or_default(saved.as_deref()).sanitized();
        settings.duration = seconds;

        log::info!("LiteAim (headless) starting: {} seed {}", mode.as_str(), seed);

        let mut audio = AudioManager::new(settings.volume);
        let mut state = GameState::new(seed, settings);
        let mut bot = Bot::new(seed);
        let mut sounds = [0_u32; 4];

        let start = TickInput {
            start: Some(mode),
            ..Default::default()
        };
        tick(&mut state, &start, 0.0, &mut audio);

        // Countdown plus the session, or a fixed stretch for Marathon
        let max_frames = ((seconds + 4) as f32 / SIM_DT) as u32;
        for _ in 0..max_frames {
            let input = bot.input(&state);
            tick(&mut state, &input, SIM_DT, &mut audio);

            for tone in audio.drain() {
                let slot = match tone.effect {
                    SoundEffect::Shoot => 0,
                    SoundEffect::Hit => 1,
                    SoundEffect::Headshot => 2,
                    SoundEffect::BodyHit => 3,
                };
                sounds[slot] += 1;
            }

            if state.phase() == GamePhase::Finished {
                break;
            }
        }

        let stats = &state.session.stats;
        log::info!(
            "Score {} | accuracy {:.1}% | hits {} misses {} | sounds shoot {} hit {} headshot {} body {}",
            stats.score,
            stats.accuracy,
            stats.hits,
            stats.misses,
            sounds[0],
            sounds[1],
            sounds[2],
            sounds[3]
        );
        match serde_json::to_string_pretty(stats) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode stats: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web frontend drives `liteaim::sim` directly
}
