//! Session phase machine and timers
//!
//! `MENU -> COUNTDOWN -> PLAYING -> {PAUSED <-> PLAYING} -> FINISHED -> MENU`
//!
//! The clock never touches targets or stats. [`SessionClock::advance`] turns
//! elapsed time into [`ClockEvent`]s which the frame driver applies. Each
//! event is stamped with the generation it was produced under; start,
//! restart, finish and home all bump the generation so anything produced
//! before them is dropped by [`SessionClock::accepts`].

use super::state::GamePhase;
use crate::consts::*;

/// What the clock wants the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSignal {
    /// Countdown stepped down but has not reached zero yet
    CountdownTick { remaining: u32 },
    /// Countdown reached zero, now PLAYING
    Started,
    /// Session duration ran out
    Finished,
    /// Marathon wants a new active mode
    MarathonSwitch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockEvent {
    pub generation: u64,
    pub signal: ClockSignal,
}

#[derive(Debug, Clone)]
pub struct SessionClock {
    phase: GamePhase,
    countdown: u32,
    /// `None` for Marathon (no time limit) and outside a session
    remaining_ms: Option<f64>,
    countdown_acc_ms: f64,
    duration_acc_ms: f64,
    marathon_acc_ms: f64,
    marathon: bool,
    /// Set once the duration ran out; lock loss no longer pauses
    ending: bool,
    generation: u64,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Menu,
            countdown: 0,
            remaining_ms: None,
            countdown_acc_ms: 0.0,
            duration_acc_ms: 0.0,
            marathon_acc_ms: 0.0,
            marathon: false,
            ending: false,
            generation: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Countdown value shown to the player (3..1)
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn remaining_ms(&self) -> Option<f64> {
        self.remaining_ms
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_ending(&self) -> bool {
        self.ending
    }

    pub fn is_marathon(&self) -> bool {
        self.marathon
    }

    /// Enter COUNTDOWN for a fresh session. Also used for restart.
    pub fn start(&mut self, marathon: bool, duration_secs: u32) {
        self.generation += 1;
        self.phase = GamePhase::Countdown;
        self.countdown = COUNTDOWN_START;
        self.remaining_ms = (!marathon).then(|| f64::from(duration_secs) * 1000.0);
        self.countdown_acc_ms = 0.0;
        self.duration_acc_ms = 0.0;
        self.marathon_acc_ms = 0.0;
        self.marathon = marathon;
        self.ending = false;
    }

    /// Restart is accepted from any in-session phase
    pub fn can_restart(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::Playing | GamePhase::Paused | GamePhase::Countdown | GamePhase::Finished
        )
    }

    /// Aim lock lost. Returns true if this paused the session.
    pub fn lock_lost(&mut self) -> bool {
        if self.ending {
            return false;
        }
        match self.phase {
            GamePhase::Playing | GamePhase::Countdown => {
                self.phase = GamePhase::Paused;
                true
            }
            _ => false,
        }
    }

    /// PAUSED -> PLAYING. Returns false from any other phase.
    ///
    /// The Marathon switch window starts over on every resume.
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.marathon_acc_ms = 0.0;
        true
    }

    pub fn finish(&mut self) {
        self.generation += 1;
        self.phase = GamePhase::Finished;
        self.ending = true;
    }

    pub fn go_home(&mut self) {
        self.generation += 1;
        self.phase = GamePhase::Menu;
        self.countdown = 0;
        self.remaining_ms = None;
        self.marathon = false;
        self.ending = false;
    }

    /// Advance timers by `dt_ms` of wall time. Only COUNTDOWN and PLAYING
    /// consume time.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<ClockEvent> {
        let mut signals = Vec::new();

        match self.phase {
            GamePhase::Countdown => {
                self.countdown_acc_ms += dt_ms;
                while self.countdown_acc_ms >= COUNTDOWN_STEP_MS && self.countdown > 0 {
                    self.countdown_acc_ms -= COUNTDOWN_STEP_MS;
                    self.countdown -= 1;
                    if self.countdown == 0 {
                        self.phase = GamePhase::Playing;
                        signals.push(ClockSignal::Started);
                        break;
                    }
                    signals.push(ClockSignal::CountdownTick {
                        remaining: self.countdown,
                    });
                }
            }
            GamePhase::Playing => {
                if self.marathon {
                    self.marathon_acc_ms += dt_ms;
                    while self.marathon_acc_ms >= MARATHON_SWITCH_MS {
                        self.marathon_acc_ms -= MARATHON_SWITCH_MS;
                        signals.push(ClockSignal::MarathonSwitch);
                    }
                } else if let Some(remaining) = self.remaining_ms.as_mut() {
                    if !self.ending {
                        self.duration_acc_ms += dt_ms;
                        while self.duration_acc_ms >= DURATION_STEP_MS {
                            self.duration_acc_ms -= DURATION_STEP_MS;
                            *remaining = (*remaining - DURATION_STEP_MS).max(0.0);
                            if *remaining <= 0.0 {
                                self.ending = true;
                                signals.push(ClockSignal::Finished);
                                break;
                            }
                        }
                    }
                }
            }
            GamePhase::Menu | GamePhase::Paused | GamePhase::Finished => {}
        }

        signals
            .into_iter()
            .map(|signal| ClockEvent {
                generation: self.generation,
                signal,
            })
            .collect()
    }

    /// False for events produced before the latest start/restart/finish/home
    pub fn accepts(&self, event: &ClockEvent) -> bool {
        event.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(events: &[ClockEvent]) -> Vec<ClockSignal> {
        events.iter().map(|e| e.signal).collect()
    }

    fn playing(marathon: bool, duration_secs: u32) -> SessionClock {
        let mut clock = SessionClock::new();
        clock.start(marathon, duration_secs);
        clock.advance(3000.0);
        assert_eq!(clock.phase(), GamePhase::Playing);
        clock
    }

    #[test]
    fn test_countdown_steps_then_starts() {
        let mut clock = SessionClock::new();
        clock.start(false, 60);
        assert_eq!(clock.phase(), GamePhase::Countdown);
        assert_eq!(clock.countdown(), 3);

        assert!(clock.advance(999.0).is_empty());
        let ev = clock.advance(1.0);
        assert_eq!(signals(&ev), vec![ClockSignal::CountdownTick { remaining: 2 }]);
        let ev = clock.advance(2000.0);
        assert_eq!(
            signals(&ev),
            vec![ClockSignal::CountdownTick { remaining: 1 }, ClockSignal::Started]
        );
        assert_eq!(clock.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_duration_runs_out() {
        let mut clock = playing(false, 1);
        assert_eq!(clock.remaining_ms(), Some(1000.0));

        assert!(clock.advance(950.0).is_empty());
        assert_eq!(clock.remaining_ms(), Some(100.0));
        let ev = clock.advance(100.0);
        assert_eq!(signals(&ev), vec![ClockSignal::Finished]);
        assert!(clock.is_ending());

        // No second Finished while the driver is applying it
        assert!(clock.advance(500.0).is_empty());
    }

    #[test]
    fn test_marathon_has_no_limit_and_switches() {
        let mut clock = playing(true, 60);
        assert_eq!(clock.remaining_ms(), None);

        assert!(clock.advance(14_999.0).is_empty());
        let ev = clock.advance(1.0);
        assert_eq!(signals(&ev), vec![ClockSignal::MarathonSwitch]);
        let ev = clock.advance(30_000.0);
        assert_eq!(ev.len(), 2);
    }

    #[test]
    fn test_pause_freezes_timers() {
        let mut clock = playing(false, 10);
        clock.advance(500.0);
        assert!(clock.lock_lost());
        assert_eq!(clock.phase(), GamePhase::Paused);
        assert!(clock.advance(60_000.0).is_empty());
        assert_eq!(clock.remaining_ms(), Some(9500.0));
        assert!(clock.resume());
        assert_eq!(clock.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_resume_restarts_marathon_window() {
        let mut clock = playing(true, 60);
        assert!(clock.advance(10_000.0).is_empty());
        assert!(clock.lock_lost());
        assert!(clock.resume());

        // The 10 s played before the pause do not carry over
        assert!(clock.advance(14_000.0).is_empty());
        let ev = clock.advance(1_000.0);
        assert_eq!(signals(&ev), vec![ClockSignal::MarathonSwitch]);
    }

    #[test]
    fn test_lock_lost_during_countdown_pauses() {
        let mut clock = SessionClock::new();
        clock.start(false, 60);
        assert!(clock.lock_lost());
        assert_eq!(clock.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_lock_lost_ignored_when_ending() {
        let mut clock = playing(false, 1);
        clock.advance(1000.0);
        assert!(clock.is_ending());
        assert!(!clock.lock_lost());
        clock.finish();
        assert!(!clock.lock_lost());
        assert_eq!(clock.phase(), GamePhase::Finished);
    }

    #[test]
    fn test_lock_lost_in_menu_is_noop() {
        let mut clock = SessionClock::new();
        assert!(!clock.lock_lost());
        assert!(!clock.resume());
        assert_eq!(clock.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_restart_allowed_phases() {
        let mut clock = SessionClock::new();
        assert!(!clock.can_restart());
        clock.start(false, 60);
        assert!(clock.can_restart());
        clock.advance(3000.0);
        assert!(clock.can_restart());
        clock.lock_lost();
        assert!(clock.can_restart());
        clock.finish();
        assert!(clock.can_restart());
        clock.go_home();
        assert!(!clock.can_restart());
    }

    #[test]
    fn test_stale_events_rejected() {
        let mut clock = playing(true, 60);
        let ev = clock.advance(15_000.0);
        assert_eq!(ev.len(), 1);
        assert!(clock.accepts(&ev[0]));

        clock.start(true, 60);
        assert!(!clock.accepts(&ev[0]));
    }

    #[test]
    fn test_go_home_bumps_generation() {
        let mut clock = playing(false, 60);
        let before = clock.generation();
        clock.go_home();
        assert!(clock.generation() > before);
        assert_eq!(clock.phase(), GamePhase::Menu);
        assert!(clock.advance(10_000.0).is_empty());
    }
}
