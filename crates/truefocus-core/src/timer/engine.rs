//! Two-clock timer engine.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads - the caller is responsible for calling `advance(now)` periodically
//! while a clock runs, passing the current wall-clock time.
//!
//! ## Clocks
//!
//! ```text
//! Focus: counts down from the configured duration toward zero.
//! Slack: counts up from zero.
//! ```
//!
//! At most one clock accrues time at any moment. Elapsed time is always
//! computed from wall-clock deltas between calls, never from an assumed
//! tick cadence.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(600);
//! engine.activate(Player::Focus, Utc::now());
//! // In a loop (~100ms):
//! engine.advance(Utc::now()); // Returns Some(winner) when focus hits zero
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::timer::format::format_hms;

/// Default focus duration: ten minutes.
pub const DEFAULT_FOCUS_SECS: u32 = 600;

/// The two clocks a user can put time on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Focus,
    Slack,
}

/// Result of a pause toggle.
///
/// `Rejected` means no clock was active and nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauseToggle {
    Rejected,
    Paused,
    Resumed,
}

/// Urgency of the remaining focus time, used by the renderer for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    None,
    Medium,
    Critical,
}

/// Core timer engine.
///
/// Operates on wall-clock deltas -- no internal thread. Mutated only by the
/// host's scheduling tick; no locking inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    /// Seconds left on the focus countdown. Never negative.
    focus_remaining: f64,
    /// Seconds accrued on the slack count-up. Never negative.
    slack_elapsed: f64,
    /// Which clock is currently selected, if any.
    active: Option<Player>,
    running: bool,
    /// Wall-clock reference for computing elapsed deltas; `None` while stopped.
    #[serde(default)]
    last_tick: Option<DateTime<Utc>>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_SECS)
    }
}

impl TimerEngine {
    /// Create a new engine with the given focus duration in seconds.
    pub fn new(focus_secs: u32) -> Self {
        Self {
            focus_remaining: f64::from(focus_secs),
            slack_elapsed: 0.0,
            active: None,
            running: false,
            last_tick: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn focus_remaining(&self) -> f64 {
        self.focus_remaining
    }

    pub fn slack_elapsed(&self) -> f64 {
        self.slack_elapsed
    }

    pub fn active(&self) -> Option<Player> {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Urgency of the focus countdown. Pure; no side effects.
    pub fn warning_level(&self) -> WarningLevel {
        if self.focus_remaining < 60.0 {
            WarningLevel::Critical
        } else if self.focus_remaining < 180.0 {
            WarningLevel::Medium
        } else {
            WarningLevel::None
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, at: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            active: self.active,
            running: self.running,
            focus_remaining_secs: self.focus_remaining,
            slack_elapsed_secs: self.slack_elapsed,
            focus_display: format_hms(self.focus_remaining),
            slack_display: format_hms(self.slack_elapsed),
            warning: self.warning_level(),
            at,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the focus duration. Only valid while stopped.
    ///
    /// Resets the slack clock to zero. Returns `false` (state unchanged)
    /// when a clock is running.
    pub fn set_focus_duration(&mut self, secs: u32) -> bool {
        if self.running {
            return false;
        }
        self.focus_remaining = f64::from(secs);
        self.slack_elapsed = 0.0;
        true
    }

    /// Select a clock and start it.
    ///
    /// Returns `false` when the requested clock is already active and
    /// running -- the caller uses that to suppress duplicate session or
    /// segment bookkeeping.
    pub fn activate(&mut self, player: Player, now: DateTime<Utc>) -> bool {
        if self.active == Some(player) && self.running {
            return false;
        }
        self.active = Some(player);
        self.running = true;
        self.last_tick = Some(now);
        true
    }

    /// Flip the running state of the active clock.
    pub fn toggle_pause(&mut self, now: DateTime<Utc>) -> PauseToggle {
        if self.active.is_none() {
            return PauseToggle::Rejected;
        }
        self.running = !self.running;
        if self.running {
            self.last_tick = Some(now);
            PauseToggle::Resumed
        } else {
            self.last_tick = None;
            PauseToggle::Paused
        }
    }

    /// Advance the active clock to `now`.
    ///
    /// No-op returning `None` while stopped or with no clock selected.
    /// Returns the winning player exactly when the focus countdown crosses
    /// from positive to zero (the slack clock outlasted it).
    pub fn advance(&mut self, now: DateTime<Utc>) -> Option<Player> {
        if !self.running {
            return None;
        }
        let player = self.active?;
        let Some(last) = self.last_tick.replace(now) else {
            // Missing reference stamp; accrue nothing this call.
            return None;
        };
        // Scheduler cadence is not guaranteed; a backwards clock step
        // accrues nothing rather than going negative.
        let elapsed = ((now - last).num_milliseconds() as f64 / 1000.0).max(0.0);

        match player {
            Player::Focus => {
                let before = self.focus_remaining;
                self.focus_remaining = (before - elapsed).max(0.0);
                if before > 0.0 && self.focus_remaining == 0.0 {
                    return Some(Player::Slack);
                }
                None
            }
            Player::Slack => {
                self.slack_elapsed += elapsed;
                None
            }
        }
    }

    /// Stop accrual without clearing the clocks. Used when the countdown
    /// is exhausted and the host takes over.
    pub fn stop(&mut self) {
        self.running = false;
        self.last_tick = None;
    }

    /// Return all fields to the initial state with the given duration.
    pub fn reset(&mut self, focus_secs: u32) {
        *self = Self::new(focus_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(secs)
    }

    #[test]
    fn advance_is_noop_when_stopped() {
        let mut engine = TimerEngine::new(600);
        assert_eq!(engine.advance(at(5)), None);
        assert_eq!(engine.focus_remaining(), 600.0);

        engine.activate(Player::Focus, t0());
        engine.toggle_pause(at(1));
        assert_eq!(engine.advance(at(10)), None);
        assert_eq!(engine.focus_remaining(), 600.0);
    }

    #[test]
    fn focus_counts_down_by_wall_clock_delta() {
        let mut engine = TimerEngine::new(600);
        engine.activate(Player::Focus, t0());
        assert_eq!(engine.advance(at(10)), None);
        assert_eq!(engine.focus_remaining(), 590.0);
        // Irregular cadence: the delta is what counts.
        assert_eq!(engine.advance(at(13)), None);
        assert_eq!(engine.focus_remaining(), 587.0);
    }

    #[test]
    fn slack_counts_up() {
        let mut engine = TimerEngine::new(600);
        engine.activate(Player::Slack, t0());
        engine.advance(at(25));
        assert_eq!(engine.slack_elapsed(), 25.0);
        assert_eq!(engine.focus_remaining(), 600.0);
    }

    #[test]
    fn winner_returned_exactly_on_exhaustion() {
        let mut engine = TimerEngine::new(10);
        engine.activate(Player::Focus, t0());
        assert_eq!(engine.advance(at(9)), None);
        assert_eq!(engine.advance(at(30)), Some(Player::Slack));
        assert_eq!(engine.focus_remaining(), 0.0);
        // Already at zero: no second winner.
        assert_eq!(engine.advance(at(31)), None);
    }

    #[test]
    fn backwards_clock_step_accrues_nothing() {
        let mut engine = TimerEngine::new(600);
        engine.activate(Player::Focus, at(10));
        assert_eq!(engine.advance(at(5)), None);
        assert_eq!(engine.focus_remaining(), 600.0);
        // The reference stamp moved to the earlier time.
        engine.advance(at(8));
        assert_eq!(engine.focus_remaining(), 597.0);
    }

    #[test]
    fn set_focus_duration_resets_slack_and_fails_while_running() {
        let mut engine = TimerEngine::new(600);
        engine.activate(Player::Slack, t0());
        engine.advance(at(30));
        assert!(!engine.set_focus_duration(1200));
        assert_eq!(engine.focus_remaining(), 600.0);
        assert_eq!(engine.slack_elapsed(), 30.0);

        engine.toggle_pause(at(31));
        assert!(engine.set_focus_duration(1200));
        assert_eq!(engine.focus_remaining(), 1200.0);
        assert_eq!(engine.slack_elapsed(), 0.0);
    }

    #[test]
    fn activate_same_running_clock_is_rejected() {
        let mut engine = TimerEngine::new(600);
        assert!(engine.activate(Player::Focus, t0()));
        assert!(!engine.activate(Player::Focus, at(5)));
        // Switching clocks is always accepted.
        assert!(engine.activate(Player::Slack, at(10)));
        // Re-activating a paused clock restarts it.
        engine.toggle_pause(at(11));
        assert!(engine.activate(Player::Slack, at(12)));
    }

    #[test]
    fn toggle_pause_tri_state() {
        let mut engine = TimerEngine::new(600);
        assert_eq!(engine.toggle_pause(t0()), PauseToggle::Rejected);

        engine.activate(Player::Focus, t0());
        assert_eq!(engine.toggle_pause(at(5)), PauseToggle::Paused);
        assert!(!engine.is_running());
        assert_eq!(engine.toggle_pause(at(20)), PauseToggle::Resumed);
        assert!(engine.is_running());
        // Resume restamps the reference: the paused gap never accrues.
        engine.advance(at(22));
        assert_eq!(engine.focus_remaining(), 598.0);
    }

    #[test]
    fn warning_level_boundaries() {
        let mut engine = TimerEngine::new(600);
        assert_eq!(engine.warning_level(), WarningLevel::None);

        // Exactly 180.0 remaining is not yet medium; medium is strictly below.
        engine.set_focus_duration(180);
        assert_eq!(engine.warning_level(), WarningLevel::None);

        engine.activate(Player::Focus, t0());
        engine.advance(at(120));
        // Exactly 60.0 remaining is still medium; critical is strictly below.
        assert_eq!(engine.focus_remaining(), 60.0);
        assert_eq!(engine.warning_level(), WarningLevel::Medium);
        engine.advance(at(120) + Duration::milliseconds(10));
        assert!(engine.focus_remaining() < 60.0);
        assert_eq!(engine.warning_level(), WarningLevel::Critical);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut engine = TimerEngine::new(600);
        engine.activate(Player::Slack, t0());
        engine.advance(at(42));
        engine.reset(600);
        assert_eq!(engine.focus_remaining(), 600.0);
        assert_eq!(engine.slack_elapsed(), 0.0);
        assert_eq!(engine.active(), None);
        assert!(!engine.is_running());
    }

    #[test]
    fn snapshot_carries_formatted_clocks() {
        let engine = TimerEngine::new(600);
        match engine.snapshot(t0()) {
            Event::StateSnapshot {
                focus_display,
                slack_display,
                running,
                ..
            } => {
                assert_eq!(focus_display, "00:10:00");
                assert_eq!(slack_display, "00:00:00");
                assert!(!running);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn engine_serde_round_trip() {
        let mut engine = TimerEngine::new(600);
        engine.activate(Player::Focus, t0());
        engine.advance(at(30));
        let json = serde_json::to_string(&engine).unwrap();
        let restored: TimerEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.focus_remaining(), engine.focus_remaining());
        assert_eq!(restored.active(), Some(Player::Focus));
    }

    proptest! {
        // For any non-negative elapsed sequence, focus never goes negative,
        // never increases, and at most one winner is reported.
        #[test]
        fn focus_countdown_monotonic(deltas in prop::collection::vec(0u64..120_000, 1..40)) {
            let mut engine = TimerEngine::new(600);
            engine.activate(Player::Focus, t0());
            let mut now = t0();
            let mut before = engine.focus_remaining();
            let mut winners = 0;
            for ms in deltas {
                now += Duration::milliseconds(ms as i64);
                let winner = engine.advance(now);
                let after = engine.focus_remaining();
                prop_assert!(after >= 0.0);
                prop_assert!(after <= before);
                if winner.is_some() {
                    winners += 1;
                    prop_assert_eq!(after, 0.0);
                    prop_assert!(before > 0.0);
                }
                before = after;
            }
            prop_assert!(winners <= 1);
        }
    }
}
