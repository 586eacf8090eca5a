//! Application controller.
//!
//! The single-threaded seam between the timer engine, the stats tracker,
//! and the host event loop. All mutation of engine and tracker state goes
//! through here, on one logical thread; background signals (idle detection)
//! must be re-dispatched onto that thread before calling in.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::events::Event;
use crate::stats::{Outcome, StatsTracker};
use crate::storage::SessionStore;
use crate::timer::{PauseToggle, Player, TimerEngine};

pub struct FocusController<S: SessionStore> {
    engine: TimerEngine,
    tracker: StatsTracker<S>,
    default_focus_secs: u32,
}

impl<S: SessionStore> FocusController<S> {
    pub fn new(default_focus_secs: u32, store: S) -> Self {
        Self {
            engine: TimerEngine::new(default_focus_secs),
            tracker: StatsTracker::new(store),
            default_focus_secs,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn tracker(&self) -> &StatsTracker<S> {
        &self.tracker
    }

    /// Clock button press.
    ///
    /// Activates the requested clock; opens a stats session on the first
    /// activation from idle and keeps slack segments aligned with clock
    /// switches. Returns `None` when the press changed nothing.
    pub fn press(&mut self, player: Player, now: DateTime<Utc>) -> Option<Event> {
        let previous = self.engine.active();
        if !self.engine.activate(player, now) {
            return None;
        }

        if self.tracker.current().is_none() {
            let initial = self.engine.focus_remaining().round() as u32;
            self.tracker.start_session(initial, now);
            debug!(initial, "session opened");
        }

        match player {
            Player::Slack if previous != Some(Player::Slack) => {
                self.tracker.record_slack_event();
                self.tracker.start_slack_segment(now);
            }
            Player::Focus if previous == Some(Player::Slack) => {
                self.tracker.end_slack_segment(now);
            }
            _ => {}
        }

        Some(Event::TimerActivated { player, at: now })
    }

    /// Scheduler tick (~100ms cadence while running).
    ///
    /// Returns the terminal event when the focus countdown is exhausted;
    /// `None` otherwise. A pending tick after the clock stopped is dropped
    /// by the engine's own running check.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let winner = self.engine.advance(now)?;
        self.engine.stop();
        let slack_total = self.engine.slack_elapsed();
        self.tracker.end_session(slack_total, Outcome::Completed, now);
        Some(Event::FocusExhausted {
            winner,
            slack_total_secs: slack_total,
            at: now,
        })
    }

    pub fn toggle_pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.engine.toggle_pause(now) {
            PauseToggle::Rejected => None,
            PauseToggle::Paused => Some(Event::TimerPaused {
                focus_remaining_secs: self.engine.focus_remaining(),
                at: now,
            }),
            PauseToggle::Resumed => Some(Event::TimerResumed {
                focus_remaining_secs: self.engine.focus_remaining(),
                at: now,
            }),
        }
    }

    /// Reset to the default duration, closing any open session as
    /// reset-before-completion.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Event {
        if self.tracker.current().is_some() {
            self.tracker.reset_session(self.engine.slack_elapsed(), now);
        }
        self.engine.reset(self.default_focus_secs);
        Event::TimerReset { at: now }
    }

    /// Set a new focus duration. Rejected (returns `None`) while running.
    pub fn set_focus_duration(&mut self, secs: u32, now: DateTime<Utc>) -> Option<Event> {
        if !self.engine.set_focus_duration(secs) {
            return None;
        }
        Some(Event::FocusDurationSet { secs, at: now })
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        self.engine.snapshot(now)
    }
}
