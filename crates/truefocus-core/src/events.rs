use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::Outcome;
use crate::timer::{Player, WarningLevel};

/// Every state change in the system produces an Event.
/// The renderer consumes events and formatted clock strings; it never
/// reaches into engine state directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerActivated {
        player: Player,
        at: DateTime<Utc>,
    },
    TimerPaused {
        focus_remaining_secs: f64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        focus_remaining_secs: f64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    FocusDurationSet {
        secs: u32,
        at: DateTime<Utc>,
    },
    /// Focus countdown exhausted -- the slack clock outlasted it.
    FocusExhausted {
        winner: Player,
        slack_total_secs: f64,
        at: DateTime<Utc>,
    },
    /// A stats session was closed and handed to the store.
    SessionClosed {
        outcome: Outcome,
        total_slack_secs: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        active: Option<Player>,
        running: bool,
        focus_remaining_secs: f64,
        slack_elapsed_secs: f64,
        focus_display: String,
        slack_display: String,
        warning: WarningLevel,
        at: DateTime<Utc>,
    },
}
