//! Session records and derived metrics.
//!
//! A session spans one focus-timer lifecycle, from first activation to
//! completion or reset. Metrics are derived on read and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    ResetEarly,
}

/// One contiguous interval spent on the Slack clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackSegment {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: u32,
}

impl SlackSegment {
    /// Close a segment. Duration is floored to whole seconds and clamped
    /// at zero against clock skew.
    pub fn close(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> Self {
        let duration_secs = (ended_at - started_at).num_seconds().max(0) as u32;
        Self {
            started_at,
            ended_at,
            duration_secs,
        }
    }
}

/// One focus-timer lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    /// Focus duration at session start.
    pub initial_focus_secs: u32,
    /// Cumulative slack time, rounded at close.
    #[serde(default)]
    pub total_slack_secs: u32,
    /// `max(initial_focus_secs - total_slack_secs, 0)`, stamped at close.
    #[serde(default)]
    pub work_time_actual: u32,
    /// Number of switches into the Slack clock.
    #[serde(default)]
    pub slack_events: u32,
    #[serde(default)]
    pub slack_segments: Vec<SlackSegment>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
}

impl Session {
    /// Open a new session.
    pub fn open(initial_focus_secs: u32, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: at,
            ended_at: None,
            initial_focus_secs,
            total_slack_secs: 0,
            work_time_actual: 0,
            slack_events: 0,
            slack_segments: Vec::new(),
            outcome: None,
        }
    }

    /// `YYYY-MM` store partition derived from the session start.
    pub fn partition_key(&self) -> String {
        self.started_at.format("%Y-%m").to_string()
    }
}

/// Efficiency metrics derived on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// `ended_at - started_at`; `None` for a session without an end stamp.
    pub wall_clock_secs: Option<i64>,
    pub actual_focus_secs: u32,
    /// Fraction of tracked time spent on Slack; 0 when nothing was tracked.
    pub slack_ratio: f64,
    /// `wall_clock - initial_focus`, signed; positive means overrun.
    pub overrun_secs: Option<i64>,
    /// `max(1 - slack_ratio, 0)`.
    pub efficiency: f64,
}

impl SessionMetrics {
    pub fn derive(session: &Session) -> Self {
        let wall_clock_secs = session
            .ended_at
            .map(|end| (end - session.started_at).num_seconds());
        let slack = i64::from(session.total_slack_secs);

        // A completed session spent the full planned duration on focus.
        // Otherwise the wall clock minus slack is the best estimate, with
        // the planned duration as fallback when no usable wall clock exists.
        let actual = if session.outcome == Some(Outcome::Completed) {
            i64::from(session.initial_focus_secs)
        } else {
            match wall_clock_secs {
                Some(wall) if wall > 0 => wall - slack,
                _ => i64::from(session.initial_focus_secs) - slack,
            }
        };
        let actual_focus_secs = actual.max(0) as u32;

        let denom = f64::from(actual_focus_secs) + f64::from(session.total_slack_secs);
        let slack_ratio = if denom > 0.0 {
            f64::from(session.total_slack_secs) / denom
        } else {
            0.0
        };

        Self {
            wall_clock_secs,
            actual_focus_secs,
            slack_ratio,
            overrun_secs: wall_clock_secs.map(|w| w - i64::from(session.initial_focus_secs)),
            efficiency: (1.0 - slack_ratio).max(0.0),
        }
    }
}

/// A stored session together with its derived metrics.
#[derive(Debug, Clone, Serialize)]
pub struct SessionWithMetrics {
    #[serde(flatten)]
    pub session: Session,
    #[serde(flatten)]
    pub metrics: SessionMetrics,
}

impl SessionWithMetrics {
    pub fn derive(session: Session) -> Self {
        let metrics = SessionMetrics::derive(&session);
        Self { session, metrics }
    }
}
