//! Daily aggregation over recorded sessions.
//!
//! Pure computation behind the stats dashboard: headline numbers,
//! behavioural insights, and per-day counts for the activity calendar.
//! No rendering here.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::stats::session::SessionWithMetrics;

/// Sessions started on the given local calendar date.
pub fn sessions_on(
    sessions: &[SessionWithMetrics],
    date: NaiveDate,
) -> Vec<&SessionWithMetrics> {
    sessions
        .iter()
        .filter(|s| local_date(s.session.started_at) == date)
        .collect()
}

/// Session count per local day, for the activity calendar.
pub fn sessions_per_day(sessions: &[SessionWithMetrics]) -> BTreeMap<NaiveDate, usize> {
    let mut days = BTreeMap::new();
    for s in sessions {
        *days.entry(local_date(s.session.started_at)).or_insert(0) += 1;
    }
    days
}

fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

/// Headline numbers for one day.
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub planned_focus_secs: u64,
    pub actual_focus_secs: u64,
    pub slack_secs: u64,
    pub slack_ratio: f64,
    pub efficiency: f64,
}

impl DaySummary {
    pub fn for_sessions(sessions: &[&SessionWithMetrics]) -> Self {
        let planned_focus_secs = sessions
            .iter()
            .map(|s| u64::from(s.session.initial_focus_secs))
            .sum();
        let actual_focus_secs: u64 = sessions
            .iter()
            .map(|s| u64::from(s.metrics.actual_focus_secs))
            .sum();
        let slack_secs: u64 = sessions
            .iter()
            .map(|s| u64::from(s.session.total_slack_secs))
            .sum();

        let tracked = (actual_focus_secs + slack_secs) as f64;
        let slack_ratio = if tracked > 0.0 {
            slack_secs as f64 / tracked
        } else {
            0.0
        };

        Self {
            planned_focus_secs,
            actual_focus_secs,
            slack_secs,
            slack_ratio,
            efficiency: (1.0 - slack_ratio).max(0.0),
        }
    }
}

/// Behavioural insights for one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayInsights {
    pub session_count: usize,
    pub avg_slack_secs: f64,
    /// Start time of the session with the highest slack ratio, with the ratio.
    pub most_disrupted: Option<MostDisrupted>,
    /// Longest single slack segment of the day, in seconds.
    pub longest_interruption_secs: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MostDisrupted {
    pub started_at: DateTime<Utc>,
    pub slack_ratio: f64,
}

impl DayInsights {
    pub fn for_sessions(sessions: &[&SessionWithMetrics]) -> Self {
        let session_count = sessions.len();
        let total_slack: u64 = sessions
            .iter()
            .map(|s| u64::from(s.session.total_slack_secs))
            .sum();
        let avg_slack_secs = if session_count > 0 {
            total_slack as f64 / session_count as f64
        } else {
            0.0
        };

        let most_disrupted = sessions
            .iter()
            .max_by(|a, b| {
                a.metrics
                    .slack_ratio
                    .partial_cmp(&b.metrics.slack_ratio)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|s| MostDisrupted {
                started_at: s.session.started_at,
                slack_ratio: s.metrics.slack_ratio,
            });

        let longest_interruption_secs = sessions
            .iter()
            .flat_map(|s| s.session.slack_segments.iter())
            .map(|seg| seg.duration_secs)
            .max();

        Self {
            session_count,
            avg_slack_secs,
            most_disrupted,
            longest_interruption_secs,
        }
    }
}
