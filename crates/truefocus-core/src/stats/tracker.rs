//! Session lifecycle bookkeeping.
//!
//! The tracker owns at most one open session and at most one open slack
//! segment within it. Closed sessions are appended to the store under the
//! month partition of their start time; a failed write is logged and the
//! in-memory close still happens (that session is lost on crash, which is
//! acceptable here).

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::stats::session::{Outcome, Session, SessionWithMetrics, SlackSegment};
use crate::storage::SessionStore;

pub struct StatsTracker<S: SessionStore> {
    store: S,
    current: Option<Session>,
    /// Start of the open slack segment, if one is open.
    open_segment: Option<DateTime<Utc>>,
}

impl<S: SessionStore> StatsTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: None,
            open_segment: None,
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Open a new session.
    ///
    /// Returns `false` without touching state when a session is already
    /// open; the tracker enforces the one-open-session invariant itself.
    pub fn start_session(&mut self, initial_focus_secs: u32, at: DateTime<Utc>) -> bool {
        if self.current.is_some() {
            return false;
        }
        self.current = Some(Session::open(initial_focus_secs, at));
        self.open_segment = None;
        true
    }

    /// Count a switch into the Slack clock on the open session.
    pub fn record_slack_event(&mut self) {
        if let Some(session) = self.current.as_mut() {
            session.slack_events += 1;
        }
    }

    /// Open a slack segment. No-op without an open session, or when a
    /// segment is already open (spurious re-activation events).
    pub fn start_slack_segment(&mut self, at: DateTime<Utc>) {
        if self.current.is_none() || self.open_segment.is_some() {
            return;
        }
        self.open_segment = Some(at);
    }

    /// Close the open slack segment. No-op without an open session or
    /// open segment.
    pub fn end_slack_segment(&mut self, at: DateTime<Utc>) {
        let Some(session) = self.current.as_mut() else {
            return;
        };
        if let Some(started_at) = self.open_segment.take() {
            session.slack_segments.push(SlackSegment::close(started_at, at));
        }
    }

    /// Close the open session and append it to the store.
    ///
    /// A dangling slack segment is closed at `at` first. No-op without an
    /// open session. Store failures are logged, never propagated.
    pub fn end_session(&mut self, total_slack_secs: f64, outcome: Outcome, at: DateTime<Utc>) {
        let Some(mut session) = self.current.take() else {
            return;
        };
        if let Some(started_at) = self.open_segment.take() {
            session.slack_segments.push(SlackSegment::close(started_at, at));
        }
        session.ended_at = Some(at);
        session.total_slack_secs = total_slack_secs.max(0.0).round() as u32;
        session.work_time_actual = session
            .initial_focus_secs
            .saturating_sub(session.total_slack_secs);
        session.outcome = Some(outcome);

        let partition = session.partition_key();
        if let Err(err) = self.store.append(&session, &partition) {
            warn!(%err, %partition, "failed to persist session, in-memory close kept");
        }
    }

    /// Close the open session as reset-before-completion.
    pub fn reset_session(&mut self, total_slack_secs: f64, at: DateTime<Utc>) {
        self.end_session(total_slack_secs, Outcome::ResetEarly, at);
    }

    /// All stored sessions with their derived metrics. Pure read; a store
    /// failure degrades to an empty history.
    pub fn sessions_with_metrics(&self) -> Vec<SessionWithMetrics> {
        self.load_sessions()
            .into_iter()
            .map(SessionWithMetrics::derive)
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.load_sessions().len()
    }

    pub fn completed_sessions(&self) -> Vec<Session> {
        self.load_sessions()
            .into_iter()
            .filter(|s| s.outcome == Some(Outcome::Completed))
            .collect()
    }

    fn load_sessions(&self) -> Vec<Session> {
        match self.store.load() {
            Ok(sessions) => sessions,
            Err(err) => {
                warn!(%err, "failed to load session history");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(secs)
    }

    fn tracker() -> StatsTracker<Database> {
        StatsTracker::new(Database::open_memory().unwrap())
    }

    #[test]
    fn round_trip_single_segment() {
        let mut tracker = tracker();
        assert!(tracker.start_session(600, t0()));
        tracker.record_slack_event();
        tracker.start_slack_segment(at(10));
        tracker.end_slack_segment(at(40));
        tracker.end_session(30.0, Outcome::Completed, at(600));

        let sessions = tracker.sessions_with_metrics();
        assert_eq!(sessions.len(), 1);
        let s = &sessions[0].session;
        assert_eq!(s.slack_segments.len(), 1);
        assert_eq!(s.slack_segments[0].duration_secs, 30);
        assert_eq!(s.total_slack_secs, 30);
        assert_eq!(s.work_time_actual, 570);
        assert_eq!(s.slack_events, 1);
        assert_eq!(s.outcome, Some(Outcome::Completed));
    }

    #[test]
    fn duplicate_start_is_rejected() {
        let mut tracker = tracker();
        assert!(tracker.start_session(600, t0()));
        assert!(!tracker.start_session(1200, at(5)));
        assert_eq!(tracker.current().unwrap().initial_focus_secs, 600);
    }

    #[test]
    fn end_session_without_open_session_is_noop() {
        let mut tracker = tracker();
        tracker.end_session(30.0, Outcome::Completed, t0());
        tracker.reset_session(30.0, t0());
        assert_eq!(tracker.session_count(), 0);
    }

    #[test]
    fn dangling_segment_closed_at_session_end() {
        let mut tracker = tracker();
        tracker.start_session(600, t0());
        tracker.start_slack_segment(at(100));
        tracker.end_session(50.0, Outcome::ResetEarly, at(150));

        let sessions = tracker.sessions_with_metrics();
        let s = &sessions[0].session;
        assert_eq!(s.slack_segments.len(), 1);
        assert_eq!(s.slack_segments[0].duration_secs, 50);
        assert_eq!(s.outcome, Some(Outcome::ResetEarly));
        assert!(tracker.current().is_none());
    }

    #[test]
    fn segment_guards_are_idempotent() {
        let mut tracker = tracker();
        // No session yet: both directions no-op.
        tracker.start_slack_segment(t0());
        tracker.end_slack_segment(at(1));

        tracker.start_session(600, t0());
        tracker.start_slack_segment(at(10));
        // Double-entry keeps the original start.
        tracker.start_slack_segment(at(20));
        tracker.end_slack_segment(at(40));
        // No open segment left.
        tracker.end_slack_segment(at(50));
        tracker.end_session(30.0, Outcome::Completed, at(60));

        let sessions = tracker.sessions_with_metrics();
        let segments = &sessions[0].session.slack_segments;
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].duration_secs, 30);
    }

    #[test]
    fn slack_total_is_rounded() {
        let mut tracker = tracker();
        tracker.start_session(600, t0());
        tracker.end_session(29.6, Outcome::ResetEarly, at(100));
        let sessions = tracker.sessions_with_metrics();
        assert_eq!(sessions[0].session.total_slack_secs, 30);
    }

    #[test]
    fn completed_filter_and_count() {
        let mut tracker = tracker();
        tracker.start_session(600, t0());
        tracker.end_session(0.0, Outcome::Completed, at(600));
        tracker.start_session(600, at(700));
        tracker.reset_session(10.0, at(800));

        assert_eq!(tracker.session_count(), 2);
        assert_eq!(tracker.completed_sessions().len(), 1);
    }
}
