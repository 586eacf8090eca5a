//! End-to-end session lifecycle tests.
//!
//! Drives the controller the way the host event loop would, through
//! completion and reset, and verifies what lands in the store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use truefocus_core::storage::{Database, SessionStore};
use truefocus_core::{FocusController, Outcome, Player, SessionWithMetrics};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap()
}

fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

#[test]
fn full_day_workflow() {
    let db = Database::open_memory().unwrap();
    let mut ctl = FocusController::new(600, db);

    // Session 1: one slack interruption, runs to completion.
    ctl.press(Player::Focus, t0());
    ctl.tick(at(10));
    ctl.press(Player::Slack, at(10));
    ctl.tick(at(40));
    ctl.press(Player::Focus, at(40));
    let event = ctl.tick(at(630));
    assert!(event.is_some(), "focus should be exhausted");

    // The exhausted clock must be reset before a new round.
    ctl.reset(at(650));

    // Session 2: user gives up half-way.
    ctl.press(Player::Focus, at(700));
    ctl.tick(at(800));
    ctl.press(Player::Slack, at(800));
    ctl.tick(at(900));
    ctl.reset(at(900));

    let sessions = ctl.tracker().sessions_with_metrics();
    assert_eq!(sessions.len(), 2);

    let completed = &sessions[0];
    assert_eq!(completed.session.outcome, Some(Outcome::Completed));
    assert_eq!(completed.session.initial_focus_secs, 600);
    assert_eq!(completed.session.total_slack_secs, 30);
    assert_eq!(completed.session.work_time_actual, 570);
    assert_eq!(completed.session.slack_events, 1);
    assert_eq!(completed.metrics.actual_focus_secs, 600);
    assert!((completed.metrics.slack_ratio - 30.0 / 630.0).abs() < 1e-9);

    let reset = &sessions[1];
    assert_eq!(reset.session.outcome, Some(Outcome::ResetEarly));
    assert_eq!(reset.session.total_slack_secs, 100);
    // Wall clock 200s, slack 100s: half the tracked time was slack.
    assert_eq!(reset.metrics.wall_clock_secs, Some(200));
    assert_eq!(reset.metrics.actual_focus_secs, 100);
    assert!((reset.metrics.slack_ratio - 0.5).abs() < 1e-9);

    // Counts and filters agree.
    assert_eq!(ctl.tracker().session_count(), 2);
    assert_eq!(ctl.tracker().completed_sessions().len(), 1);
}

#[test]
fn sessions_span_month_partitions() {
    let db = Database::open_memory().unwrap();
    let mut ctl = FocusController::new(60, db);

    let march = Utc.with_ymd_and_hms(2026, 3, 31, 23, 50, 0).unwrap();
    ctl.press(Player::Focus, march);
    ctl.tick(march + Duration::seconds(120));
    ctl.reset(march + Duration::seconds(130));

    let april = Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0).unwrap();
    ctl.press(Player::Focus, april);
    ctl.reset(april + Duration::seconds(30));

    let sessions = ctl.tracker().sessions_with_metrics();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].session.partition_key(), "2026-03");
    assert_eq!(sessions[1].session.partition_key(), "2026-04");
}

#[test]
fn history_survives_reopen_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truefocus.db");

    {
        let db = Database::open_at(&path).unwrap();
        let mut ctl = FocusController::new(60, db);
        ctl.press(Player::Focus, t0());
        ctl.tick(at(90));
    }

    let db = Database::open_at(&path).unwrap();
    let sessions: Vec<SessionWithMetrics> = db
        .load()
        .unwrap()
        .into_iter()
        .map(SessionWithMetrics::derive)
        .collect();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session.outcome, Some(Outcome::Completed));
    assert_eq!(sessions[0].metrics.actual_focus_secs, 60);
}
