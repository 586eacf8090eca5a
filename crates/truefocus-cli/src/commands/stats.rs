use chrono::{Local, NaiveDate};
use clap::Subcommand;
use truefocus_core::stats::{sessions_on, sessions_per_day, DayInsights, DaySummary};
use truefocus_core::storage::Database;
use truefocus_core::{CoreError, StatsTracker};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's headline summary and insights
    Today,
    /// Summary for a specific date
    Day {
        /// Date in YYYY-MM-DD
        date: NaiveDate,
    },
    /// All recorded sessions with derived metrics
    Sessions,
    /// Session counts per day (activity calendar feed)
    Calendar,
}

pub fn run(action: StatsAction) -> Result<(), CoreError> {
    let tracker = StatsTracker::new(Database::open()?);
    let sessions = tracker.sessions_with_metrics();

    match action {
        StatsAction::Today => print_day(&sessions, Local::now().date_naive())?,
        StatsAction::Day { date } => print_day(&sessions, date)?,
        StatsAction::Sessions => {
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        StatsAction::Calendar => {
            let days = sessions_per_day(&sessions);
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
    }
    Ok(())
}

fn print_day(
    sessions: &[truefocus_core::SessionWithMetrics],
    date: NaiveDate,
) -> Result<(), CoreError> {
    let day = sessions_on(sessions, date);
    let report = serde_json::json!({
        "date": date,
        "summary": DaySummary::for_sessions(&day),
        "insights": DayInsights::for_sessions(&day),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
