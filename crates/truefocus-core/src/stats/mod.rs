//! Session statistics: lifecycle tracking, derived metrics, daily summaries.

mod session;
mod summary;
mod tracker;

pub use session::{Outcome, Session, SessionMetrics, SessionWithMetrics, SlackSegment};
pub use summary::{sessions_on, sessions_per_day, DayInsights, DaySummary};
pub use tracker::StatsTracker;
