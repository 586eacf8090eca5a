mod engine;
mod format;

pub use engine::{PauseToggle, Player, TimerEngine, WarningLevel, DEFAULT_FOCUS_SECS};
pub use format::{format_hms, format_hms_compact, format_signed_hms};
