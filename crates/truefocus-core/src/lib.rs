//! # TrueFocus Core Library
//!
//! This library provides the core logic for TrueFocus, a two-clock
//! productivity timer: a Focus clock counts down while a Slack clock counts
//! up, and exactly one of them accrues time at any moment. It implements a
//! CLI-first philosophy where all operations are available via a standalone
//! CLI binary, with any GUI shell being a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a wall-clock-based state machine that requires the
//!   caller to periodically invoke `advance()` for progress updates
//! - **Stats**: per-session bookkeeping (slack segments, derived efficiency
//!   metrics) over an append-only, month-partitioned SQLite store
//! - **Controller**: the single-threaded seam wiring the engine and the
//!   stats tracker the way the host event loop drives them
//! - **Idle detection**: a background poll thread raising advisory signals,
//!   never touching timer state directly
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core two-clock state machine
//! - [`StatsTracker`]: session lifecycle and metric derivation
//! - [`FocusController`]: engine + tracker coordination
//! - [`Database`]: session history and KV state persistence
//! - [`Config`]: application configuration management

pub mod controller;
pub mod error;
pub mod events;
pub mod idle;
pub mod stats;
pub mod storage;
pub mod theme;
pub mod timer;

pub use controller::FocusController;
pub use error::{ConfigError, CoreError, StoreError};
pub use events::Event;
pub use idle::{IdleDetector, IdleSignal};
pub use stats::{
    Outcome, Session, SessionMetrics, SessionWithMetrics, SlackSegment, StatsTracker,
};
pub use storage::{Config, Database, SessionStore};
pub use theme::{Palette, Theme, ThemeKey};
pub use timer::{format_hms, PauseToggle, Player, TimerEngine, WarningLevel};
