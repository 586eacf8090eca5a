use chrono::Utc;
use clap::Subcommand;
use truefocus_core::storage::Database;
use truefocus_core::timer::{PauseToggle, Player, TimerEngine};
use truefocus_core::{Config, CoreError};

const ENGINE_KEY: &str = "timer_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or switch to the focus clock
    Focus,
    /// Start or switch to the slack clock
    Slack,
    /// Toggle pause on the active clock
    Pause,
    /// Set the focus duration in seconds (only while stopped)
    Set {
        /// New focus duration in seconds
        secs: u32,
    },
    /// Advance the clock to now and print the current state
    Tick,
    /// Reset to the configured default duration
    Reset,
    /// Print current timer state as JSON
    Status,
}

fn load_engine(db: &Database, default_focus_secs: u32) -> TimerEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<TimerEngine>(&json) {
            return engine;
        }
    }
    TimerEngine::new(default_focus_secs)
}

fn save_engine(db: &Database, engine: &TimerEngine) -> Result<(), CoreError> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), CoreError> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut engine = load_engine(&db, config.timer.default_focus_secs);
    let now = Utc::now();

    match action {
        TimerAction::Focus => {
            engine.activate(Player::Focus, now);
        }
        TimerAction::Slack => {
            engine.activate(Player::Slack, now);
        }
        TimerAction::Pause => {
            if engine.toggle_pause(now) == PauseToggle::Rejected {
                eprintln!("no active clock");
            }
        }
        TimerAction::Set { secs } => {
            if !engine.set_focus_duration(secs) {
                eprintln!("timer is running; pause or reset it first");
                std::process::exit(1);
            }
        }
        TimerAction::Tick => {
            if engine.advance(now).is_some() {
                engine.stop();
            }
        }
        TimerAction::Reset => {
            engine.reset(config.timer.default_focus_secs);
        }
        TimerAction::Status => {}
    }

    save_engine(&db, &engine)?;
    let snapshot = engine.snapshot(now);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
