mod config;
pub mod database;
mod session_store;

pub use config::Config;
pub use database::Database;
pub use session_store::SessionStore;

use std::path::PathBuf;

/// Returns `~/.config/truefocus[-dev]/` based on TRUEFOCUS_ENV.
///
/// Set TRUEFOCUS_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TRUEFOCUS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("truefocus-dev")
    } else {
        base_dir.join("truefocus")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
