mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, GoalsConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns the data directory, honoring two environment overrides.
///
/// MOMENTUM_DATA_DIR points anywhere and wins outright. Otherwise this is
/// `~/.config/momentum[-dev]/` based on MOMENTUM_ENV (set it to `dev` for
/// a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(dir) = std::env::var("MOMENTUM_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MOMENTUM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("momentum-dev")
    } else {
        base_dir.join("momentum")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
