//! Handler for the `init` command.

use anyhow::Result;
use colored::Colorize;
use maintrack::engine::config::Config;
use maintrack::engine::db::Db;

/// Initializes the maintenance store.
///
/// # Errors
/// Returns error if database initialization fails.
pub fn handle(config: &Config) -> Result<()> {
    let db = Db::init(&config.db_path)?;
    println!("{} Initialized {}", "✓".green(), db.path().display());
    Ok(())
}
