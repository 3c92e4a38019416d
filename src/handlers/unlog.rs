//! Handler for the `unlog` command.

use anyhow::{bail, Result};
use colored::Colorize;
use maintrack::engine::config::Config;
use maintrack::engine::db::Db;
use maintrack::engine::repo::EntryRepo;

/// Deletes a single service entry.
///
/// # Errors
/// Returns error if the entry does not exist or the delete fails.
pub fn handle(config: &Config, entry_id: i64) -> Result<()> {
    let db = Db::open(&config.db_path)?;
    let conn = db.connect()?;

    if !EntryRepo::new(&conn).remove(entry_id)? {
        bail!("Entry not found: {entry_id}");
    }
    println!(
        "{} Removed entry [{}]",
        "✓".green(),
        entry_id.to_string().yellow()
    );
    Ok(())
}
