//! Runtime configuration.

use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = ".maintrack/state.db";

/// Settings resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.db_path = path;
        }
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.log_filter = "debug".to_string();
        }
        self
    }
}
