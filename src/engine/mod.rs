//! Core engine modules for maintrack.

pub mod clock;
pub mod config;
pub mod db;
pub mod due;
pub mod error;
pub mod history;
pub mod memory;
pub mod repo;
pub mod snapshot;
pub mod types;
pub mod view;
