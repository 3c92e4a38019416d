//! Repositories: All database operations in one place.

mod entries;
mod equipment;
mod tasks;

pub use entries::EntryRepo;
pub use equipment::EquipmentRepo;
pub use tasks::TaskRepo;
