//! Equipment lookup for due-status evaluation.

use super::error::{EngineError, Result};
use super::types::EquipmentSnapshot;

/// Source of equipment state.
pub trait EquipmentSource: Sync {
    /// Returns the equipment's current snapshot, or `None` if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the underlying store cannot be read.
    fn get_by_id(&self, equipment_id: i64) -> Result<Option<EquipmentSnapshot>>;
}

/// Resolves a snapshot, turning a missing record into `ReferenceNotFound`.
///
/// # Errors
/// Returns `ReferenceNotFound` if no such equipment exists, or the source's
/// own error if the lookup fails.
pub fn resolve_snapshot<S: EquipmentSource + ?Sized>(
    source: &S,
    equipment_id: i64,
) -> Result<EquipmentSnapshot> {
    source
        .get_by_id(equipment_id)?
        .ok_or_else(|| EngineError::equipment_not_found(equipment_id))
}
