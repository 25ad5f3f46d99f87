//! Database layer for saved notes and claim validations.

mod notes;
mod schema;
mod validations;

pub use schema::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::models::{BillingValidationRecord, ClinicalNoteRecord, ValidationResult};

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Not authenticated")]
    NotAuthenticated,
}

pub type DbResult<T> = Result<T, DbError>;

/// Persistence for saved notes and validations.
///
/// Every call names the owning account. Records are only ever visible to,
/// and deletable by, their owner. There is no update.
pub trait RecordStore {
    fn save_note(
        &self,
        owner_id: &str,
        patient_id: &str,
        raw_notes: &str,
        structured_note: &str,
        reasoning: Option<&str>,
    ) -> DbResult<ClinicalNoteRecord>;

    /// Notes owned by `owner_id`, newest first.
    fn list_notes(&self, owner_id: &str) -> DbResult<Vec<ClinicalNoteRecord>>;

    /// Returns false when no such note belongs to the owner.
    fn delete_note(&self, owner_id: &str, record_id: &str) -> DbResult<bool>;

    fn save_validation(
        &self,
        owner_id: &str,
        patient_id: &str,
        clinical_notes: &str,
        result: &ValidationResult,
    ) -> DbResult<BillingValidationRecord>;

    /// Validations owned by `owner_id`, newest first.
    fn list_validations(&self, owner_id: &str) -> DbResult<Vec<BillingValidationRecord>>;

    fn delete_validation(&self, owner_id: &str, record_id: &str) -> DbResult<bool>;
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl RecordStore for Database {
    fn save_note(
        &self,
        owner_id: &str,
        patient_id: &str,
        raw_notes: &str,
        structured_note: &str,
        reasoning: Option<&str>,
    ) -> DbResult<ClinicalNoteRecord> {
        let owner_id = require_owner(owner_id)?;
        let record = ClinicalNoteRecord::new(
            owner_id.to_string(),
            patient_id.to_string(),
            raw_notes.to_string(),
            structured_note.to_string(),
            reasoning.map(str::to_string),
        );
        self.insert_note(&record)?;
        Ok(record)
    }

    fn list_notes(&self, owner_id: &str) -> DbResult<Vec<ClinicalNoteRecord>> {
        self.notes_for_owner(owner_id)
    }

    fn delete_note(&self, owner_id: &str, record_id: &str) -> DbResult<bool> {
        self.delete_note_record(owner_id, record_id)
    }

    fn save_validation(
        &self,
        owner_id: &str,
        patient_id: &str,
        clinical_notes: &str,
        result: &ValidationResult,
    ) -> DbResult<BillingValidationRecord> {
        let owner_id = require_owner(owner_id)?;
        let record = BillingValidationRecord::from_result(
            owner_id.to_string(),
            patient_id.to_string(),
            clinical_notes.to_string(),
            result,
        );
        self.insert_validation(&record)?;
        Ok(record)
    }

    fn list_validations(&self, owner_id: &str) -> DbResult<Vec<BillingValidationRecord>> {
        self.validations_for_owner(owner_id)
    }

    fn delete_validation(&self, owner_id: &str, record_id: &str) -> DbResult<bool> {
        self.delete_validation_record(owner_id, record_id)
    }
}

/// Reject a missing account before touching the store.
pub(crate) fn require_owner(owner_id: &str) -> DbResult<&str> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        warn!("record store call without an owner");
        return Err(DbError::NotAuthenticated);
    }
    Ok(owner_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        // Check that tables exist
        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert_eq!(tables, vec!["billing_validations", "clinical_notes"]);
    }

    #[test]
    fn test_require_owner() {
        assert_eq!(require_owner(" user-1 ").unwrap(), "user-1");
        assert!(matches!(require_owner("   "), Err(DbError::NotAuthenticated)));
        assert!(matches!(require_owner(""), Err(DbError::NotAuthenticated)));
    }
}
