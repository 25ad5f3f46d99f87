//! Clinical note database operations.

use rusqlite::{params, OptionalExtension};
use tracing::{info, warn};

use super::{require_owner, Database, DbResult};
use crate::models::ClinicalNoteRecord;

const NOTE_COLUMNS: &str =
    "id, owner_id, patient_id, raw_notes, structured_note, reasoning, created_at, fingerprint";

impl Database {
    /// Insert a note record as-is.
    pub fn insert_note(&self, record: &ClinicalNoteRecord) -> DbResult<()> {
        require_owner(&record.owner_id)?;
        self.conn.execute(
            r#"
            INSERT INTO clinical_notes (
                id, owner_id, patient_id, raw_notes, structured_note,
                reasoning, created_at, fingerprint
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id,
                record.owner_id,
                record.patient_id,
                record.raw_notes,
                record.structured_note,
                record.reasoning,
                record.created_at,
                record.fingerprint,
            ],
        )?;
        info!(record_id = %record.id, patient_id = %record.patient_id, "saved clinical note");
        Ok(())
    }

    /// Get one note, only if it belongs to `owner_id`.
    pub fn get_note(&self, owner_id: &str, record_id: &str) -> DbResult<Option<ClinicalNoteRecord>> {
        let owner_id = require_owner(owner_id)?;
        let sql = format!("SELECT {NOTE_COLUMNS} FROM clinical_notes WHERE owner_id = ?1 AND id = ?2");
        let row = self
            .conn
            .query_row(&sql, params![owner_id, record_id], NoteRow::from_row)
            .optional()?;
        Ok(row.map(ClinicalNoteRecord::from))
    }

    /// Notes owned by `owner_id`, newest first.
    pub fn notes_for_owner(&self, owner_id: &str) -> DbResult<Vec<ClinicalNoteRecord>> {
        let owner_id = require_owner(owner_id)?;
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM clinical_notes WHERE owner_id = ? ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([owner_id], NoteRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(ClinicalNoteRecord::from(row?));
        }
        Ok(records)
    }

    /// Delete a note owned by `owner_id`.
    pub fn delete_note_record(&self, owner_id: &str, record_id: &str) -> DbResult<bool> {
        let owner_id = require_owner(owner_id)?;
        let rows_affected = self.conn.execute(
            "DELETE FROM clinical_notes WHERE owner_id = ? AND id = ?",
            [owner_id, record_id],
        )?;
        if rows_affected > 0 {
            info!(record_id, "deleted clinical note");
        }
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct NoteRow {
    id: String,
    owner_id: String,
    patient_id: String,
    raw_notes: String,
    structured_note: String,
    reasoning: Option<String>,
    created_at: String,
    fingerprint: String,
}

impl NoteRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            patient_id: row.get(2)?,
            raw_notes: row.get(3)?,
            structured_note: row.get(4)?,
            reasoning: row.get(5)?,
            created_at: row.get(6)?,
            fingerprint: row.get(7)?,
        })
    }
}

impl From<NoteRow> for ClinicalNoteRecord {
    fn from(row: NoteRow) -> Self {
        let record = ClinicalNoteRecord {
            id: row.id,
            owner_id: row.owner_id,
            patient_id: row.patient_id,
            raw_notes: row.raw_notes,
            structured_note: row.structured_note,
            reasoning: row.reasoning,
            created_at: row.created_at,
            fingerprint: row.fingerprint,
        };
        if !record.verify_fingerprint() {
            warn!(record_id = %record.id, "clinical note fingerprint mismatch");
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbError, RecordStore};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_save_and_get_note() {
        let db = setup_db();
        let saved = db
            .save_note("user-1", "P12345", "cc: cough", "CLINICAL DOCUMENTATION", None)
            .unwrap();

        let fetched = db.get_note("user-1", &saved.id).unwrap().unwrap();
        assert_eq!(fetched, saved);
        assert!(fetched.verify_fingerprint());
    }

    #[test]
    fn test_get_note_other_owner() {
        let db = setup_db();
        let saved = db.save_note("user-1", "P1", "raw", "note", None).unwrap();

        assert!(db.get_note("user-2", &saved.id).unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let db = setup_db();
        let first = db.save_note("user-1", "P1", "first", "note", None).unwrap();
        let second = db.save_note("user-1", "P2", "second", "note", Some("why")).unwrap();

        let notes = db.list_notes("user-1").unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, second.id);
        assert_eq!(notes[1].id, first.id);
        assert_eq!(notes[0].reasoning.as_deref(), Some("why"));
    }

    #[test]
    fn test_delete_note() {
        let db = setup_db();
        let saved = db.save_note("user-1", "P1", "raw", "note", None).unwrap();

        assert!(!db.delete_note("user-2", &saved.id).unwrap());
        assert!(db.delete_note("user-1", &saved.id).unwrap());
        assert!(!db.delete_note("user-1", &saved.id).unwrap());
        assert!(db.list_notes("user-1").unwrap().is_empty());
    }

    #[test]
    fn test_blank_owner_not_authenticated() {
        let db = setup_db();
        let result = db.save_note("", "P1", "raw", "note", None);
        assert!(matches!(result, Err(DbError::NotAuthenticated)));
        assert!(matches!(db.list_notes("  "), Err(DbError::NotAuthenticated)));
    }

    #[test]
    fn test_tampered_note_detected() {
        let db = setup_db();
        let saved = db.save_note("user-1", "P1", "bp 120/80", "note", None).unwrap();

        db.conn()
            .execute(
                "UPDATE clinical_notes SET raw_notes = 'bp 180/110' WHERE id = ?",
                [&saved.id],
            )
            .unwrap();

        let fetched = db.get_note("user-1", &saved.id).unwrap().unwrap();
        assert!(!fetched.verify_fingerprint());
    }
}
