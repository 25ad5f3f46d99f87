//! SQLite schema definition.

/// Complete database schema for saved notes and validations.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Clinical Notes (Immutable - delete only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinical_notes (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL CHECK (length(trim(owner_id)) > 0),
    patient_id TEXT NOT NULL,
    raw_notes TEXT NOT NULL,
    structured_note TEXT NOT NULL,
    reasoning TEXT,
    created_at TEXT NOT NULL,
    fingerprint TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notes_owner_created ON clinical_notes(owner_id, created_at);
CREATE INDEX IF NOT EXISTS idx_notes_patient ON clinical_notes(patient_id);

-- ============================================================================
-- Billing Validations (Immutable - delete only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS billing_validations (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL CHECK (length(trim(owner_id)) > 0),
    patient_id TEXT NOT NULL,
    clinical_notes TEXT NOT NULL,
    icd10_codes TEXT NOT NULL DEFAULT '[]',       -- JSON array of CodeSuggestion
    cpt_codes TEXT NOT NULL DEFAULT '[]',         -- JSON array of CodeSuggestion
    denial_risk_score INTEGER NOT NULL CHECK (denial_risk_score BETWEEN 0 AND 100),
    missing_elements TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    recommendations TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    created_at TEXT NOT NULL,
    fingerprint TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_validations_owner_created ON billing_validations(owner_id, created_at);
CREATE INDEX IF NOT EXISTS idx_validations_patient ON billing_validations(patient_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_blank_owner_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO clinical_notes (id, owner_id, patient_id, raw_notes, structured_note, created_at, fingerprint)
             VALUES ('n1', '  ', 'P1', 'raw', 'note', '2024-01-01T00:00:00Z', 'abc')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_risk_score_range_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO billing_validations (id, owner_id, patient_id, clinical_notes, denial_risk_score, created_at, fingerprint)
             VALUES ('v1', 'user-1', 'P1', 'text', 101, '2024-01-01T00:00:00Z', 'abc')",
            [],
        );
        assert!(result.is_err());
    }
}
