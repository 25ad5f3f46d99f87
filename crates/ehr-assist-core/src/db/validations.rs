//! Billing validation database operations.

use rusqlite::params;
use tracing::{info, warn};

use super::{require_owner, Database, DbError, DbResult};
use crate::models::BillingValidationRecord;

impl Database {
    /// Insert a validation record as-is.
    pub fn insert_validation(&self, record: &BillingValidationRecord) -> DbResult<()> {
        require_owner(&record.owner_id)?;
        if record.denial_risk_score > 100 {
            return Err(DbError::Constraint(format!(
                "denial risk score {} out of range",
                record.denial_risk_score
            )));
        }

        let icd10_json = serde_json::to_string(&record.icd10_codes)?;
        let cpt_json = serde_json::to_string(&record.cpt_codes)?;
        let missing_json = serde_json::to_string(&record.missing_elements)?;
        let recommendations_json = serde_json::to_string(&record.recommendations)?;

        self.conn.execute(
            r#"
            INSERT INTO billing_validations (
                id, owner_id, patient_id, clinical_notes, icd10_codes, cpt_codes,
                denial_risk_score, missing_elements, recommendations, created_at, fingerprint
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                record.id,
                record.owner_id,
                record.patient_id,
                record.clinical_notes,
                icd10_json,
                cpt_json,
                record.denial_risk_score,
                missing_json,
                recommendations_json,
                record.created_at,
                record.fingerprint,
            ],
        )?;
        info!(
            record_id = %record.id,
            patient_id = %record.patient_id,
            risk = record.denial_risk_score,
            "saved billing validation"
        );
        Ok(())
    }

    /// Validations owned by `owner_id`, newest first.
    pub fn validations_for_owner(&self, owner_id: &str) -> DbResult<Vec<BillingValidationRecord>> {
        let owner_id = require_owner(owner_id)?;
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, owner_id, patient_id, clinical_notes, icd10_codes, cpt_codes,
                   denial_risk_score, missing_elements, recommendations, created_at, fingerprint
            FROM billing_validations
            WHERE owner_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([owner_id], |row| {
            Ok(ValidationRow {
                id: row.get(0)?,
                owner_id: row.get(1)?,
                patient_id: row.get(2)?,
                clinical_notes: row.get(3)?,
                icd10_codes: row.get(4)?,
                cpt_codes: row.get(5)?,
                denial_risk_score: row.get(6)?,
                missing_elements: row.get(7)?,
                recommendations: row.get(8)?,
                created_at: row.get(9)?,
                fingerprint: row.get(10)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }

    /// Delete a validation owned by `owner_id`.
    pub fn delete_validation_record(&self, owner_id: &str, record_id: &str) -> DbResult<bool> {
        let owner_id = require_owner(owner_id)?;
        let rows_affected = self.conn.execute(
            "DELETE FROM billing_validations WHERE owner_id = ? AND id = ?",
            [owner_id, record_id],
        )?;
        if rows_affected > 0 {
            info!(record_id, "deleted billing validation");
        }
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct ValidationRow {
    id: String,
    owner_id: String,
    patient_id: String,
    clinical_notes: String,
    icd10_codes: String,
    cpt_codes: String,
    denial_risk_score: u8,
    missing_elements: String,
    recommendations: String,
    created_at: String,
    fingerprint: String,
}

impl TryFrom<ValidationRow> for BillingValidationRecord {
    type Error = DbError;

    fn try_from(row: ValidationRow) -> Result<Self, Self::Error> {
        let record = BillingValidationRecord {
            id: row.id,
            owner_id: row.owner_id,
            patient_id: row.patient_id,
            clinical_notes: row.clinical_notes,
            icd10_codes: serde_json::from_str(&row.icd10_codes)?,
            cpt_codes: serde_json::from_str(&row.cpt_codes)?,
            denial_risk_score: row.denial_risk_score,
            missing_elements: serde_json::from_str(&row.missing_elements)?,
            recommendations: serde_json::from_str(&row.recommendations)?,
            created_at: row.created_at,
            fingerprint: row.fingerprint,
        };
        if !record.verify_fingerprint() {
            warn!(record_id = %record.id, "billing validation fingerprint mismatch");
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RecordStore;
    use crate::rules::ClaimValidator;

    const NOTE: &str = "pt c/o thirst. BP 148/92. dx: t2dm. plan: increase metformin, f/u 3mo";

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_save_and_list_validation() {
        let db = setup_db();
        let result = ClaimValidator::new().validate(NOTE);
        let saved = db.save_validation("user-1", "P12345", NOTE, &result).unwrap();

        assert_eq!(saved.denial_risk_score, result.risk_percentage);
        assert_eq!(saved.icd10_codes, result.icd10_codes);

        let listed = db.list_validations("user-1").unwrap();
        assert_eq!(listed, vec![saved]);
        assert!(listed[0].verify_fingerprint());
    }

    #[test]
    fn test_validations_scoped_to_owner() {
        let db = setup_db();
        let result = ClaimValidator::new().validate(NOTE);
        db.save_validation("user-1", "P1", NOTE, &result).unwrap();
        db.save_validation("user-2", "P2", NOTE, &result).unwrap();

        let listed = db.list_validations("user-2").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].patient_id, "P2");
    }

    #[test]
    fn test_delete_validation() {
        let db = setup_db();
        let result = ClaimValidator::new().validate("nothing useful");
        let saved = db.save_validation("user-1", "P1", "nothing useful", &result).unwrap();

        assert!(!db.delete_validation("user-2", &saved.id).unwrap());
        assert!(db.delete_validation("user-1", &saved.id).unwrap());
        assert!(db.list_validations("user-1").unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let db = setup_db();
        let result = ClaimValidator::new().validate(NOTE);
        let mut record =
            BillingValidationRecord::from_result("user-1".into(), "P1".into(), NOTE.into(), &result);
        record.denial_risk_score = 150;

        assert!(matches!(db.insert_validation(&record), Err(DbError::Constraint(_))));
    }

    #[test]
    fn test_corrupt_json_column() {
        let db = setup_db();
        let result = ClaimValidator::new().validate(NOTE);
        let saved = db.save_validation("user-1", "P1", NOTE, &result).unwrap();

        db.conn()
            .execute(
                "UPDATE billing_validations SET icd10_codes = 'not json' WHERE id = ?",
                [&saved.id],
            )
            .unwrap();

        assert!(matches!(db.list_validations("user-1"), Err(DbError::Json(_))));
    }
}
