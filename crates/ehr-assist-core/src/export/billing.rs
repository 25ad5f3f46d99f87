//! Billing validation history export.

use serde::{Deserialize, Serialize};

use crate::db::{Database, DbResult, RecordStore};
use crate::models::BillingValidationRecord;

/// One validation row for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationExportRow {
    /// Validation record ID
    pub record_id: String,
    /// Patient identifier
    pub patient_id: String,
    /// Semicolon-separated ICD-10 codes
    pub icd10_codes: String,
    /// Semicolon-separated CPT codes
    pub cpt_codes: String,
    /// Denial risk percentage
    pub denial_risk_score: u8,
    /// Risk tier label
    pub risk_tier: String,
    /// Number of missing documentation elements
    pub missing_count: usize,
    /// Save timestamp
    pub created_at: String,
    /// Record fingerprint for audit
    pub fingerprint: String,
}

impl ValidationExportRow {
    pub fn from_record(record: &BillingValidationRecord) -> Self {
        Self {
            record_id: record.id.clone(),
            patient_id: record.patient_id.clone(),
            icd10_codes: join_codes(record.icd10_codes.iter().map(|c| c.code.as_str())),
            cpt_codes: join_codes(record.cpt_codes.iter().map(|c| c.code.as_str())),
            denial_risk_score: record.denial_risk_score,
            risk_tier: record.risk_tier().as_str().to_string(),
            missing_count: record.missing_elements.len(),
            created_at: record.created_at.clone(),
            fingerprint: record.fingerprint.clone(),
        }
    }
}

/// Batch export of a user's validation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationHistoryExport {
    /// Owning user account
    pub owner_id: String,
    /// Export timestamp
    pub exported_at: String,
    /// Rows, newest first
    pub rows: Vec<ValidationExportRow>,
    /// Mean denial risk across rows
    pub average_risk: Option<f64>,
}

impl ValidationHistoryExport {
    /// Build an export from records.
    pub fn from_records(owner_id: &str, records: &[BillingValidationRecord]) -> Self {
        let rows: Vec<ValidationExportRow> =
            records.iter().map(ValidationExportRow::from_record).collect();
        let average_risk = if rows.is_empty() {
            None
        } else {
            let total: f64 = rows.iter().map(|r| f64::from(r.denial_risk_score)).sum();
            Some(total / rows.len() as f64)
        };

        Self {
            owner_id: owner_id.to_string(),
            exported_at: chrono::Utc::now().to_rfc3339(),
            rows,
            average_risk,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("record_id,patient_id,icd10_codes,cpt_codes,denial_risk_score,risk_tier,missing_count,created_at,fingerprint\n");

        for row in &self.rows {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                escape_csv(&row.record_id),
                escape_csv(&row.patient_id),
                escape_csv(&row.icd10_codes),
                escape_csv(&row.cpt_codes),
                row.denial_risk_score,
                row.risk_tier,
                row.missing_count,
                escape_csv(&row.created_at),
                escape_csv(&row.fingerprint),
            ));
        }

        csv
    }
}

/// Validation history exporter.
pub struct ValidationExporter<'a> {
    db: &'a Database,
}

impl<'a> ValidationExporter<'a> {
    /// Create a new exporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Export every validation owned by `owner_id`.
    pub fn export_owner(&self, owner_id: &str) -> DbResult<ValidationHistoryExport> {
        let records = self.db.list_validations(owner_id)?;
        Ok(ValidationHistoryExport::from_records(owner_id, &records))
    }
}

fn join_codes<'c>(codes: impl Iterator<Item = &'c str>) -> String {
    codes.collect::<Vec<_>>().join(";")
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ClaimValidator;

    fn make_record(patient: &str, text: &str) -> BillingValidationRecord {
        let result = ClaimValidator::new().validate(text);
        BillingValidationRecord::from_result("user-1".into(), patient.into(), text.into(), &result)
    }

    #[test]
    fn test_export_row_from_record() {
        let record = make_record("P12345", "HTN, BP 150/90, dx htn, plan: lisinopril 10mg");
        let row = ValidationExportRow::from_record(&record);

        assert_eq!(row.patient_id, "P12345");
        assert_eq!(row.icd10_codes, "I10");
        assert_eq!(row.denial_risk_score, 5);
        assert_eq!(row.risk_tier, "low");
        assert_eq!(row.missing_count, 0);
    }

    #[test]
    fn test_history_csv() {
        let records = vec![
            make_record("PATIENT_001", "t2dm and htn"),
            make_record("PATIENT_002", "copd, BP 130/80"),
        ];
        let export = ValidationHistoryExport::from_records("user-1", &records);

        let csv = export.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3); // Header + 2 rows
        assert!(lines[0].starts_with("record_id,patient_id"));
        assert!(lines[1].contains("E11.65;I10"));
        assert!(lines[2].contains("J44.9"));
        assert!(export.average_risk.is_some());
    }

    #[test]
    fn test_empty_history() {
        let export = ValidationHistoryExport::from_records("user-1", &[]);
        assert!(export.average_risk.is_none());
        assert_eq!(export.to_csv().lines().count(), 1);
        assert!(export.to_json().unwrap().contains("\"owner_id\": \"user-1\""));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_exporter_reads_store() {
        let db = Database::open_in_memory().unwrap();
        let result = ClaimValidator::new().validate("dx: mdd. plan: sertraline 50mg");
        db.save_validation("user-1", "PATIENT_003", "dx: mdd. plan: sertraline 50mg", &result)
            .unwrap();
        db.save_validation("user-2", "PATIENT_004", "other", &result).unwrap();

        let export = ValidationExporter::new(&db).export_owner("user-1").unwrap();
        assert_eq!(export.rows.len(), 1);
        assert_eq!(export.rows[0].icd10_codes, "F32.9");
    }
}
