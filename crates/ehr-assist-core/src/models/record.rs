//! Persisted note and validation records.
//!
//! Records are immutable once saved. Each carries a SHA-256 fingerprint of its
//! content so a row altered outside the store can be detected on read.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::coding::{CodeSuggestion, RiskTier, ValidationResult};

/// A saved clinical documentation note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClinicalNoteRecord {
    /// Record ID (UUID)
    pub id: String,
    /// Owning user account
    pub owner_id: String,
    /// Patient identifier the note belongs to
    pub patient_id: String,
    /// Raw clinician input
    pub raw_notes: String,
    /// Canonical structured note text block
    pub structured_note: String,
    /// Reasoning explanation, if one was generated
    pub reasoning: Option<String>,
    /// Creation timestamp (RFC 3339, microseconds)
    pub created_at: String,
    /// SHA-256 hex of the immutable content
    pub fingerprint: String,
}

impl ClinicalNoteRecord {
    /// Create a new record with a fresh ID and timestamp.
    pub fn new(
        owner_id: String,
        patient_id: String,
        raw_notes: String,
        structured_note: String,
        reasoning: Option<String>,
    ) -> Self {
        let mut record = Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            patient_id,
            raw_notes,
            structured_note,
            reasoning,
            created_at: now_timestamp(),
            fingerprint: String::new(),
        };
        record.fingerprint = record.compute_fingerprint();
        record
    }

    pub fn compute_fingerprint(&self) -> String {
        let mut hasher = Fingerprinter::new();
        hasher.field(&self.owner_id);
        hasher.field(&self.patient_id);
        hasher.field(&self.raw_notes);
        hasher.field(&self.structured_note);
        hasher.optional_field(self.reasoning.as_deref());
        hasher.field(&self.created_at);
        hasher.finish()
    }

    /// Check the stored fingerprint against the record content.
    pub fn verify_fingerprint(&self) -> bool {
        self.fingerprint == self.compute_fingerprint()
    }
}

/// A saved claim validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingValidationRecord {
    /// Record ID (UUID)
    pub id: String,
    /// Owning user account
    pub owner_id: String,
    /// Patient identifier
    pub patient_id: String,
    /// Text that was validated
    pub clinical_notes: String,
    pub icd10_codes: Vec<CodeSuggestion>,
    pub cpt_codes: Vec<CodeSuggestion>,
    /// Denial risk percentage, 0-100
    pub denial_risk_score: u8,
    pub missing_elements: Vec<String>,
    pub recommendations: Vec<String>,
    /// Creation timestamp (RFC 3339, microseconds)
    pub created_at: String,
    /// SHA-256 hex of the immutable content
    pub fingerprint: String,
}

impl BillingValidationRecord {
    /// Create a record from a validation result.
    pub fn from_result(
        owner_id: String,
        patient_id: String,
        clinical_notes: String,
        result: &ValidationResult,
    ) -> Self {
        let mut record = Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            patient_id,
            clinical_notes,
            icd10_codes: result.icd10_codes.clone(),
            cpt_codes: result.cpt_codes.clone(),
            denial_risk_score: result.risk_percentage,
            missing_elements: result.missing_elements.clone(),
            recommendations: result.recommendations.clone(),
            created_at: now_timestamp(),
            fingerprint: String::new(),
        };
        record.fingerprint = record.compute_fingerprint();
        record
    }

    /// Risk tier for the stored score.
    pub fn risk_tier(&self) -> RiskTier {
        RiskTier::from_percentage(self.denial_risk_score)
    }

    pub fn compute_fingerprint(&self) -> String {
        let mut hasher = Fingerprinter::new();
        hasher.field(&self.owner_id);
        hasher.field(&self.patient_id);
        hasher.field(&self.clinical_notes);
        for code in self.icd10_codes.iter().chain(self.cpt_codes.iter()) {
            hasher.field(&code.code);
            hasher.field(&code.description);
            hasher.field(&code.confidence.to_string());
        }
        hasher.field(&self.denial_risk_score.to_string());
        for item in self.missing_elements.iter().chain(self.recommendations.iter()) {
            hasher.field(item);
        }
        hasher.field(&self.created_at);
        hasher.finish()
    }

    /// Check the stored fingerprint against the record content.
    pub fn verify_fingerprint(&self) -> bool {
        self.fingerprint == self.compute_fingerprint()
    }
}

/// Length-prefixed SHA-256 so adjacent fields cannot run together.
struct Fingerprinter {
    hasher: Sha256,
}

impl Fingerprinter {
    fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    fn field(&mut self, value: &str) {
        self.hasher.update((value.len() as u64).to_le_bytes());
        self.hasher.update(value.as_bytes());
    }

    /// Presence byte first, so an absent value and an empty one differ.
    fn optional_field(&mut self, value: Option<&str>) {
        match value {
            Some(value) => {
                self.hasher.update([1u8]);
                self.field(value);
            }
            None => self.hasher.update([0u8]),
        }
    }

    fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
