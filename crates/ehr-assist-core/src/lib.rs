//! NextGen EHR Assist Core Library
//!
//! Deterministic clinical documentation and billing assistant.
//!
//! # Architecture
//!
//! ```text
//!                        Raw clinician notes
//!                                │
//!                          Input check (non-empty)
//!                                │
//!              ┌─────────────────┴─────────────────┐
//!              ▼                                   ▼
//!       Note Structurer                     Claim Validator
//!   conditions → SOAP fields        conditions → ICD-10 suggestions
//!   vitals → suggested orders       doc flags → CPT tier
//!              │                    doc flags → denial risk + checks
//!              ▼                                   │
//!   Canonical note text block  ─── parse ───►  (re-validated)
//!              │                                   │
//!              └─────────────────┬─────────────────┘
//!                                ▼
//!                  Record store (owner-scoped, newest first)
//!                                │
//!                    History search / JSON + CSV export
//! ```
//!
//! # Core Principle
//!
//! **Every output is a pure function of the input text.** The same notes always
//! produce the same note, the same codes and the same risk.
//!
//! # Modules
//!
//! - [`rules`]: Condition detection, note structuring, CPT scoring, denial risk
//! - [`export`]: Canonical note text format and validation history export
//! - [`db`]: SQLite record store
//! - [`models`]: Domain types (StructuredNote, ValidationResult, records)
//! - [`data`]: Demo patient packs and history helpers
//! - [`config`]: TOML configuration

pub mod config;
pub mod data;
pub mod db;
pub mod export;
pub mod models;
pub mod rules;

// Re-export commonly used types
pub use config::{AssistConfig, ConfigError};
pub use db::{Database, RecordStore};
pub use export::{footer_patient_id, parse_note_text, NoteTextFormat};
pub use models::{
    BillingValidationRecord, ClinicalNoteRecord, CodeSuggestion, Diagnosis, PatientProfile,
    RiskTier, StructuredNote, ValidationResult,
};
pub use rules::{ClaimValidator, NoteStructurer, RuleEngine};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum AssistError {
    #[error("Clinical notes are empty")]
    EmptyInput,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for AssistError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotAuthenticated => AssistError::NotAuthenticated,
            other => AssistError::DatabaseError(other.to_string()),
        }
    }
}

impl From<rules::RuleError> for AssistError {
    fn from(e: rules::RuleError) -> Self {
        match e {
            rules::RuleError::EmptyInput => AssistError::EmptyInput,
        }
    }
}

impl From<ConfigError> for AssistError {
    fn from(e: ConfigError) -> Self {
        AssistError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for AssistError {
    fn from(e: serde_json::Error) -> Self {
        AssistError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for AssistError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        AssistError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<EhrAssistCore>, AssistError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(EhrAssistCore::new(db, AssistConfig::default())))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<EhrAssistCore>, AssistError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(EhrAssistCore::new(db, AssistConfig::default())))
}

/// Open using TOML configuration; in-memory when no database path is set.
#[uniffi::export]
pub fn open_with_config(config_toml: String) -> Result<Arc<EhrAssistCore>, AssistError> {
    let config = AssistConfig::from_toml_str(&config_toml)?;
    let db = match &config.database_path {
        Some(path) => Database::open(path)?,
        None => Database::open_in_memory()?,
    };
    Ok(Arc::new(EhrAssistCore::new(db, config)))
}

/// Display tag for a patient's saved note.
#[uniffi::export]
pub fn note_tag(patient_id: String) -> String {
    data::note_tag(&patient_id)
}

/// Profile shown when no patient is selected.
#[uniffi::export]
pub fn default_patient_profile() -> FfiPatientProfile {
    data::default_patient_profile().into()
}

/// Parse a demo profiles pack.
#[uniffi::export]
pub fn parse_patient_profiles(content: String) -> Vec<FfiPatientProfile> {
    data::parse_patient_profiles(&content)
        .into_iter()
        .map(Into::into)
        .collect()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe assistant wrapper for FFI.
#[derive(uniffi::Object)]
pub struct EhrAssistCore {
    db: Arc<Mutex<Database>>,
    config: AssistConfig,
    engine: RuleEngine,
    format: NoteTextFormat,
}

impl EhrAssistCore {
    fn new(db: Database, config: AssistConfig) -> Self {
        let format = NoteTextFormat::new(config.system_name.clone());
        Self {
            db: Arc::new(Mutex::new(db)),
            config,
            engine: RuleEngine::new(),
            format,
        }
    }
}

#[uniffi::export]
impl EhrAssistCore {
    // =========================================================================
    // Rule Engine Operations
    // =========================================================================

    /// Structure raw notes and render the canonical text block.
    pub fn generate_note(
        &self,
        raw_notes: String,
        patient_id: Option<String>,
    ) -> Result<FfiGeneratedNote, AssistError> {
        let note = self.engine.structure_note(&raw_notes)?;
        let patient_id = self.config.patient_id_or_default(patient_id.as_deref());
        let note_text = self.format.render(&note, Some(patient_id));
        Ok(FfiGeneratedNote {
            patient_id: patient_id.to_string(),
            note: note.into(),
            note_text,
        })
    }

    /// Parse a canonical note text block; None when it has no chief complaint.
    pub fn parse_note_text(&self, text: String) -> Option<FfiStructuredNote> {
        self.format.parse(&text).map(Into::into)
    }

    /// Suggest codes and assess denial risk.
    pub fn validate_claim(&self, clinical_notes: String) -> Result<FfiValidationResult, AssistError> {
        let result = self.engine.validate_claim(&clinical_notes)?;
        Ok(result.into())
    }

    // =========================================================================
    // Note History Operations
    // =========================================================================

    /// Save a generated note.
    pub fn save_note(
        &self,
        owner_id: String,
        patient_id: String,
        raw_notes: String,
        structured_note: String,
        reasoning: Option<String>,
    ) -> Result<FfiClinicalNote, AssistError> {
        rules::require_text(&raw_notes)?;
        let db = self.db.lock()?;
        let record = db.save_note(
            &owner_id,
            &patient_id,
            &raw_notes,
            &structured_note,
            reasoning.as_deref(),
        )?;
        Ok(record.into())
    }

    /// Saved notes, newest first.
    pub fn list_notes(&self, owner_id: String) -> Result<Vec<FfiClinicalNote>, AssistError> {
        let db = self.db.lock()?;
        let notes = db.list_notes(&owner_id)?;
        Ok(notes.into_iter().map(Into::into).collect())
    }

    /// Saved notes matching a search on patient id, note tag or raw notes.
    pub fn filter_notes(
        &self,
        owner_id: String,
        query: String,
    ) -> Result<Vec<FfiClinicalNote>, AssistError> {
        let db = self.db.lock()?;
        let notes = db.list_notes(&owner_id)?;
        Ok(data::filter_notes(&notes, &query)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Delete a saved note.
    pub fn delete_note(&self, owner_id: String, record_id: String) -> Result<(), AssistError> {
        let db = self.db.lock()?;
        if !db.delete_note(&owner_id, &record_id)? {
            return Err(AssistError::NotFound(format!("clinical note {}", record_id)));
        }
        Ok(())
    }

    // =========================================================================
    // Validation History Operations
    // =========================================================================

    /// Validate notes and save the result.
    pub fn save_validation(
        &self,
        owner_id: String,
        patient_id: String,
        clinical_notes: String,
    ) -> Result<FfiBillingValidation, AssistError> {
        let result = self.engine.validate_claim(&clinical_notes)?;
        let db = self.db.lock()?;
        let record = db.save_validation(&owner_id, &patient_id, &clinical_notes, &result)?;
        Ok(record.into())
    }

    /// Saved validations, newest first.
    pub fn list_validations(
        &self,
        owner_id: String,
    ) -> Result<Vec<FfiBillingValidation>, AssistError> {
        let db = self.db.lock()?;
        let records = db.list_validations(&owner_id)?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Delete a saved validation.
    pub fn delete_validation(&self, owner_id: String, record_id: String) -> Result<(), AssistError> {
        let db = self.db.lock()?;
        if !db.delete_validation(&owner_id, &record_id)? {
            return Err(AssistError::NotFound(format!("billing validation {}", record_id)));
        }
        Ok(())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export validation history as JSON.
    pub fn export_validations_json(&self, owner_id: String) -> Result<String, AssistError> {
        let db = self.db.lock()?;
        let export = export::ValidationExporter::new(&db).export_owner(&owner_id)?;
        Ok(export.to_json()?)
    }

    /// Export validation history as CSV.
    pub fn export_validations_csv(&self, owner_id: String) -> Result<String, AssistError> {
        let db = self.db.lock()?;
        let export = export::ValidationExporter::new(&db).export_owner(&owner_id)?;
        Ok(export.to_csv())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe diagnosis.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDiagnosis {
    pub name: String,
    pub code: String,
}

impl From<Diagnosis> for FfiDiagnosis {
    fn from(diagnosis: Diagnosis) -> Self {
        Self {
            name: diagnosis.name,
            code: diagnosis.code,
        }
    }
}

/// FFI-safe structured note.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStructuredNote {
    pub chief_complaint: String,
    pub hpi_narrative: String,
    pub assessment: String,
    pub plan: String,
    pub diagnoses: Vec<FfiDiagnosis>,
    pub suggested_orders: Vec<String>,
    pub patient_portal_summary: String,
}

impl From<StructuredNote> for FfiStructuredNote {
    fn from(note: StructuredNote) -> Self {
        Self {
            chief_complaint: note.chief_complaint,
            hpi_narrative: note.hpi_narrative,
            assessment: note.assessment,
            plan: note.plan,
            diagnoses: note.diagnoses.into_iter().map(Into::into).collect(),
            suggested_orders: note.suggested_orders,
            patient_portal_summary: note.patient_portal_summary,
        }
    }
}

/// FFI-safe note generation result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGeneratedNote {
    pub patient_id: String,
    pub note: FfiStructuredNote,
    /// Canonical text block, ready to save
    pub note_text: String,
}

/// FFI-safe code suggestion.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCodeSuggestion {
    pub code: String,
    pub description: String,
    pub confidence: u8,
}

impl From<CodeSuggestion> for FfiCodeSuggestion {
    fn from(suggestion: CodeSuggestion) -> Self {
        Self {
            code: suggestion.code,
            description: suggestion.description,
            confidence: suggestion.confidence,
        }
    }
}

/// FFI-safe denial checklist entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDenialCheck {
    pub rule: String,
    /// "pass", "warning" or "fail"
    pub status: String,
    pub detail: String,
}

impl From<models::DenialCheck> for FfiDenialCheck {
    fn from(check: models::DenialCheck) -> Self {
        Self {
            rule: check.rule,
            status: check.status.as_str().to_string(),
            detail: check.detail,
        }
    }
}

/// FFI-safe validation result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiValidationResult {
    /// "low", "medium" or "high"
    pub overall_risk: String,
    pub risk_percentage: u8,
    pub icd10_codes: Vec<FfiCodeSuggestion>,
    pub cpt_codes: Vec<FfiCodeSuggestion>,
    pub denial_risks: Vec<FfiDenialCheck>,
    pub recommendations: Vec<String>,
    pub missing_elements: Vec<String>,
}

impl From<ValidationResult> for FfiValidationResult {
    fn from(result: ValidationResult) -> Self {
        Self {
            overall_risk: result.overall_risk.as_str().to_string(),
            risk_percentage: result.risk_percentage,
            icd10_codes: result.icd10_codes.into_iter().map(Into::into).collect(),
            cpt_codes: result.cpt_codes.into_iter().map(Into::into).collect(),
            denial_risks: result.denial_risks.into_iter().map(Into::into).collect(),
            recommendations: result.recommendations,
            missing_elements: result.missing_elements,
        }
    }
}

/// FFI-safe saved note.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicalNote {
    pub id: String,
    pub patient_id: String,
    pub note_tag: String,
    pub raw_notes: String,
    pub structured_note: String,
    pub reasoning: Option<String>,
    pub created_at: String,
    pub fingerprint_valid: bool,
}

impl From<ClinicalNoteRecord> for FfiClinicalNote {
    fn from(record: ClinicalNoteRecord) -> Self {
        let fingerprint_valid = record.verify_fingerprint();
        Self {
            note_tag: data::note_tag(&record.patient_id),
            id: record.id,
            patient_id: record.patient_id,
            raw_notes: record.raw_notes,
            structured_note: record.structured_note,
            reasoning: record.reasoning,
            created_at: record.created_at,
            fingerprint_valid,
        }
    }
}

/// FFI-safe saved validation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBillingValidation {
    pub id: String,
    pub patient_id: String,
    pub clinical_notes: String,
    pub icd10_codes: Vec<FfiCodeSuggestion>,
    pub cpt_codes: Vec<FfiCodeSuggestion>,
    pub denial_risk_score: u8,
    pub risk_tier: String,
    pub missing_elements: Vec<String>,
    pub recommendations: Vec<String>,
    pub created_at: String,
    pub fingerprint_valid: bool,
}

impl From<BillingValidationRecord> for FfiBillingValidation {
    fn from(record: BillingValidationRecord) -> Self {
        let fingerprint_valid = record.verify_fingerprint();
        let risk_tier = record.risk_tier().as_str().to_string();
        Self {
            id: record.id,
            patient_id: record.patient_id,
            clinical_notes: record.clinical_notes,
            icd10_codes: record.icd10_codes.into_iter().map(Into::into).collect(),
            cpt_codes: record.cpt_codes.into_iter().map(Into::into).collect(),
            denial_risk_score: record.denial_risk_score,
            risk_tier,
            missing_elements: record.missing_elements,
            recommendations: record.recommendations,
            created_at: record.created_at,
            fingerprint_valid,
        }
    }
}

/// FFI-safe patient profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientProfile {
    pub patient_id: String,
    pub name: String,
    pub dob: String,
    pub gender: String,
    pub insurance: String,
    pub allergies: Vec<String>,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
}

impl From<PatientProfile> for FfiPatientProfile {
    fn from(profile: PatientProfile) -> Self {
        Self {
            patient_id: profile.patient_id,
            name: profile.name,
            dob: profile.dob,
            gender: profile.gender,
            insurance: profile.insurance,
            allergies: profile.allergies,
            conditions: profile.conditions,
            medications: profile.medications,
        }
    }
}
