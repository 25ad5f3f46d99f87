//! Clinical-text rule engine.
//!
//! Pipeline: Input Check → Condition Detection → Documentation Flags →
//! (Note Structuring | CPT Scoring + Denial Risk)
//!
//! All stages are pure functions of the input text.

mod denial;
mod detector;
mod flags;
pub(crate) mod patterns;
mod scorer;
mod structurer;
mod validator;

pub use denial::*;
pub use detector::*;
pub use scorer::*;
pub use structurer::*;
pub use validator::*;

use thiserror::Error;
use tracing::warn;

use crate::models::{StructuredNote, ValidationResult};

/// Rule engine errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RuleError {
    #[error("Clinical notes are empty")]
    EmptyInput,
}

pub type RuleResult<T> = Result<T, RuleError>;

/// Reject blank input before any rule runs.
pub fn require_text(text: &str) -> RuleResult<&str> {
    if text.trim().is_empty() {
        warn!("rejected blank clinical notes");
        return Err(RuleError::EmptyInput);
    }
    Ok(text)
}

/// Coordinates both pipelines behind the input check.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine {
    structurer: NoteStructurer,
    validator: ClaimValidator,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Structure raw clinician notes.
    pub fn structure_note(&self, raw: &str) -> RuleResult<StructuredNote> {
        let raw = require_text(raw)?;
        Ok(self.structurer.structure(raw))
    }

    /// Suggest codes and assess denial risk.
    pub fn validate_claim(&self, text: &str) -> RuleResult<ValidationResult> {
        let text = require_text(text)?;
        Ok(self.validator.validate(text))
    }

    /// Get the structurer for direct access.
    pub fn structurer(&self) -> &NoteStructurer {
        &self.structurer
    }

    /// Get the validator for direct access.
    pub fn validator(&self) -> &ClaimValidator {
        &self.validator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_rejected() {
        let engine = RuleEngine::new();
        assert_eq!(engine.structure_note("").unwrap_err(), RuleError::EmptyInput);
        assert_eq!(engine.validate_claim(" \n\t ").unwrap_err(), RuleError::EmptyInput);
    }

    #[test]
    fn test_structured_note_text_can_be_validated() {
        let engine = RuleEngine::new();
        let note = engine
            .structure_note("c/o cough\nCOPD exacerbation\nplan: albuterol inhaler")
            .unwrap();
        let result = engine
            .validate_claim(&format!("{}\n{}", note.assessment, note.plan))
            .unwrap();

        assert_eq!(result.icd10_codes[0].code, "J44.9");
    }
}
