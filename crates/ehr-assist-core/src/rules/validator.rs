//! Claim validation: coding suggestions plus denial risk.

use tracing::debug;

use super::denial::DenialRiskEngine;
use super::detector::{icd10_suggestions_for, ConditionDetector};
use super::scorer::ComplexityScorer;
use crate::models::{DocumentationFlags, ValidationResult};

/// Runs the coding and denial-risk rules over clinical text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimValidator {
    detector: ConditionDetector,
    scorer: ComplexityScorer,
    denial: DenialRiskEngine,
}

impl ClaimValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw notes or a serialized structured note.
    pub fn validate(&self, text: &str) -> ValidationResult {
        let conditions = self.detector.detect(text);
        let flags = DocumentationFlags::from_text(text);

        let icd10_codes = icd10_suggestions_for(&conditions);
        let cpt = self.scorer.suggest(&flags, conditions.len());
        let assessment = self.denial.assess(&flags);

        debug!(
            icd10 = icd10_codes.len(),
            cpt = %cpt.code,
            risk = assessment.risk_percentage,
            tier = assessment.tier.as_str(),
            "claim validated"
        );

        ValidationResult {
            overall_risk: assessment.tier,
            risk_percentage: assessment.risk_percentage,
            icd10_codes,
            cpt_codes: vec![cpt],
            denial_risks: assessment.checks,
            recommendations: assessment.recommendations,
            missing_elements: assessment.missing_elements,
        }
    }
}
