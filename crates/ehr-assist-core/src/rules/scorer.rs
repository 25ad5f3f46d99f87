//! CPT visit-complexity scoring.

use tracing::debug;

use crate::models::{CodeSuggestion, DocumentationFlags};

/// Weight for more than one detected diagnosis.
pub const MULTIPLE_DIAGNOSES_WEIGHT: u8 = 2;

/// CPT tiers, checked from the highest threshold down.
/// The high and low tiers share a confidence of 85.
const CPT_TIERS: [(u8, &str, &str, u8); 4] = [
    (5, "99215", "Office visit, established patient, high complexity", 85),
    (4, "99214", "Office visit, established patient, moderate complexity", 88),
    (2, "99213", "Office visit, established patient, low complexity", 85),
    (0, "99212", "Office visit, established patient, straightforward", 80),
];

/// Scores visit complexity and selects an E/M code.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexityScorer;

impl ComplexityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Sum the weighted complexity predicates.
    pub fn score(&self, flags: &DocumentationFlags, diagnosis_count: usize) -> u8 {
        let mut score = 0;
        if diagnosis_count > 1 {
            score += MULTIPLE_DIAGNOSES_WEIGHT;
        }
        for present in [flags.plan, flags.vitals, flags.history, flags.exam, flags.labs_or_imaging] {
            if present {
                score += 1;
            }
        }
        score
    }

    /// The single CPT code for a complexity score.
    pub fn cpt_for_score(&self, score: u8) -> CodeSuggestion {
        let (_, code, description, confidence) = CPT_TIERS
            .iter()
            .copied()
            .find(|(threshold, ..)| score >= *threshold)
            .unwrap_or(CPT_TIERS[CPT_TIERS.len() - 1]);
        debug!(score, code, "selected CPT tier");
        CodeSuggestion::new(code, description, confidence)
    }

    /// Score and select in one step.
    pub fn suggest(&self, flags: &DocumentationFlags, diagnosis_count: usize) -> CodeSuggestion {
        self.cpt_for_score(self.score(flags, diagnosis_count))
    }
}
