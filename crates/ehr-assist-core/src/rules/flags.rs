//! Documentation-element detection.

use tracing::debug;

use super::patterns;
use crate::models::DocumentationFlags;

impl DocumentationFlags {
    /// Evaluate every documentation keyword pattern against `text`.
    ///
    /// Flags are recomputed from scratch on each call.
    pub fn from_text(text: &str) -> Self {
        let flags = Self {
            vitals: patterns::VITALS.is_match(text),
            plan: patterns::PLAN.is_match(text),
            history: patterns::HISTORY.is_match(text),
            exam: patterns::EXAM.is_match(text),
            labs_or_imaging: patterns::LABS_OR_IMAGING.is_match(text),
            medications: patterns::MEDICATIONS.is_match(text),
            assessment: patterns::ASSESSMENT.is_match(text),
            follow_up: patterns::FOLLOW_UP.is_match(text),
            education: patterns::EDUCATION.is_match(text),
        };
        debug!(?flags, "documentation flags evaluated");
        flags
    }
}
