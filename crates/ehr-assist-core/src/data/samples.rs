//! Synthetic demo content. No real PHI.

/// Typed encounter note for the synthetic default patient.
pub const SAMPLE_ENCOUNTER_NOTE: &str = "Chief Complaint
Patient presents with increased thirst, frequent urination, and fatigue.

History of Present Illness
Reports poor adherence to diabetes medication over the last month. Blood pressure elevated at 148/92. A1C from last visit was 8.9%. No signs of acute distress.

Assessment
- Type 2 Diabetes with poor control
- Essential Hypertension

Plan
Reinforce medication adherence, adjust Metformin dosage, order repeat A1C, schedule follow-up in 3 months.";

/// Shorthand clinician input for the same encounter.
pub const SAMPLE_RAW_CLINICIAN_NOTES: &str = "pt came in c/o increased thirst and urination x 3 weeks
not taking metformin regularly - missed several doses
BP 148/92, slightly elevated
last a1c was 8.9 - needs better control
dx: t2dm uncontrolled, htn
plan: increase metformin, recheck a1c, f/u 3mo";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskTier;
    use crate::rules::{ClaimValidator, NoteStructurer};

    #[test]
    fn test_sample_encounter_validates_low_risk() {
        let result = ClaimValidator::new().validate(SAMPLE_ENCOUNTER_NOTE);

        let codes: Vec<&str> = result.icd10_codes.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["E11.65", "I10"]);
        assert_eq!(result.overall_risk, RiskTier::Low);
    }

    #[test]
    fn test_sample_raw_notes_structure() {
        let note = NoteStructurer::new().structure(SAMPLE_RAW_CLINICIAN_NOTES);

        assert_eq!(note.chief_complaint, "increased thirst and urination x 3 weeks");
        assert_eq!(note.diagnosis_codes(), vec!["E11.65", "I10"]);
    }
}
