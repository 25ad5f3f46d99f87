//! Saved-note history helpers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ClinicalNoteRecord;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Display tag for a patient's saved note, e.g. `Patient_001_ClinicalNote`.
///
/// Uses the first run of digits in the id, or the whole id when it has none.
pub fn note_tag(patient_id: &str) -> String {
    let id = DIGIT_RUN
        .find(patient_id)
        .map_or(patient_id, |m| m.as_str());
    format!("Patient_{id}_ClinicalNote")
}

/// Case-insensitive search over patient id, note tag and raw notes.
///
/// An empty query keeps everything.
pub fn filter_notes<'a>(records: &'a [ClinicalNoteRecord], query: &str) -> Vec<&'a ClinicalNoteRecord> {
    let query = query.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record.patient_id.to_lowercase().contains(&query)
                || note_tag(&record.patient_id).to_lowercase().contains(&query)
                || record.raw_notes.to_lowercase().contains(&query)
        })
        .collect()
}
