//! Parsers for the demo patient text packs.
//!
//! Two formats are supported. Raw notes are concatenated files, each opened
//! by a `=== PATIENT_001.txt ===` marker. Profiles are `key: value` blocks
//! separated by a line of 40 dashes, each headed by `Patient 001`.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::{PatientNotes, PatientProfile};

static FILE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"===\s*(PATIENT_\d+)\.txt\s*===").unwrap());
static PROFILE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{40}").unwrap());
static PROFILE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Patient (\d+)").unwrap());

/// Split a raw notes pack into per-patient notes.
///
/// Text before the first marker is ignored, as are markers with no content.
pub fn parse_raw_clinical_notes(content: &str) -> Vec<PatientNotes> {
    let markers: Vec<(String, usize, usize)> = FILE_MARKER
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((caps[1].to_string(), whole.start(), whole.end()))
        })
        .collect();

    let mut patients = Vec::new();
    for (i, (patient_id, _, body_start)) in markers.iter().enumerate() {
        let body_end = markers.get(i + 1).map_or(content.len(), |(_, start, _)| *start);
        let notes = content[*body_start..body_end].trim();
        if !notes.is_empty() {
            patients.push(PatientNotes {
                patient_id: patient_id.clone(),
                notes: notes.to_string(),
            });
        }
    }

    debug!(count = patients.len(), "parsed raw clinical notes pack");
    patients
}

/// Notes for one patient from a raw notes pack.
pub fn patient_notes(content: &str, patient_id: &str) -> Option<String> {
    parse_raw_clinical_notes(content)
        .into_iter()
        .find(|p| p.patient_id == patient_id)
        .map(|p| p.notes)
}

/// Parse a profiles pack. Sections lacking an id or a name are skipped.
pub fn parse_patient_profiles(content: &str) -> Vec<PatientProfile> {
    let mut profiles = Vec::new();

    for section in PROFILE_SEPARATOR.split(content) {
        let lines: Vec<&str> = section
            .trim()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.len() < 2 {
            continue;
        }

        let mut profile = PatientProfile::default();
        for line in lines {
            if let Some(caps) = PROFILE_HEADER.captures(line) {
                profile.patient_id = format!("PATIENT_{:0>3}", &caps[1]);
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_lowercase().as_str() {
                "name" => profile.name = value.to_string(),
                "dob" => profile.dob = value.to_string(),
                "gender" => profile.gender = value.to_string(),
                "insurance" => profile.insurance = value.to_string(),
                "allergies" => profile.allergies = split_list(value),
                "conditions" => profile.conditions = split_list(value),
                "medications" => profile.medications = split_list(value),
                _ => {}
            }
        }

        if !profile.patient_id.is_empty() && !profile.name.is_empty() {
            profiles.push(profile);
        }
    }

    debug!(count = profiles.len(), "parsed patient profiles pack");
    profiles
}

/// Find one profile in a profiles pack.
pub fn patient_profile(content: &str, patient_id: &str) -> Option<PatientProfile> {
    parse_patient_profiles(content)
        .into_iter()
        .find(|p| p.patient_id == patient_id)
}

/// Profile shown when no patient is selected.
pub fn default_patient_profile() -> PatientProfile {
    PatientProfile {
        patient_id: "P12345".to_string(),
        name: "John Doe".to_string(),
        dob: "1985-04-12".to_string(),
        gender: "Male".to_string(),
        insurance: "BlueCross PPO".to_string(),
        allergies: vec!["Penicillin".to_string()],
        conditions: vec!["Type 2 Diabetes".to_string(), "Hypertension".to_string()],
        medications: vec!["Metformin 500mg".to_string(), "Lisinopril 10mg".to_string()],
    }
}

// "None" means an explicitly empty list.
fn split_list(value: &str) -> Vec<String> {
    if value == "None" {
        return Vec::new();
    }
    value.split(',').map(|item| item.trim().to_string()).collect()
}
