//! Demo patient models.

use serde::{Deserialize, Serialize};

/// A synthetic patient profile from the demo data pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientProfile {
    /// Identifier, e.g. "PATIENT_001"
    pub patient_id: String,
    pub name: String,
    pub dob: String,
    pub gender: String,
    pub insurance: String,
    pub allergies: Vec<String>,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
}

/// Raw clinician notes for one demo patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientNotes {
    pub patient_id: String,
    pub notes: String,
}
