//! Structured clinical note models.

use serde::{Deserialize, Serialize};

/// A diagnosis attached to a structured note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnosis {
    /// Display name (e.g., "Essential Hypertension")
    pub name: String,
    /// ICD-10 code (e.g., "I10")
    pub code: String,
}

impl Diagnosis {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// A SOAP-aligned note built from raw clinician text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StructuredNote {
    /// Chief complaint
    pub chief_complaint: String,
    /// History of present illness narrative
    pub hpi_narrative: String,
    /// Numbered diagnosis lines, `N. Name (CODE)`
    pub assessment: String,
    /// Numbered plan lines
    pub plan: String,
    /// Diagnoses in detection order
    pub diagnoses: Vec<Diagnosis>,
    /// Suggested orders
    pub suggested_orders: Vec<String>,
    /// Patient-facing summary sentence
    pub patient_portal_summary: String,
}

impl StructuredNote {
    /// Diagnosis codes in order.
    pub fn diagnosis_codes(&self) -> Vec<&str> {
        self.diagnoses.iter().map(|d| d.code.as_str()).collect()
    }
}

/// Vital signs pulled out of raw text. Each reading is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vitals {
    /// Blood pressure as written, e.g. "148/92"
    pub blood_pressure: Option<String>,
    /// Heart rate in bpm, digits as written
    pub heart_rate: Option<String>,
    /// Temperature as written, e.g. "98.6"
    pub temperature: Option<String>,
}

impl Vitals {
    pub fn is_empty(&self) -> bool {
        self.blood_pressure.is_none() && self.heart_rate.is_none() && self.temperature.is_none()
    }

    /// Human-readable vitals lines.
    pub fn display_items(&self) -> Vec<String> {
        let mut items = Vec::new();
        if let Some(bp) = &self.blood_pressure {
            items.push(format!("Blood Pressure: {} mmHg", bp));
        }
        if let Some(hr) = &self.heart_rate {
            items.push(format!("Heart Rate: {} bpm", hr));
        }
        if let Some(temp) = &self.temperature {
            items.push(format!("Temperature: {}°F", temp));
        }
        items
    }
}
