//! Condition detection.
//!
//! Checks a fixed, ordered table of clinical conditions against raw text:
//! diabetes → hypertension → COPD → anxiety → depression.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{CodeSuggestion, Diagnosis};

static DIABETES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)t2dm|type 2 diabetes|diabetes|dm2|hyperglycemia").unwrap()
});
static HYPERTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)htn|hypertension|high blood pressure").unwrap());
static COPD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)copd|chronic obstructive").unwrap());
static ANXIETY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)anxiety|gad").unwrap());
static DEPRESSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)depression|mdd").unwrap());

/// Diagnosis used when no condition signal fires.
pub const DEFAULT_DIAGNOSIS_NAME: &str = "General Medical/Adult Examination";
pub const DEFAULT_DIAGNOSIS_CODE: &str = "Z00.00";
const DEFAULT_ICD10_DESCRIPTION: &str =
    "Encounter for general adult medical examination without abnormal findings";
const DEFAULT_ICD10_CONFIDENCE: u8 = 75;

/// A clinical concept detected by keyword.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Condition {
    Diabetes,
    Hypertension,
    Copd,
    Anxiety,
    Depression,
}

impl Condition {
    /// All conditions in detection order.
    pub const ALL: [Condition; 5] = [
        Condition::Diabetes,
        Condition::Hypertension,
        Condition::Copd,
        Condition::Anxiety,
        Condition::Depression,
    ];

    fn pattern(&self) -> &'static Regex {
        match self {
            Condition::Diabetes => &*DIABETES,
            Condition::Hypertension => &*HYPERTENSION,
            Condition::Copd => &*COPD,
            Condition::Anxiety => &*ANXIETY,
            Condition::Depression => &*DEPRESSION,
        }
    }

    /// Case-insensitive keyword match.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern().is_match(text)
    }

    pub fn diagnosis_name(&self) -> &'static str {
        match self {
            Condition::Diabetes => "Type 2 Diabetes Mellitus",
            Condition::Hypertension => "Essential Hypertension",
            Condition::Copd => "Chronic Obstructive Pulmonary Disease",
            Condition::Anxiety => "Generalized Anxiety Disorder",
            Condition::Depression => "Major Depressive Disorder",
        }
    }

    pub fn icd10_code(&self) -> &'static str {
        match self {
            Condition::Diabetes => "E11.65",
            Condition::Hypertension => "I10",
            Condition::Copd => "J44.9",
            Condition::Anxiety => "F41.1",
            Condition::Depression => "F32.9",
        }
    }

    /// ICD-10 suggestion with its fixed confidence.
    pub fn icd10_suggestion(&self) -> CodeSuggestion {
        let (description, confidence) = match self {
            Condition::Diabetes => ("Type 2 diabetes mellitus with hyperglycemia", 95),
            Condition::Hypertension => ("Essential (primary) hypertension", 92),
            Condition::Copd => ("Chronic obstructive pulmonary disease, unspecified", 90),
            Condition::Anxiety => ("Generalized anxiety disorder", 88),
            Condition::Depression => ("Major depressive disorder, single episode, unspecified", 86),
        };
        CodeSuggestion::new(self.icd10_code(), description, confidence)
    }

    /// Orders suggested whenever this condition is present.
    pub fn suggested_orders(&self) -> &'static [&'static str] {
        match self {
            Condition::Diabetes => &["Order HbA1c lab test", "Reinforce medication adherence"],
            Condition::Hypertension => &["Monitor blood pressure", "Consider medication adjustment"],
            Condition::Copd | Condition::Anxiety | Condition::Depression => &[],
        }
    }

    pub fn diagnosis(&self) -> Diagnosis {
        Diagnosis::new(self.diagnosis_name(), self.icd10_code())
    }
}

/// Detects condition signals in free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionDetector;

impl ConditionDetector {
    pub fn new() -> Self {
        Self
    }

    /// Conditions whose keywords appear in `text`, in detection order.
    pub fn detect(&self, text: &str) -> Vec<Condition> {
        Condition::ALL
            .iter()
            .copied()
            .filter(|condition| condition.matches(text))
            .collect()
    }

    /// Diagnoses for `text`, substituting the default examination diagnosis
    /// when nothing is detected.
    pub fn diagnoses(&self, text: &str) -> Vec<Diagnosis> {
        diagnoses_for(&self.detect(text))
    }
}

/// Map detected conditions to diagnoses, with the examination fallback.
pub fn diagnoses_for(conditions: &[Condition]) -> Vec<Diagnosis> {
    if conditions.is_empty() {
        return vec![Diagnosis::new(DEFAULT_DIAGNOSIS_NAME, DEFAULT_DIAGNOSIS_CODE)];
    }
    conditions.iter().map(Condition::diagnosis).collect()
}

/// Map detected conditions to ICD-10 suggestions, with the examination fallback.
pub fn icd10_suggestions_for(conditions: &[Condition]) -> Vec<CodeSuggestion> {
    if conditions.is_empty() {
        return vec![CodeSuggestion::new(
            DEFAULT_DIAGNOSIS_CODE,
            DEFAULT_ICD10_DESCRIPTION,
            DEFAULT_ICD10_CONFIDENCE,
        )];
    }
    conditions.iter().map(Condition::icd10_suggestion).collect()
}
