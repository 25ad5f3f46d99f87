//! Coding and denial-risk models.

use serde::{Deserialize, Serialize};

/// A suggested ICD-10 or CPT code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeSuggestion {
    pub code: String,
    pub description: String,
    /// Fixed per rule, 0-100
    pub confidence: u8,
}

impl CodeSuggestion {
    pub fn new(code: &str, description: &str, confidence: u8) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            confidence,
        }
    }
}

/// Outcome of a single denial-risk check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Warning => "warning",
            CheckStatus::Fail => "fail",
        }
    }
}

/// A denial-risk checklist entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DenialCheck {
    pub rule: String,
    pub status: CheckStatus,
    pub detail: String,
}

/// Overall claim denial risk tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Map a 0-100 risk percentage to a tier: <25 low, <50 medium, else high.
    pub fn from_percentage(percentage: u8) -> Self {
        if percentage < 25 {
            RiskTier::Low
        } else if percentage < 50 {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

/// Documentation elements found in a note. Every flag comes from its own
/// keyword pattern over the same text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentationFlags {
    pub vitals: bool,
    pub plan: bool,
    pub history: bool,
    pub exam: bool,
    pub labs_or_imaging: bool,
    pub medications: bool,
    pub assessment: bool,
    pub follow_up: bool,
    pub education: bool,
}

/// Full claim validation output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub overall_risk: RiskTier,
    pub risk_percentage: u8,
    pub icd10_codes: Vec<CodeSuggestion>,
    pub cpt_codes: Vec<CodeSuggestion>,
    pub denial_risks: Vec<DenialCheck>,
    pub recommendations: Vec<String>,
    pub missing_elements: Vec<String>,
}

impl ValidationResult {
    /// Count checks with the given status.
    pub fn count_status(&self, status: CheckStatus) -> usize {
        self.denial_risks
            .iter()
            .filter(|check| check.status == status)
            .count()
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
