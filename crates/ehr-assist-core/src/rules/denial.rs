//! Denial-risk rule engine.
//!
//! Each required documentation element that is absent adds a fixed penalty to
//! a base risk, a missing-element entry and a checklist record. Assessment and
//! plan gaps fail the claim check; vitals and medication gaps only warn.

use tracing::debug;

use crate::models::{CheckStatus, DenialCheck, DocumentationFlags, RiskTier};

/// Risk every claim starts with.
pub const BASE_RISK: u8 = 5;
/// Upper bound for the risk percentage.
pub const MAX_RISK: u8 = 100;

/// A required documentation element and what its absence costs.
struct RequiredElement {
    rule: &'static str,
    missing_element: &'static str,
    penalty: u8,
    absent_status: CheckStatus,
    pass_detail: &'static str,
    absent_detail: &'static str,
    present: fn(&DocumentationFlags) -> bool,
}

const REQUIRED_ELEMENTS: [RequiredElement; 4] = [
    RequiredElement {
        rule: "Vital signs documented",
        missing_element: "Vital signs",
        penalty: 20,
        absent_status: CheckStatus::Warning,
        pass_detail: "Vital signs are recorded for this encounter",
        absent_detail: "No vital signs found; payers may question the level of service",
        present: |flags| flags.vitals,
    },
    RequiredElement {
        rule: "Medication documentation",
        missing_element: "Medication documentation",
        penalty: 15,
        absent_status: CheckStatus::Warning,
        pass_detail: "Current medications are documented",
        absent_detail: "No medications or dosages documented",
        present: |flags| flags.medications,
    },
    RequiredElement {
        rule: "Medical necessity documented",
        missing_element: "Assessment/diagnosis",
        penalty: 30,
        absent_status: CheckStatus::Fail,
        pass_detail: "Assessment supports the documented diagnoses",
        absent_detail: "No assessment or diagnosis statement establishes medical necessity",
        present: |flags| flags.assessment,
    },
    RequiredElement {
        rule: "Plan documentation",
        missing_element: "Treatment plan",
        penalty: 25,
        absent_status: CheckStatus::Fail,
        pass_detail: "Treatment plan is documented",
        absent_detail: "No treatment plan documented",
        present: |flags| flags.plan,
    },
];

const COMPATIBILITY_RULE: &str = "CPT/ICD-10 compatibility";
const COMPATIBILITY_DETAIL: &str = "Office visit code matches complexity of documented conditions";

pub const RECOMMEND_VITALS: &str =
    "Document vital signs (BP, heart rate, temperature) for this encounter";
pub const RECOMMEND_MEDICATIONS: &str = "List current medications with specific dosages";
pub const RECOMMEND_EDUCATION: &str =
    "Document patient education provided regarding the treatment plan";
pub const RECOMMEND_FOLLOW_UP: &str = "Include an explicit follow-up timeline";

/// Output of a denial-risk assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenialAssessment {
    pub checks: Vec<DenialCheck>,
    pub missing_elements: Vec<String>,
    pub risk_percentage: u8,
    pub tier: RiskTier,
    pub recommendations: Vec<String>,
}

/// Applies the required-documentation rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenialRiskEngine;

impl DenialRiskEngine {
    pub fn new() -> Self {
        Self
    }

    /// Assess denial risk from documentation flags.
    pub fn assess(&self, flags: &DocumentationFlags) -> DenialAssessment {
        let mut checks = Vec::with_capacity(REQUIRED_ELEMENTS.len() + 1);
        let mut missing_elements = Vec::new();
        let mut penalties: u32 = 0;

        for element in &REQUIRED_ELEMENTS {
            if (element.present)(flags) {
                checks.push(DenialCheck {
                    rule: element.rule.to_string(),
                    status: CheckStatus::Pass,
                    detail: element.pass_detail.to_string(),
                });
            } else {
                debug!(rule = element.rule, penalty = element.penalty, "documentation element missing");
                missing_elements.push(element.missing_element.to_string());
                penalties += u32::from(element.penalty);
                checks.push(DenialCheck {
                    rule: element.rule.to_string(),
                    status: element.absent_status,
                    detail: element.absent_detail.to_string(),
                });
            }
        }

        checks.push(DenialCheck {
            rule: COMPATIBILITY_RULE.to_string(),
            status: CheckStatus::Pass,
            detail: COMPATIBILITY_DETAIL.to_string(),
        });

        let risk_percentage = risk_from_penalties(penalties);
        DenialAssessment {
            checks,
            missing_elements,
            risk_percentage,
            tier: RiskTier::from_percentage(risk_percentage),
            recommendations: self.recommendations(flags),
        }
    }

    /// One fixed recommendation per absent vitals, medication, education or
    /// follow-up mention.
    pub fn recommendations(&self, flags: &DocumentationFlags) -> Vec<String> {
        let mut recommendations = Vec::new();
        if !flags.vitals {
            recommendations.push(RECOMMEND_VITALS.to_string());
        }
        if !flags.medications {
            recommendations.push(RECOMMEND_MEDICATIONS.to_string());
        }
        if !flags.education {
            recommendations.push(RECOMMEND_EDUCATION.to_string());
        }
        if !flags.follow_up {
            recommendations.push(RECOMMEND_FOLLOW_UP.to_string());
        }
        recommendations
    }
}

/// Penalty charged for a missing-element label, as reported in
/// `ValidationResult::missing_elements`.
pub fn missing_element_penalty(missing_element: &str) -> Option<u8> {
    REQUIRED_ELEMENTS
        .iter()
        .find(|element| element.missing_element == missing_element)
        .map(|element| element.penalty)
}

/// Base risk plus penalties, clamped to [0, 100].
pub fn risk_from_penalties(penalties: u32) -> u8 {
    let total = u32::from(BASE_RISK).saturating_add(penalties);
    total.min(u32::from(MAX_RISK)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_flags() -> DocumentationFlags {
        DocumentationFlags {
            vitals: true,
            medications: true,
            assessment: true,
            plan: true,
            education: true,
            follow_up: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_documentation() {
        let assessment = DenialRiskEngine::new().assess(&complete_flags());

        assert_eq!(assessment.risk_percentage, 5);
        assert_eq!(assessment.tier, RiskTier::Low);
        assert!(assessment.missing_elements.is_empty());
        assert!(assessment.recommendations.is_empty());
        assert_eq!(assessment.checks.len(), 5);
        assert!(assessment.checks.iter().all(|c| c.status == CheckStatus::Pass));
    }

    #[test]
    fn test_everything_missing() {
        let assessment = DenialRiskEngine::new().assess(&DocumentationFlags::default());

        assert_eq!(assessment.risk_percentage, 95);
        assert_eq!(assessment.tier, RiskTier::High);
        assert_eq!(assessment.missing_elements.len(), 4);
        assert_eq!(assessment.recommendations.len(), 4);

        let statuses: Vec<CheckStatus> = assessment.checks.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                CheckStatus::Warning,
                CheckStatus::Warning,
                CheckStatus::Fail,
                CheckStatus::Fail,
                CheckStatus::Pass
            ]
        );
        assert_eq!(assessment.checks[4].rule, "CPT/ICD-10 compatibility");
    }

    #[test]
    fn test_missing_vitals_only_is_medium() {
        let flags = DocumentationFlags {
            vitals: false,
            ..complete_flags()
        };
        let assessment = DenialRiskEngine::new().assess(&flags);

        assert_eq!(assessment.risk_percentage, 25);
        assert_eq!(assessment.tier, RiskTier::Medium);
        assert_eq!(assessment.missing_elements, vec!["Vital signs"]);
        assert_eq!(assessment.recommendations, vec![RECOMMEND_VITALS]);
    }

    #[test]
    fn test_missing_plan_fails() {
        let flags = DocumentationFlags {
            plan: false,
            ..complete_flags()
        };
        let assessment = DenialRiskEngine::new().assess(&flags);

        assert_eq!(assessment.risk_percentage, 30);
        let plan_check = assessment
            .checks
            .iter()
            .find(|c| c.rule == "Plan documentation")
            .unwrap();
        assert_eq!(plan_check.status, CheckStatus::Fail);
    }

    #[test]
    fn test_risk_clamped() {
        assert_eq!(risk_from_penalties(0), 5);
        assert_eq!(risk_from_penalties(90), 95);
        assert_eq!(risk_from_penalties(500), 100);
        assert_eq!(risk_from_penalties(u32::MAX), 100);
    }

    #[test]
    fn test_missing_element_penalty() {
        assert_eq!(missing_element_penalty("Vital signs"), Some(20));
        assert_eq!(missing_element_penalty("Medication documentation"), Some(15));
        assert_eq!(missing_element_penalty("Assessment/diagnosis"), Some(30));
        assert_eq!(missing_element_penalty("Treatment plan"), Some(25));
        assert_eq!(missing_element_penalty("Education"), None);
    }
}
