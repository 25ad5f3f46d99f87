//! "Explain reasoning" text for generated notes and claim validations.
//!
//! Explanations are built from what the rule engine actually did, so they
//! always agree with the note or result on screen.

use anyhow::{bail, Context};
use std::fmt::Write;
use tracing::{debug, warn};

use ehr_assist_core::export::parse_note_text;
use ehr_assist_core::models::{CheckStatus, StructuredNote, ValidationResult};
use ehr_assist_core::rules::{missing_element_penalty, BASE_RISK};

/// Shorthand recognized in clinician notes, with its expansion.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("pt", "patient"),
    ("c/o", "complains of"),
    ("cc", "chief complaint"),
    ("x", "for (duration)"),
    ("hx", "history"),
    ("dx", "diagnosis"),
    ("rx", "prescription"),
    ("tx", "treatment"),
    ("f/u", "follow-up"),
    ("rtn", "return"),
    ("bp", "blood pressure"),
    ("hr", "heart rate"),
    ("a1c", "hemoglobin A1c"),
    ("htn", "hypertension"),
    ("t2dm", "type 2 diabetes mellitus"),
    ("dm2", "type 2 diabetes mellitus"),
    ("copd", "chronic obstructive pulmonary disease"),
    ("gad", "generalized anxiety disorder"),
    ("mdd", "major depressive disorder"),
    ("sob", "shortness of breath"),
    ("bid", "twice daily"),
    ("prn", "as needed"),
];

/// Abbreviations present in `raw`, in table order.
pub fn find_abbreviations(raw: &str) -> Vec<(&'static str, &'static str)> {
    let tokens: Vec<String> = raw
        .split(|c: char| !(c.is_alphanumeric() || c == '/'))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect();

    ABBREVIATIONS
        .iter()
        .copied()
        .filter(|(abbreviation, _)| tokens.iter().any(|token| token == abbreviation))
        .collect()
}

/// Explain how raw notes became `note`.
pub fn explain_note(note: &StructuredNote, raw: &str) -> String {
    let mut text = String::from("**AI Reasoning Process**\n\n**Input Analysis**\n");

    let abbreviations = find_abbreviations(raw);
    debug!(
        abbreviations = abbreviations.len(),
        diagnoses = note.diagnoses.len(),
        "explaining structured note"
    );
    if abbreviations.is_empty() {
        text.push_str("The raw notes contained no recognized clinical abbreviations.\n");
    } else {
        let listed = abbreviations
            .iter()
            .map(|(short, long)| format!("{} ({})", short, long))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(text, "The raw notes contained abbreviated clinical terminology: {}.", listed);
    }

    text.push_str("\n**Transformation Steps**\n");
    text.push_str("1. Expanded medical abbreviations to standard terminology\n");
    text.push_str("2. Organized content into SOAP-aligned structure (Subjective, Objective, Assessment, Plan)\n");
    let codes = note
        .diagnoses
        .iter()
        .map(|d| format!("{} {}", d.code, d.name))
        .collect::<Vec<_>>()
        .join("; ");
    let _ = writeln!(text, "3. Added ICD-10 code references: {}", codes);
    let _ = writeln!(text, "4. Suggested {} order(s) from the documented conditions", note.suggested_orders.len());

    text.push_str("\n**Quality Checks Applied**\n");
    let _ = writeln!(text, "• Chief complaint: {}", note.chief_complaint);
    let _ = writeln!(text, "• Diagnoses coded: {}", note.diagnoses.len());
    let plan_items = note.plan.lines().filter(|line| !line.trim().is_empty()).count();
    let _ = write!(text, "• Plan items: {}", plan_items);

    text
}

/// Explain how a validation arrived at its codes and risk.
pub fn explain_validation(result: &ValidationResult) -> String {
    debug!(
        risk = result.risk_percentage,
        missing = result.missing_elements.len(),
        "explaining claim validation"
    );
    let mut text = String::from("**Billing Validation Reasoning**\n\n**Coding Analysis**\n");
    for code in result.icd10_codes.iter().chain(result.cpt_codes.iter()) {
        let _ = writeln!(
            text,
            "• {} {} (confidence {}%)",
            code.code, code.description, code.confidence
        );
    }

    let _ = write!(
        text,
        "\n**Denial Rule Application**\nChecked against {} documentation rules:\n• {} passed\n• {} warnings\n• {} failures\n",
        result.denial_risks.len(),
        result.count_status(CheckStatus::Pass),
        result.count_status(CheckStatus::Warning),
        result.count_status(CheckStatus::Fail),
    );

    let _ = write!(text, "\n**Risk Calculation**\nBase denial risk: {}%\n", BASE_RISK);
    for missing in &result.missing_elements {
        let penalty = missing_element_penalty(missing).unwrap_or(0);
        let _ = writeln!(text, "+ {} missing: +{}%", missing, penalty);
    }
    let _ = write!(
        text,
        "= Final risk: {}% ({})",
        result.risk_percentage,
        result.overall_risk.as_str().to_uppercase()
    );

    if !result.recommendations.is_empty() {
        text.push_str("\n\n**Recommendations**");
        for recommendation in &result.recommendations {
            let _ = write!(text, "\n• {}", recommendation);
        }
    }

    text
}

/// Explain a stored note text block against its raw notes.
pub fn explain_note_text(note_text: &str, raw: &str) -> anyhow::Result<String> {
    if raw.trim().is_empty() {
        warn!("rejected explanation request with empty raw notes");
        bail!("raw notes are empty");
    }
    let note = parse_note_text(note_text).context("note text is not a structured note")?;
    Ok(explain_note(&note, raw))
}
