//! Raw clinician notes → structured SOAP note.
//!
//! Every field is extracted first-match-wins. When a field cannot be found a
//! fixed placeholder is used, so structuring never fails for non-empty text.

use tracing::debug;

use super::detector::{diagnoses_for, Condition, ConditionDetector};
use super::patterns::{self, capture};
use crate::models::{Diagnosis, StructuredNote, Vitals};

pub const NOT_DOCUMENTED: &str = "Not documented";
pub const DEFAULT_HPI: &str = "Patient presents for evaluation.";
pub const DEFAULT_PLAN_ITEMS: [&str; 2] =
    ["Continue current management", "Schedule follow-up as needed"];
pub const DOCUMENT_VITALS_ORDER: &str = "Document vital signs";
pub const DEFAULT_ORDER: &str = "Continue current treatment plan";

/// Number of leading lines used for the HPI narrative.
const HPI_LINES: usize = 3;

/// Builds structured notes from free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteStructurer {
    detector: ConditionDetector,
}

impl NoteStructurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Structure raw notes.
    pub fn structure(&self, raw: &str) -> StructuredNote {
        let lines = non_empty_lines(raw);

        let chief_complaint = chief_complaint(raw, &lines);
        let hpi_narrative = hpi_narrative(&lines);
        let vitals = self.extract_vitals(raw);

        let conditions = self.detector.detect(raw);
        let diagnoses = diagnoses_for(&conditions);
        let plan_items = plan_items(raw);
        let suggested_orders = suggested_orders(&conditions, &vitals);
        let patient_portal_summary = portal_summary(&chief_complaint, &diagnoses);

        debug!(
            lines = lines.len(),
            diagnoses = diagnoses.len(),
            orders = suggested_orders.len(),
            vitals_found = !vitals.is_empty(),
            "structured clinical note"
        );

        StructuredNote {
            chief_complaint,
            hpi_narrative,
            assessment: numbered(diagnoses.iter().map(|d| format!("{} ({})", d.name, d.code))),
            plan: numbered(plan_items.into_iter()),
            diagnoses,
            suggested_orders,
            patient_portal_summary,
        }
    }

    /// Pull blood pressure, heart rate and temperature out of the text.
    pub fn extract_vitals(&self, raw: &str) -> Vitals {
        Vitals {
            blood_pressure: capture(&patterns::BLOOD_PRESSURE_TEXT, raw).map(str::to_string),
            heart_rate: capture(&patterns::HEART_RATE_TEXT, raw).map(str::to_string),
            temperature: capture(&patterns::TEMPERATURE_TEXT, raw).map(str::to_string),
        }
    }
}

fn non_empty_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

fn chief_complaint(raw: &str, lines: &[&str]) -> String {
    capture(&patterns::CHIEF_COMPLAINT_TEXT, raw)
        .filter(|cc| !cc.is_empty())
        .or_else(|| lines.first().copied())
        .unwrap_or(NOT_DOCUMENTED)
        .to_string()
}

fn hpi_narrative(lines: &[&str]) -> String {
    let joined = lines
        .iter()
        .take(HPI_LINES)
        .copied()
        .collect::<Vec<_>>()
        .join(". ")
        .replace("..", ".");
    if joined.is_empty() {
        DEFAULT_HPI.to_string()
    } else {
        joined
    }
}

fn plan_items(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    if let Some(plan) = capture(&patterns::PLAN_TEXT, raw).filter(|p| !p.is_empty()) {
        items.push(plan.to_string());
    }
    if let Some(follow_up) = capture(&patterns::FOLLOW_UP_TEXT, raw).filter(|f| !f.is_empty()) {
        items.push(format!("Follow-up: {}", follow_up));
    }
    if items.is_empty() {
        items.extend(DEFAULT_PLAN_ITEMS.iter().map(|item| item.to_string()));
    }
    items
}

fn suggested_orders(conditions: &[Condition], vitals: &Vitals) -> Vec<String> {
    let mut orders: Vec<String> = conditions
        .iter()
        .flat_map(|condition| condition.suggested_orders().iter())
        .map(|order| order.to_string())
        .collect();
    if vitals.is_empty() {
        orders.push(DOCUMENT_VITALS_ORDER.to_string());
    }
    if orders.is_empty() {
        orders.push(DEFAULT_ORDER.to_string());
    }
    orders
}

fn portal_summary(chief_complaint: &str, diagnoses: &[Diagnosis]) -> String {
    let discussed = diagnoses
        .iter()
        .map(|d| d.name.to_lowercase())
        .collect::<Vec<_>>()
        .join(" and ");
    format!(
        "You visited your healthcare provider today regarding {}. Your provider discussed {} with you. Please follow your treatment plan and contact us if you have any questions.",
        chief_complaint.to_lowercase(),
        discussed
    )
}

/// `1. a\n2. b`
fn numbered<I: Iterator<Item = String>>(items: I) -> String {
    items
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "pt came in c/o increased thirst and urination x 3 weeks
not taking metformin regularly - missed several doses
BP 148/92, slightly elevated
last a1c was 8.9 - needs better control
dx: t2dm uncontrolled, htn
plan: increase metformin, recheck a1c, f/u 3mo";

    #[test]
    fn test_structure_sample_note() {
        let note = NoteStructurer::new().structure(SAMPLE);

        assert_eq!(note.chief_complaint, "increased thirst and urination x 3 weeks");
        assert_eq!(
            note.hpi_narrative,
            "pt came in c/o increased thirst and urination x 3 weeks. not taking metformin regularly - missed several doses. BP 148/92, slightly elevated"
        );
        assert_eq!(
            note.assessment,
            "1. Type 2 Diabetes Mellitus (E11.65)\n2. Essential Hypertension (I10)"
        );
        assert_eq!(
            note.plan,
            "1. increase metformin, recheck a1c, f/u 3mo\n2. Follow-up: 3mo"
        );
        assert_eq!(
            note.suggested_orders,
            vec![
                "Order HbA1c lab test",
                "Reinforce medication adherence",
                "Monitor blood pressure",
                "Consider medication adjustment"
            ]
        );
        assert!(note
            .patient_portal_summary
            .contains("discussed type 2 diabetes mellitus and essential hypertension with you"));
    }

    #[test]
    fn test_chief_complaint_falls_back_to_first_line() {
        let note = NoteStructurer::new().structure("  \nknee pain after fall\nswelling noted");
        assert_eq!(note.chief_complaint, "knee pain after fall");
        assert_eq!(note.hpi_narrative, "knee pain after fall. swelling noted");
    }

    #[test]
    fn test_blank_input_uses_placeholders() {
        let note = NoteStructurer::new().structure("   \n  ");

        assert_eq!(note.chief_complaint, NOT_DOCUMENTED);
        assert_eq!(note.hpi_narrative, DEFAULT_HPI);
        assert_eq!(
            note.plan,
            "1. Continue current management\n2. Schedule follow-up as needed"
        );
        assert_eq!(note.suggested_orders, vec![DOCUMENT_VITALS_ORDER]);
    }

    #[test]
    fn test_double_periods_collapsed() {
        let note = NoteStructurer::new().structure("headache.\nworse at night.\nno fever");
        assert_eq!(note.hpi_narrative, "headache. worse at night. no fever");
    }

    #[test]
    fn test_vitals_extraction() {
        let vitals = NoteStructurer::new()
            .extract_vitals("Blood pressure: 120/80, HR 72, Temp 98.6F");

        assert_eq!(vitals.blood_pressure.as_deref(), Some("120/80"));
        assert_eq!(vitals.heart_rate.as_deref(), Some("72"));
        assert_eq!(vitals.temperature.as_deref(), Some("98.6"));
    }

    #[test]
    fn test_default_order_when_vitals_present_and_no_orders() {
        let note = NoteStructurer::new().structure("cc: sore throat\nHR 88");
        assert_eq!(note.suggested_orders, vec![DEFAULT_ORDER]);
        assert_eq!(note.diagnoses[0].code, "Z00.00");
    }

    #[test]
    fn test_oversized_heart_rate_counts_as_vitals() {
        let raw = "cc: fever\nhr 99999999999";
        let structurer = NoteStructurer::new();
        let note = structurer.structure(raw);

        assert_eq!(
            structurer.extract_vitals(raw).heart_rate.as_deref(),
            Some("99999999999")
        );
        assert!(!note
            .suggested_orders
            .iter()
            .any(|order| order == DOCUMENT_VITALS_ORDER));
    }

    #[test]
    fn test_temperature_capture_is_naive() {
        let raw = "cc: fever\nTemp. 101";
        let structurer = NoteStructurer::new();
        let note = structurer.structure(raw);

        assert_eq!(structurer.extract_vitals(raw).temperature.as_deref(), Some("."));
        assert!(!note
            .suggested_orders
            .iter()
            .any(|order| order == DOCUMENT_VITALS_ORDER));
        assert_eq!(
            structurer.extract_vitals("temp 1.2.3").temperature.as_deref(),
            Some("1.2.3")
        );
    }

    #[test]
    fn test_summary_lowercases_complaint() {
        let note = NoteStructurer::new().structure("Chief Complaint: Chest Pain");
        assert!(note
            .patient_portal_summary
            .starts_with("You visited your healthcare provider today regarding chest pain."));
    }
}
