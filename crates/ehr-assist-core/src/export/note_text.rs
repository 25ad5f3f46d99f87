//! Canonical text block for structured notes.
//!
//! The block is what gets stored and copied to the clipboard. `parse` accepts
//! exactly what `render` produces, so a stored note can be shown as sections
//! again. Text without a chief complaint is not a structured note and parses
//! to `None`; callers fall back to showing the raw text.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::{Diagnosis, StructuredNote};
use crate::rules::NOT_DOCUMENTED;

pub const TITLE: &str = "CLINICAL DOCUMENTATION";
pub const RULE_LINE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
pub const DEFAULT_SYSTEM_NAME: &str = "NextGenEHR";
pub const UNKNOWN_PATIENT: &str = "Unknown";

pub const CHIEF_COMPLAINT_HEADER: &str = "Chief Complaint:";
pub const HPI_HEADER: &str = "History of Present Illness:";
pub const ASSESSMENT_HEADER: &str = "Assessment:";
pub const PLAN_HEADER: &str = "Plan:";
pub const ORDERS_HEADER: &str = "Suggested Orders:";
pub const SUMMARY_HEADER: &str = "Patient Portal Summary:";

static HEADER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(Chief Complaint:|History of Present Illness:|Assessment:|Plan:|Suggested Orders:|Patient Portal Summary:)")
        .unwrap()
});
static RULE_LINE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^━{3,}").unwrap());
static DIAGNOSIS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*\d+\.\s*(.+?)\s*\(([^()]+)\)\s*$").unwrap());
static ORDER_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[•*-]\s*(.+?)\s*$").unwrap());
static PATIENT_ID_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Patient ID:[ \t]*(.*?)\s*$").unwrap());

/// Renders and parses the canonical note block.
#[derive(Debug, Clone)]
pub struct NoteTextFormat {
    system_name: String,
}

impl Default for NoteTextFormat {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_NAME)
    }
}

impl NoteTextFormat {
    /// Create a format whose footer names `system_name`.
    pub fn new(system_name: impl Into<String>) -> Self {
        Self {
            system_name: system_name.into(),
        }
    }

    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    /// Render a note to the canonical block.
    pub fn render(&self, note: &StructuredNote, patient_id: Option<&str>) -> String {
        let orders = note
            .suggested_orders
            .iter()
            .map(|order| format!("• {}", order))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{TITLE}
{RULE_LINE}

{CHIEF_COMPLAINT_HEADER} {cc}

{HPI_HEADER} {hpi}

{ASSESSMENT_HEADER}
{assessment}

{PLAN_HEADER}
{plan}

{ORDERS_HEADER}
{orders}

{SUMMARY_HEADER}
{summary}

{RULE_LINE}
Generated by {system} AI Documentation Assistant
Patient ID: {patient}",
            cc = note.chief_complaint,
            hpi = note.hpi_narrative,
            assessment = note.assessment,
            plan = note.plan,
            orders = orders,
            summary = note.patient_portal_summary,
            system = self.system_name,
            patient = patient_id.unwrap_or(UNKNOWN_PATIENT),
        )
    }

    /// Parse a canonical block back into a note.
    pub fn parse(&self, text: &str) -> Option<StructuredNote> {
        parse_note_text(text)
    }
}

/// Parse a canonical block. Returns `None` when there is no chief complaint.
pub fn parse_note_text(text: &str) -> Option<StructuredNote> {
    let sections = Sections::scan(text);

    let chief_complaint = match sections.get(CHIEF_COMPLAINT_HEADER) {
        Some(cc) if !cc.is_empty() => cc.to_string(),
        _ => {
            debug!("note text has no chief complaint; not a structured note");
            return None;
        }
    };

    let assessment = sections.get(ASSESSMENT_HEADER).unwrap_or("");
    let orders = sections.get(ORDERS_HEADER).unwrap_or("");

    let diagnoses = DIAGNOSIS_LINE
        .captures_iter(assessment)
        .map(|caps| Diagnosis::new(&caps[1], &caps[2]))
        .collect();
    let suggested_orders = ORDER_LINE
        .captures_iter(orders)
        .map(|caps| caps[1].to_string())
        .collect();

    Some(StructuredNote {
        chief_complaint,
        hpi_narrative: sections.text_or_placeholder(HPI_HEADER),
        assessment: sections.text_or_placeholder(ASSESSMENT_HEADER),
        plan: sections.text_or_placeholder(PLAN_HEADER),
        diagnoses,
        suggested_orders,
        patient_portal_summary: sections.text_or_placeholder(SUMMARY_HEADER),
    })
}

/// Patient identifier from the footer, if the note names one.
pub fn footer_patient_id(text: &str) -> Option<String> {
    PATIENT_ID_LINE
        .captures(text)
        .map(|caps| caps[1].to_string())
        .filter(|id| !id.is_empty() && id != UNKNOWN_PATIENT)
}

/// Header-delimited section bodies, first occurrence of each header.
struct Sections<'t> {
    bodies: Vec<(&'t str, &'t str)>,
}

impl<'t> Sections<'t> {
    fn scan(text: &'t str) -> Self {
        let headers: Vec<(usize, usize, &'t str)> = HEADER_LINE
            .find_iter(text)
            .map(|m| (m.start(), m.end(), m.as_str()))
            .collect();
        let rules: Vec<usize> = RULE_LINE_START.find_iter(text).map(|m| m.start()).collect();

        let mut bodies: Vec<(&'t str, &'t str)> = Vec::new();
        for (i, &(_, body_start, header)) in headers.iter().enumerate() {
            if bodies.iter().any(|(seen, _)| *seen == header) {
                continue;
            }
            let next_header = headers.get(i + 1).map(|&(start, ..)| start);
            let next_rule = rules.iter().copied().find(|&start| start >= body_start);
            let end = [next_header, next_rule]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(text.len());
            bodies.push((header, text[body_start..end].trim()));
        }
        Self { bodies }
    }

    fn get(&self, header: &str) -> Option<&'t str> {
        self.bodies
            .iter()
            .find(|(h, _)| *h == header)
            .map(|(_, body)| *body)
    }

    fn text_or_placeholder(&self, header: &str) -> String {
        match self.get(header) {
            Some(body) if !body.is_empty() => body.to_string(),
            _ => NOT_DOCUMENTED.to_string(),
        }
    }
}
