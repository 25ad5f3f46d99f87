//! Keyword and extraction patterns.
//!
//! The patterns are intentionally naive substring matches. Scoring and
//! round-trip behavior depend on them matching exactly as written.

use once_cell::sync::Lazy;
use regex::Regex;

// Documentation-element keywords

pub(crate) static VITALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bbp\b|blood pressure|\bhr\b|heart rate|pulse|\btemp|vital|\bspo2\b|o2 sat|\b\d{2,3}/\d{2,3}\b")
        .unwrap()
});

pub(crate) static PLAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)plan|rx|tx|treatment").unwrap());

pub(crate) static HISTORY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)history|\bhx\b|hpi|c/o|reports|presents|complains").unwrap()
});

pub(crate) static EXAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)exam|physical|auscultat|palpat|lungs|heart sounds|abdomen|\bpe\b").unwrap()
});

pub(crate) static LABS_OR_IMAGING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)a1c|\blabs?\b|\bcbc\b|\bbmp\b|\bcmp\b|lipid|x-?ray|\bct\b|\bmri\b|imaging|ultrasound|\bekg\b|\becg\b|\bpft\b",
    )
    .unwrap()
});

pub(crate) static MEDICATIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)medication|\bmeds?\b|\d\s?mg\b|\bmg\b|dosage|\bdose|prescri|metformin|insulin|lisinopril|amlodipine|losartan|statin|albuterol|inhaler|sertraline|fluoxetine|escitalopram",
    )
    .unwrap()
});

pub(crate) static ASSESSMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)assessment|\bdx\b|diagnos|impression|\ba/p\b").unwrap()
});

pub(crate) static FOLLOW_UP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)f/u|follow.?up|\brtn\b|return (?:to clinic|visit|in)").unwrap()
});

pub(crate) static EDUCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)educat|counsel|instructed|discussed|advised|handout").unwrap()
});

// Labeled-prefix extraction, first match wins

pub(crate) static CHIEF_COMPLAINT_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:c/o|cc:|chief complaint:?)\s*(.+)").unwrap());

pub(crate) static BLOOD_PRESSURE_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:bp|blood pressure):?\s*(\d+/\d+)").unwrap());

pub(crate) static HEART_RATE_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:hr|heart rate|pulse):?\s*(\d+)").unwrap());

pub(crate) static TEMPERATURE_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:temp|temperature):?\s*([\d.]+)").unwrap());

pub(crate) static PLAN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:plan|rx|tx|treatment):?\s*(.+)").unwrap());

pub(crate) static FOLLOW_UP_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:f/u|follow.?up|rtn):?\s*(.+)").unwrap());

/// First capture group of `pattern` in `text`, trimmed.
pub(crate) fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}
