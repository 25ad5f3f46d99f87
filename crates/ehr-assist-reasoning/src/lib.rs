//! Deterministic "explain reasoning" text for the EHR assistant.
//!
//! Everything here is derived from rule-engine output; there is no model
//! inference behind it.

pub mod explanation;

pub use explanation::*;
