//! Note text format and history export.

mod billing;
mod note_text;

pub use billing::*;
pub use note_text::*;
