//! Domain models for the EHR assistant.

mod coding;
mod note;
mod patient;
mod record;

pub use coding::*;
pub use note::*;
pub use patient::*;
pub use record::*;
