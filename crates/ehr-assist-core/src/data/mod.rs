//! Demo patient data and note history helpers.

mod history;
mod packs;
mod samples;

pub use history::*;
pub use packs::*;
pub use samples::*;
