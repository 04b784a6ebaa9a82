//! Output renderers for check results: terminal and JSON.

pub mod json;
pub mod terminal;

use crate::checks::CheckOutcome;

/// Trait for rendering a check outcome tree to an output format.
pub trait OutputRenderer {
    /// Render the outcome to a string.
    fn render(&self, outcome: &CheckOutcome) -> String;
}
