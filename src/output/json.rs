//! JSON output renderer.
//!
//! Outputs `{"passed": bool, "checks": {...}, "summary": {...}}`.

use crate::checks::CheckOutcome;
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, outcome: &CheckOutcome) -> String {
        let output = serde_json::json!({
            "passed": outcome.passed(),
            "checks": outcome,
            "summary": outcome.summary(),
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
