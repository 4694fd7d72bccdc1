use anyhow::Result;

use crate::core::verdict::{CategoryResult, RunStatistics};
use crate::reporters::traits::Reporter;

pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn name(&self) -> &str {
        "JSON"
    }

    fn generate(&self, results: &[CategoryResult], stats: &RunStatistics) -> Result<String> {
        let output = serde_json::json!({
            "categories": results,
            "summary": {
                "errors": stats.errors,
                "warnings": stats.warnings,
                "fixable": results
                    .iter()
                    .flat_map(|c| &c.checks)
                    .filter(|c| c.needs_fix && c.can_fix())
                    .count(),
            },
        });
        Ok(serde_json::to_string_pretty(&output)?)
    }
}
