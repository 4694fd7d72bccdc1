use anyhow::Result;
use colored::*;

use crate::core::console::Console;
use crate::core::runner::DiagnosticRun;
use crate::fixers::traits::FixOutcome;
use crate::fixers::FixReport;
use crate::reporters::{JsonReporter, Reporter, TextReporter};

pub struct OutputFormatter {
    format: String,
}

impl OutputFormatter {
    pub fn new(format: &str) -> Self {
        Self {
            format: format.to_string(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }

    pub fn display(&self, console: &dyn Console, run: &DiagnosticRun) -> Result<()> {
        let reporter: Box<dyn Reporter> = match self.format.as_str() {
            "json" => Box::new(JsonReporter),
            _ => Box::new(TextReporter),
        };
        let content = reporter.generate(&run.categories, &run.stats)?;
        tracing::debug!(
            reporter = reporter.name(),
            elapsed_ms = run.duration.as_millis() as u64,
            "rendering report"
        );
        for line in content.lines() {
            console.line(line);
        }
        Ok(())
    }
}

/// Print what happened to each attempted fix.
pub fn display_fix_report(console: &dyn Console, report: &FixReport) {
    if report.attempts.is_empty() {
        console.line(&format!("\n{}", "Nothing to fix.".green()));
        return;
    }

    let failures: Vec<_> = report.failures().collect();
    for attempt in &failures {
        if let FixOutcome::Failed(reason) = &attempt.outcome {
            console.line(&format!("  {} [{}] {}", "ERROR".red(), attempt.label, reason));
        }
    }

    console.line(&format!(
        "\n{} fixed, {} skipped, {} failed.",
        report.applied(),
        report.skipped(),
        failures.len()
    ));
}
