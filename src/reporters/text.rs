use anyhow::Result;
use colored::Colorize;

use crate::core::verdict::{CategoryResult, CheckResult, RunStatistics, Severity};
use crate::reporters::traits::Reporter;

pub struct TextReporter;

impl TextReporter {
    fn symbol(check: &CheckResult) -> colored::ColoredString {
        if check.diagnosis_error.is_some() {
            return "✖".red();
        }
        match check.severity {
            Severity::Error => "✖".red(),
            Severity::Warning => "●".yellow(),
            Severity::None => "✓".green(),
        }
    }

    fn check_line(check: &CheckResult) -> String {
        let mut line = format!(" {} {}", Self::symbol(check), check.label);
        if let Some(error) = &check.diagnosis_error {
            line.push_str(&format!(" {}", format!("({})", error).dimmed()));
        }
        line
    }
}

impl Reporter for TextReporter {
    fn name(&self) -> &str {
        "text"
    }

    fn generate(&self, results: &[CategoryResult], stats: &RunStatistics) -> Result<String> {
        let mut lines = Vec::new();

        for (i, category) in results.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.push(category.label.as_str().dimmed().to_string());
            lines.extend(category.checks.iter().map(Self::check_line));
        }

        lines.push(String::new());
        lines.push(format!("{}   {}", "Errors:".bold(), stats.errors));
        lines.push(format!("{} {}", "Warnings:".bold(), stats.warnings));

        Ok(lines.join("\n"))
    }
}
