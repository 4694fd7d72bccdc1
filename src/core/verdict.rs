use serde::Serialize;
use std::sync::Arc;

use crate::checks::traits::Check;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Warning,
    Error,
}

impl Severity {
    /// Only `needs_fix` and `is_required` decide the severity.
    pub fn classify(needs_fix: bool, is_required: bool) -> Self {
        match (needs_fix, is_required) {
            (false, _) => Severity::None,
            (true, true) => Severity::Error,
            (true, false) => Severity::Warning,
        }
    }
}

/// The verdict for one check in one diagnostic pass.
#[derive(Clone, Serialize)]
pub struct CheckResult {
    pub label: String,
    pub is_required: bool,
    pub needs_fix: bool,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Set when the diagnosis itself failed; such results carry no severity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis_error: Option<String>,
    #[serde(skip)]
    pub check: Arc<dyn Check>,
}

impl CheckResult {
    pub fn can_fix(&self) -> bool {
        self.check.has_fix()
    }
}

impl std::fmt::Debug for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckResult")
            .field("label", &self.label)
            .field("is_required", &self.is_required)
            .field("needs_fix", &self.needs_fix)
            .field("severity", &self.severity)
            .field("version", &self.version)
            .field("diagnosis_error", &self.diagnosis_error)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResult {
    pub label: String,
    pub checks: Vec<CheckResult>,
}

impl CategoryResult {
    pub fn has_issues(&self) -> bool {
        self.checks.iter().any(|c| c.needs_fix)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    pub errors: usize,
    pub warnings: usize,
}

impl RunStatistics {
    /// Fold the verdicts of a finished pass into totals.
    pub fn from_results(results: &[CategoryResult]) -> Self {
        results
            .iter()
            .flat_map(|category| &category.checks)
            .fold(Self::default(), |mut stats, check| {
                match check.severity {
                    Severity::Error => stats.errors += 1,
                    Severity::Warning => stats.warnings += 1,
                    Severity::None => {}
                }
                stats
            })
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.errors + self.warnings
    }
}
