use serde::Serialize;

use crate::core::verdict::{CheckResult, RunStatistics, Severity};

/// Which failing checks a fix run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixScope {
    AllIssues,
    ErrorsOnly,
    WarningsOnly,
}

impl FixScope {
    pub fn includes(&self, result: &CheckResult) -> bool {
        if !result.needs_fix {
            return false;
        }
        match self {
            FixScope::AllIssues => true,
            FixScope::ErrorsOnly => result.severity == Severity::Error,
            FixScope::WarningsOnly => result.severity == Severity::Warning,
        }
    }

    /// Number of issues the run announces up front.
    pub fn issue_count(&self, stats: &RunStatistics) -> usize {
        match self {
            FixScope::AllIssues => stats.errors + stats.warnings,
            FixScope::ErrorsOnly => stats.errors,
            FixScope::WarningsOnly => stats.warnings,
        }
    }
}

impl std::fmt::Display for FixScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixScope::AllIssues => write!(f, "all issues"),
            FixScope::ErrorsOnly => write!(f, "errors"),
            FixScope::WarningsOnly => write!(f, "warnings"),
        }
    }
}
