use colored::Colorize;
use serde::Serialize;

use crate::core::console::Console;
use crate::core::environment::EnvironmentSnapshot;
use crate::core::error::DoctorError;
use crate::core::verdict::{CategoryResult, CheckResult, RunStatistics};

use super::scope::FixScope;
use super::traits::{FixContext, FixOutcome, ProgressFactory};

#[derive(Debug, Clone, Serialize)]
pub struct FixAttempt {
    pub category: String,
    pub label: String,
    pub outcome: FixOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FixReport {
    pub attempts: Vec<FixAttempt>,
}

impl FixReport {
    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, FixOutcome::Applied))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FixOutcome::Skipped(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = &FixAttempt> {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, FixOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&FixOutcome) -> bool) -> usize {
        self.attempts.iter().filter(|a| pred(&a.outcome)).count()
    }
}

/// Categories that still have something to fix, in registry order.
pub fn fix_candidates(results: &[CategoryResult]) -> Vec<&CategoryResult> {
    results.iter().filter(|c| c.has_issues()).collect()
}

pub struct FixOrchestrator<'a> {
    console: &'a dyn Console,
    progress: &'a dyn ProgressFactory,
}

impl<'a> FixOrchestrator<'a> {
    pub fn new(console: &'a dyn Console, progress: &'a dyn ProgressFactory) -> Self {
        Self { console, progress }
    }

    /// Run the remediations selected by `scope`, one at a time.
    ///
    /// A failing remediation is recorded and the run moves on to the next
    /// check; nothing here aborts the batch.
    pub async fn apply_fixes(
        &self,
        results: &[CategoryResult],
        scope: FixScope,
        stats: &RunStatistics,
        environment: &EnvironmentSnapshot,
    ) -> FixReport {
        let candidates = fix_candidates(results);
        let issues = scope.issue_count(stats);
        tracing::debug!(%scope, issues, categories = candidates.len(), "starting fixes");

        self.console.line(&format!(
            "\nAttempting to fix {} issue{}...",
            issues.to_string().bold(),
            if issues > 1 { "s" } else { "" }
        ));

        let mut report = FixReport::default();

        for category in candidates {
            let selected: Vec<&CheckResult> = category
                .checks
                .iter()
                .filter(|check| scope.includes(check))
                .collect();

            if selected.is_empty() {
                continue;
            }

            self.console
                .line(&format!("\n{}", category.label.as_str().dimmed()));

            for result in selected {
                let outcome = self.fix_one(result, environment).await;
                report.attempts.push(FixAttempt {
                    category: category.label.clone(),
                    label: result.label.clone(),
                    outcome,
                });
            }
        }

        report
    }

    async fn fix_one(&self, result: &CheckResult, environment: &EnvironmentSnapshot) -> FixOutcome {
        let progress = self.progress.create();
        progress.start(&result.label);

        if !result.can_fix() {
            progress.fail();
            let reason = DoctorError::NoRemediation(result.label.clone()).to_string();
            return FixOutcome::Skipped(reason);
        }

        let ctx = FixContext {
            progress: progress.as_ref(),
            environment,
            console: self.console,
        };

        match result.check.apply_fix(&ctx).await {
            Ok(()) => FixOutcome::Applied,
            Err(e) => {
                progress.fail();
                let err = DoctorError::Remediation {
                    check: result.label.clone(),
                    reason: format!("{:#}", e),
                };
                tracing::warn!(error = %err, "fix failed, continuing with the next check");
                FixOutcome::Failed(err.to_string())
            }
        }
    }
}
