use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::checks::registry::Category;
use crate::checks::traits::Check;
use crate::core::environment::EnvironmentSnapshot;
use crate::core::error::DoctorError;
use crate::core::verdict::{CategoryResult, CheckResult, RunStatistics, Severity};

#[derive(Debug, Clone)]
pub struct DiagnosticRun {
    pub categories: Vec<CategoryResult>,
    pub stats: RunStatistics,
    pub duration: Duration,
}

async fn evaluate_check(check: &Arc<dyn Check>, environment: &EnvironmentSnapshot) -> CheckResult {
    let is_required = check.is_required();
    match check.diagnose(environment).await {
        Ok(diagnosis) => CheckResult {
            label: check.label().to_string(),
            is_required,
            needs_fix: diagnosis.needs_fix,
            severity: Severity::classify(diagnosis.needs_fix, is_required),
            version: diagnosis.version,
            diagnosis_error: None,
            check: Arc::clone(check),
        },
        Err(e) => {
            let err = DoctorError::Diagnosis {
                check: check.label().to_string(),
                reason: format!("{:#}", e),
            };
            tracing::warn!(error = %err, "diagnosis failed, check left out of the totals");
            CheckResult {
                label: check.label().to_string(),
                is_required,
                needs_fix: false,
                severity: Severity::None,
                version: None,
                diagnosis_error: Some(err.to_string()),
                check: Arc::clone(check),
            }
        }
    }
}

/// Diagnose every visible check, category by category.
///
/// Checks of one category are diagnosed concurrently; results keep the
/// registry order.
pub async fn evaluate(
    categories: &[Category],
    environment: &EnvironmentSnapshot,
) -> Vec<CategoryResult> {
    let mut results = Vec::with_capacity(categories.len());

    for category in categories {
        let checks = join_all(
            category
                .checks
                .iter()
                .filter(|check| check.visible())
                .map(|check| evaluate_check(check, environment)),
        )
        .await;

        results.push(CategoryResult {
            label: category.label.clone(),
            checks,
        });
    }

    results
}

/// Evaluate and fold the statistics in one go.
pub async fn run(categories: &[Category], environment: &EnvironmentSnapshot) -> DiagnosticRun {
    let start = Instant::now();
    let categories = evaluate(categories, environment).await;
    let stats = RunStatistics::from_results(&categories);
    tracing::debug!(errors = stats.errors, warnings = stats.warnings, "diagnostics finished");
    DiagnosticRun {
        categories,
        stats,
        duration: start.elapsed(),
    }
}
