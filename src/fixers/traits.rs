use serde::Serialize;

use crate::core::console::Console;
use crate::core::environment::EnvironmentSnapshot;

/// Spinner-like indicator handed to each remediation.
pub trait Progress: Send + Sync {
    fn start(&self, message: &str);
    fn stop(&self);
    fn fail(&self);
}

/// Produces a fresh [`Progress`] for every fix attempt.
pub trait ProgressFactory: Send + Sync {
    fn create(&self) -> Box<dyn Progress>;
}

/// Everything a remediation may touch while it runs.
pub struct FixContext<'a> {
    pub progress: &'a dyn Progress,
    pub environment: &'a EnvironmentSnapshot,
    pub console: &'a dyn Console,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum FixOutcome {
    Applied,
    Skipped(String),
    Failed(String),
}
