use anyhow::Result;

use crate::core::verdict::{CategoryResult, RunStatistics};

pub trait Reporter: Send + Sync {
    /// Reporter name for display
    fn name(&self) -> &str;

    /// Render the results of one diagnostic pass
    fn generate(&self, results: &[CategoryResult], stats: &RunStatistics) -> Result<String>;
}
