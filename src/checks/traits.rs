use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::core::environment::{EnvironmentSnapshot, ProbeKind};
use crate::core::error::DoctorError;
use crate::fixers::traits::FixContext;

/// What a diagnosis found out about one check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    pub needs_fix: bool,
    /// The version that was inspected, when there is one.
    pub version: Option<String>,
}

/// A single diagnosable condition with an optional remediation.
///
/// Diagnoses must not mutate shared state: the runner evaluates the checks
/// of a category concurrently against one snapshot.
#[async_trait]
pub trait Check: Send + Sync {
    fn label(&self) -> &str;

    /// Advisory checks report warnings instead of errors.
    fn is_required(&self) -> bool {
        true
    }

    /// Invisible checks are neither reported nor fixed.
    fn visible(&self) -> bool {
        true
    }

    /// Facts this check reads from the snapshot.
    fn probes(&self) -> Vec<(ProbeKind, &'static str)> {
        vec![]
    }

    async fn diagnose(&self, environment: &EnvironmentSnapshot) -> Result<Diagnosis>;

    fn has_fix(&self) -> bool {
        false
    }

    async fn apply_fix(&self, _ctx: &FixContext<'_>) -> Result<()> {
        Err(DoctorError::NoRemediation(self.label().to_string()).into())
    }
}
