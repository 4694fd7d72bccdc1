use std::path::PathBuf;

use thiserror::Error;

/// Failures the doctor contains at the smallest possible scope.
///
/// Probe, diagnosis and remediation errors never abort sibling checks;
/// they end up in a report line or in the fix summary instead.
#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("could not probe {tool}: {reason}")]
    Probe { tool: String, reason: String },

    #[error("diagnosis of '{check}' failed: {reason}")]
    Diagnosis { check: String, reason: String },

    #[error("fixing '{check}' failed: {reason}")]
    Remediation { check: String, reason: String },

    #[error("'{0}' has no automatic fix")]
    NoRemediation(String),

    #[error("invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}
