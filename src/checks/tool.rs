use anyhow::Result;
use async_trait::async_trait;

use crate::checks::common::{log_manual_installation, Installer};
use crate::checks::traits::{Check, Diagnosis};
use crate::core::environment::{EnvironmentSnapshot, ProbeKind};
use crate::core::version;
use crate::fixers::traits::FixContext;

/// A tool that must be installed within a version range.
///
/// Probe failures count as "not installed", so a tool the prober could not
/// inspect is always flagged.
pub struct ToolVersionCheck {
    label: &'static str,
    probe: (ProbeKind, &'static str),
    range: String,
    required: bool,
    download_url: &'static str,
    installer: Option<Installer>,
}

impl ToolVersionCheck {
    pub fn new(
        label: &'static str,
        probe: (ProbeKind, &'static str),
        range: impl Into<String>,
        download_url: &'static str,
    ) -> Self {
        Self {
            label,
            probe,
            range: range.into(),
            required: true,
            download_url,
            installer: None,
        }
    }

    pub fn advisory(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn installed_with(mut self, installer: Installer) -> Self {
        self.installer = Some(installer);
        self
    }
}

#[async_trait]
impl Check for ToolVersionCheck {
    fn label(&self) -> &str {
        self.label
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn probes(&self) -> Vec<(ProbeKind, &'static str)> {
        vec![self.probe]
    }

    async fn diagnose(&self, environment: &EnvironmentSnapshot) -> Result<Diagnosis> {
        let (kind, name) = self.probe;
        let installed = environment.get(kind, name).version();
        Ok(Diagnosis {
            needs_fix: !version::satisfies(installed, &self.range),
            version: installed.map(str::to_string),
        })
    }

    fn has_fix(&self) -> bool {
        true
    }

    async fn apply_fix(&self, ctx: &FixContext<'_>) -> Result<()> {
        match self.installer {
            Some(installer) if installer.is_available() => {
                installer.run().await?;
                ctx.progress.stop();
                ctx.console.line(&format!(
                    "{} installed with `{}`",
                    self.label,
                    installer.command_line()
                ));
            }
            _ => {
                ctx.progress.fail();
                log_manual_installation(ctx.console, self.label, self.download_url);
            }
        }
        Ok(())
    }
}
