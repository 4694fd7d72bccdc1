use anyhow::{bail, Context, Result};
use colored::Colorize;
use tokio::process::Command;

use crate::core::console::Console;

/// Tell the user where to get a tool the doctor cannot install itself.
pub fn log_manual_installation(console: &dyn Console, label: &str, url: &str) {
    console.line(&format!(
        "{} {} {}",
        format!("Read more about how to download {} at", label).dimmed(),
        url.bold(),
        "and run the doctor again.".dimmed()
    ));
}

/// An install command such as `brew install watchman`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Installer {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl Installer {
    pub const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }

    pub fn is_available(&self) -> bool {
        which::which(self.program).is_ok()
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program)
            .chain(self.args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion; a non-zero exit is an error.
    pub async fn run(&self) -> Result<()> {
        tracing::debug!(command = %self.command_line(), "running installer");
        let status = Command::new(self.program)
            .args(self.args)
            .status()
            .await
            .with_context(|| format!("failed to start `{}`", self.command_line()))?;
        if !status.success() {
            bail!("`{}` exited with {}", self.command_line(), status);
        }
        Ok(())
    }
}
