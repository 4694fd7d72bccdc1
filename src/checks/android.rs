use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;

use crate::checks::traits::{Check, Diagnosis};
use crate::core::environment::{EnvironmentSnapshot, ProbeKind};
use crate::fixers::traits::FixContext;

pub const ANDROID_HOME: &str = "ANDROID_HOME";

/// `ANDROID_HOME` must point at an existing SDK directory.
pub struct AndroidHomeCheck;

impl AndroidHomeCheck {
    fn shell_profile() -> &'static str {
        match std::env::var("SHELL").unwrap_or_default() {
            shell if shell.ends_with("zsh") => "~/.zshrc",
            shell if shell.ends_with("fish") => "~/.config/fish/config.fish",
            _ => "~/.bashrc",
        }
    }

    fn default_sdk_location() -> &'static str {
        if cfg!(target_os = "macos") {
            "$HOME/Library/Android/sdk"
        } else {
            "$HOME/Android/Sdk"
        }
    }
}

#[async_trait]
impl Check for AndroidHomeCheck {
    fn label(&self) -> &str {
        ANDROID_HOME
    }

    fn probes(&self) -> Vec<(ProbeKind, &'static str)> {
        vec![(ProbeKind::EnvVar, ANDROID_HOME)]
    }

    async fn diagnose(&self, environment: &EnvironmentSnapshot) -> Result<Diagnosis> {
        let points_at_dir = environment
            .env_var(ANDROID_HOME)
            .path()
            .map(|p| p.is_dir())
            .unwrap_or(false);
        Ok(Diagnosis {
            needs_fix: !points_at_dir,
            version: None,
        })
    }

    fn has_fix(&self) -> bool {
        true
    }

    async fn apply_fix(&self, ctx: &FixContext<'_>) -> Result<()> {
        ctx.progress.fail();
        ctx.console.line(&format!(
            "{} {}",
            "Add the following to".dimmed(),
            Self::shell_profile().bold()
        ));
        ctx.console
            .line(&format!("    export {}={}", ANDROID_HOME, Self::default_sdk_location()));
        ctx.console.line(&format!(
            "{}",
            "then open a new terminal and run the doctor again.".dimmed()
        ));
        Ok(())
    }
}
