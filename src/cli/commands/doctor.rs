use anyhow::{Context, Result};
use clap::Args;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::checks::registry::{default_registry, probe_request, CheckRegistry, RegistryOptions};
use crate::cli::output::{display_fix_report, OutputFormatter};
use crate::cli::progress::{Spinner, SpinnerFactory};
use crate::cli::prompt::{self, KeyChoice};
use crate::core::config::{Config, Platform};
use crate::core::console::{Console, StderrConsole, StdoutConsole};
use crate::core::environment::{EnvironmentProber, EnvironmentSnapshot, SystemProber};
use crate::core::runner::{self, DiagnosticRun};
use crate::fixers::traits::{Progress, ProgressFactory};
use crate::fixers::{FixOrchestrator, FixReport, FixScope};

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Apply all fixes without prompting
    #[arg(long)]
    pub fix: bool,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Platforms to check (comma-separated, e.g. android,ios)
    #[arg(long, value_delimiter = ',', value_enum)]
    pub platform: Option<Vec<Platform>>,

    /// Config file (defaults to .envdoctor.yml in the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorExit {
    Success,
    DispatchFailed,
}

impl DoctorExit {
    pub fn code(&self) -> u8 {
        match self {
            DoctorExit::Success => 0,
            DoctorExit::DispatchFailed => 1,
        }
    }
}

pub struct Doctor<'a> {
    pub registry: CheckRegistry,
    pub options: RegistryOptions,
    pub prober: &'a dyn EnvironmentProber,
    /// Receives the diagnostic report.
    pub report: &'a dyn Console,
    /// Receives fix progress and the fix summary.
    pub console: &'a dyn Console,
    pub progress: &'a dyn ProgressFactory,
}

impl<'a> Doctor<'a> {
    /// Probe the machine and diagnose every registered check.
    pub async fn diagnose(&self, loader: &dyn Progress) -> Result<(DiagnosticRun, EnvironmentSnapshot)> {
        let categories = self.registry.list_categories(&self.options);
        loader.start("Running diagnostics...");

        let environment = match self.prober.probe(&probe_request(&categories)).await {
            Ok(environment) => environment,
            Err(e) => {
                loader.fail();
                return Err(e.context("failed to probe the environment"));
            }
        };
        let run = runner::run(&categories, &environment).await;

        loader.stop();
        Ok((run, environment))
    }

    pub fn display(&self, formatter: &OutputFormatter, run: &DiagnosticRun) -> Result<()> {
        formatter.display(self.report, run)
    }

    pub async fn fix(
        &self,
        run: &DiagnosticRun,
        scope: FixScope,
        environment: &EnvironmentSnapshot,
    ) -> FixReport {
        let report = FixOrchestrator::new(self.console, self.progress)
            .apply_fixes(&run.categories, scope, &run.stats, environment)
            .await;
        display_fix_report(self.console, &report);
        report
    }
}

/// Act on the key chosen at the fix prompt.
pub async fn dispatch(
    choice: KeyChoice,
    doctor: &Doctor<'_>,
    run: &DiagnosticRun,
    environment: &EnvironmentSnapshot,
    clear_prompt: impl FnOnce() -> Result<()>,
) -> DoctorExit {
    let KeyChoice::Fix(scope) = choice else {
        return DoctorExit::Success;
    };

    if let Err(e) = clear_prompt() {
        tracing::error!(error = %format!("{:#}", e), "fix dispatch failed");
        return DoctorExit::DispatchFailed;
    }

    doctor.fix(run, scope, environment).await;
    DoctorExit::Success
}

pub async fn execute(args: &DoctorArgs) -> Result<DoctorExit> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::path_in(&std::env::current_dir().context("no current directory")?),
    };
    let config = Config::load(&config_path);

    let formatter = OutputFormatter::new(&args.format);
    // Keep stdout parseable when it carries JSON.
    let fix_console: &dyn Console = if formatter.is_json() {
        &StderrConsole
    } else {
        &StdoutConsole
    };

    let prober = SystemProber::new();
    let doctor = Doctor {
        registry: default_registry(),
        options: RegistryOptions::from_config(&config, args.platform.clone()),
        prober: &prober,
        report: &StdoutConsole,
        console: fix_console,
        progress: &SpinnerFactory,
    };

    let (run, environment) = doctor.diagnose(&Spinner::new()).await?;
    doctor.display(&formatter, &run)?;

    if args.fix {
        doctor.fix(&run, FixScope::AllIssues, &environment).await;
        return Ok(DoctorExit::Success);
    }

    if formatter.is_json() || !std::io::stdin().is_terminal() {
        return Ok(DoctorExit::Success);
    }

    let choice = match prompt::prompt(doctor.console).await {
        Ok(choice) => choice,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "could not read the fix choice");
            return Ok(DoctorExit::DispatchFailed);
        }
    };

    Ok(dispatch(choice, &doctor, &run, &environment, prompt::clear_usage).await)
}
