use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::core::config::{Config, Platform, VersionRanges, CONFIG_FILE};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write the config into (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing .envdoctor.yml
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(args: &InitArgs) -> Result<()> {
    let path = args
        .path
        .canonicalize()
        .with_context(|| format!("cannot open {}", args.path.display()))?;
    let config_path = Config::path_in(&path);

    if config_path.exists() && !args.force {
        println!(
            "  {} {} already exists. Use {} to overwrite.",
            "SKIP".yellow(),
            CONFIG_FILE,
            "--force".bold()
        );
        return Ok(());
    }

    let platforms = Platform::host_defaults();
    std::fs::write(&config_path, generate_config(&platforms)?)
        .with_context(|| format!("cannot write {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "config written");

    let names: Vec<String> = platforms.iter().map(|p| p.to_string()).collect();
    println!(
        "  {} {} created for {}",
        "DONE".green(),
        CONFIG_FILE,
        names.join(", ").cyan()
    );
    println!(
        "  Edit {} to change platforms and required versions.",
        config_path.display()
    );

    Ok(())
}

fn generate_config(platforms: &[Platform]) -> Result<String> {
    let config = Config {
        platforms: Some(platforms.to_vec()),
        version_ranges: Some(VersionRanges::default()),
        hidden: Some(vec![]),
    };
    let body = serde_yaml::to_string(&config).context("cannot serialize config")?;

    Ok(format!(
        "# envdoctor configuration\n\
         # Version ranges use semver syntax, e.g. \">= 16\" or \"^1.22 || >= 3\".\n\
         # Checks listed under `hidden` are left out of the report and the fixes.\n\
         {body}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_config_file() {
        let tmp = TempDir::new().unwrap();
        let args = InitArgs {
            path: tmp.path().to_path_buf(),
            force: false,
        };
        execute(&args).await.unwrap();
        assert!(tmp.path().join(CONFIG_FILE).exists());
    }

    #[tokio::test]
    async fn test_init_skips_existing_without_force() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "existing").unwrap();
        let args = InitArgs {
            path: tmp.path().to_path_buf(),
            force: false,
        };
        execute(&args).await.unwrap();
        let content = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "existing");
    }

    #[tokio::test]
    async fn test_init_overwrites_with_force() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "old").unwrap();
        let args = InitArgs {
            path: tmp.path().to_path_buf(),
            force: true,
        };
        execute(&args).await.unwrap();
        let content = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(content.contains("version_ranges"));
    }

    #[tokio::test]
    async fn test_generated_config_loads_back() {
        let tmp = TempDir::new().unwrap();
        let args = InitArgs {
            path: tmp.path().to_path_buf(),
            force: false,
        };
        execute(&args).await.unwrap();

        let config = Config::try_load(&Config::path_in(tmp.path())).unwrap();
        assert_eq!(config.platforms, Some(Platform::host_defaults()));
        assert_eq!(config.version_ranges(), VersionRanges::default());
        assert_eq!(config.hidden, Some(vec![]));
    }

    #[test]
    fn test_generate_config_lists_platforms() {
        let config = generate_config(&[Platform::Android, Platform::Ios]).unwrap();
        assert!(config.contains("- android"));
        assert!(config.contains("- ios"));
        assert!(config.contains("node: '>= 16'") || config.contains("node: \">= 16\""));
    }
}
