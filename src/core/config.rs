use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::DoctorError;

pub const CONFIG_FILE: &str = ".envdoctor.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Android => write!(f, "android"),
            Platform::Ios => write!(f, "ios"),
        }
    }
}

impl Platform {
    /// Platforms checked when neither the config nor the CLI names any.
    pub fn host_defaults() -> Vec<Platform> {
        if cfg!(target_os = "macos") {
            vec![Platform::Android, Platform::Ios]
        } else {
            vec![Platform::Android]
        }
    }
}

/// Required version ranges, one per versioned tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionRanges {
    pub node: String,
    pub yarn: String,
    pub npm: String,
    pub watchman: String,
    pub android_build_tools: String,
    pub xcode: String,
    pub cocoapods: String,
}

impl Default for VersionRanges {
    fn default() -> Self {
        Self {
            node: ">= 16".to_string(),
            yarn: ">= 1.10".to_string(),
            npm: ">= 4".to_string(),
            watchman: ">= 4".to_string(),
            android_build_tools: ">= 30".to_string(),
            xcode: ">= 12".to_string(),
            cocoapods: ">= 1.10".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub platforms: Option<Vec<Platform>>,
    pub version_ranges: Option<VersionRanges>,
    /// Labels of checks to leave out of the report and the fixes.
    pub hidden: Option<Vec<String>>,
}

impl Config {
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn try_load(path: &Path) -> Result<Self, DoctorError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| DoctorError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_yaml::from_str::<Config>(&content).map_err(|e| DoctorError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Like [`Config::try_load`], but falls back to the defaults on a bad file.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring config file");
                Config::default()
            }
        }
    }

    pub fn version_ranges(&self) -> VersionRanges {
        self.version_ranges.clone().unwrap_or_default()
    }
}
