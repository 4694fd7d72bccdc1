use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::core::error::DoctorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProbeKind {
    Binary,
    Sdk,
    Ide,
    EnvVar,
}

/// The outcome of probing a single tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Probe {
    Found {
        version: Option<String>,
        path: Option<PathBuf>,
    },
    NotFound,
    Failed {
        reason: String,
    },
}

impl Probe {
    pub fn version(&self) -> Option<&str> {
        match self {
            Probe::Found { version, .. } => version.as_deref(),
            _ => None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Probe::Found { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}

/// Immutable facts about the host, shared by every diagnosis of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    entries: BTreeMap<ProbeKind, BTreeMap<String, Probe>>,
}

static NOT_FOUND: Probe = Probe::NotFound;

impl EnvironmentSnapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// Look up a probe. Tools that were never requested read as `NotFound`.
    pub fn get(&self, kind: ProbeKind, name: &str) -> &Probe {
        self.entries
            .get(&kind)
            .and_then(|tools| tools.get(name))
            .unwrap_or(&NOT_FOUND)
    }

    pub fn env_var(&self, name: &str) -> &Probe {
        self.get(ProbeKind::EnvVar, name)
    }
}

#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    entries: BTreeMap<ProbeKind, BTreeMap<String, Probe>>,
}

impl SnapshotBuilder {
    pub fn insert(mut self, kind: ProbeKind, name: &str, probe: Probe) -> Self {
        self.entries
            .entry(kind)
            .or_default()
            .insert(name.to_string(), probe);
        self
    }

    #[cfg(test)]
    pub fn found(self, kind: ProbeKind, name: &str, version: &str) -> Self {
        self.insert(
            kind,
            name,
            Probe::Found {
                version: Some(version.to_string()),
                path: None,
            },
        )
    }

    pub fn build(self) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            entries: self.entries,
        }
    }
}

/// Declarative list of what to probe.
#[derive(Debug, Clone, Default)]
pub struct ProbeRequest {
    pub binaries: Vec<String>,
    pub sdks: Vec<String>,
    pub ides: Vec<String>,
    pub env_vars: Vec<String>,
}

impl ProbeRequest {
    pub fn add(&mut self, kind: ProbeKind, name: &str) {
        let list = match kind {
            ProbeKind::Binary => &mut self.binaries,
            ProbeKind::Sdk => &mut self.sdks,
            ProbeKind::Ide => &mut self.ides,
            ProbeKind::EnvVar => &mut self.env_vars,
        };
        if !list.iter().any(|n| n == name) {
            list.push(name.to_string());
        }
    }
}

#[async_trait]
pub trait EnvironmentProber: Send + Sync {
    async fn probe(&self, request: &ProbeRequest) -> Result<EnvironmentSnapshot>;
}

pub const ANDROID_SDK: &str = "Android SDK";
pub const XCODE: &str = "Xcode";

/// Probes the real machine: `PATH` lookups, `--version` output, SDK folders.
pub struct SystemProber {
    version_line: Regex,
}

impl SystemProber {
    pub fn new() -> Self {
        Self {
            version_line: Regex::new(r"v?(\d+(?:\.\d+){0,2})").expect("version pattern is valid"),
        }
    }

    fn extract_version(&self, output: &str) -> Option<String> {
        self.version_line
            .captures(output)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    async fn probe_binary(&self, name: &str) -> Probe {
        let path = match which::which(name) {
            Ok(path) => path,
            Err(_) => return Probe::NotFound,
        };

        match Command::new(&path).arg("--version").output().await {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                Probe::Found {
                    version: self.extract_version(&stdout),
                    path: Some(path),
                }
            }
            Ok(output) => Probe::Failed {
                reason: DoctorError::Probe {
                    tool: name.to_string(),
                    reason: format!("`--version` exited with {}", output.status),
                }
                .to_string(),
            },
            Err(e) => Probe::Failed {
                reason: DoctorError::Probe {
                    tool: name.to_string(),
                    reason: e.to_string(),
                }
                .to_string(),
            },
        }
    }

    fn probe_android_sdk(&self) -> Probe {
        let root = std::env::var_os("ANDROID_HOME")
            .or_else(|| std::env::var_os("ANDROID_SDK_ROOT"))
            .map(PathBuf::from);
        match root {
            Some(root) => Self::probe_android_sdk_at(root),
            None => Probe::NotFound,
        }
    }

    /// Inspect an SDK root; the version is the newest `build-tools` entry.
    fn probe_android_sdk_at(root: PathBuf) -> Probe {
        let build_tools = root.join("build-tools");
        let entries = match std::fs::read_dir(&build_tools) {
            Ok(entries) => entries,
            Err(_) => {
                return Probe::Found {
                    version: None,
                    path: Some(root),
                }
            }
        };

        // Newest installed build-tools wins.
        let newest = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                crate::core::version::coerce(&name).map(|v| (v, name))
            })
            .max_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, name)| name);

        Probe::Found {
            version: newest,
            path: Some(root),
        }
    }

    async fn probe_xcode(&self) -> Probe {
        if !cfg!(target_os = "macos") {
            return Probe::NotFound;
        }
        match Command::new("xcodebuild").arg("-version").output().await {
            Ok(output) if output.status.success() => Probe::Found {
                version: self.extract_version(&String::from_utf8_lossy(&output.stdout)),
                path: which::which("xcodebuild").ok(),
            },
            Ok(_) => Probe::NotFound,
            Err(e) => Probe::Failed {
                reason: e.to_string(),
            },
        }
    }

    fn probe_env_var(name: &str) -> Probe {
        match std::env::var_os(name) {
            Some(value) if !value.is_empty() => Probe::Found {
                version: None,
                path: Some(PathBuf::from(value)),
            },
            _ => Probe::NotFound,
        }
    }
}

impl Default for SystemProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnvironmentProber for SystemProber {
    async fn probe(&self, request: &ProbeRequest) -> Result<EnvironmentSnapshot> {
        let mut builder = EnvironmentSnapshot::builder();

        for name in &request.binaries {
            let probe = self.probe_binary(name).await;
            tracing::debug!(tool = %name, ?probe, "probed binary");
            builder = builder.insert(ProbeKind::Binary, name, probe);
        }

        for name in &request.sdks {
            let probe = match name.as_str() {
                ANDROID_SDK => self.probe_android_sdk(),
                _ => Probe::NotFound,
            };
            tracing::debug!(sdk = %name, ?probe, "probed sdk");
            builder = builder.insert(ProbeKind::Sdk, name, probe);
        }

        for name in &request.ides {
            let probe = match name.as_str() {
                XCODE => self.probe_xcode().await,
                _ => Probe::NotFound,
            };
            tracing::debug!(ide = %name, ?probe, "probed ide");
            builder = builder.insert(ProbeKind::Ide, name, probe);
        }

        for name in &request.env_vars {
            builder = builder.insert(ProbeKind::EnvVar, name, Self::probe_env_var(name));
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unrequested_tool_reads_as_not_found() {
        let snapshot = EnvironmentSnapshot::default();
        assert_eq!(snapshot.get(ProbeKind::Binary, "node"), &Probe::NotFound);
    }

    #[test]
    fn test_builder_records_probes() {
        let snapshot = EnvironmentSnapshot::builder()
            .found(ProbeKind::Binary, "node", "18.0.0")
            .insert(
                ProbeKind::Binary,
                "yarn",
                Probe::Failed {
                    reason: "timeout".to_string(),
                },
            )
            .build();
        assert_eq!(snapshot.get(ProbeKind::Binary, "node").version(), Some("18.0.0"));
        assert!(matches!(
            snapshot.get(ProbeKind::Binary, "yarn"),
            Probe::Failed { .. }
        ));
    }

    #[test]
    fn test_probe_request_deduplicates() {
        let mut request = ProbeRequest::default();
        request.add(ProbeKind::Binary, "node");
        request.add(ProbeKind::Binary, "node");
        request.add(ProbeKind::Sdk, ANDROID_SDK);
        assert_eq!(request.binaries, vec!["node".to_string()]);
        assert_eq!(request.sdks.len(), 1);
    }

    #[test]
    fn test_extract_version_from_tool_output() {
        let prober = SystemProber::new();
        assert_eq!(prober.extract_version("v18.17.1\n"), Some("18.17.1".to_string()));
        assert_eq!(
            prober.extract_version("Xcode 15.0\nBuild version 15A240d"),
            Some("15.0".to_string())
        );
        assert_eq!(prober.extract_version("no digits"), None);
    }

    #[test]
    fn test_snapshot_serializes_not_found_marker() {
        let snapshot = EnvironmentSnapshot::builder()
            .insert(ProbeKind::Ide, XCODE, Probe::NotFound)
            .build();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["entries"]["Ide"]["Xcode"]["status"], "not_found");
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_found() {
        let prober = SystemProber::new();
        let mut request = ProbeRequest::default();
        request.add(ProbeKind::Binary, "definitely-not-a-real-tool-xyz");
        let snapshot = prober.probe(&request).await.unwrap();
        assert_eq!(
            snapshot.get(ProbeKind::Binary, "definitely-not-a-real-tool-xyz"),
            &Probe::NotFound
        );
    }

    #[test]
    fn test_newest_build_tools_version() {
        let tmp = TempDir::new().unwrap();
        for v in ["29.0.3", "33.0.1", "30.0.2"] {
            fs::create_dir_all(tmp.path().join("build-tools").join(v)).unwrap();
        }
        let probe = SystemProber::probe_android_sdk_at(tmp.path().to_path_buf());
        assert_eq!(probe.version(), Some("33.0.1"));
        assert_eq!(probe.path(), Some(tmp.path()));
    }

    #[test]
    fn test_sdk_root_without_build_tools_has_no_version() {
        let tmp = TempDir::new().unwrap();
        let probe = SystemProber::probe_android_sdk_at(tmp.path().to_path_buf());
        assert_eq!(
            probe,
            Probe::Found {
                version: None,
                path: Some(tmp.path().to_path_buf()),
            }
        );
    }
}
