use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::checks::android::AndroidHomeCheck;
use crate::checks::common::Installer;
use crate::checks::tool::ToolVersionCheck;
use crate::checks::traits::{Check, Diagnosis};
use crate::core::config::{Config, Platform, VersionRanges};
use crate::core::environment::{
    EnvironmentSnapshot, ProbeKind, ProbeRequest, ANDROID_SDK, XCODE,
};

/// A named, ordered group of checks.
#[derive(Clone)]
pub struct Category {
    pub label: String,
    pub checks: Vec<Arc<dyn Check>>,
}

impl Category {
    pub fn new(label: &str, checks: Vec<Arc<dyn Check>>) -> Self {
        Self {
            label: label.to_string(),
            checks,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistryOptions {
    pub platforms: Vec<Platform>,
    pub version_ranges: VersionRanges,
    /// Labels of checks to mark invisible.
    pub hidden: Vec<String>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            platforms: Platform::host_defaults(),
            version_ranges: VersionRanges::default(),
            hidden: vec![],
        }
    }
}

impl RegistryOptions {
    pub fn from_config(config: &Config, platforms: Option<Vec<Platform>>) -> Self {
        Self {
            platforms: platforms
                .or_else(|| config.platforms.clone())
                .unwrap_or_else(Platform::host_defaults),
            version_ranges: config.version_ranges(),
            hidden: config.hidden.clone().unwrap_or_default(),
        }
    }
}

/// Keeps a check in its category but out of the report and the fixes.
struct Hidden(Arc<dyn Check>);

#[async_trait]
impl Check for Hidden {
    fn label(&self) -> &str {
        self.0.label()
    }

    fn is_required(&self) -> bool {
        self.0.is_required()
    }

    fn visible(&self) -> bool {
        false
    }

    async fn diagnose(&self, environment: &EnvironmentSnapshot) -> Result<Diagnosis> {
        self.0.diagnose(environment).await
    }
}

type CategoryBuilder = Box<dyn Fn(&RegistryOptions) -> Vec<Arc<dyn Check>> + Send + Sync>;

struct Entry {
    label: &'static str,
    platform: Option<Platform>,
    build: CategoryBuilder,
}

pub struct CheckRegistry {
    entries: Vec<Entry>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self { entries: vec![] }
    }

    /// Register a category. `platform` limits it to runs that include it.
    pub fn register<F>(mut self, label: &'static str, platform: Option<Platform>, build: F) -> Self
    where
        F: Fn(&RegistryOptions) -> Vec<Arc<dyn Check>> + Send + Sync + 'static,
    {
        self.entries.push(Entry {
            label,
            platform,
            build: Box::new(build),
        });
        self
    }

    pub fn list_categories(&self, options: &RegistryOptions) -> Vec<Category> {
        self.entries
            .iter()
            .filter(|entry| match entry.platform {
                Some(platform) => options.platforms.contains(&platform),
                None => true,
            })
            .map(|entry| {
                let checks = (entry.build)(options)
                    .into_iter()
                    .map(|check| {
                        if options.hidden.iter().any(|h| h == check.label()) {
                            Arc::new(Hidden(check)) as Arc<dyn Check>
                        } else {
                            check
                        }
                    })
                    .collect();
                Category::new(entry.label, checks)
            })
            .filter(|category| !category.checks.is_empty())
            .collect()
    }
}

/// Everything the given categories need probed.
pub fn probe_request(categories: &[Category]) -> ProbeRequest {
    let mut request = ProbeRequest::default();
    for check in categories.iter().flat_map(|c| &c.checks) {
        for (kind, name) in check.probes() {
            request.add(kind, name);
        }
    }
    request
}

pub fn default_registry() -> CheckRegistry {
    CheckRegistry::new()
        .register("Common", None, |options| {
            let ranges = &options.version_ranges;
            let checks: Vec<Arc<dyn Check>> = vec![
                Arc::new(ToolVersionCheck::new(
                    "Node.js",
                    (ProbeKind::Binary, "node"),
                    &ranges.node,
                    "https://nodejs.org/en/download/",
                )),
                Arc::new(
                    ToolVersionCheck::new(
                        "Yarn",
                        (ProbeKind::Binary, "yarn"),
                        &ranges.yarn,
                        "https://yarnpkg.com/getting-started/install",
                    )
                    .advisory()
                    .installed_with(Installer::new("npm", &["install", "--global", "yarn"])),
                ),
                Arc::new(ToolVersionCheck::new(
                    "npm",
                    (ProbeKind::Binary, "npm"),
                    &ranges.npm,
                    "https://docs.npmjs.com/downloading-and-installing-node-js-and-npm",
                )),
                Arc::new(
                    ToolVersionCheck::new(
                        "Watchman",
                        (ProbeKind::Binary, "watchman"),
                        &ranges.watchman,
                        "https://facebook.github.io/watchman/docs/install",
                    )
                    .advisory()
                    .installed_with(Installer::new("brew", &["install", "watchman"])),
                ),
            ];
            checks
        })
        .register("Android", Some(Platform::Android), |options| {
            let checks: Vec<Arc<dyn Check>> = vec![
                Arc::new(ToolVersionCheck::new(
                    ANDROID_SDK,
                    (ProbeKind::Sdk, ANDROID_SDK),
                    &options.version_ranges.android_build_tools,
                    "https://developer.android.com/studio",
                )),
                Arc::new(AndroidHomeCheck),
            ];
            checks
        })
        .register("iOS", Some(Platform::Ios), |options| {
            let checks: Vec<Arc<dyn Check>> = vec![
                Arc::new(ToolVersionCheck::new(
                    XCODE,
                    (ProbeKind::Ide, XCODE),
                    &options.version_ranges.xcode,
                    "https://developer.apple.com/xcode/",
                )),
                Arc::new(
                    ToolVersionCheck::new(
                        "CocoaPods",
                        (ProbeKind::Binary, "pod"),
                        &options.version_ranges.cocoapods,
                        "https://guides.cocoapods.org/using/getting-started.html",
                    )
                    .installed_with(Installer::new("gem", &["install", "cocoapods"])),
                ),
            ];
            checks
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(categories: &[Category]) -> Vec<String> {
        categories.iter().map(|c| c.label.clone()).collect()
    }

    fn options(platforms: Vec<Platform>) -> RegistryOptions {
        RegistryOptions {
            platforms,
            ..RegistryOptions::default()
        }
    }

    #[test]
    fn test_platform_filtering() {
        let registry = default_registry();
        assert_eq!(labels(&registry.list_categories(&options(vec![]))), vec!["Common"]);
        assert_eq!(
            labels(&registry.list_categories(&options(vec![Platform::Ios, Platform::Android]))),
            vec!["Common", "Android", "iOS"]
        );
    }

    #[test]
    fn test_check_order_is_declaration_order() {
        let categories = default_registry().list_categories(&options(vec![]));
        let checks: Vec<&str> = categories[0].checks.iter().map(|c| c.label()).collect();
        assert_eq!(checks, vec!["Node.js", "Yarn", "npm", "Watchman"]);
    }

    #[test]
    fn test_advisory_checks() {
        let categories = default_registry().list_categories(&options(vec![]));
        let advisory: Vec<&str> = categories[0]
            .checks
            .iter()
            .filter(|c| !c.is_required())
            .map(|c| c.label())
            .collect();
        assert_eq!(advisory, vec!["Yarn", "Watchman"]);
    }

    #[test]
    fn test_hidden_checks_become_invisible() {
        let opts = RegistryOptions {
            hidden: vec!["Watchman".to_string()],
            ..options(vec![])
        };
        let categories = default_registry().list_categories(&opts);
        let watchman = categories[0]
            .checks
            .iter()
            .find(|c| c.label() == "Watchman")
            .unwrap();
        assert!(!watchman.visible());
        assert!(!watchman.has_fix());
    }

    #[test]
    fn test_empty_categories_are_dropped() {
        let registry = CheckRegistry::new()
            .register("Empty", None, |_| vec![])
            .register("Common", None, |_| {
                vec![crate::checks::testing::ScriptedCheck::passing("a").arc()]
            });
        assert_eq!(
            labels(&registry.list_categories(&options(vec![]))),
            vec!["Common"]
        );
    }

    #[test]
    fn test_version_ranges_flow_into_checks() {
        let mut opts = options(vec![]);
        opts.version_ranges.node = ">=20".to_string();
        let categories = default_registry().list_categories(&opts);
        let node = &categories[0].checks[0];
        let snapshot = EnvironmentSnapshot::builder()
            .found(ProbeKind::Binary, "node", "18.0.0")
            .build();
        let diagnosis = futures::executor::block_on(node.diagnose(&snapshot)).unwrap();
        assert!(diagnosis.needs_fix);
    }

    #[test]
    fn test_probe_request_collects_all_probes() {
        let categories = default_registry()
            .list_categories(&options(vec![Platform::Android, Platform::Ios]));
        let request = probe_request(&categories);
        assert_eq!(request.binaries, vec!["node", "yarn", "npm", "watchman", "pod"]);
        assert_eq!(request.sdks, vec![ANDROID_SDK]);
        assert_eq!(request.ides, vec![XCODE]);
        assert_eq!(request.env_vars, vec!["ANDROID_HOME"]);
    }

    #[test]
    fn test_options_prefer_cli_platforms() {
        let config = Config {
            platforms: Some(vec![Platform::Ios]),
            ..Config::default()
        };
        let opts = RegistryOptions::from_config(&config, Some(vec![Platform::Android]));
        assert_eq!(opts.platforms, vec![Platform::Android]);
        let opts = RegistryOptions::from_config(&config, None);
        assert_eq!(opts.platforms, vec![Platform::Ios]);
    }
}
