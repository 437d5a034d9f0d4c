use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::requirements::{BuildBase, EnvVarValue};

/// Name of the configuration file looked up in the working directory and
/// at every bundle root.
pub const CONFIG_FILE_NAME: &str = "bundlescan.toml";

/// Directory names discovery never descends into.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &["node_modules", "__pycache__", ".git"];

/// bundlescan.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub discover: DiscoverConfig,
    #[serde(default, skip_serializing_if = "RuntimeConfig::is_empty")]
    pub node: RuntimeConfig,
    #[serde(default, skip_serializing_if = "RuntimeConfig::is_empty")]
    pub python: RuntimeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverConfig {
    /// Directory basenames skipped during traversal
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,
    /// Maximum directory nesting below an input path (unbounded when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

/// Per-runtime build settings read from a bundle root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Runtime version (e.g. "18" for node, "3.11" for python)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Base image class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<BuildBase>,
    /// Build-time environment variables
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, EnvVarValue>,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            ignored_dirs: default_ignored_dirs(),
            max_depth: None,
        }
    }
}

impl DiscoverConfig {
    /// Rejects entries that could never match a single path component.
    pub fn validate(&self) -> crate::Result<()> {
        for name in &self.ignored_dirs {
            if name.is_empty() {
                return Err(crate::Error::InvalidIgnoredDir {
                    name: name.clone(),
                    reason: "must not be empty",
                });
            }
            if name.contains('/') || name.contains('\\') {
                return Err(crate::Error::InvalidIgnoredDir {
                    name: name.clone(),
                    reason: "must be a directory name, not a path",
                });
            }
            if name == "." || name == ".." {
                return Err(crate::Error::InvalidIgnoredDir {
                    name: name.clone(),
                    reason: "must not be a relative path segment",
                });
            }
        }
        Ok(())
    }
}

impl RuntimeConfig {
    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.base.is_none() && self.env.is_empty()
    }
}

impl ScanConfig {
    /// Load from bundlescan.toml in the given directory, or return defaults if not found.
    pub fn load(dir: &Path) -> crate::Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                path: config_path.clone(),
                source: e,
            })?;
        let config: Self = toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: config_path,
            source: e,
        })?;
        config.discover.validate()?;
        Ok(config)
    }

    /// Renders the configuration as bundlescan.toml content.
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::ConfigSerialize { source: e })
    }
}

fn default_ignored_dirs() -> Vec<String> {
    DEFAULT_IGNORED_DIRS.iter().map(|d| (*d).to_owned()).collect()
}
