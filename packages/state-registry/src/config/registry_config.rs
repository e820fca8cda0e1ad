//! Registry configuration and its YAML schema (v1)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::{ConfigError, ConfigResult};

/// DN at which the bundle's bottom-up pass starts.
pub const DEFAULT_ROOT_DN: &str = "root";

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Debug export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DebugOutputConfig {
    /// Pretty-print exported JSON files
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Default export directory (used by the CLI when `--output` is absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for DebugOutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            dir: None,
        }
    }
}

fn default_pretty() -> bool {
    true
}

fn default_root_dn() -> String {
    DEFAULT_ROOT_DN.to_string()
}

/// Registry configuration
///
/// ```rust
/// use state_registry::config::RegistryConfig;
///
/// let config = RegistryConfig::from_yaml_str("version: 1\nroot_dn: root\n").unwrap();
/// assert_eq!(config.root_dn, "root");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub root_dn: String,
    pub debug_output: DebugOutputConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            root_dn: default_root_dn(),
            debug_output: DebugOutputConfig::default(),
        }
    }
}

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryConfigFileV1 {
    /// Schema version (always 1 for v1)
    version: Option<u32>,

    #[serde(default = "default_root_dn")]
    root_dn: String,

    #[serde(default)]
    debug_output: DebugOutputConfig,
}

impl RegistryConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml(path: &str) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: RegistryConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let config = Self {
            root_dn: file.root_dn,
            debug_output: file.debug_output,
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML (schema v1)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = RegistryConfigFileV1 {
            version: Some(1),
            root_dn: self.root_dn.clone(),
            debug_output: self.debug_output.clone(),
        };
        serde_yaml::to_string(&file).map_err(ConfigError::Yaml)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.root_dn.is_empty() {
            return Err(ConfigError::invalid("root_dn", "must not be empty"));
        }
        if self.root_dn.ends_with('/') {
            return Err(ConfigError::invalid(
                "root_dn",
                format!("'{}' must not end with '/'", self.root_dn),
            ));
        }
        Ok(())
    }
}
