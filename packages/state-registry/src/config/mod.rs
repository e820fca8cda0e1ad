//! Configuration
//!
//! Versioned YAML schema (`version: 1`). Every field has a default, so an
//! empty v1 file yields [`RegistryConfig::default`].
//!
//! ```yaml
//! version: 1
//! root_dn: root
//! debug_output:
//!   pretty: true
//!   dir: target/registry-debug
//! ```

pub mod error;
pub mod registry_config;

pub use error::{ConfigError, ConfigResult};
pub use registry_config::{DebugOutputConfig, RegistryConfig, DEFAULT_ROOT_DN};
