#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for atelier
//!
//! This crate handles loading configuration from:
//! - Default values (hard-coded)
//! - Configuration file (TOML)
//!
//! All sections and fields are defaulted so an empty config is valid. A
//! post-load validation step enforces cross-field invariants, most
//! importantly that the overall bootstrapping timeout strictly exceeds the
//! per-installer timeout.

use atelier_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Bootstrap protocol configuration
///
/// The per-installer timeout and the server-check period are machine-wide
/// values injected at Bootstrapper construction time, not per installer. The
/// overall timeout is minutes-scale so installer-level retries inside the
/// agent have room to complete before the orchestrator gives up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// URL the bootstrap binary is fetched from, inside the machine
    #[serde(default = "default_binary_url")]
    pub binary_url: String,
    /// Working directory created inside the machine
    #[serde(default = "default_bootstrap_dir")]
    pub bootstrap_dir: String,
    /// Overall bootstrapping deadline, measured from session start
    #[serde(default = "default_bootstrapping_timeout_min")]
    pub bootstrapping_timeout_min: u64,
    /// Deadline the agent applies to each single installer
    #[serde(default = "default_installer_timeout_sec")]
    pub installer_timeout_sec: u64,
    /// Poll period the agent uses when checking installer servers
    #[serde(default = "default_server_check_period_sec")]
    pub server_check_period_sec: u64,
    /// Endpoint the agent pushes progress events to
    #[serde(default = "default_push_endpoint")]
    pub push_endpoint: String,
    /// Endpoint the agent pushes installer output to
    #[serde(default = "default_push_logs_endpoint")]
    pub push_logs_endpoint: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            binary_url: default_binary_url(),
            bootstrap_dir: default_bootstrap_dir(),
            bootstrapping_timeout_min: default_bootstrapping_timeout_min(),
            installer_timeout_sec: default_installer_timeout_sec(),
            server_check_period_sec: default_server_check_period_sec(),
            push_endpoint: default_push_endpoint(),
            push_logs_endpoint: default_push_logs_endpoint(),
        }
    }
}

/// Default machine resource attributes applied by the memory provisioner
///
/// `None` for a CPU value means the corresponding attribute is not
/// provisioned at all. Memory values are in megabytes and converted to a
/// byte-valued attribute on the machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_machine_memory_mb")]
    pub default_machine_memory_mb: u64,
    #[serde(default = "default_machine_memory_request_mb")]
    pub default_machine_memory_request_mb: u64,
    #[serde(default)]
    pub default_machine_cpu_limit_cores: Option<f64>,
    #[serde(default)]
    pub default_machine_cpu_request_cores: Option<f64>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            default_machine_memory_mb: default_machine_memory_mb(),
            default_machine_memory_request_mb: default_machine_memory_request_mb(),
            default_machine_cpu_limit_cores: None,
            default_machine_cpu_request_cores: None,
        }
    }
}

/// Policy knobs for behavior the core does not hard-code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Whether a machine whose installer list resolved to nothing may still
    /// be bootstrapped. An environment with zero installers is still a
    /// startable environment, so this defaults to permissive.
    #[serde(default = "default_allow_empty_installers")]
    pub allow_empty_installers: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allow_empty_installers: default_allow_empty_installers(),
        }
    }
}

impl Config {
    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a cross-field invariant
    /// is violated.
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content fails
    /// [`Config::from_toml`].
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Self::from_toml(&content)
    }

    /// Validate cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if a URL field is not parseable or the overall
    /// bootstrapping timeout does not strictly exceed the installer timeout.
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in [
            ("bootstrap.binary_url", &self.bootstrap.binary_url),
            ("bootstrap.push_endpoint", &self.bootstrap.push_endpoint),
            (
                "bootstrap.push_logs_endpoint",
                &self.bootstrap.push_logs_endpoint,
            ),
        ] {
            Url::parse(value).map_err(|_| ConfigError::InvalidUrl {
                field: field.to_string(),
                value: value.clone(),
            })?;
        }

        let overall_sec = self
            .bootstrap
            .bootstrapping_timeout_min
            .checked_mul(60)
            .ok_or_else(|| ConfigError::InvalidValue {
                message: format!(
                    "bootstrapping_timeout_min ({}) is out of range",
                    self.bootstrap.bootstrapping_timeout_min
                ),
            })?;
        if overall_sec <= self.bootstrap.installer_timeout_sec {
            return Err(ConfigError::InvalidValue {
                message: format!(
                    "bootstrapping_timeout_min ({} min) must exceed installer_timeout_sec ({} sec)",
                    self.bootstrap.bootstrapping_timeout_min, self.bootstrap.installer_timeout_sec
                ),
            }
            .into());
        }
        Ok(())
    }
}

// Default value functions for serde

fn default_binary_url() -> String {
    "https://assets.atelier.local/bootstrapper/bootstrapper".to_string()
}

fn default_bootstrap_dir() -> String {
    "/tmp/bootstrapper".to_string()
}

fn default_bootstrapping_timeout_min() -> u64 {
    10
}

fn default_installer_timeout_sec() -> u64 {
    120
}

fn default_server_check_period_sec() -> u64 {
    3
}

fn default_push_endpoint() -> String {
    "wss://api.atelier.local/connect".to_string()
}

fn default_push_logs_endpoint() -> String {
    "wss://api.atelier.local/connect".to_string()
}

fn default_machine_memory_mb() -> u64 {
    2048
}

fn default_machine_memory_request_mb() -> u64 {
    1024
}

fn default_allow_empty_installers() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.bootstrap.bootstrapping_timeout_min, 10);
        assert_eq!(config.bootstrap.installer_timeout_sec, 120);
        assert_eq!(config.bootstrap.server_check_period_sec, 3);
        assert_eq!(config.memory.default_machine_memory_mb, 2048);
        assert!(config.policy.allow_empty_installers);
    }

    #[test]
    fn timeout_ordering_is_enforced() {
        let err = Config::from_toml(
            r"
[bootstrap]
bootstrapping_timeout_min = 1
installer_timeout_sec = 120
",
        )
        .unwrap_err();
        assert!(err.to_string().contains("must exceed"));
    }

    #[test]
    fn out_of_range_timeout_is_rejected() {
        let err = Config::from_toml(
            r"
[bootstrap]
bootstrapping_timeout_min = 9223372036854775807
",
        )
        .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn bad_urls_are_rejected() {
        let err = Config::from_toml(
            r#"
[bootstrap]
binary_url = "not a url"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid URL"));
    }
}
