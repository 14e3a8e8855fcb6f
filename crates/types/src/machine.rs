//! Machine and server configuration
//!
//! A machine config describes one machine of an environment: the servers it
//! declares, the installers to be provisioned into it, and a free-form
//! attribute map carrying resource limits. Machine names are the keys of the
//! enclosing machine map, not a field of the config itself.

use crate::installer::InstallerRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute key for the machine memory limit, in bytes.
pub const MEMORY_LIMIT_ATTRIBUTE: &str = "memoryLimitBytes";
/// Attribute key for the machine memory request, in bytes.
pub const MEMORY_REQUEST_ATTRIBUTE: &str = "memoryRequestBytes";
/// Attribute key for the machine CPU limit, in cores.
pub const CPU_LIMIT_ATTRIBUTE: &str = "cpuLimitCores";
/// Attribute key for the machine CPU request, in cores.
pub const CPU_REQUEST_ATTRIBUTE: &str = "cpuRequestCores";

/// Reserved server reference of the workspace-agent HTTP endpoint.
///
/// At most one machine per environment may declare it.
pub const WS_AGENT_HTTP_SERVER: &str = "wsagent/http";
/// Installer id that provisions the workspace agent.
pub const WS_AGENT_INSTALLER: &str = "org.atelier.ws-agent";

/// Declaration of a single server exposed by a machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl ServerConfig {
    /// Create a server declaration with the given port and protocol.
    #[must_use]
    pub fn new(port: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            port: Some(port.into()),
            protocol: Some(protocol.into()),
            path: None,
            attributes: BTreeMap::new(),
        }
    }
}

/// Configuration of one machine in an environment.
///
/// Created by the caller (workspace config), mutated in place by provisioners
/// during environment construction, frozen thereafter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub servers: BTreeMap<String, ServerConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub installers: Vec<InstallerRef>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl MachineConfig {
    /// Create an empty machine config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Set an attribute value, replacing any previous one.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a server declaration.
    pub fn add_server(&mut self, name: impl Into<String>, server: ServerConfig) {
        self.servers.insert(name.into(), server);
    }

    /// Add an installer reference, preserving order.
    pub fn add_installer(&mut self, installer: InstallerRef) {
        self.installers.push(installer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_replaced_not_merged() {
        let mut machine = MachineConfig::new();
        machine.set_attribute(MEMORY_LIMIT_ATTRIBUTE, "1024");
        machine.set_attribute(MEMORY_LIMIT_ATTRIBUTE, "2048");
        assert_eq!(machine.attribute(MEMORY_LIMIT_ATTRIBUTE), Some("2048"));
    }

    #[test]
    fn server_config_serializes_sparsely() {
        let server = ServerConfig::new("8080/tcp", "http");
        let json = serde_json::to_string(&server).unwrap();
        assert_eq!(json, r#"{"port":"8080/tcp","protocol":"http"}"#);
    }
}
