//! Structural validation of machine configs
//!
//! Name validation runs before any external I/O. Server-conflict validation
//! runs after installer resolution, when the servers contributed by
//! installers are known.

use atelier_errors::EnvironmentError;
use atelier_types::{Installer, MachineConfig};
use std::collections::BTreeMap;

/// Validates a machine-config map against structural rules.
#[derive(Debug, Clone, Default)]
pub struct MachineConfigsValidator;

impl MachineConfigsValidator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate machine names: non-empty, limited to alphanumerics and
    /// `_`, `-`, `.`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending machine.
    pub fn validate_names(
        &self,
        machines: &BTreeMap<String, MachineConfig>,
    ) -> Result<(), EnvironmentError> {
        for name in machines.keys() {
            if name.is_empty() {
                return Err(EnvironmentError::UnnamedMachine);
            }
            if !Self::is_valid_name(name) {
                return Err(EnvironmentError::InvalidMachineName { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Validate that installer-contributed servers do not collide with the
    /// servers a machine declares directly.
    ///
    /// # Errors
    ///
    /// Returns an error naming the machine, server, and installer involved
    /// in the first conflict.
    pub fn validate_servers(
        &self,
        machine_name: &str,
        machine: &MachineConfig,
        installers: &[Installer],
    ) -> Result<(), EnvironmentError> {
        for installer in installers {
            for server in installer.servers.keys() {
                if machine.servers.contains_key(server) {
                    return Err(EnvironmentError::ServerConflict {
                        machine: machine_name.to_string(),
                        server: server.clone(),
                        installer: installer.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn is_valid_name(name: &str) -> bool {
        name.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_types::ServerConfig;
    use std::collections::BTreeMap;

    fn machines(names: &[&str]) -> BTreeMap<String, MachineConfig> {
        names
            .iter()
            .map(|n| ((*n).to_string(), MachineConfig::new()))
            .collect()
    }

    #[test]
    fn accepts_reasonable_names() {
        let validator = MachineConfigsValidator::new();
        validator
            .validate_names(&machines(&["dev", "db-1", "ws_agent.main"]))
            .unwrap();
    }

    #[test]
    fn rejects_empty_and_exotic_names() {
        let validator = MachineConfigsValidator::new();
        assert!(matches!(
            validator.validate_names(&machines(&[""])),
            Err(EnvironmentError::UnnamedMachine)
        ));
        assert!(matches!(
            validator.validate_names(&machines(&["dev machine"])),
            Err(EnvironmentError::InvalidMachineName { .. })
        ));
    }

    #[test]
    fn detects_server_conflicts_with_installers() {
        let validator = MachineConfigsValidator::new();
        let mut machine = MachineConfig::new();
        machine.add_server("terminal", ServerConfig::new("4411/tcp", "ws"));

        let installer = Installer {
            id: "org.atelier.terminal".into(),
            version: "1.0.0".into(),
            script: String::new(),
            servers: [("terminal".to_string(), ServerConfig::default())]
                .into_iter()
                .collect(),
        };

        let err = validator
            .validate_servers("dev", &machine, std::slice::from_ref(&installer))
            .unwrap_err();
        assert!(matches!(err, EnvironmentError::ServerConflict { .. }));
    }
}
