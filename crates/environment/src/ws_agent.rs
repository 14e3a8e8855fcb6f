//! Workspace-agent machine location
//!
//! At most one machine per environment may host the ws-agent server; it backs
//! the IDE-facing APIs and downstream routing depends on the answer being
//! unambiguous. Two machines declaring it is a configuration error and fails
//! fast rather than silently picking one.

use crate::environment::InternalEnvironment;
use atelier_errors::EnvironmentError;
use atelier_types::{MachineConfig, WS_AGENT_HTTP_SERVER, WS_AGENT_INSTALLER};

/// Locate the machine (if any) that declares the ws-agent server.
///
/// Deterministic regardless of insertion order: machines are scanned in name
/// order and the ambiguity error lists offenders sorted.
///
/// # Errors
///
/// Returns an error naming the offending machines when more than one
/// declares the ws-agent server.
pub fn find_ws_agent_server_machine(
    env: &InternalEnvironment,
) -> Result<Option<String>, EnvironmentError> {
    let mut matches: Vec<&String> = env
        .machines()
        .iter()
        .filter(|(_, machine)| machine.servers.contains_key(WS_AGENT_HTTP_SERVER))
        .map(|(name, _)| name)
        .collect();
    matches.sort();

    match matches.as_slice() {
        [] => Ok(None),
        [name] => Ok(Some((*name).clone())),
        many => Err(EnvironmentError::MultipleWsAgentMachines {
            machines: many
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Whether a machine carries the ws-agent, either as a declared server or as
/// an installer reference (for environments where the agent is not yet
/// running as a server).
#[must_use]
pub fn contains_ws_agent(machine: &MachineConfig) -> bool {
    machine.servers.contains_key(WS_AGENT_HTTP_SERVER)
        || machine
            .installers
            .iter()
            .any(|r| r.id == WS_AGENT_INSTALLER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EnvironmentKind;
    use atelier_types::{InstallerRef, RecipeDescriptor, RecipeType, ServerConfig};
    use std::collections::BTreeMap;

    fn env_with(machines: BTreeMap<String, MachineConfig>) -> InternalEnvironment {
        InternalEnvironment::new(
            RecipeDescriptor::from_content(RecipeType::Dockerfile, "FROM alpine"),
            machines,
            BTreeMap::new(),
            vec![],
            EnvironmentKind::Dockerfile {
                dockerfile: "FROM alpine".into(),
            },
        )
        .unwrap()
    }

    fn ws_agent_machine() -> MachineConfig {
        let mut machine = MachineConfig::new();
        machine.add_server(WS_AGENT_HTTP_SERVER, ServerConfig::new("8080/tcp", "http"));
        machine
    }

    #[test]
    fn finds_the_single_ws_agent_machine() {
        let mut machines = BTreeMap::new();
        machines.insert("db".to_string(), MachineConfig::new());
        machines.insert("dev".to_string(), ws_agent_machine());

        let env = env_with(machines);
        assert_eq!(
            find_ws_agent_server_machine(&env).unwrap().as_deref(),
            Some("dev")
        );
        // Idempotent: same answer on repeat.
        assert_eq!(
            find_ws_agent_server_machine(&env).unwrap().as_deref(),
            Some("dev")
        );
    }

    #[test]
    fn absent_ws_agent_yields_none() {
        let mut machines = BTreeMap::new();
        machines.insert("dev".to_string(), MachineConfig::new());
        assert_eq!(find_ws_agent_server_machine(&env_with(machines)).unwrap(), None);
    }

    #[test]
    fn two_declaring_machines_fail_deterministically() {
        let mut machines = BTreeMap::new();
        machines.insert("zeta".to_string(), ws_agent_machine());
        machines.insert("alpha".to_string(), ws_agent_machine());

        let err = find_ws_agent_server_machine(&env_with(machines)).unwrap_err();
        match err {
            EnvironmentError::MultipleWsAgentMachines { machines } => {
                assert_eq!(machines, "alpha, zeta");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn installer_reference_counts_as_ws_agent() {
        let mut machine = MachineConfig::new();
        machine.add_installer(InstallerRef::id_only(WS_AGENT_INSTALLER));
        assert!(contains_ws_agent(&machine));
        assert!(!contains_ws_agent(&MachineConfig::new()));
    }
}
