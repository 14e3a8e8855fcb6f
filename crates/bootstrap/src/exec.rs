//! Exec channel capability
//!
//! The narrow surface a container-engine connector must expose to this core:
//! run a command inside a machine, and answer whether a server endpoint
//! exists on it. Connectors (Docker, Kubernetes, ...) live outside.

use async_trait::async_trait;
use atelier_errors::InfrastructureError;

/// Output of one command executed inside a machine.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    /// Whether the command exited successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Command execution inside one machine.
#[async_trait]
pub trait MachineExec: Send + Sync {
    /// Execute `argv` inside the machine and wait for it to return.
    ///
    /// A detached launch command returns as soon as the shell backgrounds
    /// the process; the exec channel is not held for the process lifetime.
    ///
    /// # Errors
    ///
    /// Returns an infrastructure error when the exec transport itself fails.
    /// A command that runs and exits non-zero is reported through
    /// [`ExecOutput::exit_code`], not as an error.
    async fn exec(&self, argv: &[String]) -> Result<ExecOutput, InfrastructureError>;

    /// URL of a server endpoint exposed by this machine, if present.
    fn server_endpoint(&self, server_ref: &str) -> Option<String>;
}
