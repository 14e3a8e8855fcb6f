//! Bootstrap protocol error types
//!
//! Terminal outcomes of a single machine's bootstrap session. Timeout is kept
//! distinct from agent-reported failure so callers can message them
//! differently.

use thiserror::Error;

/// Phase of the injection sequence that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionPhase {
    /// `mkdir -p` of the bootstrap directory.
    Stage,
    /// Download of the bootstrap binary.
    Fetch,
    /// Writing the installer config file.
    Configure,
    /// Detached launch of the binary.
    Launch,
}

impl std::fmt::Display for InjectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Stage => "stage",
            Self::Fetch => "fetch",
            Self::Configure => "configure",
            Self::Launch => "launch",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Error)]
pub enum BootstrapError {
    #[error("bootstrap injection failed in machine '{machine}' at {phase} step: {message}")]
    InjectionFailed {
        machine: String,
        phase: InjectionPhase,
        message: String,
    },

    #[error("bootstrap agent reported failure in machine '{machine}': {message}")]
    AgentFailed { machine: String, message: String },

    #[error("bootstrapping timed out in machine '{machine}' after {timeout_min} minutes")]
    TimedOut { machine: String, timeout_min: u64 },

    #[error("event channel closed before machine '{machine}' reported an outcome")]
    ChannelClosed { machine: String },

    #[error("machine '{machine}' has no installers to bootstrap")]
    NoInstallers { machine: String },
}
