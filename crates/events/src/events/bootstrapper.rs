use serde::{Deserialize, Serialize};

/// Bootstrap session events - one session per machine
///
/// These mirror the session state machine for observers; the authoritative
/// outcome is the `Bootstrapper`'s return value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BootstrapperEvent {
    /// Session created, injection about to begin
    Started { machine: String, runtime_id: String },

    /// Binary and config staged inside the machine
    Injected { machine: String, runtime_id: String },

    /// Detached agent process launched, awaiting events
    Launched { machine: String, runtime_id: String },

    /// Progress report forwarded from the in-machine agent
    InstallerStatus {
        machine: String,
        runtime_id: String,
        installer: String,
        status: String,
    },

    /// Agent reported successful completion
    Completed { machine: String, runtime_id: String },

    /// Injection failed or the agent reported failure
    Failed {
        machine: String,
        runtime_id: String,
        error: String,
    },

    /// No terminal event arrived before the overall deadline
    TimedOut {
        machine: String,
        runtime_id: String,
        timeout_min: u64,
    },
}
