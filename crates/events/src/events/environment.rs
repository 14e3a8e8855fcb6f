use serde::{Deserialize, Serialize};

/// Environment construction events - emitted by the environment factories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EnvironmentEvent {
    /// Machine configs passed structural validation
    Validated {
        recipe_type: String,
        machines: usize,
    },

    /// An installer reference could not be resolved and was demoted to a
    /// warning on the environment
    InstallerSkipped {
        machine: String,
        installer: String,
        reason: String,
    },

    /// Default memory/CPU attributes were filled in on a machine
    MemoryProvisioned {
        machine: String,
        memory_limit_bytes: u64,
    },
}
