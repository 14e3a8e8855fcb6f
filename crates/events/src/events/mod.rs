//! Domain-driven event types emitted by the orchestrator side.

use serde::{Deserialize, Serialize};

pub mod bootstrapper;
pub mod environment;
pub mod general;

pub use bootstrapper::BootstrapperEvent;
pub use environment::EnvironmentEvent;
pub use general::GeneralEvent;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (debug logs, warnings, errors)
    General(GeneralEvent),

    /// Environment construction events (validation, provisioning)
    Environment(EnvironmentEvent),

    /// Bootstrap session events (injection, launch, outcome)
    Bootstrapper(BootstrapperEvent),
}
