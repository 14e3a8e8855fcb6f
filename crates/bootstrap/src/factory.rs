//! Bootstrapper construction
//!
//! Pure construction with injected configuration: endpoints, timeouts, and
//! periods are machine-wide values fixed here, not per installer. One
//! produced `Bootstrapper` drives exactly one session.

use crate::bootstrapper::Bootstrapper;
use crate::exec::MachineExec;
use atelier_config::{BootstrapConfig, PolicyConfig};
use atelier_events::{EventBus, EventSender};
use atelier_types::{Installer, RuntimeIdentity};
use std::sync::Arc;

/// Constructs `Bootstrapper`s bound to a machine, runtime identity, and
/// installer set.
pub struct BootstrapperFactory {
    config: BootstrapConfig,
    policy: PolicyConfig,
    bus: Arc<EventBus>,
    events: Option<EventSender>,
}

impl BootstrapperFactory {
    #[must_use]
    pub fn new(
        config: BootstrapConfig,
        policy: PolicyConfig,
        bus: Arc<EventBus>,
        events: Option<EventSender>,
    ) -> Self {
        Self {
            config,
            policy,
            bus,
            events,
        }
    }

    /// Create a bootstrapper for one machine. No side effects.
    #[must_use]
    pub fn create(
        &self,
        identity: RuntimeIdentity,
        machine_name: impl Into<String>,
        installers: Vec<Installer>,
        exec: Arc<dyn MachineExec>,
    ) -> Bootstrapper {
        Bootstrapper::new(
            machine_name.into(),
            identity,
            installers,
            self.config.clone(),
            self.policy.clone(),
            exec,
            Arc::clone(&self.bus),
            self.events.clone(),
        )
    }
}
