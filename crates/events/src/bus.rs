//! Out-of-band event bus for agent-pushed status events
//!
//! The in-machine bootstrap agent reports progress and outcome independently
//! of the exec channel that launched it. Whatever frontend receives those
//! pushes (websocket endpoint, test harness) publishes them here; each
//! bootstrap session subscribes under its `(runtime identity, machine)` key
//! and sees only its own events.
//!
//! Subscriptions are guard-scoped: dropping the [`Subscription`] removes the
//! subscriber entry, so a session reaching a terminal state cannot leak its
//! registration across workspace restarts.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Per-installer status as reported by the in-machine agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallerStatus {
    Starting,
    Running,
    Done,
    Failed,
}

impl InstallerStatus {
    /// Wire form, as the agent spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for InstallerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-level status as reported by the in-machine agent.
///
/// Only `Done` and `Failed` are terminal for a bootstrap session;
/// `Available` announces the agent came up and started working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BootstrapperStatus {
    Available,
    Done,
    Failed,
}

/// Progress event for a single installer inside a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallerStatusEvent {
    pub runtime_id: String,
    pub machine_name: String,
    pub installer: String,
    pub status: InstallerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome event for a whole bootstrap session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapperStatusEvent {
    pub runtime_id: String,
    pub machine_name: String,
    pub status: BootstrapperStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Any event pushed by the in-machine agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    Installer(InstallerStatusEvent),
    Bootstrapper(BootstrapperStatusEvent),
}

impl AgentEvent {
    fn key(&self) -> SubscriptionKey {
        match self {
            Self::Installer(e) => (e.runtime_id.clone(), e.machine_name.clone()),
            Self::Bootstrapper(e) => (e.runtime_id.clone(), e.machine_name.clone()),
        }
    }
}

type SubscriptionKey = (String, String);

/// Receiver half handed to a subscriber.
pub type StatusReceiver = UnboundedReceiver<AgentEvent>;

/// Publish/subscribe channel keyed by `(runtime id, machine name)`.
///
/// One subscriber per key; a later subscribe for the same key replaces the
/// earlier one (a machine has at most one live bootstrap session).
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: DashMap<SubscriptionKey, UnboundedSender<AgentEvent>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe for events of one runtime identity + machine pair.
    ///
    /// The returned guard must be kept alive for the duration of the session;
    /// dropping it tears the subscription down.
    #[must_use]
    pub fn subscribe(
        self: &Arc<Self>,
        runtime_id: impl Into<String>,
        machine_name: impl Into<String>,
    ) -> (Subscription, StatusReceiver) {
        let key = (runtime_id.into(), machine_name.into());
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(key.clone(), tx.clone());
        (
            Subscription {
                bus: Arc::clone(self),
                key,
                tx,
            },
            rx,
        )
    }

    /// Deliver an agent event to the matching subscriber, if any.
    ///
    /// Events without a subscriber are dropped; the agent may keep pushing
    /// after the orchestrator gave up on the session.
    pub fn publish(&self, event: AgentEvent) {
        let key = event.key();
        if let Some(subscriber) = self.subscribers.get(&key) {
            if subscriber.send(event).is_err() {
                tracing::debug!(runtime_id = %key.0, machine = %key.1, "dropping event for closed subscriber");
            }
        } else {
            tracing::debug!(runtime_id = %key.0, machine = %key.1, "dropping event without subscriber");
        }
    }

    /// Whether a subscriber is currently registered for the pair.
    #[must_use]
    pub fn has_subscriber(&self, runtime_id: &str, machine_name: &str) -> bool {
        self.subscribers
            .contains_key(&(runtime_id.to_string(), machine_name.to_string()))
    }
}

/// Guard representing one live subscription; unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    bus: Arc<EventBus>,
    key: SubscriptionKey,
    tx: UnboundedSender<AgentEvent>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Remove only our own entry. A successor session may already have
        // replaced the registration under the same key.
        self.bus
            .subscribers
            .remove_if(&self.key, |_, tx| tx.same_channel(&self.tx));
    }
}
