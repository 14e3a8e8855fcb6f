//! The bootstrap orchestrator
//!
//! Drives the installer-injection protocol against one machine: stage the
//! working directory, fetch the binary, write the generated config, launch
//! detached, then wait for the agent's terminal event under a single
//! deadline measured from session start. The exec channel is released as
//! soon as the launch command returns; completion arrives only through the
//! event bus.

use crate::commands;
use crate::exec::MachineExec;
use crate::session::{BootstrapSession, BootstrapStatus};
use atelier_config::{BootstrapConfig, PolicyConfig};
use atelier_errors::{BootstrapError, Error, InjectionPhase};
use atelier_events::{
    AgentEvent, AppEvent, BootstrapperEvent, BootstrapperStatus, EventBus, EventEmitter,
    EventSender, StatusReceiver,
};
use atelier_types::{Installer, RuntimeIdentity};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};

/// Orchestrator-side driver for one machine's bootstrap session.
pub struct Bootstrapper {
    session: BootstrapSession,
    installers: Vec<Installer>,
    config: BootstrapConfig,
    policy: PolicyConfig,
    exec: Arc<dyn MachineExec>,
    bus: Arc<EventBus>,
    events: Option<EventSender>,
}

impl EventEmitter for Bootstrapper {
    fn event_sender(&self) -> Option<&EventSender> {
        self.events.as_ref()
    }
}

impl Bootstrapper {
    pub(crate) fn new(
        machine_name: String,
        identity: RuntimeIdentity,
        installers: Vec<Installer>,
        config: BootstrapConfig,
        policy: PolicyConfig,
        exec: Arc<dyn MachineExec>,
        bus: Arc<EventBus>,
        events: Option<EventSender>,
    ) -> Self {
        Self {
            session: BootstrapSession::new(machine_name, identity),
            installers,
            config,
            policy,
            exec,
            bus,
            events,
        }
    }

    /// Current session status; exactly one terminal status per run.
    #[must_use]
    pub fn status(&self) -> BootstrapStatus {
        self.session.status()
    }

    #[must_use]
    pub fn session(&self) -> &BootstrapSession {
        &self.session
    }

    /// Run the bootstrap protocol to a terminal state.
    ///
    /// # Errors
    ///
    /// Returns a [`BootstrapError`] describing the terminal outcome: an
    /// injection step failure, an agent-reported failure, a closed event
    /// channel, or the overall deadline elapsing (`TimedOut`, reported
    /// distinctly from failure).
    #[allow(clippy::too_many_lines)]
    pub async fn bootstrap(&mut self) -> Result<(), Error> {
        let started = Instant::now();
        let machine = self.session.machine_name().to_string();
        let runtime_id = self.session.identity().to_string();

        if self.installers.is_empty() && !self.policy.allow_empty_installers {
            self.session.advance(BootstrapStatus::Failed)?;
            return Err(BootstrapError::NoInstallers { machine }.into());
        }

        self.emit(AppEvent::Bootstrapper(BootstrapperEvent::Started {
            machine: machine.clone(),
            runtime_id: runtime_id.clone(),
        }));

        // Subscribe before launching so a fast agent cannot report into the
        // gap between launch and subscribe. The guard tears the subscription
        // down on every exit path.
        let (subscription, mut agent_events) =
            self.bus.subscribe(runtime_id.clone(), machine.clone());

        if let Err(err) = self.inject().await {
            drop(subscription);
            self.session.advance(BootstrapStatus::Failed)?;
            self.emit(AppEvent::Bootstrapper(BootstrapperEvent::Failed {
                machine,
                runtime_id,
                error: err.to_string(),
            }));
            return Err(err.into());
        }
        self.emit(AppEvent::Bootstrapper(BootstrapperEvent::Injected {
            machine: machine.clone(),
            runtime_id: runtime_id.clone(),
        }));

        if let Err(err) = self.launch().await {
            drop(subscription);
            self.session.advance(BootstrapStatus::Failed)?;
            self.emit(AppEvent::Bootstrapper(BootstrapperEvent::Failed {
                machine,
                runtime_id,
                error: err.to_string(),
            }));
            return Err(err.into());
        }
        self.session.advance(BootstrapStatus::InProgress)?;
        self.emit(AppEvent::Bootstrapper(BootstrapperEvent::Launched {
            machine: machine.clone(),
            runtime_id: runtime_id.clone(),
        }));

        // Single deadline, measured from session start, not from launch.
        let overall = Duration::from_secs(self.config.bootstrapping_timeout_min.saturating_mul(60));
        let remaining = overall.saturating_sub(started.elapsed());
        let outcome = timeout(remaining, self.await_outcome(&mut agent_events)).await;
        drop(subscription);

        match outcome {
            Ok(Ok(())) => {
                self.session.advance(BootstrapStatus::Done)?;
                self.emit(AppEvent::Bootstrapper(BootstrapperEvent::Completed {
                    machine,
                    runtime_id,
                }));
                Ok(())
            }
            Ok(Err(err)) => {
                self.session.advance(BootstrapStatus::Failed)?;
                self.emit(AppEvent::Bootstrapper(BootstrapperEvent::Failed {
                    machine,
                    runtime_id,
                    error: err.to_string(),
                }));
                Err(err.into())
            }
            Err(_elapsed) => {
                self.session.advance(BootstrapStatus::TimedOut)?;
                let timeout_min = self.config.bootstrapping_timeout_min;
                self.emit(AppEvent::Bootstrapper(BootstrapperEvent::TimedOut {
                    machine: machine.clone(),
                    runtime_id,
                    timeout_min,
                }));
                Err(BootstrapError::TimedOut {
                    machine,
                    timeout_min,
                }
                .into())
            }
        }
    }

    /// Stage, Fetch, Configure. Any failure is immediately fatal for the
    /// session; there is no partial retry and no fallback binary source.
    async fn inject(&self) -> Result<(), BootstrapError> {
        let dir = &self.config.bootstrap_dir;
        self.run(InjectionPhase::Stage, commands::stage(dir)).await?;
        self.run(
            InjectionPhase::Fetch,
            commands::fetch(dir, &self.config.binary_url),
        )
        .await?;
        self.run(InjectionPhase::Fetch, commands::mark_executable(dir))
            .await?;

        let manifest = serde_json::to_string(&self.installers).map_err(|e| {
            BootstrapError::InjectionFailed {
                machine: self.session.machine_name().to_string(),
                phase: InjectionPhase::Configure,
                message: e.to_string(),
            }
        })?;
        self.run(InjectionPhase::Configure, commands::configure(dir, &manifest))
            .await
    }

    async fn launch(&self) -> Result<(), BootstrapError> {
        self.run(
            InjectionPhase::Launch,
            commands::launch(
                &self.config.bootstrap_dir,
                self.session.machine_name(),
                self.session.identity(),
                &self.config,
            ),
        )
        .await
    }

    async fn run(&self, phase: InjectionPhase, argv: Vec<String>) -> Result<(), BootstrapError> {
        let machine = self.session.machine_name();
        tracing::debug!(%phase, machine, "executing bootstrap command");

        let output =
            self.exec
                .exec(&argv)
                .await
                .map_err(|e| BootstrapError::InjectionFailed {
                    machine: machine.to_string(),
                    phase,
                    message: e.to_string(),
                })?;
        if output.is_success() {
            Ok(())
        } else {
            let message = if output.stderr.is_empty() {
                format!("exit code {}", output.exit_code)
            } else {
                output.stderr
            };
            Err(BootstrapError::InjectionFailed {
                machine: machine.to_string(),
                phase,
                message,
            })
        }
    }

    /// Passive wait for the agent's terminal event. Installer progress is
    /// forwarded to observers but never changes session state.
    async fn await_outcome(&self, agent_events: &mut StatusReceiver) -> Result<(), BootstrapError> {
        let machine = self.session.machine_name();
        while let Some(event) = agent_events.recv().await {
            match event {
                AgentEvent::Installer(progress) => {
                    self.emit(AppEvent::Bootstrapper(BootstrapperEvent::InstallerStatus {
                        machine: machine.to_string(),
                        runtime_id: progress.runtime_id,
                        installer: progress.installer,
                        status: progress.status.to_string(),
                    }));
                }
                AgentEvent::Bootstrapper(outcome) => match outcome.status {
                    BootstrapperStatus::Available => {}
                    BootstrapperStatus::Done => return Ok(()),
                    BootstrapperStatus::Failed => {
                        return Err(BootstrapError::AgentFailed {
                            machine: machine.to_string(),
                            message: outcome
                                .error
                                .unwrap_or_else(|| "no failure detail reported".to_string()),
                        });
                    }
                },
            }
        }
        Err(BootstrapError::ChannelClosed {
            machine: machine.to_string(),
        })
    }
}
