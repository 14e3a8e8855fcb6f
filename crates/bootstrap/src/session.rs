//! Bootstrap session state machine
//!
//! ```text
//! NOT_STARTED --(inject+launch ok)--> IN_PROGRESS
//! IN_PROGRESS --(terminal SUCCESS event)--> DONE
//! IN_PROGRESS --(terminal FAILURE event)--> FAILED
//! IN_PROGRESS --(deadline elapsed)--> TIMED_OUT
//! NOT_STARTED --(inject or launch fails)--> FAILED
//! ```
//!
//! `Done`, `Failed`, and `TimedOut` are terminal; no transition leaves them.

use atelier_errors::Error;
use atelier_types::RuntimeIdentity;

/// Status of one bootstrap session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStatus {
    NotStarted,
    InProgress,
    Done,
    Failed,
    TimedOut,
}

impl BootstrapStatus {
    /// Whether this status absorbs: no transition may leave it.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::TimedOut)
    }

    fn can_advance_to(self, next: Self) -> bool {
        match self {
            Self::NotStarted => matches!(next, Self::InProgress | Self::Failed),
            Self::InProgress => next.is_terminal(),
            Self::Done | Self::Failed | Self::TimedOut => false,
        }
    }
}

/// State owned by exactly one [`crate::Bootstrapper`] instance.
#[derive(Debug, Clone)]
pub struct BootstrapSession {
    machine_name: String,
    identity: RuntimeIdentity,
    status: BootstrapStatus,
}

impl BootstrapSession {
    #[must_use]
    pub fn new(machine_name: impl Into<String>, identity: RuntimeIdentity) -> Self {
        Self {
            machine_name: machine_name.into(),
            identity,
            status: BootstrapStatus::NotStarted,
        }
    }

    #[must_use]
    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }

    #[must_use]
    pub fn identity(&self) -> &RuntimeIdentity {
        &self.identity
    }

    #[must_use]
    pub fn status(&self) -> BootstrapStatus {
        self.status
    }

    /// Advance the session to `next`.
    ///
    /// # Errors
    ///
    /// Returns an internal error for a transition the state machine does not
    /// allow; sessions in a terminal state reject every transition.
    pub fn advance(&mut self, next: BootstrapStatus) -> Result<(), Error> {
        if !self.status.can_advance_to(next) {
            return Err(Error::internal(format!(
                "illegal bootstrap transition {:?} -> {next:?} for machine '{}'",
                self.status, self.machine_name
            )));
        }
        self.status = next;
        Ok(())
    }
}
