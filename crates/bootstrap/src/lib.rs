#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Machine bootstrap protocol for atelier
//!
//! Given a running machine, a runtime identity, and an ordered installer
//! list, the [`Bootstrapper`] injects the bootstrap binary and its generated
//! config into the machine over the exec channel, launches it detached, and
//! then observes completion purely through events pushed by the in-machine
//! agent over the out-of-band event bus - never by holding the exec channel
//! open or polling.
//!
//! Each `Bootstrapper` instance drives exactly one session; terminal
//! outcomes are `Done`, `Failed`, and `TimedOut`, mutually exclusive.

pub mod bootstrapper;
pub mod commands;
pub mod exec;
pub mod factory;
pub mod session;

pub use bootstrapper::Bootstrapper;
pub use exec::{ExecOutput, MachineExec};
pub use factory::BootstrapperFactory;
pub use session::{BootstrapSession, BootstrapStatus};
