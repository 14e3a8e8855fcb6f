#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the atelier workspace runtime
//!
//! This crate provides fine-grained error types organized by domain. The
//! taxonomy mirrors the retry contract of the system: environment errors are
//! fatal and never retried, infrastructure errors are transient and may be
//! retried by the external workspace-start controller, bootstrap errors are
//! per-machine terminal outcomes.

use thiserror::Error;

pub mod bootstrap;
pub mod config;
pub mod environment;
pub mod infra;

// Re-export all error types at the root
pub use bootstrap::{BootstrapError, InjectionPhase};
pub use config::ConfigError;
pub use environment::EnvironmentError;
pub use infra::InfrastructureError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("environment error: {0}")]
    Environment(#[from] EnvironmentError),

    #[error("infrastructure error: {0}")]
    Infrastructure(#[from] InfrastructureError),

    #[error("bootstrap error: {0}")]
    Bootstrap(#[from] BootstrapError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create an internal error from any displayable value.
    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self::Internal(message.to_string())
    }

    /// Whether a retry by the external controller may succeed.
    ///
    /// Only infrastructure errors are retryable; validation and bootstrap
    /// outcomes are final.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Infrastructure(_))
    }
}
