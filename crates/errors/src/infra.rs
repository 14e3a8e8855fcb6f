//! Infrastructure error types
//!
//! Transient failures of downstream collaborators. Retry policy belongs to
//! the external workspace-start controller, not to this core.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum InfrastructureError {
    #[error("recipe fetch failed from {location}: {message}")]
    RecipeFetchFailed { location: String, message: String },

    #[error("HTTP error {status} fetching {location}")]
    RecipeFetchStatus { location: String, status: u16 },

    #[error("installer registry unavailable: {message}")]
    InstallerRegistryUnavailable { message: String },

    #[error("exec channel unavailable for machine '{machine}': {message}")]
    ExecUnavailable { machine: String, message: String },
}
