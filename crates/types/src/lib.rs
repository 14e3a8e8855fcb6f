#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the atelier workspace runtime
//!
//! This crate provides the value types shared across the system: recipe
//! descriptors, machine and server configurations, installer descriptors,
//! and the runtime identity that correlates a running environment with its
//! event streams.

pub mod identity;
pub mod installer;
pub mod machine;
pub mod recipe;

// Re-export commonly used types
pub use identity::{InvalidRuntimeIdentity, RuntimeIdentity};
pub use installer::{Installer, InstallerRef, InvalidInstallerRef};
pub use machine::{
    MachineConfig, ServerConfig, CPU_LIMIT_ATTRIBUTE, CPU_REQUEST_ATTRIBUTE,
    MEMORY_LIMIT_ATTRIBUTE, MEMORY_REQUEST_ATTRIBUTE, WS_AGENT_HTTP_SERVER, WS_AGENT_INSTALLER,
};
pub use recipe::{RecipeDescriptor, RecipeType, UnknownRecipeType};

use serde::{Deserialize, Serialize};

/// Warning code attached when an installer reference could not be resolved.
pub const UNRESOLVED_INSTALLER_WARNING_CODE: u32 = 4100;

/// Non-fatal finding accumulated during environment construction.
///
/// Warnings are returned to the caller alongside the constructed environment;
/// they never fail construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: u32,
    pub message: String,
}

impl Warning {
    /// Create a new warning with the given code and message.
    #[must_use]
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
