//! Environment validation error types
//!
//! All of these are fatal: they are surfaced to the caller before any machine
//! is touched and are never retried automatically.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum EnvironmentError {
    #[error("recipe type mismatch: factory for '{expected}' got '{actual}'")]
    RecipeTypeMismatch { expected: String, actual: String },

    #[error("malformed recipe: {message}")]
    MalformedRecipe { message: String },

    #[error("recipe has neither content nor location")]
    UnresolvedRecipe,

    #[error("recipe of type '{recipe_type}' must contain an image")]
    MissingImage { recipe_type: String },

    #[error("environment contains a machine with an empty name")]
    UnnamedMachine,

    #[error("invalid machine name: {name:?}")]
    InvalidMachineName { name: String },

    #[error("machine '{machine}' declares server '{server}' both directly and via installer '{installer}'")]
    ServerConflict {
        machine: String,
        server: String,
        installer: String,
    },

    #[error("image-based environment must contain exactly one machine, found {found}")]
    ImageEnvironmentCardinality { found: usize },

    #[error("machine '{machine}' is not declared by the recipe")]
    UnknownMachine { machine: String },

    #[error("ws-agent server is declared by multiple machines: {machines}")]
    MultipleWsAgentMachines { machines: String },
}
