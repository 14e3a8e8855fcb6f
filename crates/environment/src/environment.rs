//! The normalized environment model
//!
//! `InternalEnvironment` is built once by a factory and immutable afterwards.
//! The recipe-type-specific payload lives in [`EnvironmentKind`], a tagged
//! enum rather than a subclass hierarchy, so consumers match on it directly.

use atelier_errors::EnvironmentError;
use atelier_types::{Installer, MachineConfig, RecipeDescriptor, Warning};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parsed body of a compose recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposeRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub services: BTreeMap<String, ComposeService>,
}

/// One service entry of a compose recipe.
///
/// Only the fields the environment model needs are parsed; unknown keys are
/// ignored so authors can carry the rest of the compose vocabulary through
/// to the container platform untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposeService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<ComposeBuild>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expose: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

/// Build section of a compose service, either a bare context string or the
/// detailed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComposeBuild {
    Context(String),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dockerfile: Option<String>,
    },
}

/// Recipe-type-specific payload of an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EnvironmentKind {
    Compose(ComposeRecipe),
    Dockerfile { dockerfile: String },
    #[serde(rename = "dockerimage")]
    DockerImage { image: String },
}

impl EnvironmentKind {
    /// The image reference, for image-based environments.
    #[must_use]
    pub fn docker_image(&self) -> Option<&str> {
        match self {
            Self::DockerImage { image } => Some(image),
            _ => None,
        }
    }
}

/// The resolved, typed, machine-enumerated runtime definition of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalEnvironment {
    recipe: RecipeDescriptor,
    machines: BTreeMap<String, MachineConfig>,
    installers: BTreeMap<String, Vec<Installer>>,
    warnings: Vec<Warning>,
    kind: EnvironmentKind,
}

impl InternalEnvironment {
    /// Construct an environment, enforcing per-kind cardinality.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is [`EnvironmentKind::DockerImage`] and
    /// the machine map does not contain exactly one machine.
    pub fn new(
        recipe: RecipeDescriptor,
        machines: BTreeMap<String, MachineConfig>,
        installers: BTreeMap<String, Vec<Installer>>,
        warnings: Vec<Warning>,
        kind: EnvironmentKind,
    ) -> Result<Self, EnvironmentError> {
        if matches!(kind, EnvironmentKind::DockerImage { .. }) && machines.len() != 1 {
            return Err(EnvironmentError::ImageEnvironmentCardinality {
                found: machines.len(),
            });
        }
        Ok(Self {
            recipe,
            machines,
            installers,
            warnings,
            kind,
        })
    }

    #[must_use]
    pub fn recipe(&self) -> &RecipeDescriptor {
        &self.recipe
    }

    #[must_use]
    pub fn machines(&self) -> &BTreeMap<String, MachineConfig> {
        &self.machines
    }

    /// Dependency-ordered resolved installers for one machine.
    #[must_use]
    pub fn installers(&self, machine: &str) -> &[Installer] {
        self.installers.get(machine).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    #[must_use]
    pub fn kind(&self) -> &EnvironmentKind {
        &self.kind
    }
}
