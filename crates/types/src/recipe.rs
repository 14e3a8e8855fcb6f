//! Recipe descriptors
//!
//! A recipe is the declarative description of how a workspace environment is
//! constructed: a compose file, a Dockerfile, or a bare image reference. The
//! descriptor carries either inline `content` or a remote `location`; the
//! environment factories resolve `location` into `content` before use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Recipe types recognized by the environment factory registry.
///
/// The wire string selects exactly one factory; unknown strings are rejected
/// at the registry, not silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeType {
    Compose,
    Dockerfile,
    #[serde(rename = "dockerimage")]
    DockerImage,
}

impl RecipeType {
    /// Wire string for this recipe type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compose => "compose",
            Self::Dockerfile => "dockerfile",
            Self::DockerImage => "dockerimage",
        }
    }
}

impl fmt::Display for RecipeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a recipe type string is not recognized.
#[derive(Debug, Clone, Error)]
#[error("unknown recipe type: {0}")]
pub struct UnknownRecipeType(pub String);

impl FromStr for RecipeType {
    type Err = UnknownRecipeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compose" => Ok(Self::Compose),
            "dockerfile" => Ok(Self::Dockerfile),
            "dockerimage" => Ok(Self::DockerImage),
            other => Err(UnknownRecipeType(other.to_string())),
        }
    }
}

/// A parsed workspace recipe.
///
/// Invariant: exactly one of `content`/`location` is resolved before a
/// factory consumes the descriptor. Factories substitute a fetched body into
/// `content`; the docker-image factory copies `location` verbatim instead
/// (an image reference is its own content, no fetch required).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDescriptor {
    #[serde(rename = "type")]
    pub type_of: RecipeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl RecipeDescriptor {
    /// Create a descriptor with inline content.
    #[must_use]
    pub fn from_content(type_of: RecipeType, content: impl Into<String>) -> Self {
        Self {
            type_of,
            content: Some(content.into()),
            location: None,
        }
    }

    /// Create a descriptor pointing at a remote location.
    #[must_use]
    pub fn from_location(type_of: RecipeType, location: impl Into<String>) -> Self {
        Self {
            type_of,
            content: None,
            location: Some(location.into()),
        }
    }

    /// Whether the recipe body has been resolved into `content`.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.content.is_some()
    }

    /// Return a copy of this descriptor with the resolved body substituted
    /// into `content`, keeping `location` for provenance.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}
