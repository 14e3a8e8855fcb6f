//! Runtime identity
//!
//! The `(workspaceId, envName, ownerId)` triple is the stable key that
//! correlates a running environment instance with its log and event channels.
//! Its composite wire form `workspaceId:envName:ownerId` is passed verbatim
//! to the in-machine bootstrap agent, which echoes it back in every event.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identity of one running environment instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeIdentity {
    pub workspace_id: String,
    pub env_name: String,
    pub owner_id: String,
}

/// Error returned when a composite runtime id string is malformed.
#[derive(Debug, Clone, Error)]
#[error("invalid runtime identity: {0:?}")]
pub struct InvalidRuntimeIdentity(pub String);

impl RuntimeIdentity {
    /// Create a new runtime identity.
    #[must_use]
    pub fn new(
        workspace_id: impl Into<String>,
        env_name: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            env_name: env_name.into(),
            owner_id: owner_id.into(),
        }
    }
}

impl fmt::Display for RuntimeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.workspace_id, self.env_name, self.owner_id)
    }
}

impl FromStr for RuntimeIdentity {
    type Err = InvalidRuntimeIdentity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(ws), Some(env), Some(owner), None)
                if !ws.is_empty() && !env.is_empty() && !owner.is_empty() =>
            {
                Ok(Self::new(ws, env, owner))
            }
            _ => Err(InvalidRuntimeIdentity(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_form_round_trips() {
        let id = RuntimeIdentity::new("workspace123", "default", "user42");
        assert_eq!(id.to_string(), "workspace123:default:user42");
        assert_eq!("workspace123:default:user42".parse::<RuntimeIdentity>().unwrap(), id);
    }

    #[test]
    fn malformed_composites_are_rejected() {
        for s in ["", "a:b", "a:b:c:d", "a::c"] {
            assert!(s.parse::<RuntimeIdentity>().is_err(), "{s:?} should fail");
        }
    }
}
