//! Installer descriptors
//!
//! Installers are units of software (agents, language servers, terminals)
//! provisioned into a machine by the bootstrap agent. The registry that
//! resolves references into full descriptors lives outside this system; the
//! bootstrapper treats resolved installers as opaque, order-preserving data.

use crate::machine::ServerConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reference to an installer, `id` or `id:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct InstallerRef {
    pub id: String,
    pub version: Option<String>,
}

/// Error returned for malformed installer references.
#[derive(Debug, Clone, Error)]
#[error("invalid installer reference: {0:?}")]
pub struct InvalidInstallerRef(pub String);

impl InstallerRef {
    /// Parse an installer reference from its wire form.
    ///
    /// # Errors
    ///
    /// Returns an error if the id segment is empty.
    pub fn parse(s: &str) -> Result<Self, InvalidInstallerRef> {
        let (id, version) = match s.split_once(':') {
            Some((id, version)) => (id, Some(version.to_string())),
            None => (s, None),
        };
        if id.is_empty() {
            return Err(InvalidInstallerRef(s.to_string()));
        }
        Ok(Self {
            id: id.to_string(),
            version,
        })
    }

    /// Reference to a bare installer id with no version pin.
    #[must_use]
    pub fn id_only(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
        }
    }
}

impl fmt::Display for InstallerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{version}", self.id),
            None => f.write_str(&self.id),
        }
    }
}

impl FromStr for InstallerRef {
    type Err = InvalidInstallerRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<InstallerRef> for String {
    fn from(r: InstallerRef) -> Self {
        r.to_string()
    }
}

impl TryFrom<String> for InstallerRef {
    type Error = InvalidInstallerRef;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

/// A resolved installer descriptor.
///
/// Serialized verbatim into the bootstrap config file; the field order and
/// content must survive the trip to the in-machine agent unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installer {
    pub id: String,
    pub version: String,
    pub script: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub servers: BTreeMap<String, ServerConfig>,
}

impl Installer {
    /// Whether this installer declares the given server reference.
    #[must_use]
    pub fn declares_server(&self, server_ref: &str) -> bool {
        self.servers.contains_key(server_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installer_ref_parses_both_forms() {
        let bare = InstallerRef::parse("org.atelier.terminal").unwrap();
        assert_eq!(bare.id, "org.atelier.terminal");
        assert_eq!(bare.version, None);

        let pinned = InstallerRef::parse("org.atelier.terminal:1.0.1").unwrap();
        assert_eq!(pinned.version.as_deref(), Some("1.0.1"));
        assert_eq!(pinned.to_string(), "org.atelier.terminal:1.0.1");
    }

    #[test]
    fn empty_id_is_rejected() {
        assert!(InstallerRef::parse("").is_err());
        assert!(InstallerRef::parse(":1.0.0").is_err());
    }

    #[test]
    fn installer_ref_serializes_as_wire_string() {
        let r = InstallerRef::parse("a:1").unwrap();
        assert_eq!(serde_json::to_string(&r).unwrap(), r#""a:1""#);
        let back: InstallerRef = serde_json::from_str(r#""a:1""#).unwrap();
        assert_eq!(back, r);
    }
}
