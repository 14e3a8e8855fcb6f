//! Registries: recipe type → factory, and the installer registry seam
//!
//! Both are plain explicit tables or traits, constructed once at process
//! start and read-only afterwards. No runtime plugin discovery.

use crate::factory::EnvironmentFactory;
use async_trait::async_trait;
use atelier_errors::{Error, InfrastructureError};
use atelier_types::{Installer, InstallerRef, RecipeType};
use std::collections::HashMap;
use std::sync::Arc;

/// Result of resolving a machine's installer references.
#[derive(Debug, Clone, Default)]
pub struct InstallerResolution {
    /// Resolved installers in dependency order, transitive dependencies
    /// expanded.
    pub installers: Vec<Installer>,
    /// References that could not be resolved; demoted to warnings by the
    /// factories.
    pub unresolved: Vec<InstallerRef>,
}

/// External installer registry: resolves references into descriptors and
/// establishes dependency order.
#[async_trait]
pub trait InstallerRegistry: Send + Sync {
    /// Resolve the given references, expanding transitive dependencies and
    /// ordering the result.
    ///
    /// # Errors
    ///
    /// Returns an infrastructure error when the registry itself is
    /// unreachable. A reference that merely does not exist is reported in
    /// [`InstallerResolution::unresolved`] instead.
    async fn resolve_ordered(
        &self,
        refs: &[InstallerRef],
    ) -> Result<InstallerResolution, InfrastructureError>;
}

/// Explicit registration table mapping recipe types to factories.
///
/// A type string selects exactly one factory; unknown types fail at lookup.
#[derive(Default)]
pub struct EnvironmentFactoryRegistry {
    factories: HashMap<RecipeType, Arc<dyn EnvironmentFactory>>,
}

impl EnvironmentFactoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its declared recipe type, replacing any
    /// previous registration for that type.
    pub fn register(&mut self, factory: Arc<dyn EnvironmentFactory>) {
        self.factories.insert(factory.recipe_type(), factory);
    }

    /// Look up the factory for a recipe type.
    ///
    /// # Errors
    ///
    /// Returns an error if no factory is registered for the type.
    pub fn get(&self, recipe_type: RecipeType) -> Result<Arc<dyn EnvironmentFactory>, Error> {
        self.factories
            .get(&recipe_type)
            .cloned()
            .ok_or_else(|| Error::internal(format!("no factory registered for recipe type '{recipe_type}'")))
    }
}

impl std::fmt::Debug for EnvironmentFactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentFactoryRegistry")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
