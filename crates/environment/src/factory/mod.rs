//! Environment factories
//!
//! One factory per recipe type, all sharing the [`FactoryCore`] pipeline:
//! type check, recipe body resolution, structural validation, installer
//! resolution (unresolvable references become warnings), installer server
//! merging, and default resource provisioning.

mod compose;
mod docker_image;
mod dockerfile;

pub use compose::ComposeEnvironmentFactory;
pub use docker_image::DockerImageEnvironmentFactory;
pub use dockerfile::DockerfileEnvironmentFactory;

use crate::environment::{EnvironmentKind, InternalEnvironment};
use crate::provisioner::MemoryAttributeProvisioner;
use crate::registry::InstallerRegistry;
use crate::retriever::RecipeRetriever;
use crate::validator::MachineConfigsValidator;
use async_trait::async_trait;
use atelier_config::MemoryConfig;
use atelier_errors::{EnvironmentError, Error};
use atelier_events::{AppEvent, EnvironmentEvent, EventEmitter, EventSender};
use atelier_types::{
    MachineConfig, RecipeDescriptor, RecipeType, Warning, UNRESOLVED_INSTALLER_WARNING_CODE,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Turns `(recipe, requested machine configs)` into a typed environment.
#[async_trait]
pub trait EnvironmentFactory: Send + Sync {
    /// The recipe type this factory accepts.
    fn recipe_type(&self) -> RecipeType;

    /// Create an environment from a recipe and the caller's machine configs.
    ///
    /// # Errors
    ///
    /// Returns an [`EnvironmentError`] for validation failures (type
    /// mismatch, malformed body, cardinality violations) and an
    /// [`atelier_errors::InfrastructureError`] for transient downstream
    /// failures (recipe fetch, installer registry lookup).
    async fn create(
        &self,
        recipe: &RecipeDescriptor,
        machines: BTreeMap<String, MachineConfig>,
    ) -> Result<InternalEnvironment, Error>;
}

/// Shared pipeline state of all factories.
pub struct FactoryCore {
    retriever: Arc<dyn RecipeRetriever>,
    installers: Arc<dyn InstallerRegistry>,
    validator: MachineConfigsValidator,
    provisioner: MemoryAttributeProvisioner,
    events: Option<EventSender>,
}

impl EventEmitter for FactoryCore {
    fn event_sender(&self) -> Option<&EventSender> {
        self.events.as_ref()
    }
}

impl FactoryCore {
    #[must_use]
    pub fn new(
        retriever: Arc<dyn RecipeRetriever>,
        installers: Arc<dyn InstallerRegistry>,
        memory: MemoryConfig,
        events: Option<EventSender>,
    ) -> Self {
        Self {
            retriever,
            installers,
            validator: MachineConfigsValidator::new(),
            provisioner: MemoryAttributeProvisioner::new(memory),
            events,
        }
    }

    /// Reject recipes whose type does not match the factory. Runs before any
    /// external I/O.
    pub(crate) fn check_type(
        &self,
        expected: RecipeType,
        recipe: &RecipeDescriptor,
    ) -> Result<(), EnvironmentError> {
        if recipe.type_of == expected {
            Ok(())
        } else {
            Err(EnvironmentError::RecipeTypeMismatch {
                expected: expected.to_string(),
                actual: recipe.type_of.to_string(),
            })
        }
    }

    /// Resolve the recipe body into `content`, fetching `location` if needed.
    pub(crate) async fn resolve_content(
        &self,
        recipe: &RecipeDescriptor,
    ) -> Result<RecipeDescriptor, Error> {
        if recipe.is_resolved() {
            return Ok(recipe.clone());
        }
        match &recipe.location {
            Some(location) => {
                let body = self.retriever.retrieve(location).await?;
                Ok(recipe.clone().with_content(body))
            }
            None => Err(EnvironmentError::UnresolvedRecipe.into()),
        }
    }

    /// Run the generic tail of the pipeline and freeze the environment.
    pub(crate) async fn finish(
        &self,
        recipe: RecipeDescriptor,
        kind: EnvironmentKind,
        mut machines: BTreeMap<String, MachineConfig>,
        mut warnings: Vec<Warning>,
    ) -> Result<InternalEnvironment, Error> {
        self.validator.validate_names(&machines)?;

        let mut resolved = BTreeMap::new();
        for (name, machine) in &mut machines {
            let resolution = self.installers.resolve_ordered(&machine.installers).await?;

            for missed in &resolution.unresolved {
                warnings.push(Warning::new(
                    UNRESOLVED_INSTALLER_WARNING_CODE,
                    format!("installer '{missed}' of machine '{name}' could not be resolved"),
                ));
                self.emit(AppEvent::Environment(EnvironmentEvent::InstallerSkipped {
                    machine: name.clone(),
                    installer: missed.to_string(),
                    reason: "not found in installer registry".to_string(),
                }));
            }

            self.validator
                .validate_servers(name, machine, &resolution.installers)?;
            for installer in &resolution.installers {
                for (server_name, server) in &installer.servers {
                    machine.add_server(server_name.clone(), server.clone());
                }
            }

            let memory_limit_bytes = self.provisioner.provision(machine);
            self.emit(AppEvent::Environment(EnvironmentEvent::MemoryProvisioned {
                machine: name.clone(),
                memory_limit_bytes,
            }));

            resolved.insert(name.clone(), resolution.installers);
        }

        self.emit(AppEvent::Environment(EnvironmentEvent::Validated {
            recipe_type: recipe.type_of.to_string(),
            machines: machines.len(),
        }));

        let env = InternalEnvironment::new(recipe, machines, resolved, warnings, kind)?;
        Ok(env)
    }
}
