//! Compose environment factory

use super::{EnvironmentFactory, FactoryCore};
use crate::environment::{ComposeRecipe, EnvironmentKind, InternalEnvironment};
use async_trait::async_trait;
use atelier_errors::{EnvironmentError, Error};
use atelier_types::{MachineConfig, RecipeDescriptor, RecipeType};
use std::collections::BTreeMap;

/// Factory for `compose` recipes.
///
/// Machines are enumerated from the compose services; requested machine
/// configs merge onto their matching service. A requested machine with no
/// matching service fails validation rather than being dropped.
pub struct ComposeEnvironmentFactory {
    core: FactoryCore,
}

impl ComposeEnvironmentFactory {
    #[must_use]
    pub fn new(core: FactoryCore) -> Self {
        Self { core }
    }
}

#[async_trait]
impl EnvironmentFactory for ComposeEnvironmentFactory {
    fn recipe_type(&self) -> RecipeType {
        RecipeType::Compose
    }

    async fn create(
        &self,
        recipe: &RecipeDescriptor,
        mut machines: BTreeMap<String, MachineConfig>,
    ) -> Result<InternalEnvironment, Error> {
        self.core.check_type(RecipeType::Compose, recipe)?;
        let recipe = self.core.resolve_content(recipe).await?;
        let content = recipe
            .content
            .as_deref()
            .ok_or(EnvironmentError::UnresolvedRecipe)?;

        let compose: ComposeRecipe =
            serde_yml::from_str(content).map_err(|e| EnvironmentError::MalformedRecipe {
                message: e.to_string(),
            })?;
        if compose.services.is_empty() {
            return Err(EnvironmentError::MalformedRecipe {
                message: "compose recipe declares no services".to_string(),
            }
            .into());
        }

        for name in machines.keys() {
            if !compose.services.contains_key(name) {
                return Err(EnvironmentError::UnknownMachine {
                    machine: name.clone(),
                }
                .into());
            }
        }

        let machines = compose
            .services
            .keys()
            .map(|service| {
                let config = machines.remove(service).unwrap_or_default();
                (service.clone(), config)
            })
            .collect();

        self.core
            .finish(recipe, EnvironmentKind::Compose(compose), machines, vec![])
            .await
    }
}
