//! Dockerfile environment factory

use super::{EnvironmentFactory, FactoryCore};
use crate::environment::{EnvironmentKind, InternalEnvironment};
use async_trait::async_trait;
use atelier_errors::{EnvironmentError, Error};
use atelier_types::{MachineConfig, RecipeDescriptor, RecipeType};
use std::collections::BTreeMap;

/// Factory for `dockerfile` recipes.
///
/// The recipe body is the Dockerfile itself; machines come from the caller's
/// machine configs, as many as declared.
pub struct DockerfileEnvironmentFactory {
    core: FactoryCore,
}

impl DockerfileEnvironmentFactory {
    #[must_use]
    pub fn new(core: FactoryCore) -> Self {
        Self { core }
    }
}

#[async_trait]
impl EnvironmentFactory for DockerfileEnvironmentFactory {
    fn recipe_type(&self) -> RecipeType {
        RecipeType::Dockerfile
    }

    async fn create(
        &self,
        recipe: &RecipeDescriptor,
        machines: BTreeMap<String, MachineConfig>,
    ) -> Result<InternalEnvironment, Error> {
        self.core.check_type(RecipeType::Dockerfile, recipe)?;
        let recipe = self.core.resolve_content(recipe).await?;
        let dockerfile = recipe
            .content
            .as_deref()
            .ok_or(EnvironmentError::UnresolvedRecipe)?;
        if dockerfile.trim().is_empty() {
            return Err(EnvironmentError::MalformedRecipe {
                message: "dockerfile recipe has an empty body".to_string(),
            }
            .into());
        }

        let kind = EnvironmentKind::Dockerfile {
            dockerfile: dockerfile.to_string(),
        };
        self.core.finish(recipe, kind, machines, vec![]).await
    }
}
