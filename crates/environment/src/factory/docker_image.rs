//! Docker-image environment factory

use super::{EnvironmentFactory, FactoryCore};
use crate::environment::{EnvironmentKind, InternalEnvironment};
use async_trait::async_trait;
use atelier_errors::{EnvironmentError, Error};
use atelier_types::{MachineConfig, RecipeDescriptor, RecipeType};
use std::collections::BTreeMap;

/// Factory for `dockerimage` recipes.
///
/// A bare image reference is its own content: `location` is copied verbatim
/// into `content` instead of being fetched. Image-based environments carry
/// exactly one machine; any other cardinality fails construction.
pub struct DockerImageEnvironmentFactory {
    core: FactoryCore,
}

impl DockerImageEnvironmentFactory {
    #[must_use]
    pub fn new(core: FactoryCore) -> Self {
        Self { core }
    }
}

#[async_trait]
impl EnvironmentFactory for DockerImageEnvironmentFactory {
    fn recipe_type(&self) -> RecipeType {
        RecipeType::DockerImage
    }

    async fn create(
        &self,
        recipe: &RecipeDescriptor,
        machines: BTreeMap<String, MachineConfig>,
    ) -> Result<InternalEnvironment, Error> {
        self.core.check_type(RecipeType::DockerImage, recipe)?;

        // No network fetch for an image reference.
        let recipe = match (&recipe.content, &recipe.location) {
            (Some(_), _) => recipe.clone(),
            (None, Some(location)) => recipe.clone().with_content(location.clone()),
            (None, None) => return Err(EnvironmentError::UnresolvedRecipe.into()),
        };

        let image = recipe
            .content
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string();
        if image.is_empty() {
            return Err(EnvironmentError::MissingImage {
                recipe_type: RecipeType::DockerImage.to_string(),
            }
            .into());
        }

        let kind = EnvironmentKind::DockerImage { image };
        self.core.finish(recipe, kind, machines, vec![]).await
    }
}
