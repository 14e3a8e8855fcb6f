//! Recipe retrieval
//!
//! Factories resolve a recipe `location` into `content` through this seam.
//! The HTTP implementation is provided; other schemes belong to the
//! embedding infrastructure.

use async_trait::async_trait;
use atelier_errors::InfrastructureError;

/// Fetches a recipe body from a remote location.
#[async_trait]
pub trait RecipeRetriever: Send + Sync {
    /// Fetch the recipe body at `location`.
    ///
    /// # Errors
    ///
    /// Returns an infrastructure error when the location is unreachable or
    /// responds with a non-success status. These are transient by contract;
    /// the external workspace-start controller owns the retry policy.
    async fn retrieve(&self, location: &str) -> Result<String, InfrastructureError>;
}

/// HTTP(S) recipe retriever.
#[derive(Debug, Clone, Default)]
pub struct HttpRecipeRetriever {
    client: reqwest::Client,
}

impl HttpRecipeRetriever {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeRetriever for HttpRecipeRetriever {
    async fn retrieve(&self, location: &str) -> Result<String, InfrastructureError> {
        tracing::debug!(location, "fetching recipe");
        let response = self.client.get(location).send().await.map_err(|e| {
            InfrastructureError::RecipeFetchFailed {
                location: location.to_string(),
                message: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(InfrastructureError::RecipeFetchStatus {
                location: location.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| InfrastructureError::RecipeFetchFailed {
                location: location.to_string(),
                message: e.to_string(),
            })
    }
}
