//! Integration tests for environment construction

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use atelier_config::MemoryConfig;
    use atelier_environment::*;
    use atelier_errors::{EnvironmentError, Error, InfrastructureError};
    use atelier_types::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    /// Retriever that serves canned content; panics if asked for anything else.
    struct StubRetriever {
        body: String,
    }

    #[async_trait]
    impl RecipeRetriever for StubRetriever {
        async fn retrieve(&self, _location: &str) -> Result<String, InfrastructureError> {
            Ok(self.body.clone())
        }
    }

    /// Retriever for tests that must not perform any I/O.
    struct PanickingRetriever;

    #[async_trait]
    impl RecipeRetriever for PanickingRetriever {
        async fn retrieve(&self, location: &str) -> Result<String, InfrastructureError> {
            panic!("unexpected recipe fetch of {location}");
        }
    }

    /// Registry that knows a fixed set of installers; everything else is
    /// reported unresolved.
    #[derive(Default)]
    struct StubInstallerRegistry {
        known: BTreeMap<String, Installer>,
    }

    impl StubInstallerRegistry {
        fn with(mut self, installer: Installer) -> Self {
            self.known.insert(installer.id.clone(), installer);
            self
        }
    }

    #[async_trait]
    impl InstallerRegistry for StubInstallerRegistry {
        async fn resolve_ordered(
            &self,
            refs: &[InstallerRef],
        ) -> Result<InstallerResolution, InfrastructureError> {
            let mut resolution = InstallerResolution::default();
            for r in refs {
                match self.known.get(&r.id) {
                    Some(installer) => resolution.installers.push(installer.clone()),
                    None => resolution.unresolved.push(r.clone()),
                }
            }
            Ok(resolution)
        }
    }

    fn core(registry: StubInstallerRegistry) -> FactoryCore {
        FactoryCore::new(
            Arc::new(PanickingRetriever),
            Arc::new(registry),
            MemoryConfig::default(),
            None,
        )
    }

    fn one_machine(name: &str) -> BTreeMap<String, MachineConfig> {
        [(name.to_string(), MachineConfig::new())].into_iter().collect()
    }

    #[tokio::test]
    async fn docker_image_recipe_with_one_machine_succeeds() {
        let factory = DockerImageEnvironmentFactory::new(core(StubInstallerRegistry::default()));
        let recipe = RecipeDescriptor::from_location(RecipeType::DockerImage, "busybox:1.0");

        let env = factory.create(&recipe, one_machine("dev")).await.unwrap();

        assert_eq!(env.kind().docker_image(), Some("busybox:1.0"));
        assert_eq!(env.machines().len(), 1);
        assert!(env.machines().contains_key("dev"));
        assert_eq!(env.recipe().content.as_deref(), Some("busybox:1.0"));
        // Memory defaults were provisioned.
        assert_eq!(
            env.machines()["dev"].attribute(MEMORY_LIMIT_ATTRIBUTE),
            Some("2147483648")
        );
    }

    #[tokio::test]
    async fn docker_image_recipe_with_two_machines_fails() {
        let factory = DockerImageEnvironmentFactory::new(core(StubInstallerRegistry::default()));
        let recipe = RecipeDescriptor::from_location(RecipeType::DockerImage, "busybox:1.0");
        let mut machines = one_machine("dev");
        machines.insert("build".to_string(), MachineConfig::new());

        let err = factory.create(&recipe, machines).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Environment(EnvironmentError::ImageEnvironmentCardinality { found: 2 })
        ));
    }

    #[tokio::test]
    async fn docker_image_recipe_with_no_machines_fails() {
        let factory = DockerImageEnvironmentFactory::new(core(StubInstallerRegistry::default()));
        let recipe = RecipeDescriptor::from_content(RecipeType::DockerImage, "busybox:1.0");

        let err = factory.create(&recipe, BTreeMap::new()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Environment(EnvironmentError::ImageEnvironmentCardinality { found: 0 })
        ));
    }

    #[tokio::test]
    async fn type_mismatch_fails_before_any_io() {
        // PanickingRetriever proves no fetch happens before the type check.
        let factory = ComposeEnvironmentFactory::new(core(StubInstallerRegistry::default()));
        let recipe = RecipeDescriptor::from_location(RecipeType::DockerImage, "busybox:1.0");

        let err = factory.create(&recipe, one_machine("dev")).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Environment(EnvironmentError::RecipeTypeMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn compose_environment_end_to_end() {
        let yaml = "
services:
  dev:
    image: alpine:3.18
  db:
    image: postgres:16
";
        let terminal = Installer {
            id: "org.atelier.terminal".to_string(),
            version: "1.0.1".to_string(),
            script: "install-terminal.sh".to_string(),
            servers: [(
                "terminal".to_string(),
                ServerConfig::new("4411/tcp", "ws"),
            )]
            .into_iter()
            .collect(),
        };
        let registry = StubInstallerRegistry::default().with(terminal);

        let factory = ComposeEnvironmentFactory::new(FactoryCore::new(
            Arc::new(StubRetriever {
                body: yaml.to_string(),
            }),
            Arc::new(registry),
            MemoryConfig::default(),
            None,
        ));
        let recipe =
            RecipeDescriptor::from_location(RecipeType::Compose, "https://recipes/compose.yaml");

        let mut dev = MachineConfig::new();
        dev.add_installer(InstallerRef::id_only("org.atelier.terminal"));
        dev.add_installer(InstallerRef::id_only("org.atelier.missing"));
        let machines = [("dev".to_string(), dev)].into_iter().collect();

        let env = factory.create(&recipe, machines).await.unwrap();

        // Both services became machines, the unconfigured one with defaults.
        assert_eq!(env.machines().len(), 2);
        assert!(env.machines().contains_key("db"));

        // Resolved installer is carried in order; its server got merged.
        assert_eq!(env.installers("dev").len(), 1);
        assert_eq!(env.installers("dev")[0].id, "org.atelier.terminal");
        assert!(env.machines()["dev"].servers.contains_key("terminal"));

        // The unresolvable installer became a warning, not a failure.
        assert_eq!(env.warnings().len(), 1);
        assert_eq!(env.warnings()[0].code, UNRESOLVED_INSTALLER_WARNING_CODE);
        assert!(env.warnings()[0].message.contains("org.atelier.missing"));
    }

    #[tokio::test]
    async fn compose_rejects_machine_without_service() {
        let factory = ComposeEnvironmentFactory::new(FactoryCore::new(
            Arc::new(StubRetriever {
                body: "services:\n  dev:\n    image: alpine:3.18\n".to_string(),
            }),
            Arc::new(StubInstallerRegistry::default()),
            MemoryConfig::default(),
            None,
        ));
        let recipe =
            RecipeDescriptor::from_location(RecipeType::Compose, "https://recipes/compose.yaml");

        let err = factory
            .create(&recipe, one_machine("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Environment(EnvironmentError::UnknownMachine { .. })
        ));
    }

    #[tokio::test]
    async fn dockerfile_environment_accepts_many_machines() {
        let factory = DockerfileEnvironmentFactory::new(core(StubInstallerRegistry::default()));
        let recipe = RecipeDescriptor::from_content(RecipeType::Dockerfile, "FROM alpine:3.18\n");
        let mut machines = one_machine("dev");
        machines.insert("build".to_string(), MachineConfig::new());

        let env = factory.create(&recipe, machines).await.unwrap();
        assert_eq!(env.machines().len(), 2);
        match env.kind() {
            EnvironmentKind::Dockerfile { dockerfile } => {
                assert!(dockerfile.starts_with("FROM alpine"));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[tokio::test]
    async fn registry_routes_types_to_factories() {
        let mut registry = EnvironmentFactoryRegistry::new();
        registry.register(Arc::new(DockerImageEnvironmentFactory::new(core(
            StubInstallerRegistry::default(),
        ))));

        let factory = registry.get(RecipeType::DockerImage).unwrap();
        assert_eq!(factory.recipe_type(), RecipeType::DockerImage);
        assert!(registry.get(RecipeType::Compose).is_err());
    }

    mod http_retriever {
        use super::*;
        use httpmock::prelude::*;

        #[tokio::test]
        async fn fetches_recipe_body() {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method(GET).path("/recipe.yaml");
                then.status(200).body("services:\n  dev:\n    image: a\n");
            });

            let retriever = HttpRecipeRetriever::new();
            let body = retriever.retrieve(&server.url("/recipe.yaml")).await.unwrap();

            mock.assert();
            assert!(body.contains("dev"));
        }

        #[tokio::test]
        async fn non_success_status_is_an_infrastructure_error() {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method(GET).path("/missing.yaml");
                then.status(404);
            });

            let err = HttpRecipeRetriever::new()
                .retrieve(&server.url("/missing.yaml"))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                InfrastructureError::RecipeFetchStatus { status: 404, .. }
            ));
        }
    }
}
