#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Environment construction for atelier
//!
//! This crate turns a declarative workspace recipe (compose file, Dockerfile,
//! or bare image reference) into a normalized [`InternalEnvironment`]: the
//! typed, machine-enumerated runtime definition the workspace controller
//! starts machines from.
//!
//! One factory exists per recipe type, selected through an explicit
//! [`EnvironmentFactoryRegistry`] built at process start. Factories share a
//! common pipeline: resolve the recipe body, enumerate machines, validate
//! structurally, resolve installers (unresolvable ones become warnings, not
//! failures), merge installer servers, and fill default resource attributes.

pub mod environment;
pub mod factory;
pub mod provisioner;
pub mod registry;
pub mod retriever;
pub mod validator;
pub mod ws_agent;

pub use environment::{
    ComposeBuild, ComposeRecipe, ComposeService, EnvironmentKind, InternalEnvironment,
};
pub use factory::{
    ComposeEnvironmentFactory, DockerImageEnvironmentFactory, DockerfileEnvironmentFactory,
    EnvironmentFactory, FactoryCore,
};
pub use provisioner::MemoryAttributeProvisioner;
pub use registry::{
    EnvironmentFactoryRegistry, InstallerRegistry, InstallerResolution,
};
pub use retriever::{HttpRecipeRetriever, RecipeRetriever};
pub use validator::MachineConfigsValidator;
pub use ws_agent::{contains_ws_agent, find_ws_agent_server_machine};
