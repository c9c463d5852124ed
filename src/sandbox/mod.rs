// Sandbox module - isolated, resource-capped program execution
#![allow(dead_code, unused_imports)]

pub mod config;
pub mod demux;
pub mod docker;
pub mod error;
pub mod executor;
pub mod plan;
pub mod runtime;
pub mod types;

pub use config::{ResourceLimits, SandboxConfig};
pub use docker::DockerRuntime;
pub use error::{ConfigError, Result, SandboxError};
pub use executor::Sandbox;
pub use plan::ExecutionPlan;
pub use runtime::{ContainerExit, ContainerRuntime, ContainerSpec};
pub use types::{ExecutionRequest, SandboxResult};
