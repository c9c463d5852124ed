// Container runtime abstraction
#![allow(dead_code)]

use crate::sandbox::config::ResourceLimits;
use crate::sandbox::error::Result;
use async_trait::async_trait;

/// Everything needed to create one single-use container
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    /// Unique container name
    pub name: String,
    pub image: String,
    pub command: Vec<String>,
    /// Bind mounts in `host:container[:ro]` form
    pub binds: Vec<String>,
    pub working_dir: String,
    pub limits: ResourceLimits,
    pub network_enabled: bool,
    /// Size of the writable /tmp tmpfs
    pub tmpfs_size: String,
}

/// Exit status and demultiplexed output of a finished container
#[derive(Debug, Clone, Default)]
pub struct ContainerExit {
    pub status_code: i64,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Container runtime client, shared by all concurrent executions
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Check that the runtime answers
    async fn ping(&self) -> Result<()>;

    /// Whether an image is present locally
    async fn image_exists(&self, image: &str) -> Result<bool>;

    /// Build and tag an image from a single Dockerfile with an empty context
    async fn build_image(&self, image: &str, dockerfile: &[u8]) -> Result<()>;

    /// Create (but do not start) a container
    async fn create(&self, spec: &ContainerSpec) -> Result<()>;

    /// Start a created container, capture its output and wait for it to exit
    async fn run(&self, name: &str, max_output_bytes: usize) -> Result<ContainerExit>;

    /// Force-remove a container; removing a missing container is not an error
    async fn remove(&self, name: &str) -> Result<()>;
}
