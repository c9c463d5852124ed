// Sandbox executor: one isolated, single-use container per run

use crate::sandbox::config::SandboxConfig;
use crate::sandbox::error::{Result, SandboxError};
use crate::sandbox::plan::{APP_DIR, ExecutionPlan, PreparedRun};
use crate::sandbox::runtime::{ContainerRuntime, ContainerSpec};
use crate::sandbox::types::{ExecutionRequest, SandboxResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Runs untrusted programs through an injected container runtime
#[derive(Clone)]
pub struct Sandbox {
    runtime: Arc<dyn ContainerRuntime>,
    config: Arc<SandboxConfig>,
}

impl Sandbox {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, config: SandboxConfig) -> Self {
        debug!(
            timeout_ms = config.timeout_ms(),
            memory_bytes = config.limits.memory_bytes,
            nano_cpus = config.limits.nano_cpus,
            pids = config.limits.pids,
            network_enabled = config.network_enabled,
            "initializing sandbox"
        );
        Self {
            runtime,
            config: Arc::new(config),
        }
    }

    /// Check that the container runtime is reachable
    pub async fn ping(&self) -> Result<()> {
        self.runtime.ping().await
    }

    /// Reject sources over the size limit before anything is created
    pub fn validate(&self, source: &str) -> Result<()> {
        if source.len() > self.config.max_code_size {
            return Err(SandboxError::CodeTooLarge {
                size: source.len(),
                limit: self.config.max_code_size,
            });
        }
        Ok(())
    }

    /// Build every configured image the runtime does not have from its
    /// Dockerfile. Returns how many images are still missing afterwards.
    pub async fn ensure_images(&self) -> Result<usize> {
        let mut missing = 0;
        for (language, image) in &self.config.images {
            if self.runtime.image_exists(image).await? {
                debug!(%language, image = %image, "runner image present");
                continue;
            }

            let path = self.config.dockerfile_for(*language);
            let dockerfile = match tokio::fs::read(&path).await {
                Ok(dockerfile) => dockerfile,
                Err(e) => {
                    missing += 1;
                    warn!(
                        %language,
                        image = %image,
                        path = %path.display(),
                        error = %e,
                        "runner image missing and no Dockerfile to build it"
                    );
                    continue;
                }
            };

            if let Err(e) = self.runtime.build_image(image, &dockerfile).await {
                missing += 1;
                warn!(%language, image = %image, error = %e, "runner image build failed");
            }
        }
        Ok(missing)
    }

    /// Run one program to completion or timeout.
    ///
    /// Infrastructure failures come back as `SandboxResult::error`; `Err` is
    /// reserved for oversized sources and scratch-space IO failures. The
    /// container and the scratch directory are released on every path.
    pub async fn execute(&self, request: &ExecutionRequest) -> Result<SandboxResult> {
        self.validate(&request.source)?;

        let execution_id = Uuid::new_v4();
        let name = format!("{}{}", self.config.container_prefix, execution_id);
        let scratch = self
            .config
            .scratch_dir
            .join(format!("codegrade-{execution_id}"));

        let plan = ExecutionPlan::select(request.language, &request.source);
        let prepared = plan.prepare(&request.source, &request.stdin);

        debug!(
            container = %name,
            language = %request.language,
            source_bytes = request.source.len(),
            stdin_bytes = request.stdin.len(),
            "preparing execution"
        );

        let binds = match write_scratch(&scratch, &prepared).await {
            Ok(binds) => binds,
            Err(e) => {
                remove_scratch(&scratch).await;
                return Err(e);
            }
        };

        let result = self.run_container(&name, request, &prepared, binds).await;
        self.release(&name, &scratch).await;

        info!(
            container = %name,
            language = %request.language,
            exit_code = result.exit_code,
            duration_ms = result.duration_ms,
            error = ?result.error,
            "execution finished"
        );
        Ok(result)
    }

    async fn run_container(
        &self,
        name: &str,
        request: &ExecutionRequest,
        prepared: &PreparedRun,
        binds: Vec<String>,
    ) -> SandboxResult {
        let spec = ContainerSpec {
            name: name.to_string(),
            image: self.config.image_for(request.language),
            command: prepared.command.clone(),
            binds,
            working_dir: APP_DIR.to_string(),
            limits: self.config.limits.clone(),
            network_enabled: self.config.network_enabled,
            tmpfs_size: self.config.tmpfs_size.clone(),
        };

        let start = Instant::now();

        if let Err(e) = self.runtime.create(&spec).await {
            warn!(container = %name, error = %e, "container setup failed");
            return SandboxResult::infra_error(e.to_string(), elapsed_ms(start));
        }

        // First to settle wins; the losing run is dropped and the container
        // is force-removed by the caller
        let run = self.runtime.run(name, self.config.max_output_bytes);
        match timeout(self.config.limits.timeout, run).await {
            Ok(Ok(exit)) => SandboxResult::completed(
                &exit.stdout,
                &exit.stderr,
                exit.status_code,
                elapsed_ms(start),
            ),
            Ok(Err(e)) => {
                warn!(container = %name, error = %e, "container run failed");
                SandboxResult::infra_error(e.to_string(), elapsed_ms(start))
            }
            Err(_) => {
                let timeout_ms = self.config.timeout_ms();
                warn!(container = %name, timeout_ms, "execution timed out");
                SandboxResult::infra_error(
                    format!("Execution timed out after {timeout_ms}ms"),
                    elapsed_ms(start),
                )
            }
        }
    }

    /// Remove the container and scratch space; failures are only logged
    async fn release(&self, name: &str, scratch: &Path) {
        if let Err(e) = self.runtime.remove(name).await {
            warn!(container = %name, error = %e, "container cleanup failed");
        } else {
            debug!(container = %name, "container removed");
        }
        remove_scratch(scratch).await;
    }
}

/// Write the plan's files and return their read-only bind specs
async fn write_scratch(scratch: &Path, prepared: &PreparedRun) -> Result<Vec<String>> {
    tokio::fs::create_dir_all(scratch).await?;

    let mut binds = Vec::with_capacity(prepared.files.len());
    for file in &prepared.files {
        let host_path: PathBuf = scratch.join(&file.name);
        tokio::fs::write(&host_path, &file.contents).await?;
        binds.push(format!(
            "{}:{}/{}:ro",
            host_path.display(),
            APP_DIR,
            file.name
        ));
    }
    Ok(binds)
}

async fn remove_scratch(scratch: &Path) {
    match tokio::fs::remove_dir_all(scratch).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %scratch.display(), error = %e, "scratch cleanup failed"),
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
