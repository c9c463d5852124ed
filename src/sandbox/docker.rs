// Docker implementation of the container runtime

use crate::sandbox::demux::OutputDemux;
use crate::sandbox::error::{Result, SandboxError};
use crate::sandbox::runtime::{ContainerExit, ContainerRuntime, ContainerSpec};
use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    AttachContainerOptions, AttachContainerResults, Config, CreateContainerOptions,
    RemoveContainerOptions, StartContainerOptions, WaitContainerOptions,
};
use bollard::errors::Error as DockerError;
use bollard::image::BuildImageOptions;
use bollard::models::HostConfig;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Docker Engine client; cheap to share, safe for concurrent use
#[derive(Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect using the local defaults (unix socket or `DOCKER_HOST`)
    pub fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| SandboxError::RuntimeUnavailable(e.to_string()))?;
        info!("docker client configured");
        Ok(Self { docker })
    }

    fn host_config(spec: &ContainerSpec) -> HostConfig {
        let mut tmpfs = HashMap::new();
        tmpfs.insert(
            "/tmp".to_string(),
            format!("rw,exec,nosuid,nodev,size={}", spec.tmpfs_size),
        );

        HostConfig {
            memory: Some(spec.limits.memory_bytes),
            memory_swap: Some(spec.limits.memory_bytes),
            nano_cpus: Some(spec.limits.nano_cpus),
            pids_limit: Some(spec.limits.pids),
            network_mode: Some(if spec.network_enabled { "bridge" } else { "none" }.to_string()),
            readonly_rootfs: Some(true),
            cap_drop: Some(vec!["ALL".to_string()]),
            security_opt: Some(vec!["no-new-privileges".to_string()]),
            binds: Some(spec.binds.clone()),
            tmpfs: Some(tmpfs),
            auto_remove: Some(false),
            ..Default::default()
        }
    }

    async fn wait_exit(&self, name: &str) -> Result<i64> {
        let options = WaitContainerOptions {
            condition: "not-running",
        };
        let mut stream = Box::pin(self.docker.wait_container(name, Some(options)));

        match stream.next().await {
            Some(Ok(response)) => Ok(response.status_code),
            // Nonzero exits arrive as an error carrying the code
            Some(Err(DockerError::DockerContainerWaitError { code, .. })) => Ok(code),
            Some(Err(e)) => Err(SandboxError::ContainerWait(name.to_string(), e.to_string())),
            None => Err(SandboxError::ContainerWait(
                name.to_string(),
                "wait stream ended without a status".to_string(),
            )),
        }
    }
}

/// Tar archive holding one file named `Dockerfile`, the whole build context
pub fn build_context(dockerfile: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut header = tar::Header::new_gnu();
    header.set_size(dockerfile.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();

    let mut archive = tar::Builder::new(Vec::new());
    archive.append_data(&mut header, "Dockerfile", dockerfile)?;
    archive.into_inner()
}

fn is_not_found(err: &DockerError) -> bool {
    matches!(
        err,
        DockerError::DockerResponseServerError {
            status_code: 404,
            ..
        }
    )
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn ping(&self) -> Result<()> {
        self.docker
            .ping()
            .await
            .map(|_| ())
            .map_err(|e| SandboxError::RuntimeUnavailable(e.to_string()))
    }

    async fn image_exists(&self, image: &str) -> Result<bool> {
        match self.docker.inspect_image(image).await {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(SandboxError::ImageInspect(image.to_string(), e.to_string())),
        }
    }

    async fn build_image(&self, image: &str, dockerfile: &[u8]) -> Result<()> {
        let context = build_context(dockerfile)?;
        let options = BuildImageOptions {
            dockerfile: "Dockerfile",
            t: image,
            rm: true,
            forcerm: true,
            ..Default::default()
        };

        info!(image = %image, "building runner image");
        let mut stream =
            Box::pin(self.docker.build_image(options, None, Some(Bytes::from(context))));
        while let Some(item) = stream.next().await {
            let info =
                item.map_err(|e| SandboxError::ImageBuild(image.to_string(), e.to_string()))?;
            if let Some(error) = info.error {
                return Err(SandboxError::ImageBuild(image.to_string(), error));
            }
            if let Some(line) = info.stream.as_deref().map(str::trim)
                && !line.is_empty()
            {
                debug!(image = %image, "{line}");
            }
        }
        info!(image = %image, "runner image built");
        Ok(())
    }

    async fn create(&self, spec: &ContainerSpec) -> Result<()> {
        let config = Config {
            image: Some(spec.image.clone()),
            cmd: Some(spec.command.clone()),
            working_dir: Some(spec.working_dir.clone()),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            tty: Some(false),
            network_disabled: Some(!spec.network_enabled),
            host_config: Some(Self::host_config(spec)),
            ..Default::default()
        };
        let options = CreateContainerOptions {
            name: spec.name.clone(),
            platform: None,
        };

        let response = self
            .docker
            .create_container(Some(options), config)
            .await
            .map_err(|e| SandboxError::ContainerCreate(spec.name.clone(), e.to_string()))?;

        for warning in &response.warnings {
            warn!(container = %spec.name, warning = %warning, "container created with warning");
        }
        debug!(container = %spec.name, id = %response.id, image = %spec.image, "container created");
        Ok(())
    }

    async fn run(&self, name: &str, max_output_bytes: usize) -> Result<ContainerExit> {
        // Attach before start so no early output is lost
        let options = AttachContainerOptions::<String> {
            stdout: Some(true),
            stderr: Some(true),
            stream: Some(true),
            logs: Some(true),
            ..Default::default()
        };
        let AttachContainerResults { mut output, .. } = self
            .docker
            .attach_container(name, Some(options))
            .await
            .map_err(|e| SandboxError::ContainerStart(name.to_string(), e.to_string()))?;

        self.docker
            .start_container(name, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| SandboxError::ContainerStart(name.to_string(), e.to_string()))?;
        debug!(container = %name, "container started");

        let mut demux = OutputDemux::new(max_output_bytes);
        while let Some(frame) = output.next().await {
            match frame {
                Ok(frame) => demux.push_frame(frame),
                Err(e) => {
                    warn!(container = %name, error = %e, "output stream error");
                    break;
                }
            }
        }

        let status_code = self.wait_exit(name).await?;
        let dropped_bytes = demux.dropped();
        let (stdout, stderr) = demux.finish();
        debug!(
            container = %name,
            status_code,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            dropped_bytes,
            "container exited"
        );

        Ok(ContainerExit {
            status_code,
            stdout,
            stderr,
        })
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        match self.docker.remove_container(name, Some(options)).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) => Ok(()),
            Err(e) => Err(SandboxError::ContainerRemove(
                name.to_string(),
                e.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_build_context_holds_only_the_dockerfile() {
        let dockerfile = b"FROM python:3.11-slim\nWORKDIR /app\n";
        let context = build_context(dockerfile).unwrap();

        let mut archive = tar::Archive::new(context.as_slice());
        let mut entries = archive.entries().unwrap();
        let mut entry = entries.next().unwrap().unwrap();
        assert_eq!(entry.path().unwrap().to_str(), Some("Dockerfile"));

        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, dockerfile);
        drop(entry);
        assert!(entries.next().is_none());
    }

    #[test]
    fn test_empty_dockerfile_still_archives() {
        let context = build_context(b"").unwrap();
        assert_eq!(context.len() % 512, 0);
        assert!(!context.is_empty());
    }
}
