// Shared helpers for the integration tests: tracing setup and an in-memory
// container runtime whose replies are scripted per test
#![allow(dead_code)]

use crate::sandbox::{
    ContainerExit, ContainerRuntime, ContainerSpec, Result, SandboxConfig, SandboxError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    });
}

/// What a fake container does when run
#[derive(Debug, Clone)]
pub enum Reply {
    Exit {
        code: i64,
        stdout: String,
        stderr: String,
    },
    Hang,
    Fail(String),
}

impl Reply {
    pub fn ok(stdout: &str) -> Self {
        Reply::Exit {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn exit(code: i64, stdout: &str, stderr: &str) -> Self {
        Reply::Exit {
            code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }
}

type Handler = Arc<dyn Fn(&ContainerSpec) -> Reply + Send + Sync>;

pub struct FakeRuntime {
    handler: Handler,
    create_fails: bool,
    reachable: bool,
    specs: Mutex<HashMap<String, ContainerSpec>>,
    created: Mutex<Vec<String>>,
    removed: Mutex<Vec<String>>,
    mounted: Mutex<Vec<String>>,
    built: Mutex<Vec<(String, String)>>,
}

impl FakeRuntime {
    pub fn new(handler: impl Fn(&ContainerSpec) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
            create_fails: false,
            reachable: true,
            specs: Mutex::new(HashMap::new()),
            created: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
            mounted: Mutex::new(Vec::new()),
            built: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(reply: Reply) -> Self {
        Self::new(move |_| reply.clone())
    }

    pub fn failing_create(mut self) -> Self {
        self.create_fails = true;
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }

    /// Contents of the bind-mounted files, read while the container existed
    pub fn mounted(&self) -> Vec<String> {
        self.mounted.lock().unwrap().clone()
    }

    /// `(image, dockerfile)` for every image built
    pub fn built(&self) -> Vec<(String, String)> {
        self.built.lock().unwrap().clone()
    }

    pub fn spec(&self, name: &str) -> Option<ContainerSpec> {
        self.specs.lock().unwrap().get(name).cloned()
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn ping(&self) -> Result<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(SandboxError::RuntimeUnavailable(
                "docker daemon not running".to_string(),
            ))
        }
    }

    async fn image_exists(&self, image: &str) -> Result<bool> {
        let built = self.built.lock().unwrap().iter().any(|(b, _)| b == image);
        Ok(built || !image.contains("missing"))
    }

    async fn build_image(&self, image: &str, dockerfile: &[u8]) -> Result<()> {
        if image.contains("unbuildable") {
            return Err(SandboxError::ImageBuild(
                image.to_string(),
                "The command '/bin/sh -c apt-get install' returned a non-zero code: 100"
                    .to_string(),
            ));
        }
        self.built.lock().unwrap().push((
            image.to_string(),
            String::from_utf8_lossy(dockerfile).into_owned(),
        ));
        Ok(())
    }

    async fn create(&self, spec: &ContainerSpec) -> Result<()> {
        if self.create_fails {
            return Err(SandboxError::ContainerCreate(
                spec.name.clone(),
                "No such image".to_string(),
            ));
        }
        for bind in &spec.binds {
            if let Some(host) = bind.split(':').next()
                && let Ok(contents) = std::fs::read_to_string(host)
            {
                self.mounted.lock().unwrap().push(contents);
            }
        }
        self.created.lock().unwrap().push(spec.name.clone());
        self.specs
            .lock()
            .unwrap()
            .insert(spec.name.clone(), spec.clone());
        Ok(())
    }

    async fn run(&self, name: &str, _max_output_bytes: usize) -> Result<ContainerExit> {
        let spec = self.spec(name).ok_or_else(|| {
            SandboxError::ContainerStart(name.to_string(), "not created".to_string())
        })?;
        match (self.handler)(&spec) {
            Reply::Exit {
                code,
                stdout,
                stderr,
            } => Ok(ContainerExit {
                status_code: code,
                stdout: stdout.into_bytes(),
                stderr: stderr.into_bytes(),
            }),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(ContainerExit::default())
            }
            Reply::Fail(message) => Err(SandboxError::ContainerStart(name.to_string(), message)),
        }
    }

    async fn remove(&self, name: &str) -> Result<()> {
        self.removed.lock().unwrap().push(name.to_string());
        Ok(())
    }
}

/// The stdin mounted for a container, without its trailing newline.
/// Only readable while the container exists.
pub fn stdin_of(spec: &ContainerSpec) -> Option<String> {
    let host = spec
        .binds
        .iter()
        .find(|bind| bind.ends_with(":/app/input.txt:ro"))?
        .split(':')
        .next()?;
    let contents = std::fs::read_to_string(host).ok()?;
    Some(contents.strip_suffix('\n').unwrap_or(&contents).to_string())
}

/// Config with a private scratch dir and a short timeout
pub fn test_config() -> SandboxConfig {
    let mut config = SandboxConfig::default();
    config.scratch_dir = scratch_root();
    config.limits.timeout = Duration::from_millis(200);
    config
}

fn scratch_root() -> PathBuf {
    std::env::temp_dir().join(format!("codegrade-test-{}", uuid::Uuid::new_v4()))
}

/// Entries left under a scratch root
pub fn scratch_entries(config: &SandboxConfig) -> usize {
    std::fs::read_dir(&config.scratch_dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}
