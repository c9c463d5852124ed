// Error types for Sandbox module
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Sandbox error types
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("Code exceeds maximum size of {limit} bytes ({size} bytes submitted)")]
    CodeTooLarge { size: usize, limit: usize },

    #[error("Container runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("Failed to inspect image '{0}': {1}")]
    ImageInspect(String, String),

    #[error("Failed to build image '{0}': {1}")]
    ImageBuild(String, String),

    #[error("Failed to create container '{0}': {1}")]
    ContainerCreate(String, String),

    #[error("Failed to start container '{0}': {1}")]
    ContainerStart(String, String),

    #[error("Failed waiting for container '{0}': {1}")]
    ContainerWait(String, String),

    #[error("Failed to remove container '{0}': {1}")]
    ContainerRemove(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SandboxError>;

/// Errors while loading sandbox configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read language table {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid language table {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unknown language '{0}' in language table")]
    UnknownLanguage(String),
}
