// Sandbox configuration
#![allow(dead_code)]

use crate::env::{env_flag, env_string, parse_env_var};
use crate::language::Language;
use crate::sandbox::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_MEMORY_BYTES: i64 = 256 * 1024 * 1024;

/// Resource ceilings applied to every container
#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Memory ceiling in bytes
    pub memory_bytes: i64,
    /// CPU ceiling in units of 1e-9 CPUs
    pub nano_cpus: i64,
    /// Maximum number of processes
    pub pids: i64,
    /// Wall-clock limit for one run, compilation included
    pub timeout: Duration,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            memory_bytes: DEFAULT_MEMORY_BYTES,
            nano_cpus: 1_000_000_000,
            pids: 50,
            timeout: Duration::from_millis(30_000),
        }
    }
}

/// Sandbox configuration, process-wide and read-only after startup
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    pub limits: ResourceLimits,
    /// Attach containers to the bridge network instead of `none`
    pub network_enabled: bool,
    /// Maximum accepted source size in bytes
    pub max_code_size: usize,
    /// Per-stream capture cap in bytes
    pub max_output_bytes: usize,
    /// Host directory holding per-run source files
    pub scratch_dir: PathBuf,
    /// Prefix for container names
    pub container_prefix: String,
    /// Size of the writable tmpfs mounted at /tmp
    pub tmpfs_size: String,
    /// Runner image per language
    pub images: HashMap<Language, String>,
    /// Directory holding `Dockerfile.<language>` for images built at startup
    pub dockerfiles_dir: PathBuf,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            limits: ResourceLimits::default(),
            network_enabled: false,
            max_code_size: 50_000,
            max_output_bytes: 1_048_576, // 1MB
            scratch_dir: std::env::temp_dir(),
            container_prefix: "codegrade-exec-".to_string(),
            tmpfs_size: "64m".to_string(),
            images: default_images(),
            dockerfiles_dir: PathBuf::from("dockerfiles"),
        }
    }
}

impl SandboxConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = SandboxConfig::default();

        let memory = env_string("MEMORY_LIMIT", "256m");
        config.limits.memory_bytes = parse_memory_limit(&memory).unwrap_or_else(|| {
            warn!(value = %memory, "Invalid MEMORY_LIMIT, using 256m");
            DEFAULT_MEMORY_BYTES
        });

        let cpus: f64 = parse_env_var("CPU_LIMIT", 1.0);
        if cpus > 0.0 {
            config.limits.nano_cpus = (cpus * 1e9) as i64;
        } else {
            warn!(cpus, "CPU_LIMIT must be positive, using 1.0");
        }

        config.limits.pids = parse_env_var("PIDS_LIMIT", config.limits.pids);
        let timeout_ms: u64 = parse_env_var("EXECUTION_TIMEOUT", 30_000);
        config.limits.timeout = Duration::from_millis(timeout_ms);

        config.network_enabled = env_flag("ENABLE_NETWORK", false);
        config.max_code_size = parse_env_var("MAX_CODE_SIZE", config.max_code_size);
        config.max_output_bytes = parse_env_var("MAX_OUTPUT_BYTES", config.max_output_bytes);
        if let Ok(dir) = std::env::var("SCRATCH_DIR") {
            config.scratch_dir = PathBuf::from(dir);
        }
        config.container_prefix = env_string("CONTAINER_PREFIX", &config.container_prefix);
        config.tmpfs_size = env_string("TMPFS_SIZE", &config.tmpfs_size);

        if let Ok(dir) = std::env::var("DOCKERFILES_DIR") {
            config.dockerfiles_dir = PathBuf::from(dir);
        }

        if let Ok(path) = std::env::var("LANGUAGES_TOML") {
            let overrides = load_language_images(Path::new(&path))?;
            config.images.extend(overrides);
        }

        Ok(config)
    }

    /// Runner image for a language
    pub fn image_for(&self, language: Language) -> String {
        self.images
            .get(&language)
            .cloned()
            .unwrap_or_else(|| default_image(language))
    }

    /// Dockerfile used to build the runner image for a language
    pub fn dockerfile_for(&self, language: Language) -> PathBuf {
        self.dockerfiles_dir
            .join(format!("Dockerfile.{}", language.as_str()))
    }

    pub fn timeout_ms(&self) -> u64 {
        self.limits.timeout.as_millis() as u64
    }
}

fn default_image(language: Language) -> String {
    format!("codegrade-{}-runner:latest", language.as_str())
}

fn default_images() -> HashMap<Language, String> {
    Language::ALL
        .iter()
        .map(|lang| (*lang, default_image(*lang)))
        .collect()
}

/// Parse `256m`, `1g`, `512k` or plain bytes
pub fn parse_memory_limit(value: &str) -> Option<i64> {
    let value = value.trim().to_ascii_lowercase();
    let (digits, multiplier) = match value.chars().last()? {
        'k' => (&value[..value.len() - 1], 1024),
        'm' => (&value[..value.len() - 1], 1024 * 1024),
        'g' => (&value[..value.len() - 1], 1024 * 1024 * 1024),
        c if c.is_ascii_digit() => (value.as_str(), 1),
        _ => return None,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok()?.checked_mul(multiplier)
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    image: Option<String>,
}

/// Load per-language image overrides from a TOML table such as
/// `[python] image = "python:3.11-slim"`
pub fn load_language_images(path: &Path) -> Result<HashMap<Language, String>, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "language table not found, using default images");
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table: HashMap<String, LanguageEntry> =
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut images = HashMap::new();
    for (key, entry) in table {
        let language: Language = key
            .parse()
            .map_err(|_| ConfigError::UnknownLanguage(key.clone()))?;
        if let Some(image) = entry.image {
            images.insert(language, image);
        }
    }

    debug!(path = %path.display(), overrides = images.len(), "loaded language table");
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_memory_limit_units() {
        assert_eq!(parse_memory_limit("256m"), Some(256 * 1024 * 1024));
        assert_eq!(parse_memory_limit("1G"), Some(1024 * 1024 * 1024));
        assert_eq!(parse_memory_limit("512k"), Some(512 * 1024));
        assert_eq!(parse_memory_limit("1000"), Some(1000));
    }

    #[test]
    fn test_parse_memory_limit_rejects_garbage() {
        assert_eq!(parse_memory_limit(""), None);
        assert_eq!(parse_memory_limit("m"), None);
        assert_eq!(parse_memory_limit("12mb"), None);
        assert_eq!(parse_memory_limit("-5m"), None);
    }

    #[test]
    fn test_defaults_match_service_policy() {
        let config = SandboxConfig::default();
        assert_eq!(config.limits.memory_bytes, 256 * 1024 * 1024);
        assert_eq!(config.limits.nano_cpus, 1_000_000_000);
        assert_eq!(config.limits.pids, 50);
        assert_eq!(config.timeout_ms(), 30_000);
        assert!(!config.network_enabled);
        assert_eq!(config.max_code_size, 50_000);
        assert_eq!(
            config.image_for(Language::Java),
            "codegrade-java-runner:latest"
        );
        assert_eq!(
            config.dockerfile_for(Language::Cpp),
            PathBuf::from("dockerfiles/Dockerfile.cpp")
        );
    }

    #[test]
    fn test_load_language_images() {
        let dir = std::env::temp_dir().join(format!("codegrade-cfg-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("languages.toml");
        std::fs::write(&path, "[python]\nimage = \"python:3.12-slim\"\n\n[cpp]\n").unwrap();

        let images = load_language_images(&path).unwrap();
        assert_eq!(images.get(&Language::Python).unwrap(), "python:3.12-slim");
        assert!(!images.contains_key(&Language::Cpp));

        std::fs::write(&path, "[ruby]\nimage = \"ruby\"\n").unwrap();
        assert!(matches!(
            load_language_images(&path),
            Err(ConfigError::UnknownLanguage(_))
        ));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_language_table_is_empty() {
        let images = load_language_images(Path::new("/nonexistent/languages.toml")).unwrap();
        assert!(images.is_empty());
    }
}
