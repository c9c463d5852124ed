// Data types for Sandbox module
#![allow(dead_code)]

use crate::language::Language;
use serde::Serialize;

/// One program run: consumed once by the executor
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub language: Language,
    pub source: String,
    pub stdin: String,
}

impl ExecutionRequest {
    pub fn new(language: Language, source: impl Into<String>, stdin: impl Into<String>) -> Self {
        Self {
            language,
            source: source.into(),
            stdin: stdin.into(),
        }
    }
}

/// Captured outcome of one sandboxed run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxResult {
    pub stdout: String,
    pub stderr: String,
    /// Program exit code, `-1` for infrastructure failures
    pub exit_code: i64,
    pub duration_ms: u64,
    /// Set only for infrastructure failures (timeout, runtime, setup)
    pub error: Option<String>,
}

impl SandboxResult {
    /// Result of a program that ran to completion
    pub fn completed(stdout: &[u8], stderr: &[u8], exit_code: i64, duration_ms: u64) -> Self {
        Self {
            stdout: normalize_stream(stdout),
            stderr: normalize_stream(stderr),
            exit_code,
            duration_ms,
            error: None,
        }
    }

    /// Infrastructure failure; the message is mirrored into stderr
    pub fn infra_error(message: impl Into<String>, duration_ms: u64) -> Self {
        let message = message.into();
        Self {
            stdout: String::new(),
            stderr: message.clone(),
            exit_code: -1,
            duration_ms,
            error: Some(message),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.exit_code == 0
    }

    /// stdout, or stderr when the program printed nothing
    pub fn display_output(&self) -> &str {
        if self.stdout.is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }
}

/// Decode a demultiplexed stream and strip surrounding whitespace
fn normalize_stream(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_trims_streams() {
        let result = SandboxResult::completed(b"12\n", b"  warn \n", 0, 5);
        assert_eq!(result.stdout, "12");
        assert_eq!(result.stderr, "warn");
        assert!(result.is_success());
    }

    #[test]
    fn test_completed_keeps_invalid_utf8_lossy() {
        let result = SandboxResult::completed(&[0x66, 0xff, 0x6f], b"", 0, 1);
        assert_eq!(result.stdout, "f\u{fffd}o");
    }

    #[test]
    fn test_infra_error_shape() {
        let result = SandboxResult::infra_error("boom", 0);
        assert_eq!(result.exit_code, -1);
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert_eq!(result.display_output(), "boom");
        assert!(!result.is_success());
    }

    #[test]
    fn test_nonzero_exit_is_not_infra_error() {
        let result = SandboxResult::completed(b"", b"Traceback", 1, 3);
        assert!(result.error.is_none());
        assert!(!result.is_success());
        assert_eq!(result.display_output(), "Traceback");
    }
}
