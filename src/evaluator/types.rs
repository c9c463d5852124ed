// Data types for Evaluator module

use serde::{Deserialize, Serialize};

/// Stands in for hidden test data in every result
pub const HIDDEN_PLACEHOLDER: &str = "[Hidden]";

/// How actual output is matched against the expected output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonMode {
    #[default]
    Exact,
    IgnoreWhitespace,
    Regex,
}

/// Caller-supplied test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub comparison_mode: ComparisonMode,
    #[serde(default)]
    pub is_hidden: bool,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
            comparison_mode: ComparisonMode::Exact,
            is_hidden: false,
        }
    }

    pub fn with_mode(mut self, mode: ComparisonMode) -> Self {
        self.comparison_mode = mode;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    /// Value safe to return for a field of this test case
    pub(crate) fn visible<'a>(&self, value: &'a str) -> &'a str {
        if self.is_hidden {
            HIDDEN_PLACEHOLDER
        } else {
            value
        }
    }
}

/// Outcome of one test case, already redacted when hidden
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub index: usize,
    pub passed: bool,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    pub message: String,
    pub execution_time_ms: u64,
    pub is_hidden: bool,
}
