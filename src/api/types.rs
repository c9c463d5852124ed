// Wire types for the HTTP surface

use crate::analyzer::{ConstraintResult, ConstraintType, StructuralConstraint};
use crate::engine::{EvaluationResult, format_terminal};
use crate::evaluator::{TestCase, TestCaseResult};
use crate::language::LanguageInfo;
use crate::sandbox::SandboxResult;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/execute`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteBody {
    pub code: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub test_cases: Option<Vec<TestCase>>,
    #[serde(default)]
    pub structural_constraints: Option<Vec<StructuralConstraint>>,
    #[serde(default)]
    pub task_marks: Option<f64>,
}

/// Body of `POST /api/execute/quick`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuickBody {
    pub code: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDetail {
    pub index: usize,
    pub passed: bool,
    pub message: String,
    pub input: String,
    pub expected: String,
    pub actual: String,
    pub hidden: bool,
    pub execution_time: u64,
}

impl From<&TestCaseResult> for TestCaseDetail {
    fn from(tc: &TestCaseResult) -> Self {
        Self {
            index: tc.index,
            passed: tc.passed,
            message: tc.message.clone(),
            input: tc.input.clone(),
            expected: tc.expected_output.clone(),
            actual: tc.actual_output.clone(),
            hidden: tc.is_hidden,
            execution_time: tc.execution_time_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstraintDetail {
    pub constraint: String,
    #[serde(rename = "type")]
    pub kind: ConstraintType,
    pub count: usize,
    pub passed: bool,
    pub message: String,
}

impl From<&ConstraintResult> for ConstraintDetail {
    fn from(sc: &ConstraintResult) -> Self {
        Self {
            constraint: sc.constraint.clone(),
            kind: sc.kind,
            count: sc.count,
            passed: sc.passed,
            message: sc.message.clone(),
        }
    }
}

/// Tally plus per-item details for one stage
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary<T> {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    pub details: Vec<T>,
}

/// Response of `POST /api/execute`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub success: bool,
    pub score: f64,
    pub max_score: f64,
    pub output: String,
    pub error: Option<String>,
    pub test_cases: StageSummary<TestCaseDetail>,
    pub structural: StageSummary<ConstraintDetail>,
    pub terminal: String,
}

impl From<&EvaluationResult> for ExecuteResponse {
    fn from(result: &EvaluationResult) -> Self {
        let tests = &result.test_cases;
        let structural = &result.structural;
        Self {
            success: result.success,
            score: result.final_score,
            max_score: result.max_score,
            output: result.output.clone(),
            error: result.error.clone(),
            test_cases: StageSummary {
                passed: tests.passed,
                failed: tests.failed,
                total: tests.total,
                details: tests.results.iter().map(TestCaseDetail::from).collect(),
            },
            structural: StageSummary {
                passed: structural.passed,
                failed: structural.failed,
                total: structural.total,
                details: structural.results.iter().map(ConstraintDetail::from).collect(),
            },
            terminal: format_terminal(result),
        }
    }
}

/// Response of `POST /api/execute/quick`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickResponse {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
    pub exit_code: i64,
    pub execution_time: u64,
}

impl From<SandboxResult> for QuickResponse {
    fn from(run: SandboxResult) -> Self {
        let success = run.is_success();
        let error = if run.stderr.is_empty() {
            run.error
        } else {
            Some(run.stderr)
        };
        Self {
            success,
            output: run.stdout,
            error,
            exit_code: run.exit_code,
            execution_time: run.duration_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_body_defaults() {
        let body: ExecuteBody =
            serde_json::from_str(r#"{"code":"print(1)","language":"python"}"#).unwrap();
        assert_eq!(body.code.as_deref(), Some("print(1)"));
        assert!(body.test_cases.is_none());
        assert!(body.structural_constraints.is_none());
    }

    #[test]
    fn test_execute_body_nested_shapes() {
        let body: ExecuteBody = serde_json::from_str(
            r#"{
                "code": "x",
                "language": "java",
                "testCases": [{"input": "1", "expectedOutput": "2", "comparisonMode": "Regex", "isHidden": true}],
                "structuralConstraints": [{"type": "Forbidden", "construct": "while loop", "specifics": {"minDepth": 0, "maxDepth": 0}}],
                "taskMarks": 20
            }"#,
        )
        .unwrap();
        let cases = body.test_cases.unwrap();
        assert!(cases[0].is_hidden);
        let constraints = body.structural_constraints.unwrap();
        assert_eq!(constraints[0].kind, ConstraintType::Forbidden);
        assert_eq!(body.task_marks, Some(20.0));
    }

    #[test]
    fn test_unknown_comparison_mode_is_rejected() {
        let parsed: Result<ExecuteBody, _> = serde_json::from_str(
            r#"{"code":"x","language":"python","testCases":[{"expectedOutput":"1","comparisonMode":"Fuzzy"}]}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_quick_response_prefers_stderr() {
        let run = SandboxResult::completed(b"out", b"warning", 0, 7);
        let response = QuickResponse::from(run);
        assert!(response.success);
        assert_eq!(response.error.as_deref(), Some("warning"));

        let failed = QuickResponse::from(SandboxResult::infra_error("Execution timed out after 10ms", 10));
        assert!(!failed.success);
        assert_eq!(failed.exit_code, -1);
        assert_eq!(failed.error.as_deref(), Some("Execution timed out after 10ms"));
    }

    #[test]
    fn test_detail_field_names() {
        let detail = TestCaseDetail {
            index: 0,
            passed: true,
            message: "ok".to_string(),
            input: "1".to_string(),
            expected: "1".to_string(),
            actual: "1".to_string(),
            hidden: false,
            execution_time: 3,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["executionTime"], 3);
        assert_eq!(json["hidden"], false);
    }
}
