// Sequential test case evaluation
//
// The runner is injected so the evaluator never touches sandbox internals.
// Each run completes before the next one starts.

use crate::evaluator::compare::compare;
use crate::evaluator::types::{HIDDEN_PLACEHOLDER, TestCase, TestCaseResult};
use crate::sandbox::{SandboxError, SandboxResult};
use crate::score::ScoreSummary;
use std::future::Future;
use tracing::{debug, warn};

pub async fn evaluate_all<F, Fut>(test_cases: &[TestCase], mut run: F) -> Vec<TestCaseResult>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<SandboxResult, SandboxError>>,
{
    let mut results = Vec::with_capacity(test_cases.len());

    for (index, case) in test_cases.iter().enumerate() {
        let result = match run(case.input.clone()).await {
            Ok(execution) => judge(index, case, &execution),
            Err(e) => {
                warn!(index, error = %e, "test case execution failed");
                TestCaseResult {
                    index,
                    passed: false,
                    input: case.visible(&case.input).to_string(),
                    expected_output: case.visible(&case.expected_output).to_string(),
                    actual_output: case.visible("").to_string(),
                    message: format!("Test execution failed: {e}"),
                    execution_time_ms: 0,
                    is_hidden: case.is_hidden,
                }
            }
        };

        debug!(
            index,
            passed = result.passed,
            hidden = case.is_hidden,
            duration_ms = result.execution_time_ms,
            "test case evaluated"
        );
        results.push(result);
    }

    results
}

fn judge(index: usize, case: &TestCase, execution: &SandboxResult) -> TestCaseResult {
    let (passed, actual, message) = if !execution.is_success() {
        let message = execution
            .error
            .clone()
            .unwrap_or_else(|| "Runtime error".to_string());
        (false, execution.display_output(), message)
    } else {
        let verdict = compare(
            &execution.stdout,
            &case.expected_output,
            case.comparison_mode,
            case.is_hidden,
        );
        (verdict.passed, execution.stdout.as_str(), verdict.message)
    };

    TestCaseResult {
        index,
        passed,
        input: case.visible(&case.input).to_string(),
        expected_output: case.visible(&case.expected_output).to_string(),
        actual_output: case.visible(actual).to_string(),
        message,
        execution_time_ms: execution.duration_ms,
        is_hidden: case.is_hidden,
    }
}

pub fn calculate_test_case_score(results: &[TestCaseResult]) -> ScoreSummary {
    ScoreSummary::from_outcomes(results.iter().map(|r| r.passed))
}
