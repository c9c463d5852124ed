// Evaluation orchestrator: structure first, then execution, then the score

use crate::analyzer::{analyze_structure, calculate_structural_score};
use crate::engine::types::{EvaluationRequest, EvaluationResult, Stage};
use crate::evaluator::{calculate_test_case_score, evaluate_all};
use crate::sandbox::{ExecutionRequest, Result, Sandbox, SandboxResult};
use crate::score::final_score;
use tracing::{debug, info, warn};

/// Grades submissions against test cases and structural constraints
#[derive(Clone)]
pub struct Engine {
    sandbox: Sandbox,
}

impl Engine {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Run the program once without grading it
    pub async fn run(&self, request: ExecutionRequest) -> Result<SandboxResult> {
        self.sandbox.execute(&request).await
    }

    /// Grade one submission.
    ///
    /// Never fails: errors surface as `success: false` with `error` set.
    pub async fn evaluate(&self, request: &EvaluationRequest) -> EvaluationResult {
        let mut result = EvaluationResult::new(request.language);

        if let Some(marks) = request.task_marks {
            debug!(task_marks = marks, "task marks ignored, scoring out of 10");
        }

        if !request.structural_constraints.is_empty() {
            let results = analyze_structure(
                &request.source,
                request.language.as_str(),
                &request.structural_constraints,
            );
            let summary = calculate_structural_score(&results);
            result.structural = Stage::new(results, summary);
        }

        if request.test_cases.is_empty() {
            if let Err(e) = self.run_once(request, &mut result).await {
                warn!(language = %request.language, error = %e, "evaluation failed");
                result.success = false;
                result.error = Some(e.to_string());
                result.output = e.to_string();
                return result;
            }
        } else {
            let sandbox = &self.sandbox;
            let language = request.language;
            let source = request.source.as_str();
            let results = evaluate_all(&request.test_cases, move |stdin| {
                let execution = ExecutionRequest::new(language, source, stdin);
                async move { sandbox.execute(&execution).await }
            })
            .await;
            let summary = calculate_test_case_score(&results);
            if let Some(first) = results.first() {
                result.output = first.actual_output.clone();
            }
            result.test_cases = Stage::new(results, summary);
        }

        result.final_score = final_score(
            result.test_cases.score,
            result.structural.score,
            request.test_cases.len(),
            request.structural_constraints.len(),
        );

        info!(
            language = %request.language,
            test_cases = result.test_cases.total,
            tests_passed = result.test_cases.passed,
            constraints = result.structural.total,
            constraints_passed = result.structural.passed,
            final_score = result.final_score,
            "evaluation complete"
        );
        result
    }

    async fn run_once(
        &self,
        request: &EvaluationRequest,
        result: &mut EvaluationResult,
    ) -> Result<()> {
        let execution = ExecutionRequest::new(request.language, &request.source, "");
        let run = self.sandbox.execute(&execution).await?;
        result.output = run.display_output().to_string();
        if !run.is_success() {
            result.success = false;
            result.error = Some(run.error.unwrap_or_else(|| "Runtime error".to_string()));
        }
        Ok(())
    }
}
