// Data types for Engine module

use crate::analyzer::{ConstraintResult, StructuralConstraint};
use crate::evaluator::{TestCase, TestCaseResult};
use crate::language::Language;
use crate::score::{MAX_SCORE, ScoreSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One submission to grade
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub source: String,
    pub language: Language,
    pub test_cases: Vec<TestCase>,
    pub structural_constraints: Vec<StructuralConstraint>,
    /// Accepted for compatibility; the score scale is fixed at 10
    pub task_marks: Option<f64>,
}

impl EvaluationRequest {
    pub fn new(language: Language, source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            language,
            test_cases: Vec::new(),
            structural_constraints: Vec::new(),
            task_marks: None,
        }
    }

    pub fn with_test_cases(mut self, test_cases: Vec<TestCase>) -> Self {
        self.test_cases = test_cases;
        self
    }

    pub fn with_constraints(mut self, constraints: Vec<StructuralConstraint>) -> Self {
        self.structural_constraints = constraints;
        self
    }
}

/// Results of one evaluation stage with their tally
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage<T> {
    pub results: Vec<T>,
    pub score: f64,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl<T> Default for Stage<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            score: 0.0,
            passed: 0,
            failed: 0,
            total: 0,
        }
    }
}

impl<T> Stage<T> {
    pub fn new(results: Vec<T>, summary: ScoreSummary) -> Self {
        Self {
            results,
            score: summary.score,
            passed: summary.passed,
            failed: summary.failed,
            total: summary.total,
        }
    }
}

/// Everything the grader learned about one submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub success: bool,
    pub language: Language,
    pub executed_at: DateTime<Utc>,
    pub test_cases: Stage<TestCaseResult>,
    pub structural: Stage<ConstraintResult>,
    pub final_score: f64,
    pub max_score: f64,
    pub output: String,
    pub error: Option<String>,
}

impl EvaluationResult {
    pub fn new(language: Language) -> Self {
        Self {
            success: true,
            language,
            executed_at: Utc::now(),
            test_cases: Stage::default(),
            structural: Stage::default(),
            final_score: 0.0,
            max_score: MAX_SCORE,
            output: String::new(),
            error: None,
        }
    }
}
