// Evaluator module - runs test cases and classifies pass/fail
#![allow(dead_code, unused_imports)]

pub mod compare;
pub mod runner;
pub mod types;

pub use compare::{Comparison, compare, normalize_whitespace};
pub use runner::{calculate_test_case_score, evaluate_all};
pub use types::{ComparisonMode, HIDDEN_PLACEHOLDER, TestCase, TestCaseResult};
