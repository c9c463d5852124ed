// Engine module - orchestrates analysis, execution and scoring
#![allow(dead_code, unused_imports)]

pub mod orchestrator;
pub mod report;
pub mod types;

pub use orchestrator::Engine;
pub use report::format_terminal;
pub use types::{EvaluationRequest, EvaluationResult, Stage};
