// Constraint evaluation against construct counts

use crate::analyzer::normalize::normalize_construct;
use crate::analyzer::types::{ConstraintResult, ConstraintType, StructuralConstraint, Structure};
use crate::language::Language;

pub fn evaluate_constraint(
    structure: &Structure,
    constraint: &StructuralConstraint,
    language: Language,
) -> ConstraintResult {
    let construct = &constraint.construct;
    let count = structure.count(&normalize_construct(construct, language));
    let min_required = constraint.min_required();

    let (mut passed, mut message) = match constraint.kind {
        ConstraintType::Required if count >= min_required => (
            true,
            format!("Found {count} {construct}(s) (required: {min_required})"),
        ),
        ConstraintType::Required => (
            false,
            format!("Missing {construct}. Found {count}, required at least {min_required}"),
        ),
        ConstraintType::Forbidden if count == 0 => (
            true,
            format!("No {construct} found (found 0, allowed: 0)"),
        ),
        ConstraintType::Forbidden => (
            false,
            format!("Found {count} {construct}(s), but they are forbidden (allowed: 0)"),
        ),
    };

    if let Some(max) = constraint.max_allowed()
        && passed
        && count > max
    {
        passed = false;
        message = format!("Too many {construct}(s). Found {count}, maximum allowed: {max}");
    }

    ConstraintResult {
        constraint: construct.clone(),
        kind: constraint.kind,
        count,
        passed,
        message,
    }
}

/// Every constraint fails when the language has no analyzer
pub fn unsupported(constraint: &StructuralConstraint, language: &str) -> ConstraintResult {
    ConstraintResult {
        constraint: constraint.construct.clone(),
        kind: constraint.kind,
        count: 0,
        passed: false,
        message: format!("Structural analysis not supported for {language}"),
    }
}
