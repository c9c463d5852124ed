// Terminal rendering of an evaluation result
//
// Everything printed here is already present in the structured result.

use crate::engine::types::EvaluationResult;
use crate::score::{STRUCTURAL_WEIGHT, TEST_CASE_WEIGHT};

const HEAVY_RULE: &str = "═══════════════════════════════════════════════════════";
const LIGHT_RULE: &str = "───────────────────────────────────────────────────────";

fn status(passed: bool) -> (&'static str, &'static str) {
    if passed {
        ("✅", "✓ PASSED")
    } else {
        ("❌", "✗ FAILED")
    }
}

pub fn format_terminal(result: &EvaluationResult) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut push = |line: &str| lines.push(line.to_string());

    push(HEAVY_RULE);
    push("              CODE EXECUTION RESULTS");
    push(HEAVY_RULE);
    push("");

    if !result.output.is_empty() {
        push("📤 OUTPUT:");
        push(LIGHT_RULE);
        push(result.output.as_str());
        push(LIGHT_RULE);
        push("");
    }

    if let Some(error) = &result.error {
        push("❌ ERROR:");
        push(LIGHT_RULE);
        push(error.as_str());
        push(LIGHT_RULE);
        push("");
    }

    let tests = &result.test_cases;
    if tests.total > 0 {
        push("🧪 TEST CASES:");
        push(LIGHT_RULE);
        for (i, tc) in tests.results.iter().enumerate() {
            let (icon, label) = status(tc.passed);
            push(&format!("{icon} Test Case {}: {label}", i + 1));
            if tc.is_hidden {
                push("   [Hidden Test Case]");
            } else {
                let input = if tc.input.is_empty() { "(empty)" } else { tc.input.as_str() };
                push(&format!("   Input: {input}"));
                push(&format!("   Expected: {}", tc.expected_output));
                push(&format!("   Got: {}", tc.actual_output));
            }
            push(&format!("   {}", tc.message));
            push("");
        }
        push(&format!("Summary: {}/{} passed", tests.passed, tests.total));
        push(LIGHT_RULE);
        push("");
    }

    let structural = &result.structural;
    if structural.total > 0 {
        push("🏗️  STRUCTURAL CONSTRAINTS:");
        push(LIGHT_RULE);
        for sc in &structural.results {
            let (icon, label) = status(sc.passed);
            push(&format!("{icon} {} ({}): {label}", sc.constraint, sc.kind));
            push(&format!("   {}", sc.message));
            push("");
        }
        push(&format!(
            "Summary: {}/{} passed",
            structural.passed, structural.total
        ));
        push(LIGHT_RULE);
        push("");
    }

    push("🎯 FINAL SCORE:");
    push(LIGHT_RULE);
    push(&format!("   {} / {}", result.final_score, result.max_score));

    if tests.total > 0 && structural.total > 0 {
        let tc_max = TEST_CASE_WEIGHT * 10.0;
        let st_max = STRUCTURAL_WEIGHT * 10.0;
        push("");
        push("   Breakdown:");
        push(&format!(
            "   • Test Cases (70%): {:.1}/{tc_max:.1}",
            tests.score * tc_max
        ));
        push(&format!(
            "   • Structural (30%): {:.1}/{st_max:.1}",
            structural.score * st_max
        ));
    }

    push(HEAVY_RULE);
    lines.join("\n")
}
