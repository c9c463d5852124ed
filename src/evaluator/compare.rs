// Output comparison modes

use crate::evaluator::types::ComparisonMode;
use regex::Regex;

/// Verdict and explanation for one comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub passed: bool,
    pub message: String,
}

impl Comparison {
    fn new(passed: bool, message: impl Into<String>) -> Self {
        Self {
            passed,
            message: message.into(),
        }
    }
}

/// Trim every line, drop blank ones, rejoin with `\n`
pub fn normalize_whitespace(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compare `actual` against `expected` under `mode`.
///
/// With `hidden` set, messages never quote either side or the pattern.
pub fn compare(actual: &str, expected: &str, mode: ComparisonMode, hidden: bool) -> Comparison {
    match mode {
        ComparisonMode::Exact => {
            let passed = actual == expected;
            let message = match (passed, hidden) {
                (true, _) => "Output matches exactly".to_string(),
                (false, true) => "Output does not match the expected output".to_string(),
                (false, false) => format!("Expected: \"{expected}\"\nGot: \"{actual}\""),
            };
            Comparison::new(passed, message)
        }
        ComparisonMode::IgnoreWhitespace => {
            let actual = normalize_whitespace(actual);
            let expected = normalize_whitespace(expected);
            let passed = actual == expected;
            let message = match (passed, hidden) {
                (true, _) => "Output matches (whitespace ignored)".to_string(),
                (false, true) => {
                    "Output does not match the expected output (whitespace ignored)".to_string()
                }
                (false, false) => format!(
                    "Expected (normalized): \"{expected}\"\nGot (normalized): \"{actual}\""
                ),
            };
            Comparison::new(passed, message)
        }
        ComparisonMode::Regex => match Regex::new(expected) {
            Ok(re) if re.is_match(actual) => Comparison::new(true, "Output matches regex pattern"),
            Ok(_) if hidden => Comparison::new(false, "Output doesn't match pattern"),
            Ok(_) => Comparison::new(false, format!("Output doesn't match pattern: {expected}")),
            // regex errors echo the pattern
            Err(_) if hidden => Comparison::new(false, "Invalid regex pattern"),
            Err(e) => Comparison::new(false, format!("Invalid regex pattern: {e}")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::seq::SliceRandom;

    #[test]
    fn test_exact() {
        let ok = compare("12", "12", ComparisonMode::Exact, false);
        assert!(ok.passed);
        assert_eq!(ok.message, "Output matches exactly");

        let bad = compare("12 ", "12", ComparisonMode::Exact, false);
        assert!(!bad.passed);
        assert_eq!(bad.message, "Expected: \"12\"\nGot: \"12 \"");
    }

    #[test]
    fn test_exact_is_symmetric() {
        let mut rng = rand::thread_rng();
        let alphabet = ['a', 'b', ' ', '\n', '1'];
        for _ in 0..200 {
            let a: String = (0..rng.gen_range(0..6))
                .map(|_| *alphabet.choose(&mut rng).unwrap_or(&'a'))
                .collect();
            let b: String = (0..rng.gen_range(0..6))
                .map(|_| *alphabet.choose(&mut rng).unwrap_or(&'a'))
                .collect();
            assert_eq!(
                compare(&a, &b, ComparisonMode::Exact, false).passed,
                compare(&b, &a, ComparisonMode::Exact, false).passed
            );
        }
    }

    #[test]
    fn test_ignore_whitespace() {
        let r = compare("  1\n\n 2  \n", "1\n2", ComparisonMode::IgnoreWhitespace, false);
        assert!(r.passed);
        assert_eq!(r.message, "Output matches (whitespace ignored)");

        let r = compare("1 2", "1\n2", ComparisonMode::IgnoreWhitespace, false);
        assert!(!r.passed);
        assert!(r.message.starts_with("Expected (normalized): \"1\n2\""));
    }

    #[test]
    fn test_normalize_whitespace_is_idempotent() {
        let mut rng = rand::thread_rng();
        let pieces = ["x", "yy", " ", "\t", "\n", "\r\n", "  z "];
        for _ in 0..200 {
            let text: String = (0..rng.gen_range(0..12))
                .map(|_| *pieces.choose(&mut rng).unwrap_or(&"x"))
                .collect();
            let once = normalize_whitespace(&text);
            assert_eq!(normalize_whitespace(&once), once, "input {text:?}");
        }
    }

    #[test]
    fn test_regex_searches_output() {
        let r = compare("result: 42\n", r"\d+", ComparisonMode::Regex, false);
        assert!(r.passed);
        assert_eq!(r.message, "Output matches regex pattern");

        let r = compare("none", r"^\d+$", ComparisonMode::Regex, false);
        assert!(!r.passed);
        assert_eq!(r.message, r"Output doesn't match pattern: ^\d+$");
    }

    #[test]
    fn test_invalid_regex_fails_with_message() {
        let r = compare("anything", "[unclosed", ComparisonMode::Regex, false);
        assert!(!r.passed);
        assert!(r.message.starts_with("Invalid regex pattern: "));
    }

    #[test]
    fn test_hidden_messages_do_not_quote() {
        let cases = [
            ("secret-out", "secret-exp", ComparisonMode::Exact),
            ("secret-out", "secret-exp", ComparisonMode::IgnoreWhitespace),
            ("secret-out", "secret-exp[0-9]", ComparisonMode::Regex),
            ("secret-out", "secret-exp[", ComparisonMode::Regex),
        ];
        for (actual, expected, mode) in cases {
            let r = compare(actual, expected, mode, true);
            assert!(!r.passed);
            assert!(!r.message.contains("secret"), "{mode:?}: {}", r.message);
        }
    }
}
