// Score aggregation
//
// Functional correctness dominates: when both signals exist the final score
// is 70% test cases and 30% structure, on a 0-10 scale with one decimal.

use serde::Serialize;

pub const MAX_SCORE: f64 = 10.0;
pub const TEST_CASE_WEIGHT: f64 = 0.7;
pub const STRUCTURAL_WEIGHT: f64 = 0.3;

/// Pass/fail tally of one evaluation stage
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreSummary {
    /// passed / total, 0 when there is nothing to score
    pub score: f64,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl ScoreSummary {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let (total, passed) = outcomes
            .into_iter()
            .fold((0usize, 0usize), |(total, passed), ok| {
                (total + 1, passed + usize::from(ok))
            });
        Self {
            score: if total > 0 {
                passed as f64 / total as f64
            } else {
                0.0
            },
            total,
            passed,
            failed: total - passed,
        }
    }
}

/// Combine stage scores into the bounded 0-10 final score
pub fn final_score(
    test_case_score: f64,
    structural_score: f64,
    test_case_count: usize,
    structural_count: usize,
) -> f64 {
    let fraction = match (test_case_count > 0, structural_count > 0) {
        (true, false) => test_case_score,
        (false, true) => structural_score,
        (true, true) => test_case_score * TEST_CASE_WEIGHT + structural_score * STRUCTURAL_WEIGHT,
        (false, false) => return 0.0,
    };
    round_one_decimal(fraction * MAX_SCORE).clamp(0.0, MAX_SCORE)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let summary = ScoreSummary::from_outcomes([true, false, true, true]);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.score, 0.75);
    }

    #[test]
    fn test_empty_summary_scores_zero() {
        let summary = ScoreSummary::from_outcomes(std::iter::empty());
        assert_eq!(summary, ScoreSummary::default());
    }

    #[test]
    fn test_final_score_single_stage() {
        assert_eq!(final_score(0.5, 0.0, 2, 0), 5.0);
        assert_eq!(final_score(0.0, 2.0 / 3.0, 0, 3), 6.7);
    }

    #[test]
    fn test_final_score_weighted() {
        assert_eq!(final_score(1.0, 1.0, 3, 2), 10.0);
        assert_eq!(final_score(1.0, 0.0, 1, 1), 7.0);
        assert_eq!(final_score(0.0, 1.0, 1, 1), 3.0);
        // 0.5 * 0.7 + 0.5 * 0.3 = 0.5
        assert_eq!(final_score(0.5, 0.5, 2, 2), 5.0);
        // (2/3) * 0.7 + (1/3) * 0.3 = 0.5667
        assert_eq!(final_score(2.0 / 3.0, 1.0 / 3.0, 3, 3), 5.7);
    }

    #[test]
    fn test_final_score_nothing_to_score() {
        assert_eq!(final_score(1.0, 1.0, 0, 0), 0.0);
    }

    #[test]
    fn test_final_score_always_bounded() {
        for tc in 0..=10 {
            for st in 0..=10 {
                let score = final_score(tc as f64 / 10.0, st as f64 / 10.0, 1, 1);
                assert!((0.0..=MAX_SCORE).contains(&score), "{score} out of range");
            }
        }
    }
}
