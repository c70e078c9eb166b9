//! Uniqueness score and the pass/fail gate.

use serde::Serialize;

use super::RunState;

/// Percentage of analyzed lines not flagged as duplicated.
///
/// Rounded to two decimal places and clamped to `0.0..=100.0`. An empty
/// corpus scores 100.
///
/// # Example
///
/// ```
/// use paradupe::duplicates::uniqueness_score;
///
/// assert_eq!(uniqueness_score(100, 20), 80.0);
/// assert_eq!(uniqueness_score(0, 0), 100.0);
/// ```
#[must_use]
pub fn uniqueness_score(total_lines: usize, duped_lines: usize) -> f64 {
    if total_lines == 0 {
        return 100.0;
    }
    let raw = 100.0 - (duped_lines as f64 / total_lines as f64) * 100.0;
    round2(raw.clamp(0.0, 100.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Outcome of comparing a run's score to the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    /// Uniqueness score, two decimals
    pub score: f64,
    /// Minimum passing score
    pub threshold: f64,
    /// Whether `score >= threshold`
    pub passed: bool,
}

impl Verdict {
    /// Score a finished run against `threshold`.
    #[must_use]
    pub fn evaluate(state: &RunState, threshold: f64) -> Self {
        let score = uniqueness_score(state.total_lines, state.duped_lines);
        Self {
            score,
            threshold,
            passed: score >= threshold,
        }
    }

    /// One-line summary used by the text report and logs.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.passed {
            format!(
                "You passed your threshold of {}% with a score of {:.2}%",
                self.threshold, self.score
            )
        } else {
            format!(
                "You failed your threshold of {}% with a score of {:.2}%",
                self.threshold, self.score
            )
        }
    }
}
