use std::fmt;
use std::time::Duration;

use super::score::ScoreResult;

/// Feedback shown to the student when a rule could not be evaluated.
pub const UNPROCESSABLE_FEEDBACK: &str = "Your answer could not be processed.";

/// What one rule contributed to a grading pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// The rule matched; `raw` is the unweighted score, `weighted` includes the rule's fraction.
    Matched { raw: f64, weighted: f64 },
    NoMatch,
    /// The rule's pattern could not be compiled; it contributed nothing.
    Unprocessable(String),
}

/// Detailed grading report returned by
/// [`RuleSet::grade_detailed()`](super::ruleset::RuleSet::grade_detailed).
///
/// Contains the score, every rule's outcome in authored order, and the
/// wall-clock duration of the grading pass.
#[derive(Debug, Clone)]
#[must_use]
pub struct GradingReport {
    score: ScoreResult,
    outcomes: Vec<(String, RuleOutcome)>,
    duration: Duration,
}

impl GradingReport {
    pub(crate) fn new(
        score: ScoreResult,
        outcomes: Vec<(String, RuleOutcome)>,
        duration: Duration,
    ) -> Self {
        Self {
            score,
            outcomes,
            duration,
        }
    }

    /// The score, same as [`RuleSet::grade()`](super::ruleset::RuleSet::grade).
    pub fn score(&self) -> &ScoreResult {
        &self.score
    }

    /// Each rule's id and outcome, in authored order.
    #[must_use]
    pub fn outcomes(&self) -> &[(String, RuleOutcome)] {
        &self.outcomes
    }

    /// Ids of the rules that matched, in authored order.
    #[must_use]
    pub fn matched(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, RuleOutcome::Matched { .. }))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    #[must_use]
    pub fn has_unprocessable(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, o)| matches!(o, RuleOutcome::Unprocessable(_)))
    }

    /// Student-facing notice when some rule could not be evaluated.
    ///
    /// Never exposes the underlying regex error.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        self.has_unprocessable().then_some(UNPROCESSABLE_FEEDBACK)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for GradingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score: {}", self.score)?;
        write!(f, ", matched: [{}]", self.matched().join(", "))?;
        if self.has_unprocessable() {
            write!(f, ", unprocessable rules present")?;
        }
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
