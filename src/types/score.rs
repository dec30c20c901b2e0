use std::fmt;

/// The outcome of grading one submission: the best-matching rule, if any,
/// and the resulting fraction in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ScoreResult {
    rule: Option<String>,
    fraction: f64,
}

impl fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule {
            Some(id) => write!(f, "{id} = {}", self.fraction),
            None => write!(f, "no match = {}", self.fraction),
        }
    }
}

impl ScoreResult {
    /// A result naming the matched rule. The fraction is clamped to `[0, 1]`.
    pub fn matched(rule: impl Into<String>, fraction: f64) -> Self {
        Self {
            rule: Some(rule.into()),
            fraction: fraction.clamp(0.0, 1.0),
        }
    }

    /// No rule matched.
    pub fn none() -> Self {
        Self {
            rule: None,
            fraction: 0.0,
        }
    }

    /// Identifier of the best-matching rule.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        self.rule.is_some()
    }
}

/// How a graded fraction is presented to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradedState {
    Right,
    Partial,
    Wrong,
}

impl GradedState {
    const TOLERANCE: f64 = 0.000_001;

    #[must_use]
    pub fn for_fraction(fraction: f64) -> Self {
        if fraction < Self::TOLERANCE {
            Self::Wrong
        } else if fraction > 1.0 - Self::TOLERANCE {
            Self::Right
        } else {
            Self::Partial
        }
    }
}

impl fmt::Display for GradedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Right => "gradedright",
            Self::Partial => "gradedpartial",
            Self::Wrong => "gradedwrong",
        };
        f.write_str(s)
    }
}
