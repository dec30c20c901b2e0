use std::fmt;

use thiserror::Error;

/// Authoring-time problems found in one answer specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("illegal option '{option}'")]
    IllegalOption { option: char },

    #[error("unknown key '{key}'")]
    UnknownKey { key: String },

    #[error("key '{key}' is out of order; keys must appear in the order: {expected}")]
    KeyOutOfOrder { key: String, expected: String },

    #[error("unescaped anchor '{anchor}' in regex {fragment}; anchors are added automatically")]
    UnescapedAnchor { anchor: char, fragment: usize },

    #[error("no `[[regex]] /OPTIONS/` block found")]
    MalformedSpec,
}

/// Authoring-time problems concerning an answer slot or the whole answer set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthoringError {
    #[error(transparent)]
    Spec(#[from] ValidationError),

    #[error("grade or feedback set without a regular expression")]
    GradeWithoutRegex,

    #[error("at least one regular expression is required")]
    NoAnswers,

    #[error("one of the answers must have a grade of 100%")]
    NoFullGrade,
}

/// An [`AuthoringError`] tied to the answer slot it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotError {
    pub slot: usize,
    pub id: String,
    pub error: AuthoringError,
}

impl fmt::Display for SlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "answer {} ('{}'): {}", self.slot + 1, self.id, self.error)
    }
}

impl std::error::Error for SlotError {}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{} authoring error(s): {}", errors.len(), join(errors))]
    Invalid { errors: Vec<SlotError> },
}

impl CompileError {
    /// All collected slot errors.
    #[must_use]
    pub fn errors(&self) -> &[SlotError] {
        match self {
            Self::Invalid { errors } => errors,
        }
    }
}

fn join(errors: &[SlotError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A synthesized pattern that the regex engine refused to compile.
#[derive(Debug, Clone, Error)]
#[error("could not compile pattern `{pattern}`: {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}
