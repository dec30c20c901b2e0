use std::fmt;

/// The grammar a specification was tried against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// `[[regex]] /OPTIONS/` followed by `key=value` lines.
    Current,
    /// A single `regex/OPTIONS/` line with uppercase letters.
    Legacy,
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
        })
    }
}

/// A specification that one grammar does not accept.
///
/// [`parse()`](super::parse) swallows it: a spec the current grammar rejects
/// goes to the legacy grammar, and one both reject becomes the degenerate
/// rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    syntax: Syntax,
    missing: &'static str,
}

impl ParseError {
    pub(crate) fn new(syntax: Syntax, missing: &'static str) -> Self {
        Self { syntax, missing }
    }

    /// The grammar that rejected the specification.
    #[must_use]
    pub fn syntax(&self) -> Syntax {
        self.syntax
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a {} specification: no {} found", self.syntax, self.missing)
    }
}

impl std::error::Error for ParseError {}
