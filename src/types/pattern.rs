use std::fmt;

/// An anchored, flag-decorated pattern ready for a [`PatternEngine`](crate::PatternEngine).
///
/// Derived deterministically from a raw fragment and its [`Flags`](super::Flags)
/// by [`synthesize()`](crate::synthesize). Never persisted; equal inputs give
/// equal patterns, so it doubles as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompiledPattern {
    pub(crate) pattern: String,
    pub(crate) ignore_case: bool,
    pub(crate) dot_all: bool,
}

impl CompiledPattern {
    /// The pattern text, including anchors and the outer non-capturing group.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    #[must_use]
    pub fn dot_all(&self) -> bool {
        self.dot_all
    }

    /// Modifier letters in PCRE notation (`i`, `s`).
    #[must_use]
    pub fn modifiers(&self) -> String {
        let mut out = String::new();
        if self.ignore_case {
            out.push('i');
        }
        if self.dot_all {
            out.push('s');
        }
        out
    }
}

impl fmt::Display for CompiledPattern {
    /// Renders the delimited form, e.g. `/^(?:a\/b)$/i`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.modifiers())
    }
}
