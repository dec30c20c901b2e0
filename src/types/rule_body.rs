use super::error::PatternError;
use super::flags::Flags;
use crate::engine::PatternEngine;

/// Separator used to split an answer in match-any-order mode unless the
/// specification sets `separator=`.
pub const DEFAULT_SEPARATOR: &str = "\n";

/// The parsed form of one answer specification.
///
/// Produced by [`parse()`](crate::parse::parse); immutable afterwards.
/// `regex_fragments` is never empty: a specification that cannot be parsed
/// yields a single empty fragment. That degenerate body scores zero against
/// every answer, blank answers included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBody {
    pub(crate) regex_fragments: Vec<String>,
    pub(crate) flags: Flags,
    pub(crate) separator: String,
    pub(crate) comment: Option<String>,
    pub(crate) feedback_override: Option<String>,
    pub(crate) points: Option<u32>,
    pub(crate) size: Option<u32>,
}

impl Default for RuleBody {
    fn default() -> Self {
        Self::new(vec![String::new()], Flags::default())
    }
}

impl RuleBody {
    pub(crate) fn new(regex_fragments: Vec<String>, flags: Flags) -> Self {
        let regex_fragments = if regex_fragments.is_empty() {
            vec![String::new()]
        } else {
            regex_fragments
        };
        Self {
            regex_fragments,
            flags,
            separator: DEFAULT_SEPARATOR.to_owned(),
            comment: None,
            feedback_override: None,
            points: None,
            size: None,
        }
    }

    /// The degenerate body used when no grammar accepts the specification.
    #[must_use]
    pub fn degenerate() -> Self {
        Self::default()
    }

    /// Raw regex fragments in authored order.
    #[must_use]
    pub fn regex_fragments(&self) -> &[String] {
        &self.regex_fragments
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Separator used to split an answer in match-any-order mode.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    #[must_use]
    pub fn feedback_override(&self) -> Option<&str> {
        self.feedback_override.as_deref()
    }

    /// Points of an embedded answer field. Not used by top-level scoring.
    #[must_use]
    pub fn points(&self) -> Option<u32> {
        self.points
    }

    /// Input size of an embedded answer field. Not used by top-level scoring.
    #[must_use]
    pub fn size(&self) -> Option<u32> {
        self.size
    }

    /// True if this body is the degenerate single-empty-fragment rule.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.regex_fragments.len() == 1 && self.regex_fragments[0].is_empty()
    }

    /// Score `answer` against this body, returning an unweighted fraction in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the engine cannot compile one of the
    /// synthesized patterns.
    pub fn score(&self, answer: &str, engine: &dyn PatternEngine) -> Result<f64, PatternError> {
        crate::evaluate::score_body(self, answer, engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_degenerate() {
        let body = RuleBody::default();
        assert!(body.is_degenerate());
        assert_eq!(body.separator(), "\n");
        assert_eq!(body.flags(), Flags::default());
    }

    #[test]
    fn empty_fragment_list_is_replaced() {
        let body = RuleBody::new(Vec::new(), Flags::default());
        assert_eq!(body.regex_fragments(), &[String::new()]);
    }

    #[test]
    fn non_empty_fragment_is_not_degenerate() {
        let body = RuleBody::new(vec!["a".into()], Flags::default());
        assert!(!body.is_degenerate());
    }

    #[test]
    fn degenerate_body_scores_zero() {
        let engine = crate::RegexEngine::new();
        let body = RuleBody::degenerate();
        for answer in ["", "  ", "\n\t\n", "anything"] {
            assert_eq!(body.score(answer, &engine).unwrap(), 0.0, "{answer:?}");
        }
    }
}
