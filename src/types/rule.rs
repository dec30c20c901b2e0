use super::rule_body::RuleBody;

/// Format of a rule's feedback text, using the host's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "binary-cache", derive(serde::Serialize, serde::Deserialize))]
pub enum FeedbackFormat {
    Moodle,
    #[default]
    Html,
    Plain,
    Markdown,
}

impl FeedbackFormat {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Moodle => 0,
            Self::Html => 1,
            Self::Plain => 2,
            Self::Markdown => 4,
        }
    }

    /// Unknown codes fall back to HTML.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Moodle,
            2 => Self::Plain,
            4 => Self::Markdown,
            _ => Self::Html,
        }
    }
}

/// One instructor-authored answer slot.
///
/// The specification text is parsed when the rule is constructed and never
/// again. An unparsable specification yields the degenerate rule, which
/// never matches, rather than an error. The fraction is the caller's grading
/// policy and is stored as given.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRule {
    pub(crate) id: String,
    pub(crate) spec: String,
    pub(crate) fraction: f64,
    pub(crate) feedback: String,
    pub(crate) feedback_format: FeedbackFormat,
    pub(crate) body: RuleBody,
}

impl AnswerRule {
    pub fn new(id: impl Into<String>, spec: impl Into<String>, fraction: f64) -> Self {
        let spec = spec.into();
        let body = crate::parse::parse(&spec);
        Self {
            id: id.into(),
            spec,
            fraction,
            feedback: String::new(),
            feedback_format: FeedbackFormat::default(),
            body,
        }
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: impl Into<String>, format: FeedbackFormat) -> Self {
        self.feedback = feedback.into();
        self.feedback_format = format;
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The raw specification text as authored.
    #[must_use]
    pub fn spec(&self) -> &str {
        &self.spec
    }

    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// The feedback to display: the specification's `feedback=` line if
    /// present, otherwise the rule's own feedback.
    #[must_use]
    pub fn feedback(&self) -> &str {
        self.body.feedback_override().unwrap_or(&self.feedback)
    }

    #[must_use]
    pub fn feedback_format(&self) -> FeedbackFormat {
        self.feedback_format
    }

    #[must_use]
    pub fn body(&self) -> &RuleBody {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_on_construction() {
        let rule = AnswerRule::new("a1", "[[a]] [[b]]/O/", 1.0);
        assert_eq!(rule.body().regex_fragments(), &["a", "b"]);
        assert!(rule.body().flags().match_any_order);
        assert_eq!(rule.spec(), "[[a]] [[b]]/O/");
    }

    #[test]
    fn invalid_spec_is_kept_as_degenerate_rule() {
        let rule = AnswerRule::new("a1", "[[oops", 1.0);
        assert!(rule.body().is_degenerate());
        assert_eq!(rule.spec(), "[[oops");
    }

    #[test]
    fn feedback_override_wins() {
        let rule = AnswerRule::new("a1", "[[a]]//\nfeedback=From spec", 1.0)
            .with_feedback("From slot", FeedbackFormat::Plain);
        assert_eq!(rule.feedback(), "From spec");
        assert_eq!(rule.feedback_format(), FeedbackFormat::Plain);

        let rule = AnswerRule::new("a2", "[[a]]//", 1.0).with_feedback("From slot", FeedbackFormat::Html);
        assert_eq!(rule.feedback(), "From slot");
    }

    #[test]
    fn feedback_format_codes() {
        for format in [
            FeedbackFormat::Moodle,
            FeedbackFormat::Html,
            FeedbackFormat::Plain,
            FeedbackFormat::Markdown,
        ] {
            assert_eq!(FeedbackFormat::from_code(format.code()), format);
        }
        assert_eq!(FeedbackFormat::from_code(9), FeedbackFormat::Html);
    }
}
