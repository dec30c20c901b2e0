use std::fmt;

use super::error::{CompileError, SlotError};
use super::grading_report::GradingReport;
use super::rule::{AnswerRule, FeedbackFormat};
use super::score::{GradedState, ScoreResult};
use crate::engine::{PatternEngine, RegexEngine};
use crate::parse::KeyProfile;

/// Builder for authoring a [`RuleSet`].
///
/// Unlike [`RuleSet::from_rules()`], compiling validates every answer slot
/// and the answer set as a whole.
///
/// # Example
///
/// ```
/// use regexmatch::RuleSetBuilder;
///
/// let ruleset = RuleSetBuilder::new()
///     .answer("1", "[[ls -l]]//", |a| a.fraction(1.0).feedback("Correct"))
///     .answer("2", "[[ls]]//", |a| a.fraction(0.5).feedback("Almost"))
///     .compile()
///     .unwrap();
///
/// let score = ruleset.grade("ls   -l");
/// assert_eq!(score.rule(), Some("1"));
/// assert_eq!(score.fraction(), 1.0);
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<AnswerRule>,
    profile: KeyProfile,
}

/// Intermediate builder passed to the answer definition closure.
#[derive(Debug)]
pub struct AnswerBuilder {
    fraction: f64,
    feedback: String,
    format: FeedbackFormat,
}

impl RuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose which `key=value` settings the specifications may use.
    #[must_use]
    pub fn profile(mut self, profile: KeyProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Add an answer slot. The closure sets the slot's fraction and feedback.
    #[must_use]
    pub fn answer(
        mut self,
        id: &str,
        spec: &str,
        f: impl FnOnce(AnswerBuilder) -> AnswerBuilder,
    ) -> Self {
        let answer = f(AnswerBuilder {
            fraction: 0.0,
            feedback: String::new(),
            format: FeedbackFormat::default(),
        });
        self.rules.push(
            AnswerRule::new(id, spec, answer.fraction).with_feedback(answer.feedback, answer.format),
        );
        self
    }

    /// Authoring errors of every slot, without consuming the builder.
    #[must_use]
    pub fn validate(&self) -> Vec<SlotError> {
        crate::compile::check(&self.rules, self.profile)
    }

    /// Validate the answers and build an immutable `RuleSet`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Invalid`] listing every authoring error found.
    pub fn compile(self) -> Result<RuleSet, CompileError> {
        crate::compile::compile(self.rules, self.profile)
    }
}

impl AnswerBuilder {
    /// Weight of the slot, normally in `[0, 1]`.
    #[must_use]
    pub fn fraction(mut self, fraction: f64) -> Self {
        self.fraction = fraction;
        self
    }

    /// HTML feedback shown when this slot is the best match.
    #[must_use]
    pub fn feedback(self, feedback: &str) -> Self {
        self.feedback_as(feedback, FeedbackFormat::Html)
    }

    #[must_use]
    pub fn feedback_as(mut self, feedback: &str, format: FeedbackFormat) -> Self {
        self.feedback = feedback.to_owned();
        self.format = format;
        self
    }
}

/// An ordered, immutable set of answer rules. Thread-safe and designed to live behind `Arc`.
#[derive(Debug)]
pub struct RuleSet {
    pub(crate) rules: Vec<AnswerRule>,
    engine: Box<dyn PatternEngine>,
}

impl RuleSet {
    /// Build a rule set from already-stored rules without validating them.
    ///
    /// This is the load path: every rule is kept, including ones whose
    /// specification no longer parses.
    #[must_use]
    pub fn from_rules(rules: Vec<AnswerRule>) -> Self {
        Self {
            rules,
            engine: Box::new(RegexEngine::new()),
        }
    }

    /// Replace the regex engine used for grading.
    #[must_use]
    pub fn with_engine(mut self, engine: impl PatternEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Grade a submitted answer.
    ///
    /// Returns the rule with the highest weighted fraction; ties go to the
    /// rule authored first. Credit is never summed across rules.
    pub fn grade(&self, answer: &str) -> ScoreResult {
        crate::evaluate::grade(&self.rules, answer, self.engine.as_ref())
    }

    /// Grade with per-rule diagnostics.
    pub fn grade_detailed(&self, answer: &str) -> GradingReport {
        crate::evaluate::grade_detailed(&self.rules, answer, self.engine.as_ref())
    }

    /// Whether a response counts as answered.
    #[must_use]
    pub fn is_complete_response(&self, answer: Option<&str>) -> bool {
        answer.is_some_and(|a| !a.is_empty())
    }

    /// Grade a response and classify the fraction. A missing or empty
    /// answer scores zero.
    #[must_use]
    pub fn grade_response(&self, answer: Option<&str>) -> (f64, GradedState) {
        let fraction = match answer {
            Some(answer) if !answer.is_empty() => self.grade(answer).fraction(),
            _ => 0.0,
        };
        (fraction, GradedState::for_fraction(fraction))
    }

    /// Look up a rule by id, e.g. to show the feedback of a [`ScoreResult`].
    #[must_use]
    pub fn rule(&self, id: &str) -> Option<&AnswerRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Rules in authored order.
    #[must_use]
    pub fn rules(&self) -> &[AnswerRule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(feature = "binary-cache")]
impl RuleSet {
    /// Encode the authored rules as a binary blob.
    ///
    /// When `source_text` is given, its BLAKE3 digest is stored with the
    /// rules; see [`serial::source_digest`](crate::serial::source_digest).
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if the rules cannot be encoded.
    pub fn to_bytes(
        &self,
        source_text: Option<&str>,
    ) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self, source_text)
    }

    /// Rebuild a rule set from a blob written by [`to_bytes`](Self::to_bytes),
    /// parsing every specification again.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) if the
    /// blob is truncated, corrupt, from another format version, or inconsistent.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }

    /// [`to_bytes`](Self::to_bytes), written to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding
    /// or writing fails.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
        source_text: Option<&str>,
    ) -> Result<(), crate::serial::SerializeError> {
        std::fs::write(path, self.to_bytes(source_text)?)?;
        Ok(())
    }

    /// [`from_bytes`](Self::from_bytes) on the contents of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) if the
    /// file cannot be read or holds no valid blob.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::serial::DeserializeError> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let any_order = self
            .rules
            .iter()
            .filter(|r| r.body.flags().match_any_order)
            .count();
        write!(
            f,
            "RuleSet({} rules, {} any-order)",
            self.rules.len(),
            any_order,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompiledPattern, PatternError};

    fn question() -> RuleSet {
        RuleSetBuilder::new()
            .answer("full", "[[a b]]//", |a| a.fraction(1.0).feedback("Right"))
            .answer("half", "[[a]]//", |a| a.fraction(0.5).feedback("Half"))
            .compile()
            .unwrap()
    }

    #[test]
    fn builder_collects_answers() {
        let builder = RuleSetBuilder::new()
            .answer("1", "[[x]]//", |a| a.fraction(1.0))
            .answer("2", "[[y]]//", |a| {
                a.fraction(0.25).feedback_as("y?", FeedbackFormat::Plain)
            });

        assert_eq!(builder.rules.len(), 2);
        assert_eq!(builder.rules[1].id(), "2");
        assert_eq!(builder.rules[1].fraction(), 0.25);
        assert_eq!(builder.rules[1].feedback(), "y?");
        assert_eq!(builder.rules[1].feedback_format(), FeedbackFormat::Plain);
        assert!(builder.validate().is_empty());
    }

    #[test]
    fn grade_picks_best_rule() {
        let rs = question();
        assert_eq!(rs.grade("a  b"), ScoreResult::matched("full", 1.0));
        assert_eq!(rs.grade("a"), ScoreResult::matched("half", 0.5));
        assert_eq!(rs.grade("b"), ScoreResult::none());
    }

    #[test]
    fn feedback_lookup() {
        let rs = question();
        let score = rs.grade("a");
        let rule = rs.rule(score.rule().unwrap()).unwrap();
        assert_eq!(rule.feedback(), "Half");
    }

    #[test]
    fn response_helpers() {
        let rs = question();
        assert!(rs.is_complete_response(Some("0")));
        assert!(!rs.is_complete_response(Some("")));
        assert!(!rs.is_complete_response(None));
        assert_eq!(rs.grade_response(Some("a b")), (1.0, GradedState::Right));
        assert_eq!(rs.grade_response(Some("a")), (0.5, GradedState::Partial));
        assert_eq!(rs.grade_response(None), (0.0, GradedState::Wrong));
    }

    #[derive(Debug)]
    struct AlwaysFails;

    impl PatternEngine for AlwaysFails {
        fn compile_and_match(
            &self,
            pattern: &CompiledPattern,
            _subject: &str,
        ) -> Result<bool, PatternError> {
            Err(PatternError {
                pattern: pattern.to_string(),
                message: "unsupported".into(),
            })
        }
    }

    #[test]
    fn custom_engine_failure_scores_zero() {
        let rs = question().with_engine(AlwaysFails);
        assert_eq!(rs.grade("a b"), ScoreResult::none());
        assert!(rs.grade_detailed("a b").has_unprocessable());
    }

    #[test]
    fn display() {
        let rs = RuleSet::from_rules(vec![
            AnswerRule::new("1", "[[a]] [[b]]/O/", 1.0),
            AnswerRule::new("2", "[[a]]//", 0.5),
        ]);
        assert_eq!(rs.to_string(), "RuleSet(2 rules, 1 any-order)");
    }
}
