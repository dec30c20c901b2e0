mod compile;
mod engine;
mod evaluate;
pub mod parse;
#[cfg(feature = "binary-cache")]
pub mod serial;
mod synthesize;
mod types;

pub use engine::{PatternEngine, RegexEngine};
pub use synthesize::synthesize;
pub use types::{
    AnswerBuilder, AnswerRule, AuthoringError, CompileError, CompiledPattern, FeedbackFormat,
    Flags, GradedState, GradingReport, PatternError, RuleBody, RuleOutcome, RuleSet,
    RuleSetBuilder, ScoreResult, SlotError, ValidationError, DEFAULT_SEPARATOR,
    UNPROCESSABLE_FEEDBACK,
};

#[cfg(feature = "binary-cache")]
pub use serial::{DeserializeError, SerializeError};
