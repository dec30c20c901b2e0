mod error;
mod flags;
mod grading_report;
mod pattern;
mod rule;
mod rule_body;
mod ruleset;
mod score;

pub use error::{AuthoringError, CompileError, PatternError, SlotError, ValidationError};
pub use flags::Flags;
pub use grading_report::{GradingReport, RuleOutcome, UNPROCESSABLE_FEEDBACK};
pub use pattern::CompiledPattern;
pub use rule::{AnswerRule, FeedbackFormat};
pub use rule_body::{RuleBody, DEFAULT_SEPARATOR};
pub use ruleset::{AnswerBuilder, RuleSet, RuleSetBuilder};
pub use score::{GradedState, ScoreResult};
