use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use fancy_regex::Regex;

use crate::{CompiledPattern, PatternError};

/// The regex capability the grader needs: compile a synthesized pattern and
/// test whether it matches a subject.
///
/// Implementations must be thread-safe; a [`RuleSet`](crate::RuleSet) shares
/// one engine across every grading call.
pub trait PatternEngine: fmt::Debug + Send + Sync {
    /// Returns whether `pattern` matches `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern cannot be compiled or matching
    /// gives up.
    fn compile_and_match(
        &self,
        pattern: &CompiledPattern,
        subject: &str,
    ) -> Result<bool, PatternError>;
}

/// [`PatternEngine`] backed by the backtracking `fancy-regex` crate.
///
/// Lookahead, lookbehind and backreferences are supported. Modifiers are
/// applied as an inline `(?is)` prefix. Compiled regexes are cached by their
/// [`CompiledPattern`], so repeated grading of the same rule set compiles
/// each pattern once.
#[derive(Debug, Default)]
pub struct RegexEngine {
    cache: RwLock<HashMap<CompiledPattern, Regex>>,
}

impl RegexEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached compiled patterns.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    fn regex_for(&self, pattern: &CompiledPattern) -> Result<Regex, PatternError> {
        if let Some(re) = self
            .cache
            .read()
            .ok()
            .and_then(|cache| cache.get(pattern).cloned())
        {
            return Ok(re);
        }

        let modifiers = pattern.modifiers();
        let source = if modifiers.is_empty() {
            pattern.as_str().to_owned()
        } else {
            format!("(?{modifiers}){}", pattern.as_str())
        };
        let re = Regex::new(&source).map_err(|e| pattern_error(pattern, &e))?;

        // A poisoned cache only costs a recompile next time.
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(pattern.clone(), re.clone());
        }
        Ok(re)
    }
}

impl PatternEngine for RegexEngine {
    fn compile_and_match(
        &self,
        pattern: &CompiledPattern,
        subject: &str,
    ) -> Result<bool, PatternError> {
        self.regex_for(pattern)?
            .is_match(subject)
            .map_err(|e| pattern_error(pattern, &e))
    }
}

fn pattern_error(pattern: &CompiledPattern, err: &fancy_regex::Error) -> PatternError {
    PatternError {
        pattern: pattern.to_string(),
        message: err.to_string(),
    }
}
