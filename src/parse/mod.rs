mod error;
mod grammar;
mod keys;
mod validate;

pub use error::{ParseError, Syntax};
pub use keys::{Key, KeyProfile};
pub use validate::validate;

use crate::{Flags, RuleBody};

/// Parse an answer specification into a [`RuleBody`].
///
/// The current `[[regex]] /OPTIONS/` syntax is tried first, then the legacy
/// `regex/OPTIONS/` syntax. If neither applies the result is the degenerate
/// single-empty-fragment body. Parsing never fails.
#[must_use]
pub fn parse(spec: &str) -> RuleBody {
    parse_current(spec)
        .or_else(|_| parse_legacy(spec))
        .unwrap_or_else(|err| {
            tracing::debug!("{err}; falling back to an empty rule");
            RuleBody::degenerate()
        })
}

/// Parse the current syntax: `[[a]] [[b]] /OPTIONS/` followed by `key=value` lines.
///
/// Option letters toggle flags (uppercase on, lowercase off); unrecognized
/// letters and lines are ignored here and reported by [`validate()`].
///
/// # Errors
///
/// Returns [`ParseError`] if the input has no `]] /OPTIONS/` marker.
pub fn parse_current(spec: &str) -> Result<RuleBody, ParseError> {
    let spec = spec.replace('\r', "");
    let sections = grammar::current_sections(&spec)
        .ok_or_else(|| ParseError::new(Syntax::Current, "`]] /OPTIONS/` marker"))?;

    let body = RuleBody::new(
        sections.fragments.iter().map(|&f| f.to_owned()).collect(),
        Flags::from_options(sections.options),
    );
    Ok(keys::apply(body, sections.key_values))
}

/// Parse the legacy syntax: one regex terminated by `/OPTIONS/`.
///
/// Legacy letters are uppercase only. `I`, `D`, `P`, `R` and `O` turn their
/// flag on; `S` and `T` turn infinite-space and trim-spaces off.
///
/// # Errors
///
/// Returns [`ParseError`] if the first line does not end in a `/OPTIONS/` suffix.
pub fn parse_legacy(spec: &str) -> Result<RuleBody, ParseError> {
    let spec = spec.replace('\r', "");
    let sections = grammar::legacy_sections(&spec)
        .ok_or_else(|| ParseError::new(Syntax::Legacy, "trailing `/OPTIONS/` suffix"))?;

    let mut flags = Flags::default();
    for letter in sections.options.chars() {
        flags.apply_legacy_option(letter);
    }
    let body = RuleBody::new(
        sections.fragments.iter().map(|&f| f.to_owned()).collect(),
        flags,
    );
    Ok(keys::apply(body, sections.key_values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let body = parse("[[a b]]//");
        assert_eq!(body.regex_fragments(), &["a b"]);
        assert_eq!(body.flags(), Flags::default());
        assert_eq!(body.separator(), "\n");
        assert_eq!(body.comment(), None);
    }

    #[test]
    fn parse_options_and_keys() {
        let body = parse("[[a]]\n[[b]]\n/IOs/\nseparator=;\ncomment=two commands");
        assert_eq!(body.regex_fragments(), &["a", "b"]);
        let flags = body.flags();
        assert!(flags.ignore_case);
        assert!(flags.match_any_order);
        assert!(!flags.infinite_space);
        assert!(flags.trim_spaces);
        assert_eq!(body.separator(), ";");
        assert_eq!(body.comment(), Some("two commands"));
    }

    #[test]
    fn parse_strips_carriage_returns() {
        let body = parse("[[a]]\r\n[[b]]/O/\r\nseparator=,\r\n");
        assert_eq!(body.regex_fragments(), &["a", "b"]);
        assert_eq!(body.separator(), ",");
    }

    #[test]
    fn parse_cloze_keys() {
        let body = parse("[[x]]//\nfeedback=Nice\npoints=2\nsize=10");
        assert_eq!(body.feedback_override(), Some("Nice"));
        assert_eq!(body.points(), Some(2));
        assert_eq!(body.size(), Some(10));
    }

    #[test]
    fn parse_legacy_syntax() {
        let body = parse("ab c/IS/");
        assert_eq!(body.regex_fragments(), &["ab c"]);
        let flags = body.flags();
        assert!(flags.ignore_case);
        assert!(!flags.infinite_space);
        assert!(flags.trim_spaces);
    }

    #[test]
    fn legacy_defaults_keep_space_flags_on() {
        let body = parse_legacy("abc//").unwrap();
        assert_eq!(body.flags(), Flags::default());
    }

    #[test]
    fn each_grammar_reports_itself() {
        assert_eq!(parse_current("abc/I/").unwrap_err().syntax(), Syntax::Current);
        let err = parse_legacy("[[abc").unwrap_err();
        assert_eq!(err.syntax(), Syntax::Legacy);
        assert!(err.to_string().starts_with("not a legacy specification"));
    }

    #[test]
    fn current_syntax_is_preferred() {
        assert!(parse_current("abc/I/").is_err());
        // the legacy grammar alone would keep the brackets
        assert_eq!(parse_legacy("[[abc]]/I/").unwrap().regex_fragments(), &["[[abc]]"]);
        assert_eq!(parse("[[abc]]/I/").regex_fragments(), &["abc"]);
    }

    #[test]
    fn unparsable_yields_degenerate_body() {
        for spec in ["", "[[abc", "just text", "[[a]]/I"] {
            let body = parse(spec);
            assert!(body.is_degenerate(), "expected degenerate body for {spec:?}");
        }
    }

    #[test]
    fn parse_is_idempotent() {
        let spec = "[[a]] [[b c]]/IOp/\nseparator=,\ncomment=x";
        assert_eq!(parse(spec), parse(spec));
    }

    #[test]
    fn unknown_option_letters_are_ignored() {
        assert_eq!(parse("[[a]]/XyZ/").flags(), Flags::default());
    }
}
