use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, preceded};
use winnow::error::{ContextError, ErrMode, ModalResult};
use winnow::prelude::*;
use winnow::token::{rest, take_while};

use super::keys::Key;

/// The three parts of a specification, borrowed from the normalized input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sections<'i> {
    pub(crate) fragments: Vec<&'i str>,
    pub(crate) options: &'i str,
    pub(crate) key_values: &'i str,
}

// -- Current syntax: [[a]] [[b]] /OPTIONS/ -----------------------------------

/// `]]`, optional whitespace, then `/LETTERS/`. Yields the letters.
fn options_marker<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded(
        ("]]", multispace0),
        delimited(
            '/',
            take_while(0.., |c: char| c.is_ascii_alphabetic()),
            '/',
        ),
    )
    .parse_next(input)
}

/// `]]`, optional whitespace, `[[` between two fragments.
fn fragment_gap(input: &mut &str) -> ModalResult<()> {
    ("]]", multispace0, "[[").void().parse_next(input)
}

/// Try `parser` at every `]` of `haystack` and stop at the first success.
///
/// Returns the text before the match, the parser's output and the text
/// after the match.
fn find_first<'i, O>(
    haystack: &'i str,
    mut parser: impl Parser<&'i str, O, ErrMode<ContextError>>,
) -> Option<(&'i str, O, &'i str)> {
    haystack.match_indices(']').find_map(|(at, _)| {
        let mut input = &haystack[at..];
        parser
            .parse_next(&mut input)
            .ok()
            .map(|out| (&haystack[..at], out, input))
    })
}

/// Split a carriage-return-free specification in the current syntax.
pub(crate) fn current_sections(spec: &str) -> Option<Sections<'_>> {
    let (head, options, key_values) = find_first(spec, options_marker)?;
    let head = head.trim();
    let mut block = head.strip_prefix("[[").unwrap_or(head);

    let mut fragments = Vec::new();
    while let Some((fragment, (), after)) = find_first(block, fragment_gap) {
        fragments.push(fragment);
        block = after;
    }
    fragments.push(block);

    Some(Sections {
        fragments,
        options,
        key_values,
    })
}

// -- Legacy syntax: regex/OPTIONS/ --------------------------------------------

/// Split a carriage-return-free specification in the legacy syntax.
///
/// The first line is the regex followed by a `/OPTIONS/` suffix of
/// uppercase letters; any further lines are the key-value block.
pub(crate) fn legacy_sections(spec: &str) -> Option<Sections<'_>> {
    let spec = spec.trim();
    let (first, key_values) = spec.split_once('\n').unwrap_or((spec, ""));

    let open = first.trim_end().strip_suffix('/')?;
    let fragment_end = open.trim_end_matches(|c: char| c.is_ascii_uppercase());
    let options = &open[fragment_end.len()..];
    let fragment = fragment_end.strip_suffix('/')?;

    Some(Sections {
        fragments: vec![fragment],
        options,
        key_values,
    })
}

// -- Key-value lines ----------------------------------------------------------

fn key_prefix(input: &mut &str) -> ModalResult<Key> {
    alt((
        "separator=".value(Key::Separator),
        "comment=".value(Key::Comment),
        "feedback=".value(Key::Feedback),
        "points=".value(Key::Points),
        "size=".value(Key::Size),
    ))
    .parse_next(input)
}

/// One `key=value` line; the value is the rest of the line, untrimmed.
pub(crate) fn key_value<'i>(input: &mut &'i str) -> ModalResult<(Key, &'i str)> {
    (key_prefix, rest).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_fragment() {
        let s = current_sections("[[abc]]/I/").unwrap();
        assert_eq!(s.fragments, vec!["abc"]);
        assert_eq!(s.options, "I");
        assert_eq!(s.key_values, "");
    }

    #[test]
    fn whitespace_before_options() {
        let s = current_sections("[[abc]] \n /IO/\nseparator=,").unwrap();
        assert_eq!(s.fragments, vec!["abc"]);
        assert_eq!(s.options, "IO");
        assert_eq!(s.key_values, "\nseparator=,");
    }

    #[test]
    fn multiple_fragments() {
        let s = current_sections("[[a]] [[b]]\n[[c]]/O/").unwrap();
        assert_eq!(s.fragments, vec!["a", "b", "c"]);
    }

    #[test]
    fn fragment_ending_in_bracket() {
        let s = current_sections("[[[abc]]]//").unwrap();
        assert_eq!(s.fragments, vec!["[abc]"]);
    }

    #[test]
    fn first_marker_wins() {
        let s = current_sections("[[a]]//\ncomment=[[b]]/I/").unwrap();
        assert_eq!(s.fragments, vec!["a"]);
        assert_eq!(s.options, "");
        assert_eq!(s.key_values, "\ncomment=[[b]]/I/");
    }

    #[test]
    fn slash_inside_fragment() {
        let s = current_sections("[[a/b]]//").unwrap();
        assert_eq!(s.fragments, vec!["a/b"]);
    }

    #[test]
    fn no_marker() {
        assert!(current_sections("[[abc]]").is_none());
        assert!(current_sections("[[abc]]/I").is_none());
        assert!(current_sections("abc/I/").is_none());
    }

    #[test]
    fn legacy_suffix() {
        let s = legacy_sections("ab c/IS/").unwrap();
        assert_eq!(s.fragments, vec!["ab c"]);
        assert_eq!(s.options, "IS");
    }

    #[test]
    fn legacy_empty_options_and_key_lines() {
        let s = legacy_sections("a|b//\nseparator=,").unwrap();
        assert_eq!(s.fragments, vec!["a|b"]);
        assert_eq!(s.options, "");
        assert_eq!(s.key_values, "separator=,");
    }

    #[test]
    fn legacy_requires_uppercase_suffix() {
        assert!(legacy_sections("a/b/").is_none());
        assert!(legacy_sections("abc").is_none());
        assert!(legacy_sections("abc/").is_none());
    }

    #[test]
    fn key_value_lines() {
        assert_eq!(
            key_value.parse("separator=,").unwrap(),
            (Key::Separator, ",")
        );
        assert_eq!(key_value.parse("points=").unwrap(), (Key::Points, ""));
        assert!(key_value.parse("foo=bar").is_err());
        assert!(key_value.parse("separator").is_err());
    }
}
