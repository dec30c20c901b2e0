use crate::{CompiledPattern, Flags};

/// Replacement for a literal space when infinite-space is on.
const SPACE_RUN: &str = r"(?:[ \t]+)";
/// Replacement for `;` when pipe-space is on.
const SEMICOLON: &str = r"(?:[ \t]*(?:;|\n)[ \t]*)";
/// Replacement for `\|` when pipe-space is on.
const PIPE: &str = r"(?:[ \t]*\|[ \t]*)";

/// Delimiter of the rendered pattern (`/.../flags`).
const DELIMITER: char = '/';

/// Rewrite a raw fragment into an anchored pattern according to `flags`.
///
/// Substitutions run in a fixed order: infinite-space, pipe/semicolon,
/// redirect. Every pass skips escape pairs, so `\ ` stays a single literal
/// space and `\;` stays a literal semicolon. `\<` and `\>` become plain
/// angle brackets, and the `/` delimiter is escaped. The result is wrapped
/// in a non-capturing group so a top-level alternation stays inside the
/// anchors.
#[must_use]
pub fn synthesize(fragment: &str, flags: Flags) -> CompiledPattern {
    let mut body = fragment.to_owned();
    if flags.infinite_space {
        body = expand_spaces(&body);
    }
    if flags.pipe_space {
        body = expand_pipes(&body);
    }
    if flags.redirect_space {
        body = expand_redirects(&body);
    }
    let body = normalize_escapes(&body);

    CompiledPattern {
        pattern: format!("^(?:{body})$"),
        ignore_case: flags.ignore_case,
        dot_all: flags.dot_all,
    }
}

fn expand_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => push_escape(&mut out, chars.next()),
            ' ' => out.push_str(SPACE_RUN),
            other => out.push(other),
        }
    }
    out
}

fn expand_pipes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('|') => out.push_str(PIPE),
                next => push_escape(&mut out, next),
            },
            ';' => out.push_str(SEMICOLON),
            other => out.push(other),
        }
    }
    out
}

fn expand_redirects(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => push_escape(&mut out, chars.next()),
            '(' => {
                out.push(c);
                // lookbehind and named group openers are not redirects
                if chars.next_if_eq(&'?').is_some() {
                    out.push('?');
                    if chars.next_if_eq(&'<').is_some() {
                        out.push('<');
                        if chars.peek().is_some_and(|next| next.is_alphabetic()) {
                            for name in chars.by_ref() {
                                out.push(name);
                                if name == '>' {
                                    break;
                                }
                            }
                        }
                    }
                }
            }
            '<' | '>' => {
                // `<<` and `>>` are one token, never two
                let doubled = chars.next_if_eq(&c).is_some();
                out.push_str(r"(?:[ \t]*");
                out.push(c);
                if doubled {
                    out.push(c);
                }
                out.push_str(r"[ \t]*)");
            }
            other => out.push(other),
        }
    }
    out
}

fn normalize_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                // PCRE reads these as literals; some engines as word boundaries
                Some(bracket @ ('<' | '>')) => out.push(bracket),
                next => push_escape(&mut out, next),
            },
            DELIMITER => {
                out.push('\\');
                out.push(DELIMITER);
            }
            other => out.push(other),
        }
    }
    out
}

fn push_escape(out: &mut String, escaped: Option<char>) {
    out.push('\\');
    if let Some(c) = escaped {
        out.push(c);
    }
}
