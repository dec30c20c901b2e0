use super::grammar::{self, Sections};
use super::keys::{self, KeyLine, KeyProfile};
use crate::{Flags, ValidationError};

/// Check an answer specification for authoring errors.
///
/// Every problem is collected rather than stopping at the first one:
/// illegal option letters, unescaped `^`/`$` anchors, unknown keys, keys
/// out of order, and a missing options block. Parsing itself accepts all of
/// these; validation is what keeps them out of new questions.
#[must_use]
pub fn validate(spec: &str, profile: KeyProfile) -> Vec<ValidationError> {
    let spec = spec.replace('\r', "");
    let mut errors = Vec::new();

    if let Some(sections) = grammar::current_sections(&spec) {
        check_sections(&sections, Flags::OPTION_LETTERS, profile, &mut errors);
    } else if let Some(sections) = grammar::legacy_sections(&spec) {
        check_sections(&sections, Flags::LEGACY_OPTION_LETTERS, profile, &mut errors);
    } else {
        errors.push(ValidationError::MalformedSpec);
    }

    errors
}

fn check_sections(
    sections: &Sections<'_>,
    allowed_letters: &str,
    profile: KeyProfile,
    errors: &mut Vec<ValidationError>,
) {
    for option in sections.options.chars() {
        if !allowed_letters.contains(option) {
            errors.push(ValidationError::IllegalOption { option });
        }
    }

    for (idx, fragment) in sections.fragments.iter().enumerate() {
        if let Some(anchor) = find_unescaped_anchor(fragment) {
            errors.push(ValidationError::UnescapedAnchor {
                anchor,
                fragment: idx + 1,
            });
        }
    }

    check_keys(sections.key_values, profile, errors);
}

fn check_keys(block: &str, profile: KeyProfile, errors: &mut Vec<ValidationError>) {
    let mut last = None;
    for line in keys::key_lines(block) {
        match line {
            KeyLine::Setting(key, _) if !profile.allows(key) => {
                errors.push(ValidationError::UnknownKey {
                    key: key.name().to_owned(),
                });
            }
            KeyLine::Setting(key, _) => {
                if last.is_some_and(|prev| key <= prev) {
                    errors.push(ValidationError::KeyOutOfOrder {
                        key: key.name().to_owned(),
                        expected: profile.expected_order(),
                    });
                } else {
                    last = Some(key);
                }
            }
            KeyLine::Unknown(line) => {
                let key = line.split_once('=').map_or(line, |(key, _)| key);
                errors.push(ValidationError::UnknownKey {
                    key: key.trim_end().to_owned(),
                });
            }
        }
    }
}

/// First `^` or `$` that acts as an anchor.
///
/// Escaped characters are skipped, and inside a character class `^` and `$`
/// are ordinary characters (`[^a]`, `[$€]`). Classes do not nest: a `[`
/// inside a class is a member unless it opens a POSIX class like `[:alpha:]`.
pub(crate) fn find_unescaped_anchor(fragment: &str) -> Option<char> {
    let mut chars = fragment.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' if !in_class => {
                in_class = true;
                // a leading `]` (after an optional `^`) is a literal member
                chars.next_if_eq(&'^');
                chars.next_if_eq(&']');
            }
            '[' if chars.next_if_eq(&':').is_some() => {
                while let Some(member) = chars.next() {
                    if member == ':' && chars.next_if_eq(&']').is_some() {
                        break;
                    }
                }
            }
            ']' if in_class => in_class = false,
            '^' | '$' if !in_class => return Some(c),
            _ => {}
        }
    }
    None
}
