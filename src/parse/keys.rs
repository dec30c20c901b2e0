use std::fmt;

use winnow::Parser;

use super::grammar;
use crate::RuleBody;

/// A recognized `key=value` setting, in the order keys must be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Separator,
    Comment,
    Feedback,
    Points,
    Size,
}

impl Key {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Separator => "separator",
            Self::Comment => "comment",
            Self::Feedback => "feedback",
            Self::Points => "points",
            Self::Size => "size",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which keys an answer specification may use.
///
/// The parser reads every recognized key regardless; the profile only
/// matters for authoring-time validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyProfile {
    /// A standalone regex question: `separator`, `comment`.
    Question,
    /// Every recognized key; used by answer fields embedded in a cloze text.
    #[default]
    Cloze,
}

impl KeyProfile {
    #[must_use]
    pub fn allowed(self) -> &'static [Key] {
        match self {
            Self::Question => &[Key::Separator, Key::Comment],
            Self::Cloze => &[
                Key::Separator,
                Key::Comment,
                Key::Feedback,
                Key::Points,
                Key::Size,
            ],
        }
    }

    #[must_use]
    pub fn allows(self, key: Key) -> bool {
        self.allowed().contains(&key)
    }

    /// The allowed keys in their required order, comma separated.
    #[must_use]
    pub fn expected_order(self) -> String {
        self.allowed()
            .iter()
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A line of the key-value block. Keys must start the line; an indented
/// `key=value` is an unknown line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyLine<'i> {
    Setting(Key, &'i str),
    Unknown(&'i str),
}

/// Non-blank lines of the key-value block.
pub(crate) fn key_lines(block: &str) -> impl Iterator<Item = KeyLine<'_>> {
    block
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match grammar::key_value.parse(line) {
            Ok((key, value)) => KeyLine::Setting(key, value),
            Err(_) => KeyLine::Unknown(line),
        })
}

/// Assign every recognized setting of `block` to `body`. Later lines win.
pub(crate) fn apply(mut body: RuleBody, block: &str) -> RuleBody {
    for line in key_lines(block) {
        let KeyLine::Setting(key, value) = line else {
            continue;
        };
        match key {
            Key::Separator => body.separator = value.to_owned(),
            Key::Comment => body.comment = Some(value.to_owned()),
            Key::Feedback => body.feedback_override = Some(value.to_owned()),
            Key::Points => body.points = value.trim().parse().ok(),
            Key::Size => body.size = value.trim().parse().ok(),
        }
    }
    body
}
