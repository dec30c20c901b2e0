//! Binary cache for rule sets.
//!
//! A blob is a 32-byte header followed by a bincode payload:
//!
//! ```text
//! Offset  Size  Field
//! 0       4     b"RXMQ"
//! 4       2     format version, u16 LE
//! 6       2     engine version, u16 LE (informational)
//! 8       4     reserved, zero
//! 12      4     payload length, u32 LE
//! 16      16    first 16 bytes of the payload's BLAKE3 hash
//! 32..          payload
//! ```
//!
//! The payload holds what an author wrote: each rule's id, raw
//! specification, fraction and feedback. Specifications are parsed again
//! when a blob is loaded and compiled patterns are never stored, so a blob
//! written by an older parser still grades with the current one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AnswerRule, FeedbackFormat, RuleSet};

const MAGIC: [u8; 4] = *b"RXMQ";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;
const CHECKSUM_SIZE: usize = 16;

/// Failure to write a [`RuleSet`](crate::RuleSet) blob.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("could not encode rule set: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("payload of {0} bytes does not fit the header's length field")]
    TooLarge(usize),

    #[error("could not write rule set: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to read a [`RuleSet`](crate::RuleSet) blob.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a regexmatch rule set: bad magic bytes")]
    BadMagic,

    #[error("rule set blob has format v{blob}, this build reads v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("rule set blob is corrupt: checksum mismatch")]
    ChecksumMismatch,

    #[error("rule set blob is truncated: expected {expected} bytes, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("could not decode rule set payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("inconsistent rule set payload: {0}")]
    Validation(String),

    #[error("could not read rule set: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    source_digest: Option<[u8; 32]>,
    rule_count: u32,
    rules: Vec<StoredRule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRule {
    id: String,
    spec: String,
    fraction: f64,
    feedback: String,
    feedback_format: FeedbackFormat,
}

impl From<&AnswerRule> for StoredRule {
    fn from(rule: &AnswerRule) -> Self {
        Self {
            id: rule.id.clone(),
            spec: rule.spec.clone(),
            fraction: rule.fraction,
            feedback: rule.feedback.clone(),
            feedback_format: rule.feedback_format,
        }
    }
}

impl StoredRule {
    fn into_rule(self) -> AnswerRule {
        AnswerRule::new(self.id, self.spec, self.fraction)
            .with_feedback(self.feedback, self.feedback_format)
    }
}

impl Payload {
    fn check(&self) -> Result<(), DeserializeError> {
        if self.rule_count as usize != self.rules.len() {
            return Err(DeserializeError::Validation(format!(
                "payload announces {} rules but holds {}",
                self.rule_count,
                self.rules.len()
            )));
        }
        if let Some(rule) = self.rules.iter().find(|r| !r.fraction.is_finite()) {
            return Err(DeserializeError::Validation(format!(
                "rule '{}' has a non-finite fraction",
                rule.id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    format_version: u16,
    payload_len: u32,
    checksum: [u8; CHECKSUM_SIZE],
}

impl Header {
    fn for_payload(payload: &[u8]) -> Result<Self, SerializeError> {
        let payload_len =
            u32::try_from(payload.len()).map_err(|_| SerializeError::TooLarge(payload.len()))?;
        Ok(Self {
            format_version: FORMAT_VERSION,
            payload_len,
            checksum: checksum(payload),
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.format_version.to_le_bytes());
        out.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&self.payload_len.to_le_bytes());
        out.extend_from_slice(&self.checksum);
    }

    fn read(bytes: &[u8]) -> Result<Self, DeserializeError> {
        let Some(header) = bytes.get(..HEADER_SIZE) else {
            return Err(DeserializeError::LengthMismatch {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        };
        if header[..4] != MAGIC {
            return Err(DeserializeError::BadMagic);
        }

        let mut checksum = [0; CHECKSUM_SIZE];
        checksum.copy_from_slice(&header[16..HEADER_SIZE]);
        Ok(Self {
            format_version: u16::from_le_bytes([header[4], header[5]]),
            payload_len: u32::from_le_bytes([header[12], header[13], header[14], header[15]]),
            checksum,
        })
    }

    /// The payload this header describes, after the length check.
    fn payload<'b>(&self, bytes: &'b [u8]) -> Result<&'b [u8], DeserializeError> {
        let end = HEADER_SIZE + self.payload_len as usize;
        bytes
            .get(HEADER_SIZE..end)
            .ok_or(DeserializeError::LengthMismatch {
                expected: end,
                actual: bytes.len(),
            })
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let mut out = [0; CHECKSUM_SIZE];
    out.copy_from_slice(&blake3::hash(payload).as_bytes()[..CHECKSUM_SIZE]);
    out
}

fn decode_payload(payload: &[u8]) -> Result<Payload, DeserializeError> {
    let (payload, _): (Payload, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    Ok(payload)
}

pub(crate) fn encode(
    ruleset: &RuleSet,
    source_text: Option<&str>,
) -> Result<Vec<u8>, SerializeError> {
    let rules: Vec<StoredRule> = ruleset.rules.iter().map(StoredRule::from).collect();
    let rule_count =
        u32::try_from(rules.len()).map_err(|_| SerializeError::TooLarge(rules.len()))?;
    let payload = Payload {
        source_digest: source_text.map(|text| *blake3::hash(text.as_bytes()).as_bytes()),
        rule_count,
        rules,
    };
    let payload = bincode::serde::encode_to_vec(&payload, bincode::config::standard())?;

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    Header::for_payload(&payload)?.write(&mut out);
    out.extend_from_slice(&payload);
    Ok(out)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<RuleSet, DeserializeError> {
    let header = Header::read(bytes)?;
    if header.format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: header.format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload = header.payload(bytes)?;
    if checksum(payload) != header.checksum {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let payload = decode_payload(payload)?;
    payload.check()?;
    tracing::debug!(rules = payload.rules.len(), "loaded rule set from blob");
    Ok(RuleSet::from_rules(
        payload.rules.into_iter().map(StoredRule::into_rule).collect(),
    ))
}

/// BLAKE3 digest of the source text recorded in a blob, if any.
///
/// Lets a caller decide whether a cached blob is stale without rebuilding
/// the rule set.
///
/// # Errors
///
/// Returns [`DeserializeError`] if the header or payload cannot be read.
pub fn source_digest(bytes: &[u8]) -> Result<Option<[u8; 32]>, DeserializeError> {
    let header = Header::read(bytes)?;
    let payload = decode_payload(header.payload(bytes)?)?;
    Ok(payload.source_digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RuleSet {
        RuleSet::from_rules(vec![
            AnswerRule::new("1", "[[a]] [[b]]/O/\nseparator=,", 1.0)
                .with_feedback("Both", FeedbackFormat::Plain),
            AnswerRule::new("2", "[[oops", 0.5),
        ])
    }

    #[test]
    fn header_layout() {
        let header = Header::for_payload(b"payload").unwrap();
        let mut out = Vec::new();
        header.write(&mut out);

        assert_eq!(out.len(), HEADER_SIZE);
        assert_eq!(&out[..4], b"RXMQ");
        assert_eq!(Header::read(&out).unwrap(), header);
        assert_eq!(header.payload_len, 7);
    }

    #[test]
    fn header_rejects_bad_magic() {
        let mut out = vec![0; HEADER_SIZE];
        out[..4].copy_from_slice(b"NOPE");
        assert!(matches!(Header::read(&out), Err(DeserializeError::BadMagic)));
    }

    #[test]
    fn header_rejects_short_input() {
        assert!(matches!(
            Header::read(&[0; 10]),
            Err(DeserializeError::LengthMismatch {
                expected: HEADER_SIZE,
                actual: 10
            })
        ));
    }

    #[test]
    fn raw_specs_are_stored() {
        let bytes = encode(&sample(), None).unwrap();
        let payload = decode_payload(&bytes[HEADER_SIZE..]).unwrap();
        assert_eq!(payload.rule_count, 2);
        assert_eq!(payload.rules[1].spec, "[[oops");
        assert_eq!(payload.rules[0].feedback_format, FeedbackFormat::Plain);
    }

    #[test]
    fn decoded_rules_are_reparsed() {
        let restored = decode(&encode(&sample(), None).unwrap()).unwrap();
        assert_eq!(restored.rules(), sample().rules());
        assert!(restored.rules()[1].body().is_degenerate());
    }

    #[test]
    fn payload_check_catches_count_mismatch() {
        let payload = Payload {
            source_digest: None,
            rule_count: 5,
            rules: Vec::new(),
        };
        assert!(matches!(payload.check(), Err(DeserializeError::Validation(_))));
    }

    #[test]
    fn payload_check_catches_non_finite_fraction() {
        let mut rule = StoredRule::from(&sample().rules()[0]);
        rule.fraction = f64::NAN;
        let payload = Payload {
            source_digest: None,
            rule_count: 1,
            rules: vec![rule],
        };
        assert!(matches!(payload.check(), Err(DeserializeError::Validation(_))));
    }
}
