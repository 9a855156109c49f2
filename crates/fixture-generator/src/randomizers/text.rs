//! Text and binary generators.

use super::identity::random_uuid;
use super::Randomizer;
use crate::error::PopulateError;
use crate::parameters::SizeRange;
use crate::random::ValueSource;
use fixture_core::Value;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Generates alphanumeric strings with a length in a size range.
#[derive(Debug, Clone, Copy)]
pub struct StringRandomizer {
    length: SizeRange,
}

impl StringRandomizer {
    pub fn new(length: SizeRange) -> Self {
        Self { length }
    }

    /// Create a randomizer for lengths in `[min, max]`.
    pub fn with_length(min: usize, max: usize) -> Result<Self, PopulateError> {
        Ok(Self::new(SizeRange::new(min, max)?))
    }
}

impl Randomizer for StringRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        let len = source.count_in(self.length.min, self.length.max);
        let s: String = (0..len)
            .map(|_| char::from(source.sample(Alphanumeric)))
            .collect();
        Value::String(s)
    }
}

/// Generates alphanumeric characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharRandomizer;

impl Randomizer for CharRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        Value::Char(char::from(source.sample(Alphanumeric)))
    }
}

/// Generates byte strings with a length in a size range.
#[derive(Debug, Clone, Copy)]
pub struct BytesRandomizer {
    length: SizeRange,
}

impl BytesRandomizer {
    pub fn new(length: SizeRange) -> Self {
        Self { length }
    }
}

impl Randomizer for BytesRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        let len = source.count_in(self.length.min, self.length.max);
        let mut bytes = vec![0u8; len];
        source.fill(bytes.as_mut_slice());
        Value::Bytes(bytes)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Digits(usize),
    Uuid,
}

/// Pattern-based string generator.
///
/// Supports placeholders:
/// - `{uuid}` - random UUID
/// - `{rand:N}` - random N-digit number without leading zero
///
/// Any other text is copied as is.
#[derive(Debug, Clone)]
pub struct PatternRandomizer {
    segments: Vec<Segment>,
}

impl PatternRandomizer {
    /// Parse `pattern`, rejecting malformed `{rand:N}` placeholders.
    pub fn new(pattern: &str) -> Result<Self, PopulateError> {
        let mut segments = Vec::new();
        let mut rest = pattern;

        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let end = start + len;
            let placeholder = &rest[start + 1..end];

            let segment = if placeholder == "uuid" {
                Some(Segment::Uuid)
            } else if let Some(digits) = placeholder.strip_prefix("rand:") {
                let digits = digits.parse::<usize>().map_err(|_| {
                    PopulateError::InvalidArgument(format!(
                        "invalid placeholder '{{{placeholder}}}' in pattern '{pattern}'"
                    ))
                })?;
                Some(Segment::Digits(digits))
            } else {
                None
            };

            match segment {
                Some(segment) => {
                    if start > 0 {
                        segments.push(Segment::Literal(rest[..start].to_string()));
                    }
                    segments.push(segment);
                }
                None => segments.push(Segment::Literal(rest[..=end].to_string())),
            }
            rest = &rest[end + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }
}

impl Randomizer for PatternRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        let mut result = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => result.push_str(text),
                Segment::Digits(n) => push_random_digits(source, *n, &mut result),
                Segment::Uuid => result.push_str(&random_uuid(source).to_string()),
            }
        }
        Value::String(result)
    }
}

/// Append a random number with exactly `digits` digits.
fn push_random_digits(source: &mut ValueSource, digits: usize, out: &mut String) {
    if digits == 0 {
        return;
    }

    // First digit should be 1-9 to avoid leading zeros
    out.push(char::from(b'0' + source.gen_range(1..10u8)));

    for _ in 1..digits {
        out.push(char::from(b'0' + source.gen_range(0..10u8)));
    }
}
