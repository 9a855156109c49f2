//! Value generators.
//!
//! A [`Randomizer`] produces one value per call. Randomizers are stateless:
//! every random draw comes from the session [`ValueSource`] handed in by the
//! caller, so a fixed seed reproduces the same values. Any closure
//! `Fn(&mut ValueSource) -> Value` is a randomizer.
//!
//! Modules:
//! - [`numeric`]: booleans, integers, floats and decimals, optionally range-bounded
//! - [`temporal`]: dates, times and date-times within a range
//! - [`text`]: strings, characters, bytes and patterns
//! - [`identity`]: UUIDs and URLs

pub mod identity;
pub mod numeric;
pub mod temporal;
pub mod text;

use crate::error::PopulateError;
use crate::random::ValueSource;
use fixture_core::Value;
use rand::Rng;
use std::sync::Arc;

pub use identity::{UrlRandomizer, UuidRandomizer};
pub use numeric::{
    BooleanRandomizer, DecimalRangeRandomizer, FloatKind, FloatRangeRandomizer, IntegerKind,
    IntegerRangeRandomizer,
};
pub use temporal::{
    DateRangeRandomizer, DateTimeRangeRandomizer, TimeRandomizer, ZonedDateTimeRangeRandomizer,
};
pub use text::{BytesRandomizer, CharRandomizer, PatternRandomizer, StringRandomizer};

/// Produces values for a field or a type.
pub trait Randomizer: Send + Sync {
    /// Produce the next value, drawing randomness from `source`.
    fn produce(&self, source: &mut ValueSource) -> Value;
}

impl<F> Randomizer for F
where
    F: Fn(&mut ValueSource) -> Value + Send + Sync,
{
    fn produce(&self, source: &mut ValueSource) -> Value {
        self(source)
    }
}

/// Shared handle to a randomizer.
pub type SharedRandomizer = Arc<dyn Randomizer>;

/// Always produces the same value.
#[derive(Debug, Clone)]
pub struct ConstantRandomizer {
    value: Value,
}

impl ConstantRandomizer {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Randomizer for ConstantRandomizer {
    fn produce(&self, _source: &mut ValueSource) -> Value {
        self.value.clone()
    }
}

/// Picks one of a fixed list of values uniformly.
#[derive(Debug, Clone)]
pub struct OneOfRandomizer {
    values: Vec<Value>,
}

impl OneOfRandomizer {
    /// Create a randomizer over `values`, which must not be empty.
    pub fn new(values: Vec<Value>) -> Result<Self, PopulateError> {
        if values.is_empty() {
            return Err(PopulateError::InvalidArgument(
                "one-of randomizer needs at least one value".to_string(),
            ));
        }
        Ok(Self { values })
    }
}

impl Randomizer for OneOfRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        self.values[source.gen_range(0..self.values.len())].clone()
    }
}

/// Picks a variant of an enum type uniformly.
///
/// An enum without variants produces `Null`.
#[derive(Debug, Clone)]
pub struct EnumRandomizer {
    type_name: String,
    variants: Vec<String>,
}

impl EnumRandomizer {
    pub fn new(type_name: impl Into<String>, variants: Vec<String>) -> Self {
        Self {
            type_name: type_name.into(),
            variants,
        }
    }

    /// Restrict the candidate variants by excluding some of them.
    pub fn excluding(mut self, excluded: &[&str]) -> Self {
        self.variants.retain(|v| !excluded.contains(&v.as_str()));
        self
    }
}

impl Randomizer for EnumRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        if self.variants.is_empty() {
            return Value::Null;
        }
        let variant = &self.variants[source.gen_range(0..self.variants.len())];
        Value::Enum {
            type_name: self.type_name.clone(),
            variant: variant.clone(),
        }
    }
}
