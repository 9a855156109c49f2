//! Numeric value generators.

use super::Randomizer;
use crate::error::PopulateError;
use crate::random::ValueSource;
use fixture_core::Value;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Width of the default float range when a bound is omitted.
pub const DEFAULT_FLOAT_SPAN: f64 = 1_000_000.0;

/// Scale of generated decimals.
pub const DEFAULT_DECIMAL_SCALE: u32 = 2;

/// Generates booleans.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanRandomizer;

impl Randomizer for BooleanRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        Value::Bool(source.gen())
    }
}

/// Integer widths.
///
/// As a randomizer, an integer kind draws uniformly over its whole width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerKind {
    Byte,
    Short,
    Int,
    Long,
}

impl IntegerKind {
    /// Smallest representable value.
    pub fn min_value(&self) -> i64 {
        match self {
            Self::Byte => i64::from(i8::MIN),
            Self::Short => i64::from(i16::MIN),
            Self::Int => i64::from(i32::MIN),
            Self::Long => i64::MIN,
        }
    }

    /// Largest representable value.
    pub fn max_value(&self) -> i64 {
        match self {
            Self::Byte => i64::from(i8::MAX),
            Self::Short => i64::from(i16::MAX),
            Self::Int => i64::from(i32::MAX),
            Self::Long => i64::MAX,
        }
    }

    // Callers guarantee `v` is within the kind's bounds.
    fn wrap(&self, v: i64) -> Value {
        match self {
            Self::Byte => Value::Byte(v as i8),
            Self::Short => Value::Short(v as i16),
            Self::Int => Value::Int(v as i32),
            Self::Long => Value::Long(v),
        }
    }

    /// Draw an unbounded value of this width.
    pub fn draw(&self, source: &mut ValueSource) -> Value {
        match self {
            Self::Byte => Value::Byte(source.gen()),
            Self::Short => Value::Short(source.gen()),
            Self::Int => Value::Int(source.gen()),
            Self::Long => Value::Long(source.gen()),
        }
    }
}

impl Randomizer for IntegerKind {
    fn produce(&self, source: &mut ValueSource) -> Value {
        self.draw(source)
    }
}

/// Generates integers in `[min, max]`.
///
/// An omitted bound defaults to the limit of the integer width, so
/// `new(kind, None, Some(max))` produces values `<= max`.
#[derive(Debug, Clone, Copy)]
pub struct IntegerRangeRandomizer {
    kind: IntegerKind,
    min: i64,
    max: i64,
}

impl IntegerRangeRandomizer {
    pub fn new(kind: IntegerKind, min: Option<i64>, max: Option<i64>) -> Result<Self, PopulateError> {
        let min = min.unwrap_or_else(|| kind.min_value());
        let max = max.unwrap_or_else(|| kind.max_value());
        if min > max {
            return Err(PopulateError::invalid_range("integer", min, max));
        }
        if min < kind.min_value() || max > kind.max_value() {
            return Err(PopulateError::InvalidArgument(format!(
                "integer range [{min}, {max}] does not fit {kind:?}"
            )));
        }
        Ok(Self { kind, min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }
}

impl Randomizer for IntegerRangeRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        self.kind.wrap(source.gen_range(self.min..=self.max))
    }
}

/// Float widths.
///
/// As a randomizer, a float kind draws uniformly from `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatKind {
    Float,
    Double,
}

impl Randomizer for FloatKind {
    fn produce(&self, source: &mut ValueSource) -> Value {
        match self {
            Self::Float => Value::Float(source.gen()),
            Self::Double => Value::Double(source.gen()),
        }
    }
}

/// Generates floats in `[min, max]`.
///
/// An omitted bound is placed [`DEFAULT_FLOAT_SPAN`] away from the other one
/// (`[0, DEFAULT_FLOAT_SPAN]` when both are omitted).
#[derive(Debug, Clone, Copy)]
pub struct FloatRangeRandomizer {
    kind: FloatKind,
    min: f64,
    max: f64,
}

impl FloatRangeRandomizer {
    pub fn new(kind: FloatKind, min: Option<f64>, max: Option<f64>) -> Result<Self, PopulateError> {
        let (min, max) = match (min, max) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, min + DEFAULT_FLOAT_SPAN),
            (None, Some(max)) => (max - DEFAULT_FLOAT_SPAN, max),
            (None, None) => (0.0, DEFAULT_FLOAT_SPAN),
        };
        if !min.is_finite() || !max.is_finite() {
            return Err(PopulateError::InvalidArgument(format!(
                "float range bounds must be finite, got [{min}, {max}]"
            )));
        }
        if min > max {
            return Err(PopulateError::invalid_range("float", min, max));
        }
        if kind == FloatKind::Float && (min < f64::from(f32::MIN) || max > f64::from(f32::MAX)) {
            return Err(PopulateError::InvalidArgument(format!(
                "float range [{min}, {max}] does not fit a 32-bit float"
            )));
        }
        Ok(Self { kind, min, max })
    }
}

impl Randomizer for FloatRangeRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        let v = if (self.max - self.min).is_finite() {
            source.gen_range(self.min..=self.max)
        } else {
            // Span overflows f64: draw over the halved range and scale back
            let half = self.min / 2.0 + source.gen::<f64>() * (self.max / 2.0 - self.min / 2.0);
            (half * 2.0).clamp(self.min, self.max)
        };
        match self.kind {
            // Narrowing may round past a bound, so clamp back into the range
            FloatKind::Float => Value::Float((v as f32).clamp(self.min as f32, self.max as f32)),
            FloatKind::Double => Value::Double(v),
        }
    }
}

/// Generates decimals in `[min, max]` with a fixed scale.
#[derive(Debug, Clone, Copy)]
pub struct DecimalRangeRandomizer {
    scale: u32,
    min_units: i64,
    max_units: i64,
}

impl DecimalRangeRandomizer {
    /// Create a randomizer; an omitted bound defaults to `0` or `DEFAULT_FLOAT_SPAN` away.
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Result<Self, PopulateError> {
        Self::with_scale(min, max, DEFAULT_DECIMAL_SCALE)
    }

    pub fn with_scale(
        min: Option<Decimal>,
        max: Option<Decimal>,
        scale: u32,
    ) -> Result<Self, PopulateError> {
        let span = Decimal::from(DEFAULT_FLOAT_SPAN as i64);
        let (min, max) = match (min, max) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, min.saturating_add(span)),
            (None, Some(max)) => (max.saturating_sub(span), max),
            (None, None) => (Decimal::ZERO, span),
        };
        if min > max {
            return Err(PopulateError::invalid_range("decimal", min, max));
        }

        // Work in units of 10^-scale; round inwards so every value stays in range
        let factor = Decimal::from(10i64.checked_pow(scale).ok_or_else(|| {
            PopulateError::InvalidArgument(format!("decimal scale {scale} is too large"))
        })?);
        let out_of_range =
            || PopulateError::InvalidArgument(format!("decimal range [{min}, {max}] is too wide"));
        let min_units = min
            .checked_mul(factor)
            .map(|d| d.ceil())
            .and_then(|d| d.to_i64())
            .ok_or_else(out_of_range)?;
        let max_units = max
            .checked_mul(factor)
            .map(|d| d.floor())
            .and_then(|d| d.to_i64())
            .ok_or_else(out_of_range)?;
        if min_units > max_units {
            return Err(PopulateError::InvalidArgument(format!(
                "decimal range [{min}, {max}] holds no value of scale {scale}"
            )));
        }

        Ok(Self {
            scale,
            min_units,
            max_units,
        })
    }
}

impl Randomizer for DecimalRangeRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        let units = source.gen_range(self.min_units..=self.max_units);
        Value::Decimal(Decimal::new(units, self.scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_range() {
        let randomizer = IntegerRangeRandomizer::new(IntegerKind::Int, Some(10), Some(20)).unwrap();
        let mut source = ValueSource::new(42);

        for _ in 0..100 {
            match randomizer.produce(&mut source) {
                Value::Int(v) => assert!((10..=20).contains(&v)),
                other => panic!("Expected Int value, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_integer_open_ended() {
        let randomizer = IntegerRangeRandomizer::new(IntegerKind::Short, None, Some(-100)).unwrap();
        assert_eq!(randomizer.min(), i64::from(i16::MIN));
        let mut source = ValueSource::new(42);
        for _ in 0..100 {
            match randomizer.produce(&mut source) {
                Value::Short(v) => assert!(v <= -100),
                other => panic!("Expected Short value, got {other:?}"),
            }
        }

        let randomizer = IntegerRangeRandomizer::new(IntegerKind::Byte, Some(120), None).unwrap();
        for _ in 0..100 {
            match randomizer.produce(&mut source) {
                Value::Byte(v) => assert!(v >= 120),
                other => panic!("Expected Byte value, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_integer_invalid_range() {
        assert!(matches!(
            IntegerRangeRandomizer::new(IntegerKind::Long, Some(5), Some(1)),
            Err(PopulateError::InvalidArgument(_))
        ));
        assert!(IntegerRangeRandomizer::new(IntegerKind::Byte, Some(0), Some(1000)).is_err());
        assert!(IntegerRangeRandomizer::new(IntegerKind::Int, Some(7), Some(7)).is_ok());
    }

    #[test]
    fn test_float_range() {
        let randomizer = FloatRangeRandomizer::new(FloatKind::Double, Some(0.0), Some(100.0)).unwrap();
        let mut source = ValueSource::new(42);

        for _ in 0..100 {
            let v = randomizer.produce(&mut source).as_f64().unwrap();
            assert!((0.0..=100.0).contains(&v));
        }

        let randomizer = FloatRangeRandomizer::new(FloatKind::Float, None, Some(-1.5)).unwrap();
        for _ in 0..100 {
            match randomizer.produce(&mut source) {
                Value::Float(v) => assert!(v <= -1.5),
                other => panic!("Expected Float value, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_float_range_wider_than_f64_span() {
        let randomizer =
            FloatRangeRandomizer::new(FloatKind::Double, Some(-1.0e308), Some(1.0e308)).unwrap();
        let mut source = ValueSource::new(1);

        for _ in 0..100 {
            match randomizer.produce(&mut source) {
                Value::Double(v) => assert!(v.is_finite() && (-1.0e308..=1.0e308).contains(&v)),
                other => panic!("Expected Double, got {other:?}"),
            }
        }

        let full = FloatRangeRandomizer::new(FloatKind::Double, Some(f64::MIN), Some(f64::MAX)).unwrap();
        assert!(matches!(full.produce(&mut source), Value::Double(v) if v.is_finite()));
    }

    #[test]
    fn test_float_invalid_range() {
        assert!(FloatRangeRandomizer::new(FloatKind::Double, Some(2.0), Some(1.0)).is_err());
        assert!(FloatRangeRandomizer::new(FloatKind::Double, Some(f64::NAN), None).is_err());
    }

    #[test]
    fn test_decimal_range() {
        let min = Decimal::new(1050, 2);
        let max = Decimal::new(2000, 2);
        let randomizer = DecimalRangeRandomizer::new(Some(min), Some(max)).unwrap();
        let mut source = ValueSource::new(42);

        for _ in 0..100 {
            match randomizer.produce(&mut source) {
                Value::Decimal(d) => {
                    assert!(d >= min && d <= max);
                    assert_eq!(d.scale(), 2);
                }
                other => panic!("Expected Decimal value, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_decimal_invalid_range() {
        assert!(DecimalRangeRandomizer::new(Some(Decimal::ONE), Some(Decimal::ZERO)).is_err());
        // No two-digit decimal lies strictly inside (0.001, 0.009)
        assert!(DecimalRangeRandomizer::new(
            Some(Decimal::new(1, 3)),
            Some(Decimal::new(9, 3))
        )
        .is_err());
    }

    #[test]
    fn test_unbounded_draw_matches_width() {
        let mut source = ValueSource::new(1);
        assert!(matches!(IntegerKind::Byte.draw(&mut source), Value::Byte(_)));
        assert!(matches!(IntegerKind::Long.draw(&mut source), Value::Long(_)));
        assert!(matches!(BooleanRandomizer.produce(&mut source), Value::Bool(_)));
        match FloatKind::Double.produce(&mut source) {
            Value::Double(v) => assert!((0.0..1.0).contains(&v)),
            other => panic!("Expected Double value, got {other:?}"),
        }
    }
}
