//! Date and time generators.
//!
//! Range randomizers draw whole seconds (whole days for dates) uniformly
//! between their bounds. An omitted bound falls back to the matching end of
//! the default date range, moved past the other bound when needed, so the
//! result always satisfies the bound that was given.

use super::Randomizer;
use crate::error::PopulateError;
use crate::parameters::DateRange;
use crate::random::ValueSource;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use fixture_core::Value;
use rand::Rng;

const SECONDS_PER_DAY: u32 = 86_400;

fn resolve_bounds<T: PartialOrd + Copy + std::fmt::Debug>(
    what: &str,
    min: Option<T>,
    max: Option<T>,
    default_min: T,
    default_max: T,
) -> Result<(T, T), PopulateError> {
    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, if default_max >= min { default_max } else { min }),
        (None, Some(max)) => (if default_min <= max { default_min } else { max }, max),
        (None, None) => (default_min, default_max),
    };
    if min > max {
        return Err(PopulateError::invalid_range(what, min, max));
    }
    Ok((min, max))
}

/// Draw a whole second in `[min, max]`, or `min` itself if no whole second fits.
fn draw_instant(
    source: &mut ValueSource,
    min: DateTime<FixedOffset>,
    max: DateTime<FixedOffset>,
) -> DateTime<FixedOffset> {
    let lo = min.timestamp() + i64::from(min.timestamp_subsec_nanos() > 0);
    let hi = max.timestamp();
    if lo > hi {
        return min;
    }
    let secs = source.gen_range(lo..=hi);
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.with_timezone(min.offset()))
        .unwrap_or(min)
}

/// Generates dates in `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct DateRangeRandomizer {
    min: NaiveDate,
    max: NaiveDate,
}

impl DateRangeRandomizer {
    pub fn new(min: Option<NaiveDate>, max: Option<NaiveDate>) -> Result<Self, PopulateError> {
        let defaults = DateRange::default();
        let (min, max) = resolve_bounds(
            "date",
            min,
            max,
            defaults.min.date_naive(),
            defaults.max.date_naive(),
        )?;
        Ok(Self { min, max })
    }

    /// Create a randomizer over the days of `range`.
    pub fn from_range(range: &DateRange) -> Self {
        Self {
            min: range.min.date_naive(),
            max: range.max.date_naive(),
        }
    }
}

impl Randomizer for DateRangeRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        let day = source.gen_range(self.min.num_days_from_ce()..=self.max.num_days_from_ce());
        Value::Date(NaiveDate::from_num_days_from_ce_opt(day).unwrap_or(self.min))
    }
}

/// Generates date-times without offset in `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeRangeRandomizer {
    min: DateTime<FixedOffset>,
    max: DateTime<FixedOffset>,
}

impl DateTimeRangeRandomizer {
    pub fn new(
        min: Option<NaiveDateTime>,
        max: Option<NaiveDateTime>,
    ) -> Result<Self, PopulateError> {
        let defaults = DateRange::default();
        let (min, max) = resolve_bounds(
            "date-time",
            min,
            max,
            defaults.min.naive_local(),
            defaults.max.naive_local(),
        )?;
        Ok(Self {
            min: min.and_utc().fixed_offset(),
            max: max.and_utc().fixed_offset(),
        })
    }

    pub fn from_range(range: &DateRange) -> Self {
        Self {
            min: range.min,
            max: range.max,
        }
    }
}

impl Randomizer for DateTimeRangeRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        Value::DateTime(draw_instant(source, self.min, self.max).naive_local())
    }
}

/// Generates date-times with offset in `[min, max]`.
///
/// Values carry the offset of `min`.
#[derive(Debug, Clone, Copy)]
pub struct ZonedDateTimeRangeRandomizer {
    min: DateTime<FixedOffset>,
    max: DateTime<FixedOffset>,
}

impl ZonedDateTimeRangeRandomizer {
    pub fn new(
        min: Option<DateTime<FixedOffset>>,
        max: Option<DateTime<FixedOffset>>,
    ) -> Result<Self, PopulateError> {
        let defaults = DateRange::default();
        let (min, max) = resolve_bounds("zoned date-time", min, max, defaults.min, defaults.max)?;
        Ok(Self { min, max })
    }

    pub fn from_range(range: &DateRange) -> Self {
        Self {
            min: range.min,
            max: range.max,
        }
    }
}

impl Randomizer for ZonedDateTimeRangeRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        Value::ZonedDateTime(draw_instant(source, self.min, self.max))
    }
}

/// Generates times of day with whole-second precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeRandomizer;

impl Randomizer for TimeRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        let secs = source.gen_range(0..SECONDS_PER_DAY);
        Value::Time(NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range() {
        let randomizer = DateRangeRandomizer::new(Some(date(2020, 1, 1)), Some(date(2020, 1, 31))).unwrap();
        let mut source = ValueSource::new(42);

        for _ in 0..100 {
            match randomizer.produce(&mut source) {
                Value::Date(d) => assert!(d >= date(2020, 1, 1) && d <= date(2020, 1, 31)),
                other => panic!("Expected Date value, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_date_open_ended_before_default_range() {
        // max earlier than the default minimum
        let max = date(1999, 6, 1);
        let randomizer = DateRangeRandomizer::new(None, Some(max)).unwrap();
        let mut source = ValueSource::new(7);
        for _ in 0..20 {
            match randomizer.produce(&mut source) {
                Value::Date(d) => assert!(d <= max),
                other => panic!("Expected Date value, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_date_invalid_range() {
        assert!(matches!(
            DateRangeRandomizer::new(Some(date(2021, 1, 1)), Some(date(2020, 1, 1))),
            Err(PopulateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zoned_range_keeps_offset() {
        let range = DateRange::default();
        let randomizer = ZonedDateTimeRangeRandomizer::from_range(&range);
        let mut source = ValueSource::new(42);

        for _ in 0..100 {
            match randomizer.produce(&mut source) {
                Value::ZonedDateTime(dt) => {
                    assert!(dt >= range.min && dt <= range.max);
                    assert_eq!(dt.offset().local_minus_utc(), 3600);
                }
                other => panic!("Expected ZonedDateTime value, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_zoned_open_ended() {
        let min = DateRange::default().max;
        let randomizer = ZonedDateTimeRangeRandomizer::new(Some(min), None).unwrap();
        let mut source = ValueSource::new(3);
        match randomizer.produce(&mut source) {
            Value::ZonedDateTime(dt) => assert_eq!(dt, min),
            other => panic!("Expected ZonedDateTime value, got {other:?}"),
        }
    }

    #[test]
    fn test_naive_date_time_range() {
        let min = date(2020, 5, 1).and_hms_opt(0, 0, 0).unwrap();
        let max = date(2020, 5, 2).and_hms_opt(0, 0, 0).unwrap();
        let randomizer = DateTimeRangeRandomizer::new(Some(min), Some(max)).unwrap();
        let mut source = ValueSource::new(42);

        for _ in 0..100 {
            match randomizer.produce(&mut source) {
                Value::DateTime(dt) => assert!(dt >= min && dt <= max),
                other => panic!("Expected DateTime value, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_time() {
        let mut source = ValueSource::new(42);
        match TimeRandomizer.produce(&mut source) {
            Value::Time(t) => assert_eq!(t.nanosecond(), 0),
            other => panic!("Expected Time value, got {other:?}"),
        }
    }
}
