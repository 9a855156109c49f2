//! Population parameters.
//!
//! Parameters can be built in code or loaded from YAML:
//!
//! ```yaml
//! seed: 42
//! collection_size_range: { min: 1, max: 5 }
//! string_length_range: { min: 3, max: 10 }
//! date_range:
//!   min: 2015-01-01T00:00:00+01:00
//!   max: 2025-01-01T00:00:00+01:00
//! randomization_depth: 2
//! scan_for_concrete_types: true
//! ```
//!
//! Omitted keys take their default values.

use crate::error::PopulateError;
use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default seed of a session.
pub const DEFAULT_SEED: u64 = 123;

/// Default minimum number of container elements.
pub const DEFAULT_COLLECTION_MIN: usize = 1;

/// Default maximum number of container elements.
pub const DEFAULT_COLLECTION_MAX: usize = 100;

/// Default minimum generated string length.
pub const DEFAULT_STRING_MIN: usize = 1;

/// Default maximum generated string length.
pub const DEFAULT_STRING_MAX: usize = 32;

/// Default per-path occurrence limit for any one type.
pub const DEFAULT_RANDOMIZATION_DEPTH: usize = 1;

/// Offset of the reference instant (+01:00).
const REFERENCE_OFFSET_SECS: i32 = 3600;

/// 2010-01-01T00:00:00+01:00
const DEFAULT_DATE_MIN_SECS: i64 = 1_262_300_400;

/// 2020-01-01T00:00:00+01:00
const REFERENCE_INSTANT_SECS: i64 = 1_577_833_200;

/// 2030-01-01T00:00:00+01:00
const DEFAULT_DATE_MAX_SECS: i64 = 1_893_452_400;

fn reference_offset() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

fn instant(secs: i64) -> DateTime<FixedOffset> {
    (DateTime::<Utc>::default() + Duration::seconds(secs)).with_timezone(&reference_offset())
}

/// Reference instant that the default date range is centered on.
pub fn reference_instant() -> DateTime<FixedOffset> {
    instant(REFERENCE_INSTANT_SECS)
}

/// Inclusive `[min, max]` range of sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: usize,
    pub max: usize,
}

impl SizeRange {
    /// Create a range, rejecting `min > max`.
    pub fn new(min: usize, max: usize) -> Result<Self, PopulateError> {
        let range = Self { min, max };
        range.validate("size")?;
        Ok(range)
    }

    /// Check if `n` lies within the range.
    pub fn contains(&self, n: usize) -> bool {
        (self.min..=self.max).contains(&n)
    }

    fn validate(&self, what: &str) -> Result<(), PopulateError> {
        if self.min > self.max {
            return Err(PopulateError::invalid_range(what, self.min, self.max));
        }
        Ok(())
    }
}

/// Inclusive `[min, max]` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: DateTime<FixedOffset>,
    pub max: DateTime<FixedOffset>,
}

impl DateRange {
    /// Create a range, rejecting `min > max`.
    pub fn new(min: DateTime<FixedOffset>, max: DateTime<FixedOffset>) -> Result<Self, PopulateError> {
        if min > max {
            return Err(PopulateError::invalid_range("date", min, max));
        }
        Ok(Self { min, max })
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            min: instant(DEFAULT_DATE_MIN_SECS),
            max: instant(DEFAULT_DATE_MAX_SECS),
        }
    }
}

/// Configuration of a population session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Seed of the session value source
    pub seed: u64,

    /// Number of elements generated for containers
    pub collection_size_range: SizeRange,

    /// Length of generated strings
    pub string_length_range: SizeRange,

    /// Range of generated temporal values
    pub date_range: DateRange,

    /// How many times one type may occur on a single path from the root
    /// before a placeholder is produced instead
    pub randomization_depth: usize,

    /// Whether abstract types and interfaces are resolved to concrete subtypes
    pub scan_for_concrete_types: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            collection_size_range: SizeRange {
                min: DEFAULT_COLLECTION_MIN,
                max: DEFAULT_COLLECTION_MAX,
            },
            string_length_range: SizeRange {
                min: DEFAULT_STRING_MIN,
                max: DEFAULT_STRING_MAX,
            },
            date_range: DateRange::default(),
            randomization_depth: DEFAULT_RANDOMIZATION_DEPTH,
            scan_for_concrete_types: false,
        }
    }
}

impl Parameters {
    /// Parse parameters from a YAML string and validate them.
    pub fn from_yaml(yaml: &str) -> Result<Self, PopulateError> {
        let params: Parameters = serde_yaml::from_str(yaml)
            .map_err(|e| PopulateError::InvalidArgument(format!("invalid parameters: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    /// Load parameters from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PopulateError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check every range and limit.
    pub fn validate(&self) -> Result<(), PopulateError> {
        self.collection_size_range.validate("collection size")?;
        self.string_length_range.validate("string length")?;
        if self.date_range.min > self.date_range.max {
            return Err(PopulateError::invalid_range(
                "date",
                self.date_range.min,
                self.date_range.max,
            ));
        }
        if self.randomization_depth == 0 {
            return Err(PopulateError::InvalidArgument(
                "randomization depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the collection size range.
    pub fn collection_size_range(mut self, min: usize, max: usize) -> Result<Self, PopulateError> {
        self.collection_size_range = SizeRange::new(min, max)?;
        Ok(self)
    }

    /// Set the string length range.
    pub fn string_length_range(mut self, min: usize, max: usize) -> Result<Self, PopulateError> {
        self.string_length_range = SizeRange::new(min, max)?;
        Ok(self)
    }

    /// Set the date range.
    pub fn date_range(
        mut self,
        min: DateTime<FixedOffset>,
        max: DateTime<FixedOffset>,
    ) -> Result<Self, PopulateError> {
        self.date_range = DateRange::new(min, max)?;
        Ok(self)
    }

    pub fn randomization_depth(mut self, depth: usize) -> Self {
        self.randomization_depth = depth;
        self
    }

    pub fn scan_for_concrete_types(mut self, scan: bool) -> Self {
        self.scan_for_concrete_types = scan;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = Parameters::default();
        assert_eq!(params.seed, 123);
        assert_eq!(params.collection_size_range, SizeRange { min: 1, max: 100 });
        assert_eq!(params.string_length_range, SizeRange { min: 1, max: 32 });
        assert_eq!(params.randomization_depth, 1);
        assert!(!params.scan_for_concrete_types);
        assert_eq!(
            params.date_range.min.to_rfc3339(),
            "2010-01-01T00:00:00+01:00"
        );
        assert_eq!(
            params.date_range.max.to_rfc3339(),
            "2030-01-01T00:00:00+01:00"
        );
        assert_eq!(reference_instant().to_rfc3339(), "2020-01-01T00:00:00+01:00");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_inverted_size_range_rejected() {
        assert!(matches!(
            SizeRange::new(5, 1),
            Err(PopulateError::InvalidArgument(_))
        ));
        assert!(SizeRange::new(3, 3).is_ok());
        assert!(Parameters::default().collection_size_range(10, 2).is_err());
    }

    #[test]
    fn test_inverted_date_range_rejected() {
        let range = DateRange::default();
        assert!(DateRange::new(range.max, range.min).is_err());
        assert!(DateRange::new(range.min, range.min).is_ok());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let params = Parameters::default().randomization_depth(0);
        assert!(matches!(
            params.validate(),
            Err(PopulateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r#"
seed: 42
collection_size_range: { min: 1, max: 5 }
scan_for_concrete_types: true
"#;
        let params = Parameters::from_yaml(yaml).unwrap();
        assert_eq!(params.seed, 42);
        assert_eq!(params.collection_size_range, SizeRange { min: 1, max: 5 });
        assert_eq!(params.string_length_range, SizeRange { min: 1, max: 32 });
        assert!(params.scan_for_concrete_types);
    }

    #[test]
    fn test_from_yaml_date_range() {
        let yaml = r#"
date_range:
  min: 2015-01-01T00:00:00+01:00
  max: 2016-01-01T00:00:00+01:00
"#;
        let params = Parameters::from_yaml(yaml).unwrap();
        assert_eq!(params.date_range.min.to_rfc3339(), "2015-01-01T00:00:00+01:00");
    }

    #[test]
    fn test_from_yaml_invalid_range() {
        let yaml = "string_length_range: { min: 10, max: 2 }";
        assert!(matches!(
            Parameters::from_yaml(yaml),
            Err(PopulateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"randomization_depth: 3\n").unwrap();
        let params = Parameters::from_file(file.path()).unwrap();
        assert_eq!(params.randomization_depth, 3);
        assert_eq!(params.seed, DEFAULT_SEED);
    }

    #[test]
    fn test_from_missing_file_keeps_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Parameters::from_file(dir.path().join("missing.yaml")).unwrap_err();

        match &err {
            PopulateError::IoError(io) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected IoError, got {other:?}"),
        }
        assert!(std::error::Error::source(&err).is_some());
    }
}
