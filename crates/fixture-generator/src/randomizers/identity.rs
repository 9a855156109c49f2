//! UUID and URL generators.

use super::Randomizer;
use crate::error::PopulateError;
use crate::random::ValueSource;
use fixture_core::Value;
use rand::Rng;
use url::Url;
use uuid::Uuid;

/// URLs the default URL randomizer picks from.
pub const DEFAULT_URLS: &[&str] = &[
    "https://www.google.com",
    "https://www.yahoo.com",
    "https://www.wikipedia.org",
    "https://www.github.com",
    "https://www.rust-lang.org",
    "https://crates.io",
    "https://docs.rs",
    "https://www.example.com",
];

/// Generate a random UUID v4 from the value source.
pub fn random_uuid(source: &mut ValueSource) -> Uuid {
    let mut bytes = [0u8; 16];
    source.fill(&mut bytes);

    // Set version (4) and variant (RFC 4122) bits
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

/// Generates version 4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRandomizer;

impl Randomizer for UuidRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        Value::Uuid(random_uuid(source))
    }
}

/// Picks a URL from a fixed list.
#[derive(Debug, Clone)]
pub struct UrlRandomizer {
    urls: Vec<Url>,
}

impl UrlRandomizer {
    /// Create a randomizer over `urls`, which must be non-empty and valid.
    pub fn new(urls: &[&str]) -> Result<Self, PopulateError> {
        if urls.is_empty() {
            return Err(PopulateError::InvalidArgument(
                "URL randomizer needs at least one URL".to_string(),
            ));
        }
        let urls = urls
            .iter()
            .map(|u| {
                Url::parse(u)
                    .map_err(|e| PopulateError::InvalidArgument(format!("invalid URL '{u}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { urls })
    }
}

impl Default for UrlRandomizer {
    fn default() -> Self {
        Self {
            urls: DEFAULT_URLS
                .iter()
                .filter_map(|u| Url::parse(u).ok())
                .collect(),
        }
    }
}

impl Randomizer for UrlRandomizer {
    fn produce(&self, source: &mut ValueSource) -> Value {
        if self.urls.is_empty() {
            return Value::Null;
        }
        Value::Url(self.urls[source.gen_range(0..self.urls.len())].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_deterministic() {
        let a = random_uuid(&mut ValueSource::new(42));
        let b = random_uuid(&mut ValueSource::new(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_uuid_version() {
        let mut source = ValueSource::new(42);
        match UuidRandomizer.produce(&mut source) {
            Value::Uuid(uuid) => assert_eq!(uuid.get_version_num(), 4),
            other => panic!("Expected UUID, got {other:?}"),
        }
        // Ensure uniqueness
        assert_ne!(random_uuid(&mut source), random_uuid(&mut source));
    }

    #[test]
    fn test_default_urls() {
        let randomizer = UrlRandomizer::default();
        let mut source = ValueSource::new(1);
        for _ in 0..20 {
            match randomizer.produce(&mut source) {
                Value::Url(url) => assert_eq!(url.scheme(), "https"),
                other => panic!("Expected Url, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_custom_urls() {
        let randomizer = UrlRandomizer::new(&["http://localhost:8080/a"]).unwrap();
        let mut source = ValueSource::new(1);
        match randomizer.produce(&mut source) {
            Value::Url(url) => assert_eq!(url.port(), Some(8080)),
            other => panic!("Expected Url, got {other:?}"),
        }
        assert!(UrlRandomizer::new(&["not a url"]).is_err());
        assert!(UrlRandomizer::new(&[]).is_err());
    }
}
