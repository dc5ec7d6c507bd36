//! Cache Key Module
//!
//! Validated cache keys. A key is 1 to 64 characters drawn from ASCII
//! letters, digits, hyphen, underscore and dot.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{CacheError, Result};

static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^[A-Za-z0-9\-_.]{{1,{MAX_KEY_LENGTH}}}$"))
        .expect("key pattern is a valid regex")
});

// == Cache Key ==
/// A key that has passed format validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Validates `key`, failing with [`CacheError::InvalidKey`] on mismatch.
    pub fn parse(key: impl AsRef<str>) -> Result<Self> {
        let key = key.as_ref();
        if KEY_PATTERN.is_match(key) {
            Ok(Self(key.to_string()))
        } else {
            Err(CacheError::InvalidKey(key.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_alphabet() {
        for key in ["a", "A-Z_0.9", "user.profile-42", "..", "-", "_"] {
            assert!(CacheKey::parse(key).is_ok(), "{key:?} should be valid");
        }
    }

    #[test]
    fn test_length_bounds() {
        assert!(CacheKey::parse("x".repeat(64)).is_ok());
        assert!(matches!(
            CacheKey::parse("x".repeat(65)),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(CacheKey::parse(""), Err(CacheError::InvalidKey(_))));
    }

    #[test]
    fn test_rejects_other_characters() {
        for key in ["a b", "a/b", "key:1", "ключ", "a\n", "{}", "a*"] {
            assert!(
                matches!(CacheKey::parse(key), Err(CacheError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_matches_input() {
        let key = CacheKey::parse("session.abc").unwrap();
        assert_eq!(key.to_string(), "session.abc");
        assert_eq!(key.as_str(), "session.abc");
    }
}
