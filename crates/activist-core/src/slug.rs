//! Tenant slugs
//!
//! A slug is the URL-safe identifier of a tenant and doubles as the subdomain
//! label used for domain resolution, so it is restricted to a single
//! lowercase DNS label: `[a-z0-9-]`, at most 63 characters.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Longest label a DNS name may carry.
pub const MAX_SLUG_LEN: usize = 63;

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("slug pattern is valid"));

/// Validated tenant slug.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(pub(crate) String);

impl Slug {
    /// Parse an already-normalized slug.
    ///
    /// Rejects empty input, anything longer than [`MAX_SLUG_LEN`], and any
    /// character outside `[a-z0-9-]` (uppercase included).
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidSlug("slug must not be empty".to_string()));
        }
        if s.len() > MAX_SLUG_LEN {
            return Err(Error::InvalidSlug(format!(
                "'{}' is longer than {} characters",
                s, MAX_SLUG_LEN
            )));
        }
        if !SLUG_PATTERN.is_match(s) {
            return Err(Error::InvalidSlug(format!(
                "'{}' may only contain a-z, 0-9 and '-'",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Normalize free-form input (e.g. an admin form field) into a slug.
    ///
    /// Lowercases, turns whitespace and `_` into `-`, drops every other
    /// character outside `[a-z0-9-]`, collapses dash runs and trims dashes
    /// from both ends.
    ///
    /// # Examples
    /// ```
    /// use activist_core::Slug;
    ///
    /// assert_eq!(Slug::normalize("Climate Action!").unwrap().as_str(), "climate-action");
    /// assert!(Slug::normalize("  ***  ").is_err());
    /// ```
    pub fn normalize(input: &str) -> Result<Self> {
        let mut out = String::with_capacity(input.len());
        for ch in input.trim().chars().flat_map(char::to_lowercase) {
            let mapped = match ch {
                'a'..='z' | '0'..='9' => Some(ch),
                '-' | '_' => Some('-'),
                c if c.is_whitespace() => Some('-'),
                _ => None,
            };
            if let Some(c) = mapped {
                if c == '-' && out.ends_with('-') {
                    continue;
                }
                out.push(c);
            }
        }
        let trimmed = out.trim_matches('-');
        if trimmed.is_empty() {
            return Err(Error::InvalidSlug(format!(
                "'{}' contains no usable characters",
                input
            )));
        }
        Self::parse(trimmed)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Slug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by `Slug` be queried with a plain `&str`.
impl Borrow<str> for Slug {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_normalized() {
        assert_eq!(Slug::parse("climate-action").unwrap().as_str(), "climate-action");
        assert_eq!(Slug::parse("a1").unwrap().as_str(), "a1");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(Slug::parse("").is_err());
        assert!(Slug::parse("Climate").is_err());
        assert!(Slug::parse("has space").is_err());
        assert!(Slug::parse("dot.ted").is_err());
        assert!(Slug::parse(&"a".repeat(MAX_SLUG_LEN + 1)).is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(Slug::normalize("City Bikes").unwrap().as_str(), "city-bikes");
        assert_eq!(Slug::normalize("  Save_the--Whales ").unwrap().as_str(), "save-the-whales");
        assert_eq!(Slug::normalize("Ünïcode Ok").unwrap().as_str(), "ncode-ok");
        assert!(matches!(Slug::normalize("!!!"), Err(Error::InvalidSlug(_))));
    }

    #[test]
    fn test_serde_validates() {
        let ok: Slug = serde_json::from_str("\"city-bikes\"").unwrap();
        assert_eq!(ok.as_str(), "city-bikes");
        assert!(serde_json::from_str::<Slug>("\"City Bikes\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"city-bikes\"");
    }
}
