//! URL slug type.
//!
//! Slugs are the idempotency keys for categories, products and vendor stores.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("slug contains invalid character {0:?}")]
    InvalidChar(char),
    /// The input starts or ends with a hyphen.
    #[error("slug cannot start or end with a hyphen")]
    EdgeHyphen,
    /// The input contains two hyphens in a row.
    #[error("slug cannot contain consecutive hyphens")]
    DoubleHyphen,
}

/// A lowercase, hyphen-separated URL slug.
///
/// ## Constraints
///
/// - Length: 1-128 characters
/// - Only lowercase ASCII letters, digits and `-`
/// - No leading, trailing or doubled hyphens
///
/// ## Examples
///
/// ```
/// use marketplace_core::Slug;
///
/// assert!(Slug::parse("mens-clothing").is_ok());
/// assert!(Slug::parse("iphone-15-pro").is_ok());
///
/// assert!(Slug::parse("").is_err());
/// assert!(Slug::parse("Mens Clothing").is_err());
/// assert!(Slug::parse("-leading").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 128;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, contains characters
    /// other than `[a-z0-9-]`, or has a leading, trailing or doubled hyphen.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidChar(c));
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }

        if s.contains("--") {
            return Err(SlugError::DoubleHyphen);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
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

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_slugs() {
        assert!(Slug::parse("electronics").is_ok());
        assert!(Slug::parse("home-garden").is_ok());
        assert!(Slug::parse("samsung-galaxy-s24").is_ok());
        assert!(Slug::parse("a").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(Slug::MAX_LENGTH + 1);
        assert!(matches!(Slug::parse(&long), Err(SlugError::TooLong { .. })));
    }

    #[test]
    fn test_parse_rejects_uppercase_and_spaces() {
        assert_eq!(Slug::parse("Books"), Err(SlugError::InvalidChar('B')));
        assert_eq!(Slug::parse("movies tv"), Err(SlugError::InvalidChar(' ')));
        assert_eq!(Slug::parse("home&garden"), Err(SlugError::InvalidChar('&')));
    }

    #[test]
    fn test_parse_rejects_bad_hyphens() {
        assert_eq!(Slug::parse("-books"), Err(SlugError::EdgeHyphen));
        assert_eq!(Slug::parse("books-"), Err(SlugError::EdgeHyphen));
        assert_eq!(Slug::parse("movies--tv"), Err(SlugError::DoubleHyphen));
    }

    #[test]
    fn test_deserialize_validates() {
        let slug: Slug = serde_json::from_str("\"kitchen\"").unwrap();
        assert_eq!(slug.as_str(), "kitchen");

        let bad: Result<Slug, _> = serde_json::from_str("\"Kitchen\"");
        assert!(bad.is_err());
    }
}
