//! Subdomain label type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Label`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum LabelError {
    /// The input string is empty.
    #[error("subdomain label cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("subdomain label must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("subdomain label may only contain lowercase letters, digits and hyphens")]
    InvalidCharacter,
    /// The input starts or ends with a hyphen.
    #[error("subdomain label cannot start or end with a hyphen")]
    EdgeHyphen,
}

/// A single DNS label used as the subdomain part (e.g. `api` in
/// `api.example.com`).
///
/// ## Constraints
///
/// - Length: 1-63 characters (DNS label limit)
/// - Lowercase ASCII letters, digits and hyphens only
/// - No leading or trailing hyphen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Maximum length of a DNS label.
    pub const MAX_LENGTH: usize = 63;

    /// Parse a `Label` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, contains invalid
    /// characters, or has a leading or trailing hyphen.
    pub fn parse(s: &str) -> Result<Self, LabelError> {
        if s.is_empty() {
            return Err(LabelError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(LabelError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(LabelError::InvalidCharacter);
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(LabelError::EdgeHyphen);
        }

        Ok(Self(s.to_owned()))
    }

    /// Derive a label from free-form user input.
    ///
    /// Lowercases the input, replaces any run of non-alphanumeric characters
    /// with a single hyphen and strips hyphens from the edges. Returns an
    /// error if nothing usable remains.
    ///
    /// ```
    /// use freedns_core::Label;
    ///
    /// let label = Label::slugify("My Cool App!").unwrap();
    /// assert_eq!(label.as_str(), "my-cool-app");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the slugified result is empty or too long.
    pub fn slugify(input: &str) -> Result<Self, LabelError> {
        let mut out = String::with_capacity(input.len());
        let mut last_hyphen = true; // suppress leading hyphen

        for c in input.to_lowercase().chars() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                out.push(c);
                last_hyphen = false;
            } else if !last_hyphen {
                out.push('-');
                last_hyphen = true;
            }
        }

        let trimmed = out.trim_end_matches('-');
        Self::parse(trimmed)
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the fully-qualified name under a parent domain.
    #[must_use]
    pub fn fqdn(&self, parent: &str) -> String {
        format!("{}.{parent}", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Label::parse("api").is_ok());
        assert!(Label::parse("my-app-2").is_ok());
        assert!(Label::parse("a").is_ok());
    }

    #[test]
    fn test_parse_rejects_uppercase() {
        assert!(matches!(
            Label::parse("API"),
            Err(LabelError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_rejects_edge_hyphens() {
        assert!(matches!(Label::parse("-api"), Err(LabelError::EdgeHyphen)));
        assert!(matches!(Label::parse("api-"), Err(LabelError::EdgeHyphen)));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "a".repeat(64);
        assert!(matches!(
            Label::parse(&long),
            Err(LabelError::TooLong { .. })
        ));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(Label::slugify("My Cool App!").unwrap().as_str(), "my-cool-app");
        assert_eq!(Label::slugify("api").unwrap().as_str(), "api");
        assert_eq!(Label::slugify("a__b").unwrap().as_str(), "a-b");
        assert!(Label::slugify("!!!").is_err());
    }

    #[test]
    fn test_fqdn() {
        let label = Label::parse("api").unwrap();
        assert_eq!(label.fqdn("example.com"), "api.example.com");
    }
}
