// ABOUTME: Manifest identifier validation.
// ABOUTME: A manifest id doubles as the rendered artifact's filename, so it must be path-safe.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestIdError {
    #[error("manifest id cannot be empty")]
    Empty,

    #[error("manifest id exceeds maximum length of 255 characters")]
    TooLong,

    #[error("manifest id cannot contain a path separator")]
    PathSeparator,

    #[error("manifest id cannot start with a dot")]
    LeadingDot,

    #[error("invalid character in manifest id: '{0}'")]
    InvalidChar(char),
}

/// A named logical unit of configuration. The id is both the template lookup
/// key and the filename the rendered artifact is written under, which is why
/// construction rejects anything that could escape the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestId(String);

impl ManifestId {
    pub fn new(value: &str) -> Result<Self, ManifestIdError> {
        if value.is_empty() {
            return Err(ManifestIdError::Empty);
        }

        if value.len() > 255 {
            return Err(ManifestIdError::TooLong);
        }

        if value.starts_with('.') {
            return Err(ManifestIdError::LeadingDot);
        }

        for c in value.chars() {
            if c == '/' || c == '\\' {
                return Err(ManifestIdError::PathSeparator);
            }
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
                return Err(ManifestIdError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ManifestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
