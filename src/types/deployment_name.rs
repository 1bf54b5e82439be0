// ABOUTME: Deployment name validation.
// ABOUTME: Names become container names and backup prefixes, so they follow RFC 1123 labels.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentNameError {
    #[error("deployment name cannot be empty")]
    Empty,

    #[error("deployment name exceeds maximum length of 63 characters")]
    TooLong,

    #[error("deployment name cannot start with a hyphen")]
    StartsWithHyphen,

    #[error("deployment name cannot end with a hyphen")]
    EndsWithHyphen,

    #[error("deployment name must be lowercase")]
    NotLowercase,

    #[error("invalid character in deployment name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeploymentName(String);

impl DeploymentName {
    pub fn new(value: &str) -> Result<Self, DeploymentNameError> {
        if value.is_empty() {
            return Err(DeploymentNameError::Empty);
        }

        if value.len() > 63 {
            return Err(DeploymentNameError::TooLong);
        }

        if value.starts_with('-') {
            return Err(DeploymentNameError::StartsWithHyphen);
        }

        if value.ends_with('-') {
            return Err(DeploymentNameError::EndsWithHyphen);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(DeploymentNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(DeploymentNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
