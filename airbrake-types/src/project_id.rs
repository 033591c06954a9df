use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised if a project ID cannot be parsed from a string.
#[derive(Debug, Error, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParseProjectIdError {
    /// Raised if the value is not a positive integer in the supported range.
    #[error("invalid value for project id")]
    InvalidValue,
    /// Raised if an empty value is parsed.
    #[error("empty or missing project id")]
    EmptyValue,
}

/// Represents an Airbrake project ID.
///
/// Project IDs are positive integers; they show up in the notice endpoint
/// path (`/api/v3/projects/{id}/notices`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ProjectId(u64);

impl ProjectId {
    /// Creates a new project ID from its numeric value.
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value of this project id.
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = ParseProjectIdError;

    fn from_str(s: &str) -> Result<ProjectId, ParseProjectIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseProjectIdError::EmptyValue);
        }

        match s.parse::<u64>() {
            Ok(val) => Ok(ProjectId::new(val)),
            Err(_) => Err(ParseProjectIdError::InvalidValue),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use rstest::rstest;

    #[test]
    fn test_basic_api() {
        let id: ProjectId = "42".parse().unwrap();
        assert_eq!(id, ProjectId::new(42));
        assert_eq!(id.value(), 42);
        assert_eq!(ProjectId::new(42).to_string(), "42");

        assert_eq!(serde_json::to_string(&ProjectId::new(42)).unwrap(), "42");
        assert_eq!(
            serde_json::from_str::<ProjectId>("42").unwrap(),
            ProjectId::new(42)
        );
    }

    #[rstest]
    #[case("1", Ok(ProjectId::new(1)))]
    #[case(" 123456\n", Ok(ProjectId::new(123_456)))]
    #[case("-1", Err(ParseProjectIdError::InvalidValue))]
    #[case("42xxx", Err(ParseProjectIdError::InvalidValue))]
    #[case("", Err(ParseProjectIdError::EmptyValue))]
    #[case("   ", Err(ParseProjectIdError::EmptyValue))]
    fn test_parse(#[case] input: &str, #[case] expected: Result<ProjectId, ParseProjectIdError>) {
        assert_eq!(input.parse::<ProjectId>(), expected);
    }
}
