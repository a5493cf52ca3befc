//! Connection descriptors (`scheme://params`)

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// A connection descriptor of the form `scheme://params`.
///
/// The scheme selects the driver; the params are handed to that driver
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUrl {
    scheme: String,
    params: String,
}

impl ConnectionUrl {
    pub fn parse(url: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };
        let (scheme, params) = url
            .split_once("://")
            .ok_or_else(|| invalid("expected scheme://params"))?;
        if scheme.is_empty() {
            return Err(invalid("scheme must not be empty"));
        }
        if !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        {
            return Err(invalid("scheme contains invalid characters"));
        }
        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            params: params.to_string(),
        })
    }

    /// Lowercased scheme
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Everything after `://`
    pub fn params(&self) -> &str {
        &self.params
    }
}

impl FromStr for ConnectionUrl {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ConnectionUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duckdb_memory() {
        let url = ConnectionUrl::parse("duckdb://:memory:").unwrap();
        assert_eq!(url.scheme(), "duckdb");
        assert_eq!(url.params(), ":memory:");
    }

    #[test]
    fn test_parse_keeps_params_verbatim() {
        let url = ConnectionUrl::parse("SQLite:///tmp/a b/db.sqlite").unwrap();
        assert_eq!(url.scheme(), "sqlite");
        assert_eq!(url.params(), "/tmp/a b/db.sqlite");
        assert_eq!(url.to_string(), "sqlite:///tmp/a b/db.sqlite");
    }

    #[test]
    fn test_parse_rejects_missing_scheme() {
        assert!(ConnectionUrl::parse("/tmp/db.duckdb").is_err());
        assert!(ConnectionUrl::parse("://x").is_err());
        assert!(ConnectionUrl::parse("my db://x").is_err());
    }
}
