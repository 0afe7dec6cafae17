//! Opaque wrapper for secret-bearing configuration values

use std::fmt;

/// A secret string (API token, secret access key)
///
/// Both `Debug` and `Display` print `[REDACTED]`; the raw value is only
/// reachable through [`Secret::expose`], which keeps tokens out of logs and
/// error messages unless a call site asks for the value explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying secret value
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_expose_value() {
        let secret = Secret::new("super_secret_token_12345");
        let debug_output = format!("{:?}", secret);

        assert_eq!(debug_output, "[REDACTED]");
        assert!(!debug_output.contains("super_secret_token_12345"));
    }

    #[test]
    fn test_display_does_not_expose_value() {
        let secret = Secret::new("super_secret_token_12345");
        assert_eq!(secret.to_string(), "[REDACTED]");
    }

    #[test]
    fn test_expose_returns_value() {
        let secret = Secret::from("tfe-token");
        assert_eq!(secret.expose(), "tfe-token");
        assert!(!secret.is_empty());
    }
}
