//! API token type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque Rail Data Marketplace API token.
///
/// Never checked for format; only a live request can tell whether a token
/// is accepted. `Debug` is redacted so tokens stay out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wrap a token, trimming surrounding whitespace.
    ///
    /// Returns `None` if nothing remains after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw token, for request headers and form defaults.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_rejected() {
        assert!(ApiToken::new("").is_none());
        assert!(ApiToken::new("   ").is_none());
    }

    #[test]
    fn token_trimmed() {
        let token = ApiToken::new("  abc123 ").unwrap();
        assert_eq!(token.expose(), "abc123");
    }

    #[test]
    fn debug_is_redacted() {
        let token = ApiToken::new("secret").unwrap();
        assert_eq!(format!("{token:?}"), "ApiToken(***)");
    }

    #[test]
    fn serializes_as_plain_string() {
        let token = ApiToken::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"abc\"");
    }
}
