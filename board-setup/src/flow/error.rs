//! Flow error types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::darwin::RailClientError;
use crate::store::StoreError;

/// Why validation of user input failed.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The rail service rejected the token
    #[error("API token rejected")]
    InvalidToken(#[source] RailClientError),

    /// The rail service rejected the station/destination combination
    #[error("station input rejected")]
    InvalidInput(#[source] RailClientError),

    /// Anything else: network failures, unexpected responses
    #[error("unexpected error while validating")]
    Unknown(#[source] RailClientError),
}

impl From<RailClientError> for ValidationError {
    fn from(err: RailClientError) -> Self {
        match err {
            RailClientError::InvalidToken => ValidationError::InvalidToken(err),
            RailClientError::InvalidInput { .. } => ValidationError::InvalidInput(err),
            other => ValidationError::Unknown(other),
        }
    }
}

/// Base-level error shown on a redisplayed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorTag {
    InvalidToken,
    #[serde(rename = "invalid_station_input")]
    InvalidInput,
    NoToken,
    Unknown,
}

impl ErrorTag {
    /// The tag as sent to form renderers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorTag::InvalidToken => "invalid_token",
            ErrorTag::InvalidInput => "invalid_station_input",
            ErrorTag::NoToken => "no_token",
            ErrorTag::Unknown => "unknown",
        }
    }

    /// Human-readable guidance for the tag.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorTag::InvalidToken => "The API token was rejected. Check it and try again.",
            ErrorTag::InvalidInput => "The station or destination codes were not recognised.",
            ErrorTag::NoToken => "No API token is available. Set up the integration again.",
            ErrorTag::Unknown => "Unexpected error. See the server log for details.",
        }
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ValidationError> for ErrorTag {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::InvalidToken(_) => ErrorTag::InvalidToken,
            ValidationError::InvalidInput(_) => ErrorTag::InvalidInput,
            ValidationError::Unknown(_) => ErrorTag::Unknown,
        }
    }
}

impl From<&StoreError> for ErrorTag {
    fn from(_: &StoreError) -> Self {
        ErrorTag::Unknown
    }
}

/// Misuse of a flow by its host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The flow already reached its terminal state
    #[error("flow already finished")]
    AlreadyFinished,
}

/// Render an error and its sources as one line, outermost first.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
