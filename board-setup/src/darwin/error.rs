//! Rail client error types.

/// Errors from a rail data client.
///
/// `InvalidToken` and `InvalidInput` are the two failures the setup flows
/// can explain to the user. Everything else is reported as an unknown error.
#[derive(Debug, thiserror::Error)]
pub enum RailClientError {
    /// The API token was rejected
    #[error("unauthorized (invalid API token)")]
    InvalidToken,

    /// The station or destination codes were rejected
    #[error("invalid station input: {message}")]
    InvalidInput { message: String },

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an unexpected error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}
