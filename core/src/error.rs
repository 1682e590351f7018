//! Error types for the hero.page client.
//!
//! The client itself recognises three failures: the server answered with a
//! non-2xx status, a request payload could not be encoded, or a header (in
//! practice the bearer token) is not valid HTTP. Network failures come
//! straight from `reqwest` untouched. A 2xx body that is not JSON is never an
//! error; see `HeroClient::parse_response`.

/// Errors returned by `HeroClient` and `HeroApi`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned a status outside `200..=299`. The body is not
    /// inspected.
    #[error("Request failed with status {status}")]
    Http { status: u16 },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A header name or value (usually a token with control characters)
    /// cannot be sent over HTTP. The request is not sent.
    #[error("invalid value for header `{name}`")]
    InvalidHeader { name: String },

    /// DNS, connect, TLS, or body-read failure from the HTTP stack.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// The HTTP status carried by an `Http` error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status } => Some(*status),
            _ => None,
        }
    }
}
