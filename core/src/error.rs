//! Error types for the JSON client.
//!
//! # Design
//! Every failure a round trip can hit gets its own variant so callers can
//! tell a bad URL from a dead host from a garbled response body. None of them
//! carry a real HTTP status; `status_code` reports the `FAILURE_STATUS`
//! sentinel for callers that want a `(status, error)` pair.
//!
//! Wrapped errors are rendered into the message rather than exposed as
//! `source`, so chain reporters print them once.

use thiserror::Error;

/// Status reported alongside any failed call.
pub const FAILURE_STATUS: i32 = -1;

/// Errors returned by `JsonClient` and the free request functions.
#[derive(Debug, Error)]
pub enum Error {
    /// The client was constructed without a base URL.
    #[error("parameter \"base_url\" is required")]
    MissingBaseUrl,

    /// The composed URL could not be parsed or is not http(s).
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request could not be assembled, e.g. an invalid header name or value.
    #[error("invalid request: {0}")]
    Request(String),

    /// The request body could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialize(serde_json::Error),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection refused, DNS failure, or any other I/O level failure.
    #[error("transport error: {0}")]
    Transport(ureq::Error),

    /// The response body was not valid JSON for the requested type.
    #[error("failed to decode response body (HTTP {status}): {error}")]
    Decode { status: u16, error: serde_json::Error },
}

impl Error {
    /// Sentinel status paired with this failure.
    pub fn status_code(&self) -> i32 {
        FAILURE_STATUS
    }

    /// True for failures that happened on the wire rather than in our code.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout)
    }

    /// True when the server answered but its body did not decode.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(_) => Error::Timeout,
            ureq::Error::BadUri(reason) => Error::InvalidUrl {
                url: String::new(),
                reason,
            },
            ureq::Error::Http(e) => Error::Request(e.to_string()),
            other => Error::Transport(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
