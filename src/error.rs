//! Error types for the cloudconvert client.
//!
//! One enum covers every failure mode of the client, split along the
//! boundaries that matter to callers:
//!
//! * [`Error::Encode`] — producing the multipart body failed. This is the
//!   authoritative outcome of an upload: an encoding failure wins over
//!   whatever the HTTP exchange reported, because a server can answer 200
//!   after accepting a truncated body.
//! * [`Error::Transport`] — the request never completed (connection refused,
//!   DNS, timeout, malformed request).
//! * [`Error::Remote`] — the service answered non-200 with a well-formed
//!   error envelope; carries the service's own message and numeric code.
//! * [`Error::UnexpectedStatus`] — the service answered non-200 with a body
//!   that is *not* an error envelope. We refuse to guess and report the raw
//!   status mismatch instead.
//! * [`Error::Decode`] — the service answered 200 but the body does not
//!   deserialize into a [`ProcessStatus`](crate::status::ProcessStatus).
//!
//! Nothing is retried or swallowed internally; every error propagates to the
//! immediate caller of the operation that produced it.

use thiserror::Error;

/// All errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    // ── Upload pipeline ───────────────────────────────────────────────────
    /// Producing the multipart request body failed: a field write, the file
    /// part header, the input-stream copy, or the terminator.
    ///
    /// Carries the exact underlying error — an input stream failing mid-read
    /// surfaces here verbatim, never as a generic end-of-data or HTTP error.
    #[error("failed to encode multipart body: {0}")]
    Encode(#[source] std::io::Error),

    // ── Transport ─────────────────────────────────────────────────────────
    /// Request construction or network failure while talking to the service.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A URL could not be parsed or resolved against the API base URL.
    #[error("invalid URL '{url}': {reason}")]
    Url { url: String, reason: String },

    // ── Remote service ────────────────────────────────────────────────────
    /// The service rejected the request with a decoded error envelope.
    #[error("[{code}] {message}")]
    Remote { message: String, code: i64 },

    /// Non-200 response whose body is not an error envelope.
    #[error("invalid status code; expected {expected} but got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },

    // ── Response decoding ─────────────────────────────────────────────────
    /// A 200 response whose body does not parse as the expected envelope.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    // ── Config ────────────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn url(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::Url {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_display_matches_envelope() {
        let e = Error::Remote {
            message: "Input format not supported".into(),
            code: 400,
        };
        assert_eq!(e.to_string(), "[400] Input format not supported");
    }

    #[test]
    fn unexpected_status_display() {
        let e = Error::UnexpectedStatus {
            expected: 200,
            actual: 503,
        };
        assert_eq!(
            e.to_string(),
            "invalid status code; expected 200 but got 503"
        );
    }

    #[test]
    fn encode_preserves_source_message() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk detached");
        let e = Error::Encode(io);
        assert!(e.to_string().contains("disk detached"), "got: {e}");
    }
}
