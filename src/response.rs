//! Response decoding shared by every operation.
//!
//! All service endpoints follow the same contract: HTTP 200 carries the
//! expected JSON envelope, anything else carries an
//! [`ErrorEnvelope`](crate::status::ErrorEnvelope) — except when it doesn't
//! (proxies, gateways, and half-dead backends answer with HTML or nothing).
//! Hence the two-tier parse: try the typed error envelope first, and if that
//! fails synthesize a status-mismatch error carrying the raw codes. Callers
//! never see a fabricated zero-valued envelope.

use crate::error::Error;
use crate::status::ErrorEnvelope;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::pin::Pin;
use tracing::debug;

/// A boxed stream of downloaded bytes.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>;

/// Decode a 200 response into `T`, or map a non-200 response to the
/// appropriate error.
pub(crate) async fn json_envelope<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();
    let body = response.bytes().await?;

    if status != StatusCode::OK {
        return Err(error_for_status(status, &body));
    }

    serde_json::from_slice(&body).map_err(Error::Decode)
}

/// Pass a 200 response through as a byte stream, or map a non-200 response
/// to the appropriate error.
pub(crate) async fn body_stream(response: Response) -> Result<ByteStream, Error> {
    let status = response.status();
    if status != StatusCode::OK {
        let body = response.bytes().await?;
        return Err(error_for_status(status, &body));
    }

    Ok(Box::pin(response.bytes_stream().map_err(Error::Transport)))
}

/// Two-tier parse of a non-200 body: typed error envelope, else a generic
/// status-mismatch error.
pub(crate) fn error_for_status(status: StatusCode, body: &[u8]) -> Error {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => Error::Remote {
            message: envelope.message,
            code: envelope.code,
        },
        Err(parse_err) => {
            debug!(
                status = status.as_u16(),
                %parse_err,
                "non-200 body is not an error envelope"
            );
            Error::UnexpectedStatus {
                expected: StatusCode::OK.as_u16(),
                actual: status.as_u16(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_envelope_becomes_remote_error() {
        let body = br#"{"error": "Invalid API key", "code": 401}"#;
        let err = error_for_status(StatusCode::UNAUTHORIZED, body);
        match err {
            Error::Remote { message, code } => {
                assert_eq!(message, "Invalid API key");
                assert_eq!(code, 401);
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_body_becomes_status_mismatch() {
        let err = error_for_status(StatusCode::BAD_GATEWAY, b"<html>502</html>");
        match err {
            Error::UnexpectedStatus { expected, actual } => {
                assert_eq!(expected, 200);
                assert_eq!(actual, 502);
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[test]
    fn empty_json_object_is_not_an_envelope() {
        // The permissive alternative would decode {} as "[0] " — make sure
        // we fall through to the status mismatch instead.
        let err = error_for_status(StatusCode::INTERNAL_SERVER_ERROR, b"{}");
        assert!(matches!(err, Error::UnexpectedStatus { actual: 500, .. }));
    }
}
