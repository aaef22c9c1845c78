//! The concurrent streaming-upload pipeline.
//!
//! ## Shape
//!
//! ```text
//!  encoder task                         caller's task
//!  ────────────                         ─────────────
//!  multipart fields ──▶ pipe ──▶ request body ──▶ POST job URL
//!  file stream      ──▶  │
//!  terminator       ──▶  │
//!        │               ▼
//!        └──▶ outcome signal ──▶ joiner ──▶ decode response
//! ```
//!
//! Two units of work run concurrently per upload: the multipart encoder
//! (spawned) and the transmitter (the caller's own task). They share nothing
//! but the bounded [`pipe`] and a one-shot outcome signal, so the request
//! starts flowing before the file has been read and memory stays bounded by
//! the pipe window rather than the file size.
//!
//! ## Why the outcome signal exists
//!
//! When encoding fails mid-body the transmitter only ever sees its side of
//! the pipe end — a generic aborted body, or worse, a server that happily
//! answers 200 for the bytes it did receive. The encoder therefore posts its
//! true outcome into a single-slot channel *before* closing the pipe, on
//! every path, and the joiner refuses to trust the HTTP result until it has
//! read that slot.

pub(crate) mod multipart;
pub(crate) mod pipe;

use crate::error::Error;
use crate::response;
use crate::status::ProcessStatus;
use multipart::MultipartEncoder;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, Url};
use std::collections::BTreeMap;
use std::io;
use tokio::io::AsyncRead;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// One upload call's worth of input. Owned by the caller, consumed by the
/// pipeline; the `wait` flag is read-only input copied from the job handle.
pub(crate) struct UploadRequest<R> {
    pub filename: String,
    pub input: R,
    pub output_format: String,
    pub options: BTreeMap<String, String>,
    pub wait: bool,
}

/// Stream `request` to the job's upload URL as a multipart body and decode
/// the service's answer.
pub(crate) async fn upload<R>(
    http: &reqwest::Client,
    url: Url,
    request: UploadRequest<R>,
    pipe_capacity: usize,
) -> Result<ProcessStatus, Error>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let (writer, reader) = pipe::pipe(pipe_capacity);
    let mut encoder = MultipartEncoder::new(writer);
    let content_type = encoder.content_type();
    let (done_tx, done_rx) = oneshot::channel::<io::Result<()>>();

    debug!(url = %url, filename = %request.filename, "starting streamed upload");

    // Encoder unit. Invariant: the outcome is posted exactly once, before
    // the pipe closes, on every path — the joiner must never see a bare
    // end-of-data where an encode error was the cause.
    let mut request = request;
    tokio::spawn(async move {
        let outcome = encode_parts(&mut encoder, &mut request).await;
        let writer = encoder.into_writer();
        match outcome {
            Ok(()) => {
                let _ = done_tx.send(Ok(()));
                writer.close();
            }
            Err(err) => {
                warn!(%err, "multipart encode failed, aborting request body");
                let body_err = io::Error::new(err.kind(), err.to_string());
                let _ = done_tx.send(Err(err));
                writer.close_with_error(body_err).await;
            }
        }
    });

    // Transmitter unit: issue the request with the pipe's read end as the
    // body and block until response headers arrive or the connection fails.
    let sent = http
        .post(url)
        .header(CONTENT_TYPE, content_type)
        .body(Body::wrap_stream(reader))
        .send()
        .await;

    // Joiner: the encode outcome is read exactly once and checked before any
    // HTTP result is trusted.
    let encoded = match done_rx.await {
        Ok(outcome) => outcome,
        // The encoder posts before terminating on every path, so a dropped
        // sender means the task died (panic/abort) mid-encode.
        Err(_) => Err(io::Error::new(
            io::ErrorKind::Other,
            "encoder terminated without reporting an outcome",
        )),
    };

    match (encoded, sent) {
        // A BrokenPipe write failure means the transmitter hung up first;
        // the transport error is the cause, the failed write the symptom.
        (Err(enc), Err(transport)) if enc.kind() == io::ErrorKind::BrokenPipe => {
            Err(Error::Transport(transport))
        }
        // Any other encode error is authoritative, even over an HTTP 200 —
        // the server may have accepted a truncated body.
        (Err(enc), _) => Err(Error::Encode(enc)),
        (Ok(()), Err(transport)) => Err(Error::Transport(transport)),
        (Ok(()), Ok(res)) => response::json_envelope(res).await,
    }
}

/// Write every part of the body in protocol order. Aborts on the first
/// failed write; no partial retry.
async fn encode_parts<R>(
    encoder: &mut MultipartEncoder,
    request: &mut UploadRequest<R>,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    encoder.write_field("input", "upload").await?;
    encoder
        .write_field("outputformat", &request.output_format)
        .await?;

    if request.wait {
        encoder.write_field("wait", "true").await?;
    }

    for (key, value) in &request.options {
        encoder
            .write_field(&format!("converteroptions[{key}]"), value)
            .await?;
    }

    encoder
        .write_file("file", &request.filename, &mut request.input)
        .await?;

    encoder.finish().await
}
