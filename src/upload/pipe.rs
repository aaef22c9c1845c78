//! In-process byte pipe connecting the multipart encoder to the HTTP body.
//!
//! The encoder and the transmitter run as two concurrent tasks; this pipe is
//! the only thing between them. It is a bounded channel of byte chunks:
//! writes suspend once `capacity` chunks sit unread, and resume as the
//! transmitter drains them into the socket. Peak buffered memory for an
//! upload is therefore `capacity × chunk size`, independent of the file size.
//!
//! Closing the write end cleanly ends the stream after buffered chunks
//! drain. Closing it with an error makes the reader observe that error,
//! which aborts the in-flight request body instead of silently truncating
//! it — the server must not mistake a failed encode for a complete upload.

use bytes::Bytes;
use futures::Stream;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Create a pipe holding at most `capacity` unread chunks.
pub(crate) fn pipe(capacity: usize) -> (PipeWriter, PipeReader) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (PipeWriter { tx }, PipeReader { rx })
}

/// Write end. Exactly one exists per upload; consumed on close.
pub(crate) struct PipeWriter {
    tx: mpsc::Sender<io::Result<Bytes>>,
}

impl PipeWriter {
    /// Queue one chunk, suspending while the pipe is full.
    ///
    /// Fails with [`io::ErrorKind::BrokenPipe`] once the read end is gone —
    /// the transmitter dropped the body, so producing further bytes is
    /// pointless.
    pub async fn write(&self, chunk: Bytes) -> io::Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        self.tx
            .send(Ok(chunk))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "pipe reader dropped"))
    }

    /// Close cleanly: the reader sees end-of-stream after draining.
    pub fn close(self) {}

    /// Close with an error: the reader observes `error` after draining any
    /// buffered chunks, failing the request body.
    pub async fn close_with_error(self, error: io::Error) {
        // The reader may already be gone (request aborted); nothing to do then.
        let _ = self.tx.send(Err(error)).await;
    }
}

/// Read end: a `Stream` of chunks, pluggable into `reqwest::Body::wrap_stream`.
pub(crate) struct PipeReader {
    rx: mpsc::Receiver<io::Result<Bytes>>,
}

impl Stream for PipeReader {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
