//! Incremental multipart/form-data encoder.
//!
//! Serialises job fields and a file payload into a multipart body, one part
//! at a time, writing each piece straight into the
//! [`pipe`](crate::upload::pipe) instead of materialising the body in
//! memory. The file part is copied from the input reader in fixed-size
//! chunks, so a multi-gigabyte upload buffers no more than the pipe allows.
//!
//! A fresh random boundary is generated per encoder; the transmitter reads
//! it back via [`MultipartEncoder::content_type`] to build the request
//! header before the body exists.

use super::pipe::PipeWriter;
use bytes::Bytes;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};
use uuid::Uuid;

/// Chunk size for copying the input stream into the pipe.
pub(crate) const ENCODE_CHUNK_SIZE: usize = 64 * 1024;

/// Writes a multipart/form-data body into a [`PipeWriter`].
pub(crate) struct MultipartEncoder {
    writer: PipeWriter,
    boundary: String,
}

impl MultipartEncoder {
    pub fn new(writer: PipeWriter) -> Self {
        Self {
            writer,
            boundary: format!("cloudconvert-{}", Uuid::new_v4().simple()),
        }
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Write one text field.
    pub async fn write_field(&mut self, name: &str, value: &str) -> io::Result<()> {
        let part = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            self.boundary,
            escape_quoted(name),
            value
        );
        self.writer.write(Bytes::from(part)).await
    }

    /// Write the file part, copying `reader` to exhaustion.
    ///
    /// Read errors from `reader` propagate verbatim — they are the root
    /// cause the caller must see, not the truncated body they leave behind.
    pub async fn write_file<R>(&mut self, name: &str, filename: &str, reader: &mut R) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let header = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            self.boundary,
            escape_quoted(name),
            escape_quoted(filename)
        );
        self.writer.write(Bytes::from(header)).await?;

        let mut buf = vec![0u8; ENCODE_CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            self.writer.write(Bytes::copy_from_slice(&buf[..n])).await?;
        }

        self.writer.write(Bytes::from_static(b"\r\n")).await
    }

    /// Write the closing boundary. The pipe stays open; the caller closes it
    /// after posting the encode outcome.
    pub async fn finish(&mut self) -> io::Result<()> {
        let terminator = format!("--{}--\r\n", self.boundary);
        self.writer.write(Bytes::from(terminator)).await
    }

    /// Hand the pipe's write end back for closing.
    pub fn into_writer(self) -> PipeWriter {
        self.writer
    }
}

/// Escape a value for use inside a quoted `Content-Disposition` parameter.
fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::pipe;
    use futures::StreamExt;

    /// Drive `encode` to completion and return the produced body as a string.
    async fn collect_body<F, Fut>(encode: F) -> String
    where
        F: FnOnce(MultipartEncoder) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = MultipartEncoder> + Send,
    {
        let (writer, reader) = pipe::pipe(4);
        let encoder = MultipartEncoder::new(writer);
        let task = tokio::spawn(async move {
            let encoder = encode(encoder).await;
            encoder.into_writer().close();
        });

        let chunks: Vec<_> = reader.collect().await;
        task.await.unwrap();
        let bytes: Vec<u8> = chunks
            .into_iter()
            .flat_map(|c| c.unwrap().to_vec())
            .collect();
        String::from_utf8(bytes).unwrap()
    }

    #[tokio::test]
    async fn field_layout_is_well_formed() {
        let body = collect_body(|mut enc| async move {
            enc.write_field("input", "upload").await.unwrap();
            enc.write_field("outputformat", "png").await.unwrap();
            enc.finish().await.unwrap();
            enc
        })
        .await;

        assert!(body.contains("Content-Disposition: form-data; name=\"input\"\r\n\r\nupload\r\n"));
        assert!(body.contains("name=\"outputformat\"\r\n\r\npng\r\n"));
        assert!(body.ends_with("--\r\n"));

        // Exactly one opening boundary per part plus the terminator.
        let boundary_line = body.lines().next().unwrap().to_string();
        assert_eq!(body.matches(&boundary_line).count(), 3);
    }

    #[tokio::test]
    async fn file_part_streams_reader_verbatim() {
        let payload = vec![0x42u8; ENCODE_CHUNK_SIZE * 2 + 17];
        let expected = payload.clone();
        let body = collect_body(move |mut enc| async move {
            let mut reader = std::io::Cursor::new(payload);
            enc.write_file("file", "blob.bin", &mut reader).await.unwrap();
            enc.finish().await.unwrap();
            enc
        })
        .await;

        assert!(body.contains("name=\"file\"; filename=\"blob.bin\""));
        assert!(body.contains("Content-Type: application/octet-stream"));
        let payload_text = String::from_utf8(expected).unwrap();
        assert!(body.contains(&payload_text), "file bytes must be copied verbatim");
    }

    #[tokio::test]
    async fn filename_quotes_are_escaped() {
        let body = collect_body(|mut enc| async move {
            let mut reader = std::io::Cursor::new(b"x".to_vec());
            enc.write_file("file", "we \"love\" rust.txt", &mut reader)
                .await
                .unwrap();
            enc.finish().await.unwrap();
            enc
        })
        .await;

        assert!(body.contains(r#"filename="we \"love\" rust.txt""#));
    }

    #[tokio::test]
    async fn reader_error_propagates_verbatim() {
        struct FailingReader;
        impl tokio::io::AsyncRead for FailingReader {
            fn poll_read(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
                _buf: &mut tokio::io::ReadBuf<'_>,
            ) -> std::task::Poll<io::Result<()>> {
                std::task::Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::Other,
                    "stream source vanished",
                )))
            }
        }

        let (writer, _reader) = pipe::pipe(4);
        let mut encoder = MultipartEncoder::new(writer);
        let err = encoder
            .write_file("file", "doomed.bin", &mut FailingReader)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "stream source vanished");
    }
}
