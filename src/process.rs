//! Job handle: upload, status polling, and artifact download.
//!
//! A [`Process`] is created by [`Client::create_process`](crate::client::Client::create_process)
//! and is immutable except for the `wait` flag, set value-style before the
//! upload:
//!
//! ```rust,no_run
//! # use cloudconvert::Client;
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("my-key")?;
//! let process = client.create_process("pdf", "png").await?.wait(true);
//! let file = tokio::fs::File::open("report.pdf").await?;
//! let status = process
//!     .convert_stream(file, "report.pdf", "png", Default::default())
//!     .await?;
//! println!("finished: {}", status.message);
//! # Ok(())
//! # }
//! ```

use crate::error::Error;
use crate::response::{self, ByteStream};
use crate::status::ProcessStatus;
use crate::upload::{self, UploadRequest};
use reqwest::Url;
use std::collections::BTreeMap;
use tokio::io::AsyncRead;
use tracing::debug;

/// Converter options passed with an upload, keyed by option name.
///
/// A `BTreeMap` so the encoded field order is deterministic for a given map.
pub type ConverterOptions = BTreeMap<String, String>;

/// Handle to one conversion job at the service.
#[derive(Debug, Clone)]
pub struct Process {
    http: reqwest::Client,
    id: String,
    url: Url,
    input_format: String,
    output_format: String,
    wait: bool,
    pipe_capacity: usize,
}

impl Process {
    pub(crate) fn new(
        http: reqwest::Client,
        id: String,
        url: Url,
        input_format: String,
        output_format: String,
        pipe_capacity: usize,
    ) -> Self {
        Self {
            http,
            id,
            url,
            input_format,
            output_format,
            wait: false,
            pipe_capacity,
        }
    }

    /// Job identifier assigned by the service.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The job's callback URL (status checks and upload).
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Input format the job was created for.
    pub fn input_format(&self) -> &str {
        &self.input_format
    }

    /// Output format the job was created for.
    pub fn output_format(&self) -> &str {
        &self.output_format
    }

    /// Request synchronous completion: with `wait = true` the upload call
    /// holds its response until the conversion finishes.
    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// Upload `input` as a streamed multipart body and return the job
    /// status from the service's response.
    ///
    /// The encoder and the transmitter run concurrently; memory use is
    /// bounded by the pipe window, not the input size. Note that the input
    /// stream may be consumed to exhaustion even on error paths that strike
    /// after streaming begins.
    ///
    /// `output_format` here is what is sent with the body and may differ
    /// from the format the job was created with; `options` keys are encoded
    /// as `converteroptions[<key>]` fields.
    pub async fn convert_stream<R>(
        &self,
        input: R,
        filename: &str,
        output_format: &str,
        options: ConverterOptions,
    ) -> Result<ProcessStatus, Error>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        upload::upload(
            &self.http,
            self.url.clone(),
            UploadRequest {
                filename: filename.to_string(),
                input,
                output_format: output_format.to_string(),
                options,
                wait: self.wait,
            },
            self.pipe_capacity,
        )
        .await
    }

    /// Fetch the job's current status.
    pub async fn status(&self) -> Result<ProcessStatus, Error> {
        debug!(id = %self.id, "checking job status");
        let response = self.http.get(self.url.clone()).send().await?;
        response::json_envelope(response).await
    }

    /// Download the job's output artifact as a byte stream.
    ///
    /// For multi-file results this is the combined archive; use
    /// [`download_one`](Self::download_one) for an individual file.
    pub async fn download(&self) -> Result<ByteStream, Error> {
        let url = self
            .url
            .join(&format!("/download/{}", self.id))
            .map_err(|e| Error::url(self.url.as_str(), e))?;
        debug!(id = %self.id, url = %url, "downloading output");
        let response = self.http.get(url).send().await?;
        response::body_stream(response).await
    }

    /// Download one named file from a multi-file result.
    pub async fn download_one(&self, file: &str) -> Result<ByteStream, Error> {
        let mut url = self
            .url
            .join(&format!("/download/{}", self.id))
            .map_err(|e| Error::url(self.url.as_str(), e))?;
        url.path_segments_mut()
            .map_err(|_| Error::url(self.url.as_str(), "URL cannot carry a file segment"))?
            .push(file);
        debug!(id = %self.id, url = %url, "downloading single output file");
        let response = self.http.get(url).send().await?;
        response::body_stream(response).await
    }
}
