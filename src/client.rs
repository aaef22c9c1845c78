//! Client entry point and job creation.
//!
//! A [`Client`] holds the API key and a shared `reqwest::Client`; each
//! conversion starts with [`Client::create_process`], which registers the
//! job with the service and returns a [`Process`] handle pointing at the
//! job's own callback URL. Everything after that — upload, status polling,
//! download — happens through the handle.

use crate::config::ClientConfig;
use crate::error::Error;
use crate::process::Process;
use crate::response;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Client for the conversion service.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    config: ClientConfig,
}

#[derive(Serialize)]
struct CreateProcessRequest<'a> {
    apikey: &'a str,
    inputformat: &'a str,
    outputformat: &'a str,
}

/// Only the fields the handle needs; the service sends more (host, limits,
/// expiry) but nothing downstream consumes them.
#[derive(Deserialize)]
struct CreateProcessResponse {
    url: String,
    id: String,
}

impl Client {
    /// Create a client for the public API endpoint with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::with_config(ClientConfig::builder().api_key(api_key).build()?)
    }

    /// Create a client from an explicit [`ClientConfig`].
    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| Error::url(&config.base_url, e))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    /// The configured API key.
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Register a conversion job for the given input/output formats.
    ///
    /// On success the service assigns the job an id and a callback URL
    /// (possibly protocol-relative, resolved here against the base URL). An
    /// unsupported format pair surfaces as [`Error::Remote`] and no upload
    /// ever takes place.
    pub async fn create_process(
        &self,
        input_format: &str,
        output_format: &str,
    ) -> Result<Process, Error> {
        let endpoint = self
            .base_url
            .join("/process")
            .map_err(|e| Error::url(self.base_url.as_str(), e))?;

        let response = self
            .http
            .post(endpoint)
            .json(&CreateProcessRequest {
                apikey: &self.config.api_key,
                inputformat: input_format,
                outputformat: output_format,
            })
            .send()
            .await?;

        let created: CreateProcessResponse = response::json_envelope(response).await?;

        let job_url = self
            .base_url
            .join(&created.url)
            .map_err(|e| Error::url(&created.url, e))?;

        info!(id = %created.id, url = %job_url, "created conversion job");

        Ok(Process::new(
            self.http.clone(),
            created.id,
            job_url,
            input_format.to_string(),
            output_format.to_string(),
            self.config.pipe_capacity,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stores_api_key() {
        let client = Client::new("test-key").unwrap();
        assert_eq!(client.api_key(), "test-key");
    }

    #[test]
    fn protocol_relative_job_url_resolves_against_base_scheme() {
        let base = Url::parse(crate::config::DEFAULT_API_URL).unwrap();
        let resolved = base.join("//srv01.cloudconvert.com/process/abc").unwrap();
        assert_eq!(resolved.scheme(), "https");
        assert_eq!(resolved.host_str(), Some("srv01.cloudconvert.com"));
        assert_eq!(resolved.path(), "/process/abc");
    }
}
