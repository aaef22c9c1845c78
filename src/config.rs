//! Client configuration.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share a configuration across jobs and to see at a glance how two
//! clients differ.
//!
//! # Design choice: builder over constructor
//! Most callers only ever set the API key; the builder lets them ignore the
//! rest and rely on documented defaults.

use crate::error::Error;
use std::time::Duration;

/// Base URL of the conversion service.
pub const DEFAULT_API_URL: &str = "https://api.cloudconvert.com";

/// Number of in-flight pipe chunks an upload may buffer before the encoder
/// suspends. See [`ClientConfigBuilder::pipe_capacity`].
pub const DEFAULT_PIPE_CAPACITY: usize = 8;

/// Configuration for a [`Client`](crate::client::Client).
///
/// # Example
/// ```rust
/// use cloudconvert::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .api_key("my-key")
///     .timeout(Duration::from_secs(600))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Static API key sent with job creation. Required, non-empty.
    pub api_key: String,

    /// Base URL of the service. Default: [`DEFAULT_API_URL`].
    ///
    /// Override for testing against a local server or a regional endpoint.
    pub base_url: String,

    /// Whole-request deadline applied to every HTTP call. Default: `None`.
    ///
    /// `None` is deliberate: a `wait = true` upload legitimately blocks until
    /// the remote conversion finishes, which can take minutes for large
    /// files. Set a deadline when your caller cannot tolerate an unbounded
    /// wait — a stalled connection otherwise blocks the call indefinitely.
    pub timeout: Option<Duration>,

    /// Upload pipe capacity, in chunks. Default: [`DEFAULT_PIPE_CAPACITY`].
    ///
    /// Bounds how far the multipart encoder may run ahead of the network:
    /// peak buffered memory per upload is roughly
    /// `pipe_capacity × 64 KiB` regardless of the file size.
    pub pipe_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_API_URL.to_string(),
            timeout: None,
            pipe_capacity: DEFAULT_PIPE_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn pipe_capacity(mut self, chunks: usize) -> Self {
        self.config.pipe_capacity = chunks.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, Error> {
        let c = &self.config;
        if c.api_key.is_empty() {
            return Err(Error::Config("API key must not be empty".into()));
        }
        reqwest::Url::parse(&c.base_url).map_err(|e| Error::url(&c.base_url, e))?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = ClientConfig::builder().api_key("k").build().unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.pipe_capacity, DEFAULT_PIPE_CAPACITY);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            ClientConfig::builder().build(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ClientConfig::builder()
            .api_key("k")
            .base_url("not a url")
            .build();
        assert!(matches!(result, Err(Error::Url { .. })));
    }

    #[test]
    fn pipe_capacity_clamps_to_one() {
        let config = ClientConfig::builder()
            .api_key("k")
            .pipe_capacity(0)
            .build()
            .unwrap();
        assert_eq!(config.pipe_capacity, 1);
    }
}
