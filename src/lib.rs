//! # cloudconvert
//!
//! Async client for the CloudConvert v1 file-conversion API with streaming
//! multipart uploads.
//!
//! ## Why this crate?
//!
//! Uploading a file to a conversion service the naive way means buffering
//! the whole multipart body in memory before the first byte hits the wire —
//! painful for gigabyte inputs, fatal on small machines. This crate encodes
//! the body and transmits it concurrently through a bounded in-memory pipe,
//! so the service starts processing while the file is still being read and
//! peak memory stays at a few dozen kilobytes no matter the file size.
//!
//! ## Pipeline Overview
//!
//! ```text
//! create_process          convert_stream                        status/download
//!  │                       │
//!  ├─ POST /process        ├─ encoder task: fields + file ─▶ pipe
//!  │  (job id + URL)       ├─ transmitter: POST job URL ◀── pipe
//!  │                       ├─ joiner: outcome signal before HTTP result
//!  │                       └─ decoder: status envelope | error envelope
//!  ▼                       ▼
//! Process ───────────────▶ ProcessStatus ────────────────▶ artifact bytes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloudconvert::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(std::env::var("CLOUDCONVERT_KEY")?)?;
//!     let process = client.create_process("pdf", "png").await?.wait(true);
//!
//!     let file = tokio::fs::File::open("flyer.pdf").await?;
//!     let status = process
//!         .convert_stream(file, "flyer.pdf", "png", Default::default())
//!         .await?;
//!
//!     println!("{}% — {}", status.percent, status.message);
//!     Ok(())
//! }
//! ```
//!
//! ## Error semantics
//!
//! Errors are never retried or swallowed; the first failure from either the
//! encoder or the transmitter is final and is returned to the caller. An
//! encoding failure always wins over the HTTP outcome — see
//! [`Error`] for the full taxonomy.
//!
//! ## Timeouts
//!
//! There is no deadline by default: a `wait = true` upload legitimately
//! blocks until the remote conversion completes. Callers who cannot tolerate
//! an unbounded wait should set [`ClientConfig::timeout`], which bounds each
//! whole HTTP exchange, or drop the upload future, which tears the pipeline
//! down promptly.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod process;
pub mod response;
pub mod status;

mod upload;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_API_URL, DEFAULT_PIPE_CAPACITY};
pub use error::Error;
pub use process::{ConverterOptions, Process};
pub use response::ByteStream;
pub use status::{ConverterInfo, ErrorEnvelope, InputInfo, OutputInfo, ProcessStatus};
