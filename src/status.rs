//! Response envelopes returned by the conversion service.
//!
//! [`ProcessStatus`] is the JSON document every successful job operation
//! returns: progress while the conversion runs, plus output metadata once it
//! finishes. [`ErrorEnvelope`] is the shape of a non-200 body.
//!
//! ## Required vs. optional fields
//!
//! `id`, `url`, `percent`, `message`, and `step` are present in every status
//! response the service emits, so they are plain fields — a 200 body missing
//! any of them is a decode error, not a silently zero-valued struct. The
//! timestamps and the nested descriptors only appear once the job reaches the
//! corresponding phase, so they are `Option`s.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Progress and result metadata for a conversion job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessStatus {
    /// Job identifier assigned by the service.
    pub id: String,
    /// Callback URL for this job (status checks, upload).
    pub url: String,
    /// Completion percentage. The service emits both `50` and `"99.99"`-style
    /// fractional values, so this is a float.
    pub percent: f64,
    /// Human-readable progress message.
    pub message: String,
    /// Current step, e.g. `"input"`, `"convert"`, `"finished"`, `"error"`.
    pub step: String,
    /// Unix timestamp at which processing started.
    #[serde(default)]
    pub starttime: Option<i64>,
    /// Unix timestamp at which processing ended. Absent while running.
    #[serde(default)]
    pub endtime: Option<i64>,
    /// Unix timestamp at which the job and its artifacts expire.
    #[serde(default)]
    pub expire: Option<i64>,
    /// Conversion minutes billed for this job.
    #[serde(default)]
    pub minutes: Option<u32>,
    /// Processing-group id the job was assigned to.
    #[serde(default)]
    pub group: Option<String>,
    /// Input descriptor. Absent until the upload has been received.
    #[serde(default)]
    pub input: Option<InputInfo>,
    /// Output descriptor. Absent until the conversion has finished.
    #[serde(default)]
    pub output: Option<OutputInfo>,
    /// Converter descriptor.
    #[serde(default)]
    pub converter: Option<ConverterInfo>,
}

/// Metadata about the uploaded input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// How the input reached the service, e.g. `"upload"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
}

/// Metadata about the produced output artifact(s).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputInfo {
    /// Download URL for the artifact.
    #[serde(default)]
    pub url: Option<String>,
    /// Artifact size in bytes.
    pub size: u64,
    pub filename: String,
    pub ext: String,
    /// Ordered file names for multi-file results (e.g. one PNG per page,
    /// delivered as a zip). Absent for single-file results.
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

/// Metadata about the converter that ran the job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterInfo {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Free-form converter options echoed back by the service.
    #[serde(default)]
    pub options: Option<BTreeMap<String, serde_json::Value>>,
}

/// Body of a non-200 response.
///
/// Both fields are required: an empty or unrelated JSON body must fail to
/// parse so the caller falls through to
/// [`Error::UnexpectedStatus`](crate::error::Error::UnexpectedStatus) instead
/// of fabricating a `[0] ""` remote error.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "error")]
    pub message: String,
    pub code: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_status_round_trips() {
        let json = r#"{
            "id": "ab1cd2",
            "url": "//host/process/ab1cd2",
            "percent": 100,
            "message": "Conversion finished",
            "step": "finished",
            "starttime": 1700000000,
            "endtime": 1700000042,
            "expire": 1700086400,
            "minutes": 1,
            "group": "g-17",
            "input": { "type": "upload", "filename": "report.pdf", "ext": "pdf" },
            "output": {
                "url": "//host/download/ab1cd2",
                "size": 482133,
                "filename": "report.zip",
                "ext": "zip",
                "files": ["report-1.png", "report-2.png"]
            },
            "converter": { "format": "png", "type": "convert" }
        }"#;
        let status: ProcessStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.step, "finished");
        assert_eq!(status.percent, 100.0);
        let output = status.output.unwrap();
        assert_eq!(output.ext, "zip");
        assert_eq!(
            output.files.as_deref(),
            Some(&["report-1.png".to_string(), "report-2.png".to_string()][..])
        );
    }

    #[test]
    fn fractional_percent_parses() {
        let json = r#"{
            "id": "x", "url": "u", "percent": 99.99,
            "message": "converting", "step": "convert"
        }"#;
        let status: ProcessStatus = serde_json::from_str(json).unwrap();
        assert!((status.percent - 99.99).abs() < f64::EPSILON);
        assert!(status.output.is_none());
    }

    #[test]
    fn missing_required_field_is_an_error() {
        // No "step" — must not decode into a defaulted struct.
        let json = r#"{"id": "x", "url": "u", "percent": 0, "message": ""}"#;
        assert!(serde_json::from_str::<ProcessStatus>(json).is_err());
    }

    #[test]
    fn error_envelope_requires_both_fields() {
        assert!(serde_json::from_str::<ErrorEnvelope>("{}").is_err());
        assert!(serde_json::from_str::<ErrorEnvelope>(r#"{"error": "nope"}"#).is_err());

        let env: ErrorEnvelope =
            serde_json::from_str(r#"{"error": "Input format not supported", "code": 400}"#)
                .unwrap();
        assert_eq!(env.message, "Input format not supported");
        assert_eq!(env.code, 400);
    }
}
