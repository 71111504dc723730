use std::path::PathBuf;

use bytes::Bytes;
use thiserror::Error;

pub type RequestId = u64;

/// A 2xx answer from an operation endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitAck {
    pub status: u16,
    /// The service promises JSON but no particular shape.
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub path: PathBuf,
    pub byte_len: u64,
    pub sha256_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("invalid service url: {0}")]
    InvalidUrl(String),
    #[error("service responded with http status {status}")]
    Rejected {
        status: u16,
        /// The `message` field of the JSON error body, when present.
        message: Option<String>,
    },
    #[error("timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("artifact too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("could not save artifact: {0}")]
    Persist(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SubmissionCompleted {
        request_id: RequestId,
        result: Result<SubmitAck, ServiceError>,
    },
    DownloadCompleted {
        request_id: RequestId,
        result: Result<SavedArtifact, DownloadError>,
    },
}
