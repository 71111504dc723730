//! Porter engine: remote service client, artifact storage and effect execution.
mod artifact;
mod client;
mod engine;
mod types;

pub use artifact::{ensure_output_dir, sanitize_file_name, short_digest, ArtifactStore, PersistError};
pub use client::{ReqwestServiceClient, ServiceClient, ServiceSettings, ARTIFACT_PATH, DEFAULT_BASE_URL};
pub use engine::{ChannelEventSink, EngineHandle, EngineStartError, EventSink};
pub use types::{
    Artifact, DownloadError, EngineEvent, RequestId, SavedArtifact, ServiceError, SubmitAck,
};
