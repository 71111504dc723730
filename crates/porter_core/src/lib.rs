//! Porter core: pure job-client state machine and view-model helpers.
mod effect;
mod kind;
mod msg;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use kind::{JobKind, KindProfile, ParseJobKindError};
pub use msg::{DownloadOutcome, Msg, SubmissionOutcome};
pub use state::{AppState, FailureKind, JobFailure, JobState, JobStatus, Ticket};
pub use update::update;
pub use validate::{validate, RepositoryReference, Validation, INVALID_URL_MESSAGE};
pub use view_model::{JobViewModel, StatusView};
