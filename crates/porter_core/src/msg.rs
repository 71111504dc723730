use crate::Ticket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the repository URL field.
    InputChanged(String),
    /// User pressed the submit control.
    SubmitClicked,
    /// User pressed the reset/clear control.
    ResetClicked,
    /// User pressed the download control.
    DownloadClicked,
    /// The remote call for a submission completed.
    SubmissionFinished {
        ticket: Ticket,
        outcome: SubmissionOutcome,
    },
    /// Artifact retrieval completed.
    DownloadFinished {
        ticket: Ticket,
        outcome: DownloadOutcome,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 2xx with a JSON body.
    Accepted,
    /// Non-2xx; `message` is the service-provided text, if any.
    Rejected { status: u16, message: Option<String> },
    /// Network failure, unreadable body or cancellation.
    Unreachable { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved { location: String, bytes: u64 },
    Failed { detail: String },
}
