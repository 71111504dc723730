use crate::Ticket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the repository URL to the kind's endpoint.
    Submit {
        ticket: Ticket,
        endpoint: &'static str,
        github_url: String,
    },
    /// Abandon an in-flight submission; its response will be discarded anyway.
    CancelSubmission { ticket: Ticket },
    /// GET the artifact and save it under `file_name`.
    FetchArtifact { ticket: Ticket, file_name: String },
}
