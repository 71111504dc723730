use crate::view_model::{JobViewModel, StatusView};
use crate::{
    validate, DownloadOutcome, Effect, JobKind, Msg, RepositoryReference, SubmissionOutcome,
    INVALID_URL_MESSAGE,
};

/// Identifies one outbound call; responses carrying any other ticket are stale.
pub type Ticket = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Empty or malformed URL at submit time; never reaches the network.
    Validation,
    /// Non-success HTTP status from an operation endpoint.
    Request { status: u16 },
    /// Network or parse failure; shown with the generic message.
    Transport,
    /// Artifact retrieval failed; job status is untouched.
    Download,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl JobFailure {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(JobFailure),
}

/// One job-kind instance of the client state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobState {
    kind: JobKind,
    url: String,
    field_invalid: bool,
    status: JobStatus,
    repository: Option<RepositoryReference>,
    download_error: Option<JobFailure>,
    pending_submission: Option<Ticket>,
    pending_download: Option<Ticket>,
    last_saved: Option<String>,
    next_ticket: Ticket,
    dirty: bool,
}

impl JobState {
    pub fn new(kind: JobKind) -> Self {
        Self {
            kind,
            url: String::new(),
            field_invalid: false,
            status: JobStatus::Idle,
            repository: None,
            download_error: None,
            pending_submission: None,
            pending_download: None,
            last_saved: None,
            next_ticket: 1,
            dirty: false,
        }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    pub fn repository(&self) -> Option<&RepositoryReference> {
        self.repository.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.status == JobStatus::Submitting
    }

    /// Derived from the status; there is no separate flag to fall out of sync.
    pub fn download_ready(&self) -> bool {
        self.status == JobStatus::Succeeded
    }

    pub fn download_in_flight(&self) -> bool {
        self.pending_download.is_some()
    }

    pub fn pending_submission(&self) -> Option<Ticket> {
        self.pending_submission
    }

    /// The message currently shown in the error channel, if any.
    pub fn error(&self) -> Option<&JobFailure> {
        match &self.status {
            JobStatus::Failed(failure) => Some(failure),
            _ => self.download_error.as_ref(),
        }
    }

    pub fn view(&self) -> JobViewModel {
        let profile = self.kind.profile();
        let status = match &self.status {
            JobStatus::Idle => StatusView::Idle,
            JobStatus::Submitting => StatusView::Loading,
            JobStatus::Succeeded => StatusView::Success(profile.success_message.to_string()),
            JobStatus::Failed(failure) => StatusView::Error(failure.message.clone()),
        };
        let submitting = self.is_submitting();
        let download_ready = self.download_ready();
        JobViewModel {
            kind: self.kind,
            title: profile.title,
            url: self.url.clone(),
            url_valid: !self.field_invalid,
            status,
            error_message: self.error().map(|failure| failure.message.clone()),
            validation_hint: self.field_invalid.then_some(INVALID_URL_MESSAGE),
            submit_label: if submitting {
                profile.busy_label
            } else {
                profile.submit_label
            },
            submit_enabled: !self.url.is_empty() && !self.field_invalid && !submitting,
            reset_enabled: self.status != JobStatus::Idle
                || self.download_error.is_some()
                || !self.url.is_empty(),
            download_ready,
            download_in_flight: self.download_in_flight(),
            artifact_name: download_ready
                .then(|| profile.artifact_name(self.repository.as_ref())),
            last_saved: self.last_saved.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_url(&mut self, url: String) {
        self.field_invalid = !validate(&url).is_acceptable();
        self.url = url;
        self.dirty = true;
    }

    /// Clears prior outcome state and returns the ticket for the new outbound call.
    pub(crate) fn begin_submission(&mut self, reference: RepositoryReference) -> Ticket {
        self.status = JobStatus::Submitting;
        self.download_error = None;
        self.pending_download = None;
        self.last_saved = None;
        self.repository = Some(reference);
        self.field_invalid = false;
        let ticket = self.allocate_ticket();
        self.pending_submission = Some(ticket);
        self.dirty = true;
        ticket
    }

    pub(crate) fn reject_input(&mut self) {
        self.status = JobStatus::Failed(JobFailure::new(
            FailureKind::Validation,
            INVALID_URL_MESSAGE,
        ));
        self.field_invalid = true;
        self.repository = None;
        self.download_error = None;
        self.pending_download = None;
        self.last_saved = None;
        self.dirty = true;
    }

    /// Applies a submission response. Returns false when the ticket is stale.
    pub(crate) fn finish_submission(&mut self, ticket: Ticket, outcome: SubmissionOutcome) -> bool {
        if self.pending_submission != Some(ticket) {
            return false;
        }
        self.pending_submission = None;
        let fallback = self.kind.profile().failure_fallback;
        self.status = match outcome {
            SubmissionOutcome::Accepted => JobStatus::Succeeded,
            SubmissionOutcome::Rejected { status, message } => {
                let message = message
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string());
                JobStatus::Failed(JobFailure::new(FailureKind::Request { status }, message))
            }
            SubmissionOutcome::Unreachable { .. } => {
                JobStatus::Failed(JobFailure::new(FailureKind::Transport, fallback))
            }
        };
        self.dirty = true;
        true
    }

    /// Returns the ticket and file name for a download, or `None` when not allowed.
    pub(crate) fn begin_download(&mut self) -> Option<(Ticket, String)> {
        if !self.download_ready() || self.pending_download.is_some() {
            return None;
        }
        let file_name = self
            .kind
            .profile()
            .artifact_name(self.repository.as_ref());
        let ticket = self.allocate_ticket();
        self.pending_download = Some(ticket);
        self.dirty = true;
        Some((ticket, file_name))
    }

    /// Applies a download result. Returns false when the ticket is stale.
    pub(crate) fn finish_download(&mut self, ticket: Ticket, outcome: DownloadOutcome) -> bool {
        if self.pending_download != Some(ticket) {
            return false;
        }
        self.pending_download = None;
        match outcome {
            DownloadOutcome::Saved { location, .. } => {
                self.last_saved = Some(location);
                self.download_error = None;
            }
            DownloadOutcome::Failed { .. } => {
                self.download_error = Some(JobFailure::new(
                    FailureKind::Download,
                    self.kind.profile().download_failure_message,
                ));
            }
        }
        self.dirty = true;
        true
    }

    /// Returns to the initial state, yielding the ticket of any abandoned submission.
    pub(crate) fn reset(&mut self) -> Option<Ticket> {
        let abandoned = self.pending_submission;
        let mut fresh = JobState::new(self.kind);
        fresh.next_ticket = self.next_ticket;
        fresh.dirty = self.dirty;
        if fresh != *self {
            fresh.dirty = true;
            *self = fresh;
        }
        abandoned
    }

    fn allocate_ticket(&mut self) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }
}

/// Both job-kind instances. They share nothing; each is driven independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    convert: JobState,
    analyse: JobState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            convert: JobState::new(JobKind::Convert),
            analyse: JobState::new(JobKind::Analyse),
        }
    }

    pub fn job(&self, kind: JobKind) -> &JobState {
        match kind {
            JobKind::Convert => &self.convert,
            JobKind::Analyse => &self.analyse,
        }
    }

    pub fn job_mut(&mut self, kind: JobKind) -> &mut JobState {
        match kind {
            JobKind::Convert => &mut self.convert,
            JobKind::Analyse => &mut self.analyse,
        }
    }

    /// Routes `msg` to the instance for `kind` and returns its effects.
    pub fn dispatch(&mut self, kind: JobKind, msg: Msg) -> Vec<Effect> {
        let slot = self.job_mut(kind);
        let current = std::mem::replace(slot, JobState::new(kind));
        let (next, effects) = crate::update(current, msg);
        *slot = next;
        effects
    }
}
