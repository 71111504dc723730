use std::collections::HashMap;
use std::sync::{mpsc, Arc};

use anyhow::Context;
use porter_core::{DownloadOutcome, Effect, JobKind, Msg, SubmissionOutcome, Ticket};
use porter_engine::{
    DownloadError, EngineEvent, EngineHandle, EventSink, RequestId, SavedArtifact, ServiceError,
    SubmitAck,
};
use porter_logging::{porter_debug, porter_info, porter_warn};

use super::app::AppEvent;
use super::config::ClientConfig;

/// Forwards engine events into the app's single event channel.
struct AppEventSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for AppEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Engine(event));
    }
}

/// Executes core effects on the engine and maps engine events back to core messages.
pub struct EffectRunner {
    engine: EngineHandle,
    next_request: RequestId,
    routes: HashMap<RequestId, (JobKind, Ticket)>,
}

impl EffectRunner {
    pub fn new(config: &ClientConfig, events: mpsc::Sender<AppEvent>) -> anyhow::Result<Self> {
        let engine = EngineHandle::new(
            config.service_settings(),
            config.output_dir.clone(),
            Arc::new(AppEventSink { tx: events }),
        )
        .context("starting service engine")?;
        Ok(Self::with_engine(engine))
    }

    pub fn with_engine(engine: EngineHandle) -> Self {
        Self {
            engine,
            next_request: 1,
            routes: HashMap::new(),
        }
    }

    pub fn run(&mut self, kind: JobKind, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit {
                    ticket,
                    endpoint,
                    github_url,
                } => {
                    let request_id = self.route(kind, ticket);
                    porter_info!(
                        "Submit kind={} request_id={} endpoint={} url={}",
                        kind,
                        request_id,
                        endpoint,
                        github_url
                    );
                    self.engine.submit(request_id, endpoint, github_url);
                }
                Effect::CancelSubmission { ticket } => {
                    match self.request_for(kind, ticket) {
                        Some(request_id) => self.engine.cancel(request_id),
                        None => porter_debug!("nothing to cancel for {} ticket={}", kind, ticket),
                    }
                }
                Effect::FetchArtifact { ticket, file_name } => {
                    let request_id = self.route(kind, ticket);
                    porter_info!(
                        "Download kind={} request_id={} file={}",
                        kind,
                        request_id,
                        file_name
                    );
                    self.engine.download(request_id, file_name);
                }
            }
        }
    }

    /// Maps a finished engine request to the message for the job that issued it.
    pub fn translate(&mut self, event: EngineEvent) -> Option<(JobKind, Msg)> {
        match event {
            EngineEvent::SubmissionCompleted { request_id, result } => {
                let (kind, ticket) = self.take_route(request_id)?;
                Some((
                    kind,
                    Msg::SubmissionFinished {
                        ticket,
                        outcome: submission_outcome(result),
                    },
                ))
            }
            EngineEvent::DownloadCompleted { request_id, result } => {
                let (kind, ticket) = self.take_route(request_id)?;
                Some((
                    kind,
                    Msg::DownloadFinished {
                        ticket,
                        outcome: download_outcome(result),
                    },
                ))
            }
        }
    }

    fn route(&mut self, kind: JobKind, ticket: Ticket) -> RequestId {
        let request_id = self.next_request;
        self.next_request += 1;
        self.routes.insert(request_id, (kind, ticket));
        request_id
    }

    fn request_for(&self, kind: JobKind, ticket: Ticket) -> Option<RequestId> {
        self.routes
            .iter()
            .find(|(_, route)| **route == (kind, ticket))
            .map(|(request_id, _)| *request_id)
    }

    fn take_route(&mut self, request_id: RequestId) -> Option<(JobKind, Ticket)> {
        let route = self.routes.remove(&request_id);
        if route.is_none() {
            porter_warn!("engine reported unknown request_id={}", request_id);
        }
        route
    }
}

pub fn submission_outcome(result: Result<SubmitAck, ServiceError>) -> SubmissionOutcome {
    match result {
        Ok(_) => SubmissionOutcome::Accepted,
        Err(ServiceError::Rejected { status, message }) => {
            SubmissionOutcome::Rejected { status, message }
        }
        Err(err) => SubmissionOutcome::Unreachable {
            detail: err.to_string(),
        },
    }
}

pub fn download_outcome(result: Result<SavedArtifact, DownloadError>) -> DownloadOutcome {
    match result {
        Ok(saved) => DownloadOutcome::Saved {
            location: saved.path.display().to_string(),
            bytes: saved.byte_len,
        },
        Err(err) => DownloadOutcome::Failed {
            detail: err.to_string(),
        },
    }
}
