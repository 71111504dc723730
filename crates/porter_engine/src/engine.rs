use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;

use porter_logging::{porter_debug, porter_info, porter_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{
    ArtifactStore, DownloadError, EngineEvent, ReqwestServiceClient, RequestId, ServiceClient,
    ServiceError, ServiceSettings,
};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Error)]
pub enum EngineStartError {
    #[error("could not start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("could not configure service client: {0}")]
    Client(#[from] ServiceError),
}

enum EngineCommand {
    Submit {
        request_id: RequestId,
        endpoint: String,
        github_url: String,
    },
    Download {
        request_id: RequestId,
        file_name: String,
    },
    Cancel {
        request_id: RequestId,
    },
}

type InFlight = Arc<Mutex<HashMap<RequestId, CancellationToken>>>;

/// Runs service calls on a background tokio runtime and reports results to a sink.
///
/// Dropping the handle stops the worker thread once queued commands are drained.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        settings: ServiceSettings,
        output_dir: PathBuf,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineStartError> {
        let client = ReqwestServiceClient::new(settings)?;
        Self::with_client(Arc::new(client), ArtifactStore::new(output_dir), sink)
    }

    pub fn with_client(
        client: Arc<dyn ServiceClient>,
        store: ArtifactStore,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineStartError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("porter-engine".to_string())
            .spawn(move || {
                let in_flight: InFlight = Arc::default();
                while let Ok(command) = cmd_rx.recv() {
                    handle_command(&runtime, &client, &store, &sink, &in_flight, command);
                }
                porter_debug!("engine command channel closed; shutting down");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn submit(&self, request_id: RequestId, endpoint: impl Into<String>, github_url: impl Into<String>) {
        self.send(EngineCommand::Submit {
            request_id,
            endpoint: endpoint.into(),
            github_url: github_url.into(),
        });
    }

    pub fn download(&self, request_id: RequestId, file_name: impl Into<String>) {
        self.send(EngineCommand::Download {
            request_id,
            file_name: file_name.into(),
        });
    }

    pub fn cancel(&self, request_id: RequestId) {
        self.send(EngineCommand::Cancel { request_id });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            porter_warn!("engine worker is gone; command dropped");
        }
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    client: &Arc<dyn ServiceClient>,
    store: &ArtifactStore,
    sink: &Arc<dyn EventSink>,
    in_flight: &InFlight,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Submit {
            request_id,
            endpoint,
            github_url,
        } => {
            let token = CancellationToken::new();
            lock(in_flight).insert(request_id, token.clone());

            let client = client.clone();
            let sink = sink.clone();
            let in_flight = in_flight.clone();
            runtime.spawn(async move {
                let result = tokio::select! {
                    _ = token.cancelled() => Err(ServiceError::Cancelled),
                    result = client.submit(&endpoint, &github_url) => result,
                };
                lock(&in_flight).remove(&request_id);
                match &result {
                    Ok(ack) => porter_info!(
                        "request {} accepted with {}: {}",
                        request_id,
                        ack.status,
                        ack.body
                    ),
                    Err(err) => porter_warn!("request {} failed: {}", request_id, err),
                }
                sink.emit(EngineEvent::SubmissionCompleted { request_id, result });
            });
        }
        EngineCommand::Download {
            request_id,
            file_name,
        } => {
            let client = client.clone();
            let store = store.clone();
            let sink = sink.clone();
            runtime.spawn(async move {
                let result = download(client.as_ref(), store, file_name).await;
                if let Err(err) = &result {
                    porter_warn!("download {} failed: {}", request_id, err);
                }
                sink.emit(EngineEvent::DownloadCompleted { request_id, result });
            });
        }
        EngineCommand::Cancel { request_id } => {
            if let Some(token) = lock(in_flight).remove(&request_id) {
                porter_info!("cancelling request {}", request_id);
                token.cancel();
            }
        }
    }
}

async fn download(
    client: &dyn ServiceClient,
    store: ArtifactStore,
    file_name: String,
) -> Result<crate::SavedArtifact, DownloadError> {
    let artifact = client.fetch_artifact().await?;
    tokio::task::spawn_blocking(move || store.save(&file_name, &artifact))
        .await
        .map_err(|err| DownloadError::Persist(err.to_string()))?
        .map_err(|err| DownloadError::Persist(err.to_string()))
}

fn lock(in_flight: &InFlight) -> std::sync::MutexGuard<'_, HashMap<RequestId, CancellationToken>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}
