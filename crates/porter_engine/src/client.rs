use std::time::Duration;

use bytes::BytesMut;
use futures_util::StreamExt;
use porter_logging::{porter_debug, porter_warn};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use url::Url;

use crate::{Artifact, ServiceError, SubmitAck};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
/// Shared by both job kinds; returns whatever the last server-side job produced.
pub const ARTIFACT_PATH: &str = "/download";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` waits for the service indefinitely.
    pub request_timeout: Option<Duration>,
    pub max_artifact_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_artifact_bytes: 512 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait ServiceClient: Send + Sync {
    /// POSTs `{"github_url": ...}` to `endpoint`.
    async fn submit(&self, endpoint: &str, github_url: &str) -> Result<SubmitAck, ServiceError>;

    /// GETs the artifact produced by the last job.
    async fn fetch_artifact(&self) -> Result<Artifact, ServiceError>;
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    github_url: &'a str,
}

#[derive(Debug, Clone)]
pub struct ReqwestServiceClient {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl ReqwestServiceClient {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        // Fail early on a bad base address rather than on the first click.
        endpoint_url(&settings.base_url, ARTIFACT_PATH)?;

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ServiceError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl ServiceClient for ReqwestServiceClient {
    async fn submit(&self, endpoint: &str, github_url: &str) -> Result<SubmitAck, ServiceError> {
        let url = endpoint_url(&self.settings.base_url, endpoint)?;
        porter_debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&SubmitBody { github_url })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = service_message(&body);
            porter_warn!("{} rejected with {}: {:?}", endpoint, status, message);
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = serde_json::from_slice(&body)
            .map_err(|err| ServiceError::Decode(err.to_string()))?;
        Ok(SubmitAck {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch_artifact(&self) -> Result<Artifact, ServiceError> {
        let url = endpoint_url(&self.settings.base_url, ARTIFACT_PATH)?;
        porter_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                message: None,
            });
        }

        let max_bytes = self.settings.max_artifact_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ServiceError::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ServiceError::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(Artifact {
            bytes: bytes.freeze(),
            content_type,
        })
    }
}

/// Joins `path` onto the base address, keeping any path prefix the base carries.
fn endpoint_url(base_url: &str, path: &str) -> Result<Url, ServiceError> {
    let joined = format!("{}{}", base_url.trim_end_matches('/'), path);
    let url = Url::parse(&joined).map_err(|err| ServiceError::InvalidUrl(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ServiceError::InvalidUrl(format!("unsupported scheme {other}"))),
    }
}

/// Extracts a non-empty `message` string from a JSON error body.
fn service_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToOwned::to_owned)
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::Timeout;
    }
    if err.is_decode() {
        return ServiceError::Decode(err.to_string());
    }
    ServiceError::Network(err.to_string())
}
