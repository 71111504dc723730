use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use porter_engine::{ServiceSettings, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

use crate::cli::GlobalArgs;
use crate::platform::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "porter.ron";

/// Client settings, read from a RON file and overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub connect_timeout_secs: u64,
    /// Unset means a submission may wait forever.
    pub request_timeout_secs: Option<u64>,
    pub max_artifact_bytes: u64,
    pub log: LogDestination,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let service = ServiceSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("downloads"),
            connect_timeout_secs: service.connect_timeout.as_secs(),
            request_timeout_secs: None,
            max_artifact_bytes: service.max_artifact_bytes,
            log: LogDestination::default(),
        }
    }
}

impl ClientConfig {
    /// Loads the config named on the command line, or `./porter.ron` when present.
    pub fn resolve(args: &GlobalArgs) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::load_optional(Path::new(DEFAULT_CONFIG_FILE))?,
        };
        config.apply_overrides(args);
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Like [`ClientConfig::load`], but a missing file yields the defaults.
    pub fn load_optional(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn apply_overrides(&mut self, args: &GlobalArgs) {
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(output_dir) = &args.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(log) = args.log {
            self.log = log;
        }
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            max_artifact_bytes: self.max_artifact_bytes,
        }
    }
}
