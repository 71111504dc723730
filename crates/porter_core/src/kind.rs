use std::fmt;
use std::str::FromStr;

use crate::RepositoryReference;

/// The two operations the remote service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobKind {
    /// AngularJS to Angular 16 conversion.
    Convert,
    /// Razor Pages analysis.
    Analyse,
}

impl JobKind {
    pub const ALL: [JobKind; 2] = [JobKind::Convert, JobKind::Analyse];

    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::Convert => "convert",
            JobKind::Analyse => "analyse",
        }
    }

    pub fn profile(self) -> &'static KindProfile {
        match self {
            JobKind::Convert => &CONVERT_PROFILE,
            JobKind::Analyse => &ANALYSE_PROFILE,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseJobKindError(pub String);

impl fmt::Display for ParseJobKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown job kind '{}' (expected convert or analyse)", self.0)
    }
}

impl std::error::Error for ParseJobKindError {}

impl FromStr for JobKind {
    type Err = ParseJobKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "convert" => Ok(JobKind::Convert),
            "analyse" | "analyze" => Ok(JobKind::Analyse),
            other => Err(ParseJobKindError(other.to_string())),
        }
    }
}

/// Per-kind wiring: endpoint, user-facing messages and artifact naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindProfile {
    pub endpoint: &'static str,
    pub title: &'static str,
    pub submit_label: &'static str,
    pub busy_label: &'static str,
    pub success_message: &'static str,
    pub failure_fallback: &'static str,
    pub download_failure_message: &'static str,
    pub fallback_artifact_name: &'static str,
    /// Convert names the archive after the repository; analyse always uses the fixed report name.
    pub per_repo_artifact_names: bool,
}

impl KindProfile {
    pub fn artifact_name(&self, repository: Option<&RepositoryReference>) -> String {
        match repository {
            Some(repo) if self.per_repo_artifact_names && !repo.name.is_empty() => {
                format!("16-{}.zip", repo.name)
            }
            _ => self.fallback_artifact_name.to_string(),
        }
    }
}

static CONVERT_PROFILE: KindProfile = KindProfile {
    endpoint: "/process",
    title: "AngularJS to Angular 16 Converter",
    submit_label: "Convert to Angular 16",
    busy_label: "Converting...",
    success_message: "Conversion completed successfully!",
    failure_fallback: "Failed to process repository",
    download_failure_message: "Failed to download the converted project",
    fallback_artifact_name: "Angular-Project-16.zip",
    per_repo_artifact_names: true,
};

static ANALYSE_PROFILE: KindProfile = KindProfile {
    endpoint: "/analyse",
    title: "Razor Pages Analyser",
    submit_label: "Analyze",
    busy_label: "Analyzing...",
    success_message: "Analysis completed successfully!",
    failure_fallback: "Failed to analyze repository",
    download_failure_message: "Failed to download the analysis report",
    fallback_artifact_name: "Razor-Pages-Analysis.zip",
    per_repo_artifact_names: false,
};
