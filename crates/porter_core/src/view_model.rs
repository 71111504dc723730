use crate::JobKind;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusView {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl StatusView {
    pub fn label(&self) -> &'static str {
        match self {
            StatusView::Idle => "idle",
            StatusView::Loading => "loading",
            StatusView::Success(_) => "success",
            StatusView::Error(_) => "error",
        }
    }
}

/// Everything a shell needs to render one job-kind instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobViewModel {
    pub kind: JobKind,
    pub title: &'static str,
    pub url: String,
    /// False only for a non-empty URL that fails validation, or after a rejected submit.
    pub url_valid: bool,
    pub status: StatusView,
    pub error_message: Option<String>,
    pub validation_hint: Option<&'static str>,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub reset_enabled: bool,
    pub download_ready: bool,
    pub download_in_flight: bool,
    pub artifact_name: Option<String>,
    pub last_saved: Option<String>,
    pub dirty: bool,
}
