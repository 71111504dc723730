use porter_core::{JobViewModel, StatusView};

/// Renders one job-kind instance as terminal lines.
pub fn render(view: &JobViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("[{}] {}", view.kind, view.title));

    let url = if view.url.is_empty() {
        "(empty)"
    } else {
        view.url.as_str()
    };
    lines.push(format!("  url: {url}"));

    if let Some(hint) = view.validation_hint {
        // The error line already says the same thing after a rejected submit.
        if view.error_message.as_deref() != Some(hint) {
            lines.push(format!("  ! {hint}"));
        }
    }

    match &view.status {
        StatusView::Idle => {}
        StatusView::Loading => lines.push(format!("  status: {}", view.submit_label)),
        StatusView::Success(message) => lines.push(format!("  status: {message}")),
        StatusView::Error(_) => lines.push("  status: failed".to_string()),
    }

    if let Some(error) = &view.error_message {
        lines.push(format!("  error: {error}"));
    }

    if view.download_in_flight {
        if let Some(name) = &view.artifact_name {
            lines.push(format!("  downloading {name}..."));
        }
    } else if let Some(saved) = &view.last_saved {
        lines.push(format!("  saved: {saved}"));
    } else if let Some(name) = &view.artifact_name {
        lines.push(format!("  download ready: {name}"));
    }

    lines.push(format!("  actions: {}", available_actions(view).join(", ")));
    lines
}

fn available_actions(view: &JobViewModel) -> Vec<&'static str> {
    let mut actions = Vec::new();
    if view.submit_enabled {
        actions.push("submit");
    }
    if view.reset_enabled {
        actions.push("reset");
    }
    if view.download_ready && !view.download_in_flight {
        actions.push("download");
    }
    actions.push("url <text>");
    actions
}
