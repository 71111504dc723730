use porter_logging::{porter_debug, porter_info};

use crate::{validate, Effect, JobState, Msg, Validation};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: JobState, msg: Msg) -> (JobState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(url) => {
            state.set_url(url);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // The submit control is disabled while submitting; a stray click is dropped.
            if state.is_submitting() {
                porter_debug!("{} submit ignored: request already in flight", state.kind());
                return (state, Vec::new());
            }
            match validate(state.url()) {
                Validation::Valid(reference) => {
                    let github_url = state.url().to_string();
                    let endpoint = state.kind().profile().endpoint;
                    let ticket = state.begin_submission(reference);
                    porter_info!(
                        "{} submit ticket={} endpoint={} url={}",
                        state.kind(),
                        ticket,
                        endpoint,
                        github_url
                    );
                    vec![Effect::Submit {
                        ticket,
                        endpoint,
                        github_url,
                    }]
                }
                Validation::Empty | Validation::Invalid => {
                    porter_debug!("{} submit rejected locally: invalid url", state.kind());
                    state.reject_input();
                    Vec::new()
                }
            }
        }
        Msg::ResetClicked => match state.reset() {
            Some(ticket) => {
                porter_info!("{} reset abandons ticket={}", state.kind(), ticket);
                vec![Effect::CancelSubmission { ticket }]
            }
            None => Vec::new(),
        },
        Msg::DownloadClicked => match state.begin_download() {
            Some((ticket, file_name)) => vec![Effect::FetchArtifact { ticket, file_name }],
            None => Vec::new(),
        },
        Msg::SubmissionFinished { ticket, outcome } => {
            if !state.finish_submission(ticket, outcome) {
                porter_debug!("{} discarding stale submission ticket={}", state.kind(), ticket);
            }
            Vec::new()
        }
        Msg::DownloadFinished { ticket, outcome } => {
            if !state.finish_download(ticket, outcome) {
                porter_debug!("{} discarding stale download ticket={}", state.kind(), ticket);
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
