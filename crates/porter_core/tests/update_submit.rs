use std::sync::Once;

use pretty_assertions::assert_eq;
use porter_core::{
    update, DownloadOutcome, Effect, FailureKind, JobKind, JobState, JobStatus, Msg, RepositoryReference,
    StatusView, SubmissionOutcome, INVALID_URL_MESSAGE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(porter_logging::initialize_for_tests);
}

fn submit(state: JobState, input: &str) -> (JobState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::SubmitClicked)
}

fn submitted_ticket(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Submit { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("submit effect")
}

#[test]
fn valid_url_emits_single_submit_to_kind_endpoint() {
    init_logging();
    let (state, effects) = submit(JobState::new(JobKind::Convert), "https://github.com/acme/widget");

    assert_eq!(
        effects,
        vec![Effect::Submit {
            ticket: 1,
            endpoint: "/process",
            github_url: "https://github.com/acme/widget".to_string(),
        }]
    );
    assert_eq!(state.status(), &JobStatus::Submitting);
    assert_eq!(state.view().status, StatusView::Loading);
    assert!(!state.view().submit_enabled);
    assert_eq!(state.view().submit_label, "Converting...");

    let (_state, effects) = submit(JobState::new(JobKind::Analyse), "https://github.com/acme/pages/");
    assert!(matches!(
        effects.as_slice(),
        [Effect::Submit { endpoint: "/analyse", .. }]
    ));
}

#[test]
fn scenario_a_success_enables_download_with_repo_name() {
    init_logging();
    let (state, effects) = submit(JobState::new(JobKind::Convert), "https://github.com/acme/widget");
    let ticket = submitted_ticket(&effects);

    let (state, effects) = update(
        state,
        Msg::SubmissionFinished {
            ticket,
            outcome: SubmissionOutcome::Accepted,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.status(), &JobStatus::Succeeded);
    assert_eq!(
        state.repository(),
        Some(&RepositoryReference {
            owner: "acme".to_string(),
            name: "widget".to_string(),
        })
    );

    let view = state.view();
    assert!(view.download_ready);
    assert_eq!(
        view.status,
        StatusView::Success("Conversion completed successfully!".to_string())
    );
    assert_eq!(view.artifact_name.as_deref(), Some("16-widget.zip"));
    assert_eq!(view.error_message, None);

    let (_state, effects) = update(state, Msg::DownloadClicked);
    assert_eq!(
        effects,
        vec![Effect::FetchArtifact {
            ticket: 2,
            file_name: "16-widget.zip".to_string(),
        }]
    );
}

#[test]
fn scenario_b_extra_path_segment_is_rejected_locally() {
    init_logging();
    let (state, effects) = submit(
        JobState::new(JobKind::Convert),
        "https://github.com/acme/widget/extra",
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.status, StatusView::Error(INVALID_URL_MESSAGE.to_string()));
    assert_eq!(view.validation_hint, Some(INVALID_URL_MESSAGE));
    assert!(!view.url_valid);
    assert!(!view.download_ready);
    assert!(matches!(
        state.status(),
        JobStatus::Failed(failure) if failure.kind == FailureKind::Validation
    ));
}

#[test]
fn empty_url_submit_is_rejected_and_flags_field() {
    init_logging();
    let state = JobState::new(JobKind::Analyse);
    assert!(state.view().url_valid);

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert!(!state.view().url_valid);
    assert_eq!(state.view().error_message.as_deref(), Some(INVALID_URL_MESSAGE));
}

#[test]
fn scenario_c_service_message_is_displayed() {
    init_logging();
    let (state, effects) = submit(JobState::new(JobKind::Convert), "https://github.com/acme/widget");
    let ticket = submitted_ticket(&effects);

    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            ticket,
            outcome: SubmissionOutcome::Rejected {
                status: 500,
                message: Some("repo too large".to_string()),
            },
        },
    );
    let view = state.view();
    assert_eq!(view.status, StatusView::Error("repo too large".to_string()));
    assert_eq!(view.error_message.as_deref(), Some("repo too large"));
    assert!(!view.download_ready);
    assert!(view.submit_enabled);
}

#[test]
fn scenario_d_missing_message_uses_kind_fallback() {
    init_logging();
    for (kind, fallback) in [
        (JobKind::Convert, "Failed to process repository"),
        (JobKind::Analyse, "Failed to analyze repository"),
    ] {
        let (state, effects) = submit(JobState::new(kind), "https://github.com/acme/widget");
        let ticket = submitted_ticket(&effects);
        let (state, _) = update(
            state,
            Msg::SubmissionFinished {
                ticket,
                outcome: SubmissionOutcome::Rejected {
                    status: 500,
                    message: None,
                },
            },
        );
        assert_eq!(state.view().status, StatusView::Error(fallback.to_string()));

        let (state, effects) = update(state, Msg::SubmitClicked);
        let ticket = submitted_ticket(&effects);
        let (state, _) = update(
            state,
            Msg::SubmissionFinished {
                ticket,
                outcome: SubmissionOutcome::Rejected {
                    status: 502,
                    message: Some("   ".to_string()),
                },
            },
        );
        assert_eq!(state.view().error_message.as_deref(), Some(fallback));
    }
}

#[test]
fn transport_failure_uses_generic_message() {
    init_logging();
    let (state, effects) = submit(JobState::new(JobKind::Analyse), "https://github.com/acme/widget");
    let ticket = submitted_ticket(&effects);
    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            ticket,
            outcome: SubmissionOutcome::Unreachable {
                detail: "connection refused".to_string(),
            },
        },
    );
    assert!(matches!(
        state.status(),
        JobStatus::Failed(failure)
            if failure.kind == FailureKind::Transport
                && failure.message == "Failed to analyze repository"
    ));
}

#[test]
fn second_submit_while_submitting_is_ignored() {
    init_logging();
    let (state, effects) = submit(JobState::new(JobKind::Convert), "https://github.com/acme/widget");
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert_eq!(state.pending_submission(), Some(1));
    assert_eq!(state.status(), &JobStatus::Submitting);
}

#[test]
fn resubmit_clears_previous_outcome_before_request() {
    init_logging();
    let (state, effects) = submit(JobState::new(JobKind::Convert), "https://github.com/acme/widget");
    let ticket = submitted_ticket(&effects);
    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            ticket,
            outcome: SubmissionOutcome::Rejected {
                status: 500,
                message: Some("boom".to_string()),
            },
        },
    );
    assert!(state.view().error_message.is_some());

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(submitted_ticket(&effects), 2);
    let view = state.view();
    assert_eq!(view.status, StatusView::Loading);
    assert_eq!(view.error_message, None);
    assert!(!view.download_ready);

    // Succeeded is cleared the same way.
    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            ticket: 2,
            outcome: SubmissionOutcome::Accepted,
        },
    );
    assert!(state.view().download_ready);
    let (state, _) = submit(state, "https://github.com/acme/gadget");
    let view = state.view();
    assert_eq!(view.status, StatusView::Loading);
    assert!(!view.download_ready);
    assert_eq!(view.artifact_name, None);
}

#[test]
fn typing_updates_live_validity_without_touching_status() {
    init_logging();
    let state = JobState::new(JobKind::Analyse);
    let (state, _) = update(state, Msg::InputChanged("https://github".to_string()));
    let view = state.view();
    assert!(!view.url_valid);
    assert!(!view.submit_enabled);
    assert_eq!(view.status, StatusView::Idle);
    assert_eq!(view.error_message, None);

    let (mut state, _) = update(state, Msg::InputChanged(String::new()));
    assert!(state.view().url_valid);
    assert!(!state.view().submit_enabled);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn rejected_resubmit_clears_previously_saved_artifact() {
    init_logging();
    let (state, effects) = submit(JobState::new(JobKind::Convert), "https://github.com/acme/widget");
    let ticket = submitted_ticket(&effects);
    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            ticket,
            outcome: SubmissionOutcome::Accepted,
        },
    );
    let (state, effects) = update(state, Msg::DownloadClicked);
    let download = match effects.as_slice() {
        [Effect::FetchArtifact { ticket, .. }] => *ticket,
        other => panic!("expected one fetch effect, got {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::DownloadFinished {
            ticket: download,
            outcome: DownloadOutcome::Saved {
                location: "out/16-widget.zip".to_string(),
                bytes: 10,
            },
        },
    );
    assert_eq!(state.view().last_saved.as_deref(), Some("out/16-widget.zip"));

    let (state, effects) = submit(state, "https://github.com/acme/widget/extra");
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.status, StatusView::Error(INVALID_URL_MESSAGE.to_string()));
    assert!(!view.download_ready);
    assert_eq!(view.last_saved, None);
}
