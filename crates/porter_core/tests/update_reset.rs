use std::sync::Once;

use pretty_assertions::assert_eq;
use porter_core::{
    update, AppState, Effect, JobKind, JobState, JobStatus, Msg, StatusView, SubmissionOutcome,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(porter_logging::initialize_for_tests);
}

fn assert_neutral(state: &JobState) {
    let view = state.view();
    assert_eq!(view.url, "");
    assert_eq!(view.status, StatusView::Idle);
    assert_eq!(view.error_message, None);
    assert_eq!(view.validation_hint, None);
    assert!(view.url_valid);
    assert!(!view.download_ready);
    assert_eq!(state.repository(), None);
}

#[test]
fn reset_yields_neutral_state_from_any_state() {
    init_logging();
    let typed = update(
        JobState::new(JobKind::Convert),
        Msg::InputChanged("not a url".to_string()),
    )
    .0;
    let rejected = update(typed.clone(), Msg::SubmitClicked).0;
    let accepted = {
        let (state, _) = update(
            JobState::new(JobKind::Convert),
            Msg::InputChanged("https://github.com/acme/widget".to_string()),
        );
        let (state, _) = update(state, Msg::SubmitClicked);
        update(
            state,
            Msg::SubmissionFinished {
                ticket: 1,
                outcome: SubmissionOutcome::Accepted,
            },
        )
        .0
    };

    for state in [JobState::new(JobKind::Convert), typed, rejected, accepted] {
        let (state, effects) = update(state, Msg::ResetClicked);
        assert!(effects.is_empty());
        assert_neutral(&state);
    }
}

#[test]
fn reset_is_idempotent() {
    init_logging();
    let (state, _) = update(
        JobState::new(JobKind::Analyse),
        Msg::InputChanged("https://github.com/acme/widget".to_string()),
    );
    let (mut once, _) = update(state, Msg::ResetClicked);
    assert!(once.consume_dirty());

    let (mut twice, effects) = update(once.clone(), Msg::ResetClicked);
    assert!(effects.is_empty());
    assert_eq!(once, twice);
    assert!(!twice.consume_dirty());
}

#[test]
fn reset_during_submission_cancels_and_discards_late_response() {
    init_logging();
    let (state, _) = update(
        JobState::new(JobKind::Convert),
        Msg::InputChanged("https://github.com/acme/widget".to_string()),
    );
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(effects.len(), 1);
    assert!(state.view().reset_enabled);

    let (state, effects) = update(state, Msg::ResetClicked);
    assert_eq!(effects, vec![Effect::CancelSubmission { ticket: 1 }]);
    assert_neutral(&state);

    let (state, effects) = update(
        state,
        Msg::SubmissionFinished {
            ticket: 1,
            outcome: SubmissionOutcome::Accepted,
        },
    );
    assert!(effects.is_empty());
    assert_neutral(&state);
}

#[test]
fn new_submission_after_reset_ignores_old_ticket() {
    init_logging();
    let (state, _) = update(
        JobState::new(JobKind::Convert),
        Msg::InputChanged("https://github.com/acme/widget".to_string()),
    );
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(state, Msg::ResetClicked);
    let (state, _) = update(
        state,
        Msg::InputChanged("https://github.com/acme/gadget".to_string()),
    );
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(matches!(effects.as_slice(), [Effect::Submit { ticket: 2, .. }]));

    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            ticket: 1,
            outcome: SubmissionOutcome::Rejected {
                status: 500,
                message: Some("stale".to_string()),
            },
        },
    );
    assert_eq!(state.status(), &JobStatus::Submitting);

    let (state, _) = update(
        state,
        Msg::SubmissionFinished {
            ticket: 2,
            outcome: SubmissionOutcome::Accepted,
        },
    );
    assert_eq!(state.view().artifact_name.as_deref(), Some("16-gadget.zip"));
}

#[test]
fn kinds_are_independent_instances() {
    init_logging();
    let mut app = AppState::new();
    app.dispatch(
        JobKind::Convert,
        Msg::InputChanged("https://github.com/acme/widget".to_string()),
    );
    let convert_effects = app.dispatch(JobKind::Convert, Msg::SubmitClicked);
    assert_eq!(convert_effects.len(), 1);

    app.dispatch(
        JobKind::Analyse,
        Msg::InputChanged("https://github.com/acme/pages".to_string()),
    );
    let analyse_effects = app.dispatch(JobKind::Analyse, Msg::SubmitClicked);
    assert!(matches!(
        analyse_effects.as_slice(),
        [Effect::Submit { ticket: 1, endpoint: "/analyse", .. }]
    ));

    app.dispatch(JobKind::Analyse, Msg::ResetClicked);
    assert_eq!(app.job(JobKind::Analyse).status(), &JobStatus::Idle);
    assert_eq!(app.job(JobKind::Convert).status(), &JobStatus::Submitting);
    assert_eq!(app.job(JobKind::Convert).url(), "https://github.com/acme/widget");
}
