use formsync_autosave::{AutosaveStatus, ErrorSink, PipelineState, SaveError};
use formsync_types::EntityId;

// ── PipelineState ────────────────────────────────────────────────

#[test]
fn default_state_is_idle() {
    let state = PipelineState::default();
    assert!(!state.typing);
    assert!(!state.saving);
    assert!(state.error.is_none());
    assert_eq!(state.status(), AutosaveStatus::Idle);
}

#[test]
fn status_precedence() {
    let mut state = PipelineState {
        typing: false,
        saving: true,
        error: None,
    };
    assert_eq!(state.status(), AutosaveStatus::Saving);

    state.saving = false;
    state.typing = true;
    state.error = Some(SaveError::Timeout);
    assert_eq!(state.status(), AutosaveStatus::Typing);

    state.typing = false;
    assert_eq!(state.status(), AutosaveStatus::Failed("save timed out".into()));
}

#[test]
fn status_display() {
    assert_eq!(AutosaveStatus::Idle.to_string(), "Saved");
    assert_eq!(AutosaveStatus::Typing.to_string(), "Typing...");
    assert_eq!(AutosaveStatus::Saving.to_string(), "Saving...");
    assert_eq!(
        AutosaveStatus::Failed("boom".into()).to_string(),
        "Error: boom"
    );
}

// ── ErrorSink ────────────────────────────────────────────────────

#[test]
fn error_sink_records_and_clears() {
    let mut sink = ErrorSink::new();
    let mut state = PipelineState {
        typing: false,
        saving: true,
        error: None,
    };

    sink.record(&mut state, EntityId::new(1), SaveError::rejected(409, "stale version"));
    assert!(!state.saving);
    assert_eq!(state.error, Some(SaveError::rejected(409, "stale version")));
    assert_eq!(sink.failures(), 1);

    sink.clear(&mut state);
    assert!(state.error.is_none());
    assert_eq!(sink.failures(), 1);
}

#[test]
fn save_error_messages() {
    assert_eq!(
        SaveError::rejected(400, "bad field").to_string(),
        "save rejected (400): bad field"
    );
    assert_eq!(SaveError::Network("reset".into()).to_string(), "network error: reset");
    assert_eq!(SaveError::other("nope").to_string(), "nope");
}
