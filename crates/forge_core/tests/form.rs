mod common;

use common::*;
use forge_core::{find_framework, update, AppState, Effect, FeedbackStatus, Msg};
use pretty_assertions::assert_eq;

#[test]
fn framework_fills_empty_requirement_directly() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::FrameworkSelected("icio".to_string()));
    assert!(effects.is_empty());
    assert_eq!(
        state.view().requirement,
        find_framework("ICIO").unwrap().template
    );
}

#[test]
fn framework_overwrite_needs_confirmation() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::RequirementChanged("my own words".to_string()),
    );

    let (state, effects) = update(state, Msg::FrameworkSelected("CRISPE".to_string()));
    match &effects[..] {
        [Effect::RequestConfirmation(prompt)] => assert!(prompt.message.contains("CRISPE")),
        other => panic!("unexpected effects {other:?}"),
    }
    assert_eq!(state.view().requirement, "my own words");

    let (state, _) = update(state, Msg::ConfirmationAnswered(false));
    assert_eq!(state.view().requirement, "my own words");

    let (state, _) = update(state, Msg::FrameworkSelected("CRISPE".to_string()));
    let (state, effects) = update(state, Msg::ConfirmationAnswered(true));
    assert!(effects.is_empty());
    assert_eq!(
        state.view().requirement,
        find_framework("CRISPE").unwrap().template
    );
}

#[test]
fn unknown_framework_and_stray_answers_are_ignored() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::FrameworkSelected("nope".to_string()));
    assert_eq!(next, state);
    assert!(effects.is_empty());

    let (next, effects) = update(state.clone(), Msg::ConfirmationAnswered(true));
    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn clearing_requirement_needs_no_confirmation() {
    let (state, _) = update(AppState::new(), Msg::RequirementChanged("x".to_string()));
    let (state, effects) = update(state, Msg::RequirementCleared);
    assert!(effects.is_empty());
    assert_eq!(state.view().requirement, "");
}

#[test]
fn reset_keeps_history_and_clears_everything_else() {
    init_logging();
    let state = generate_ok(AppState::new(), "https://a.example.com", "titles", 1);
    let (state, _) = update(state, Msg::AdvancedToggled);
    let (state, _) = update(state, Msg::HtmlContextChanged("<div/>".to_string()));
    let (state, effects) = request_fix(state, "broken");
    let (state, _) = finish(state, regenerate_id(&effects), Err("x".to_string()), 2);
    assert!(state.error().is_some());
    let history_before = state.history().clone();

    let (state, effects) = update(state, Msg::NewTask);
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(state.history(), &history_before);
    assert!(view.results.is_empty());
    assert_eq!(view.error, None);
    assert_eq!(view.feedback, FeedbackStatus::None);
    assert_eq!(view.url, "");
    assert_eq!(view.requirement, "");
    assert_eq!(view.html_context, "");
    assert!(!view.show_advanced);
    assert_eq!(view.submit_label, "Generate script");
}

#[test]
fn copy_emits_effect_and_marker_expires() {
    init_logging();
    let state = generate_ok(AppState::new(), "https://a.example.com", "titles", 1);

    let (state, effects) = update(state, Msg::CopyClicked { index: 0 });
    assert_eq!(
        effects,
        vec![Effect::CopyToClipboard {
            index: 0,
            code: state.results()[0].code.clone()
        }]
    );
    let (state, effects) = update(state, Msg::CopyClicked { index: 4 });
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::CodeCopied { index: 0, at_ms: 100 });
    assert!(state.view().results[0].copied);

    let (state, _) = update(state, Msg::Tick { now_ms: 1_000 });
    assert!(state.view().results[0].copied);
    let (mut state, _) = update(state, Msg::Tick { now_ms: 2_100 });
    assert!(!state.view().results[0].copied);
    assert!(state.consume_dirty());
}

#[test]
fn dirty_flag_is_consumed_once() {
    let (mut state, _) = update(AppState::new(), Msg::UrlChanged("https://a".to_string()));
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
    let (mut state, _) = update(state, Msg::Tick { now_ms: 5 });
    assert!(!state.consume_dirty());
}
