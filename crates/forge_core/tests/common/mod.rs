#![allow(dead_code)]

use std::sync::Once;

use forge_core::{update, AppState, Effect, GeneratedCode, Msg, RequestId, ScrapingRequest};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(forge_logging::initialize_for_tests);
}

pub fn code(tag: &str) -> GeneratedCode {
    GeneratedCode {
        code: format!("print('{tag}')"),
        explanation: format!("Explains {tag}"),
        libraries: vec!["requests".to_string(), "lxml".to_string()],
    }
}

pub fn fill_form(state: AppState, url: &str, requirement: &str, html: &str) -> AppState {
    let (state, _) = update(state, Msg::UrlChanged(url.to_string()));
    let (state, _) = update(state, Msg::RequirementChanged(requirement.to_string()));
    let (state, _) = update(state, Msg::HtmlContextChanged(html.to_string()));
    state
}

/// Fills the form and submits it, returning the `Generate` effect's id and request.
pub fn submit(
    state: AppState,
    url: &str,
    requirement: &str,
    html: &str,
) -> (AppState, RequestId, ScrapingRequest) {
    let state = fill_form(state, url, requirement, html);
    let (state, effects) = update(state, Msg::Submitted);
    let (request_id, request) = effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::Generate {
                request_id,
                request,
            } => Some((request_id, request)),
            _ => None,
        })
        .expect("generate effect");
    (state, request_id, request)
}

pub fn finish(
    state: AppState,
    request_id: RequestId,
    result: Result<GeneratedCode, String>,
    finished_at_ms: i64,
) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::GenerationFinished {
            request_id,
            result,
            finished_at_ms,
        },
    )
}

/// Runs one successful generation cycle.
pub fn generate_ok(state: AppState, url: &str, requirement: &str, at_ms: i64) -> AppState {
    let (state, request_id, _) = submit(state, url, requirement, "");
    let (state, _) = finish(state, request_id, Ok(code(url)), at_ms);
    state
}

/// Rejects the newest result, types feedback and asks for a corrected version.
pub fn request_fix(state: AppState, feedback: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::MarkedIncorrect);
    let (state, _) = update(state, Msg::FeedbackChanged(feedback.to_string()));
    update(state, Msg::RegenerateClicked)
}

pub fn regenerate_id(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Regenerate { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("regenerate effect")
}
