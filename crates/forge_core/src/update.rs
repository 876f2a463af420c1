use forge_logging::{forge_debug, forge_info};

use crate::state::{CopiedMarker, InFlight, InFlightKind};
use crate::{
    find_framework, AppState, Effect, FeedbackStatus, GeneratedCode, History, Msg,
    PendingConfirmation, RequestId, COPIED_MARKER_MS,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(text) => {
            state.url = text;
            state.mark_dirty();
            Vec::new()
        }
        Msg::RequirementChanged(text) => {
            state.requirement = text;
            state.mark_dirty();
            Vec::new()
        }
        Msg::HtmlContextChanged(text) => {
            state.html_context = text;
            state.mark_dirty();
            Vec::new()
        }
        Msg::AdvancedToggled => {
            state.show_advanced = !state.show_advanced;
            state.mark_dirty();
            Vec::new()
        }
        Msg::FrameworkSelected(id) => select_framework(&mut state, &id),
        Msg::RequirementCleared => {
            if !state.requirement.is_empty() {
                state.requirement.clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ConfirmationAnswered(accepted) => answer_confirmation(&mut state, accepted),
        Msg::Submitted => submit(&mut state),
        Msg::GenerationFinished {
            request_id,
            result,
            finished_at_ms,
        } => finish_generation(&mut state, request_id, result, finished_at_ms),
        Msg::MarkedCorrect => {
            if can_give_feedback(&state) {
                state.feedback = FeedbackStatus::Success;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::MarkedIncorrect => {
            if can_give_feedback(&state) {
                state.feedback = FeedbackStatus::Fixing;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FeedbackChanged(text) => {
            state.user_feedback = text;
            state.mark_dirty();
            Vec::new()
        }
        Msg::FeedbackCancelled => {
            if state.feedback == FeedbackStatus::Fixing {
                state.feedback = FeedbackStatus::None;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RegenerateClicked => regenerate(&mut state),
        Msg::NewTask => {
            state.reset();
            Vec::new()
        }
        Msg::HistorySelected(id) => {
            select_history(&mut state, &id);
            Vec::new()
        }
        Msg::ClearHistoryClicked => {
            if state.history.is_empty() {
                Vec::new()
            } else {
                request_confirmation(&mut state, PendingConfirmation::ClearHistory)
            }
        }
        Msg::HistoryRestored(items) => {
            state.history = History::from_persisted(items);
            state.mark_dirty();
            Vec::new()
        }
        Msg::CopyClicked { index } => match state.results.get(index) {
            Some(result) => vec![Effect::CopyToClipboard {
                index,
                code: result.code.clone(),
            }],
            None => Vec::new(),
        },
        Msg::CodeCopied { index, at_ms } => {
            if index < state.results.len() {
                state.copied = Some(CopiedMarker {
                    index,
                    until_ms: at_ms + COPIED_MARKER_MS,
                });
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick { now_ms } => {
            if state.copied.is_some_and(|marker| now_ms >= marker.until_ms) {
                state.copied = None;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn select_framework(state: &mut AppState, id: &str) -> Vec<Effect> {
    let Some(framework) = find_framework(id) else {
        forge_debug!("Ignoring unknown framework id {:?}", id);
        return Vec::new();
    };

    let current = state.requirement.trim();
    if current.is_empty() || current == framework.template {
        state.requirement = framework.template.to_string();
        state.mark_dirty();
        return Vec::new();
    }

    request_confirmation(
        state,
        PendingConfirmation::OverwriteRequirement {
            framework_id: framework.id,
        },
    )
}

fn request_confirmation(state: &mut AppState, pending: PendingConfirmation) -> Vec<Effect> {
    state.pending_confirmation = Some(pending);
    state.mark_dirty();
    vec![Effect::RequestConfirmation(pending.prompt())]
}

fn answer_confirmation(state: &mut AppState, accepted: bool) -> Vec<Effect> {
    let Some(pending) = state.pending_confirmation.take() else {
        return Vec::new();
    };
    state.mark_dirty();
    if !accepted {
        return Vec::new();
    }

    match pending {
        PendingConfirmation::OverwriteRequirement { framework_id } => {
            if let Some(framework) = find_framework(framework_id) {
                state.requirement = framework.template.to_string();
            }
            Vec::new()
        }
        PendingConfirmation::ClearHistory => {
            state.history.clear();
            vec![Effect::ClearHistory]
        }
    }
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if state.is_loading() {
        forge_debug!("Submit ignored: a generation is already in flight");
        return Vec::new();
    }
    let request = match state.form_request() {
        Ok(request) => request,
        Err(err) => {
            forge_debug!("Submit ignored: {}", err);
            return Vec::new();
        }
    };

    let request_id = state.next_request_id();
    forge_info!(
        "Generation {} requested for host {}",
        request_id,
        request.hostname()
    );
    state.in_flight = Some(InFlight {
        id: request_id,
        kind: InFlightKind::Generate,
        request: request.clone(),
    });
    state.error = None;
    state.feedback = FeedbackStatus::None;
    state.user_feedback.clear();
    state.pending_confirmation = None;
    state.mark_dirty();

    vec![Effect::Generate {
        request_id,
        request,
    }]
}

fn regenerate(state: &mut AppState) -> Vec<Effect> {
    if !state.can_regenerate() {
        forge_debug!("Regenerate ignored in state {:?}", state.feedback);
        return Vec::new();
    }
    let (Ok(request), Some(latest)) = (state.form_request(), state.results.first()) else {
        return Vec::new();
    };

    let previous_code = latest.code.clone();
    let feedback = state.user_feedback.trim().to_string();
    let request_id = state.next_request_id();
    forge_info!(
        "Regeneration {} requested after {} result(s)",
        request_id,
        state.results.len()
    );
    state.in_flight = Some(InFlight {
        id: request_id,
        kind: InFlightKind::Regenerate,
        request: request.clone(),
    });
    state.error = None;
    state.mark_dirty();

    vec![Effect::Regenerate {
        request_id,
        request,
        previous_code,
        feedback,
    }]
}

fn finish_generation(
    state: &mut AppState,
    request_id: RequestId,
    result: Result<GeneratedCode, String>,
    finished_at_ms: i64,
) -> Vec<Effect> {
    let in_flight = match state.in_flight.take() {
        Some(in_flight) if in_flight.id == request_id => in_flight,
        other => {
            forge_debug!("Dropping stale completion for generation {}", request_id);
            state.in_flight = other;
            return Vec::new();
        }
    };
    state.mark_dirty();

    match (in_flight.kind, result) {
        (InFlightKind::Generate, Ok(code)) => {
            state.results = vec![code];
            state.copied = None;
            let item = state.history.new_item(
                &in_flight.request.url,
                &in_flight.request.requirement,
                finished_at_ms,
            );
            state.history.record(item.clone());
            vec![Effect::RecordHistory(item)]
        }
        (InFlightKind::Regenerate, Ok(code)) => {
            state.results.insert(0, code);
            state.copied = None;
            state.feedback = FeedbackStatus::None;
            state.user_feedback.clear();
            Vec::new()
        }
        (InFlightKind::Generate, Err(message)) => {
            state.error = Some(message);
            Vec::new()
        }
        (InFlightKind::Regenerate, Err(message)) => {
            state.error = Some(format!("Regeneration failed: {message}"));
            Vec::new()
        }
    }
}

fn can_give_feedback(state: &AppState) -> bool {
    !state.results.is_empty() && state.feedback == FeedbackStatus::None
}

fn select_history(state: &mut AppState, id: &str) {
    let Some(item) = state.history.find(id).cloned() else {
        forge_debug!("Ignoring unknown history id {:?}", id);
        return;
    };
    state.url = item.url;
    state.requirement = item.requirement;
    state.html_context.clear();
    state.in_flight = None;
    state.results.clear();
    state.error = None;
    state.feedback = FeedbackStatus::None;
    state.user_feedback.clear();
    state.pending_confirmation = None;
    state.copied = None;
    state.mark_dirty();
}
