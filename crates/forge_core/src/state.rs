use crate::view_model::{AppViewModel, HistoryRowView, ResultView};
use crate::{ConfirmationPrompt, GeneratedCode, History, ScrapingRequest};

pub type RequestId = u64;

/// How long the "copied" marker stays visible.
pub const COPIED_MARKER_MS: i64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackStatus {
    #[default]
    None,
    Success,
    Fixing,
}

/// A destructive action waiting for the user's yes/no.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirmation {
    OverwriteRequirement { framework_id: &'static str },
    ClearHistory,
}

impl PendingConfirmation {
    pub fn prompt(self) -> ConfirmationPrompt {
        let message = match self {
            PendingConfirmation::OverwriteRequirement { framework_id } => format!(
                "Applying the {framework_id} framework will overwrite the current requirement. Continue?"
            ),
            PendingConfirmation::ClearHistory => {
                "Clear all recent tasks from history?".to_string()
            }
        };
        ConfirmationPrompt { message }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InFlightKind {
    Generate,
    Regenerate,
}

/// The one generation whose completion the state is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub(crate) id: RequestId,
    pub(crate) kind: InFlightKind,
    pub(crate) request: ScrapingRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CopiedMarker {
    pub(crate) index: usize,
    pub(crate) until_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) url: String,
    pub(crate) requirement: String,
    pub(crate) html_context: String,
    pub(crate) show_advanced: bool,
    pub(crate) in_flight: Option<InFlight>,
    /// Index 0 is always the newest result.
    pub(crate) results: Vec<GeneratedCode>,
    pub(crate) error: Option<String>,
    pub(crate) history: History,
    pub(crate) feedback: FeedbackStatus,
    pub(crate) user_feedback: String,
    pub(crate) pending_confirmation: Option<PendingConfirmation>,
    pub(crate) copied: Option<CopiedMarker>,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let loading = self.is_loading();
        let total = self.results.len();
        let results = self
            .results
            .iter()
            .enumerate()
            .map(|(index, result)| ResultView {
                index,
                label: if index == 0 {
                    "Latest version".to_string()
                } else {
                    format!("Version {}", total - index)
                },
                note: (index == 0 && total > 1).then_some("Fixed according to your feedback"),
                code: result.code.clone(),
                explanation: result.explanation.clone(),
                libraries: result.libraries.clone(),
                copied: self.copied.is_some_and(|marker| marker.index == index),
            })
            .collect();

        let history = self
            .history
            .items()
            .iter()
            .map(|item| HistoryRowView {
                id: item.id.clone(),
                hostname: item.hostname(),
                requirement: item.requirement.clone(),
                timestamp: item.timestamp,
            })
            .collect();

        let submit_label = if loading {
            "Analyzing..."
        } else if total > 0 {
            "Start over"
        } else {
            "Generate script"
        };

        AppViewModel {
            url: self.url.clone(),
            requirement: self.requirement.clone(),
            html_context: self.html_context.clone(),
            show_advanced: self.show_advanced,
            loading,
            submit_enabled: !loading && self.form_request().is_ok(),
            submit_label,
            error: self.error.clone(),
            results,
            feedback: self.feedback,
            user_feedback: self.user_feedback.clone(),
            regenerate_enabled: self.can_regenerate(),
            history,
            confirmation: self.pending_confirmation.map(|pending| pending.prompt().message),
            dirty: self.dirty,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Id of the generation currently awaited, if any.
    pub fn in_flight_id(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|in_flight| in_flight.id)
    }

    pub fn results(&self) -> &[GeneratedCode] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn feedback_status(&self) -> FeedbackStatus {
        self.feedback
    }

    pub fn user_feedback(&self) -> &str {
        &self.user_feedback
    }

    pub fn pending_confirmation(&self) -> Option<PendingConfirmation> {
        self.pending_confirmation
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    /// Regeneration needs the fixing panel open, typed feedback, a result to
    /// correct and a valid form.
    pub(crate) fn can_regenerate(&self) -> bool {
        !self.is_loading()
            && self.feedback == FeedbackStatus::Fixing
            && !self.results.is_empty()
            && !self.user_feedback.trim().is_empty()
            && self.form_request().is_ok()
    }

    pub(crate) fn form_request(&self) -> Result<ScrapingRequest, crate::RequestError> {
        ScrapingRequest::new(&self.url, &self.requirement, Some(&self.html_context))
    }

    /// Clears everything except history; an in-flight generation is abandoned.
    pub(crate) fn reset(&mut self) {
        self.url.clear();
        self.requirement.clear();
        self.html_context.clear();
        self.show_advanced = false;
        self.in_flight = None;
        self.results.clear();
        self.error = None;
        self.feedback = FeedbackStatus::None;
        self.user_feedback.clear();
        self.pending_confirmation = None;
        self.copied = None;
        self.mark_dirty();
    }
}
