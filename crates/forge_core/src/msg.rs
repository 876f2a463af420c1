use crate::{GeneratedCode, HistoryItem, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the target URL field.
    UrlChanged(String),
    /// User edited the requirement text.
    RequirementChanged(String),
    /// User edited the optional HTML snippet.
    HtmlContextChanged(String),
    /// User showed or hid the advanced HTML-context section.
    AdvancedToggled,
    /// User picked a prompt framework by id.
    FrameworkSelected(String),
    /// User emptied the requirement field.
    RequirementCleared,
    /// Answer to the pending confirmation prompt.
    ConfirmationAnswered(bool),
    /// User submitted the form.
    Submitted,
    /// Engine completion for a generation or regeneration.
    GenerationFinished {
        request_id: RequestId,
        result: Result<GeneratedCode, String>,
        finished_at_ms: i64,
    },
    /// User accepted the newest result.
    MarkedCorrect,
    /// User rejected the newest result and wants to describe the problem.
    MarkedIncorrect,
    /// User edited the feedback text.
    FeedbackChanged(String),
    /// User closed the feedback box without submitting.
    FeedbackCancelled,
    /// User submitted feedback for a corrected version.
    RegenerateClicked,
    /// User started a new task from scratch.
    NewTask,
    /// User picked a history entry by id.
    HistorySelected(String),
    /// User asked to wipe the history.
    ClearHistoryClicked,
    /// Restore history entries loaded from storage at start-up.
    HistoryRestored(Vec<HistoryItem>),
    /// User asked to copy the code of the result at `index`.
    CopyClicked { index: usize },
    /// The platform finished writing result `index` to the clipboard.
    CodeCopied { index: usize, at_ms: i64 },
    /// Periodic clock tick.
    Tick { now_ms: i64 },
    /// Fallback for placeholder wiring.
    NoOp,
}
