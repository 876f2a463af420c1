use crate::FeedbackStatus;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub url: String,
    pub requirement: String,
    pub html_context: String,
    pub show_advanced: bool,
    pub loading: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub error: Option<String>,
    pub results: Vec<ResultView>,
    pub feedback: FeedbackStatus,
    pub user_feedback: String,
    pub regenerate_enabled: bool,
    pub history: Vec<HistoryRowView>,
    pub confirmation: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub index: usize,
    pub label: String,
    pub note: Option<&'static str>,
    pub code: String,
    pub explanation: String,
    pub libraries: Vec<String>,
    pub copied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub id: String,
    pub hostname: String,
    pub requirement: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}
