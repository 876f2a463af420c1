use crate::{HistoryItem, RequestId, ScrapingRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Generate {
        request_id: RequestId,
        request: ScrapingRequest,
    },
    Regenerate {
        request_id: RequestId,
        request: ScrapingRequest,
        previous_code: String,
        feedback: String,
    },
    RecordHistory(HistoryItem),
    ClearHistory,
    RequestConfirmation(ConfirmationPrompt),
    CopyToClipboard { index: usize, code: String },
}

/// Yes/no question the platform must put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub message: String,
}
