//! XPath Forge core: pure state machine, domain types and view-model helpers.
mod effect;
mod history;
mod msg;
mod state;
mod templates;
mod types;
mod update;
mod view_model;

pub use effect::{ConfirmationPrompt, Effect};
pub use history::{History, HistoryItem, HISTORY_LIMIT};
pub use msg::Msg;
pub use state::{AppState, FeedbackStatus, PendingConfirmation, RequestId, COPIED_MARKER_MS};
pub use templates::{find_framework, Framework, FRAMEWORKS};
pub use types::{GeneratedCode, RequestError, ScrapingRequest};
pub use update::update;
pub use view_model::{AppViewModel, HistoryRowView, ResultView};
