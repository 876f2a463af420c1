use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use forge_core::{Effect, Msg};
use forge_engine::{EngineEvent, EngineHandle, HistoryStorage, HistoryStore};
use forge_logging::{forge_debug, forge_info, forge_warn};

use super::clipboard::Clipboard;

/// Executes effects emitted by `update` and feeds engine completions back as messages.
pub struct EffectRunner<S: HistoryStorage> {
    engine: Arc<EngineHandle>,
    history: HistoryStore<S>,
    clipboard: Box<dyn Clipboard>,
}

impl<S: HistoryStorage> EffectRunner<S> {
    pub fn new(
        engine: EngineHandle,
        history: HistoryStore<S>,
        clipboard: Box<dyn Clipboard>,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Self {
        let runner = Self {
            engine: Arc::new(engine),
            history,
            clipboard,
        };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    #[cfg(test)]
    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// Runs `effects` in order and returns messages that must be dispatched right away.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::Generate {
                    request_id,
                    request,
                } => {
                    forge_info!(
                        "Generate request_id={} host={}",
                        request_id,
                        request.hostname()
                    );
                    self.engine.generate(request_id, request);
                }
                Effect::Regenerate {
                    request_id,
                    request,
                    previous_code,
                    feedback,
                } => {
                    forge_info!(
                        "Regenerate request_id={} host={} feedback_len={}",
                        request_id,
                        request.hostname(),
                        feedback.len()
                    );
                    self.engine
                        .regenerate(request_id, request, previous_code, feedback);
                }
                Effect::RecordHistory(item) => {
                    if let Err(err) = self.history.record(item) {
                        forge_warn!("Failed to persist history: {}", err);
                    }
                }
                Effect::ClearHistory => {
                    if let Err(err) = self.history.clear() {
                        forge_warn!("Failed to clear stored history: {}", err);
                    }
                }
                Effect::RequestConfirmation(prompt) => {
                    // The prompt is shown from the view model.
                    forge_debug!("Confirmation requested: {}", prompt.message);
                }
                Effect::CopyToClipboard { index, code } => match self.clipboard.copy(&code) {
                    Ok(()) => follow_ups.push(Msg::CodeCopied {
                        index,
                        at_ms: now_ms(),
                    }),
                    Err(err) => forge_warn!("Clipboard write failed: {}", err),
                },
            }
        }
        follow_ups
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            match engine.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => {
                    if msg_tx.send(to_msg(event)).is_err() {
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    forge_warn!("Engine event channel closed");
                    break;
                }
            }
        });
    }
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::GenerationCompleted {
            request_id,
            kind,
            result,
        } => {
            forge_debug!(
                "{} request {} completed ok={}",
                kind,
                request_id,
                result.is_ok()
            );
            Msg::GenerationFinished {
                request_id,
                result: result.map_err(|err| err.to_string()),
                finished_at_ms: now_ms(),
            }
        }
    }
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
