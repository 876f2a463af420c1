use std::io;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use forge_core::{GeneratedCode, RequestId, ScrapingRequest};
use forge_logging::{forge_debug, forge_error};

use crate::{EngineEvent, GenerationClient, GenerationError, GenerationFailure, GenerationKind};

enum EngineCommand {
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
}

impl EngineCommand {
    fn request_id(&self) -> RequestId {
        match self {
            EngineCommand::Generate { request_id, .. }
            | EngineCommand::Regenerate { request_id, .. } => *request_id,
        }
    }

    fn kind(&self) -> GenerationKind {
        match self {
            EngineCommand::Generate { .. } => GenerationKind::Generate,
            EngineCommand::Regenerate { .. } => GenerationKind::Regenerate,
        }
    }

    /// Completion reported when the command never produced a result.
    fn aborted(&self, message: &str) -> EngineEvent {
        EngineEvent::GenerationCompleted {
            request_id: self.request_id(),
            kind: self.kind(),
            result: Err(GenerationError::new(GenerationFailure::Aborted, message)),
        }
    }
}

/// Runs generation calls on a background tokio runtime and reports completions.
///
/// Every accepted command yields exactly one [`EngineEvent`], also when the
/// call panics or the worker is gone.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(client: Arc<dyn GenerationClient>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let worker_tx = event_tx.clone();
        thread::Builder::new()
            .name("forge-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let client = client.clone();
                    let event_tx = worker_tx.clone();
                    runtime.spawn(supervise(client, command, event_tx));
                }
                forge_debug!("Engine command channel closed; shutting down");
            })?;

        Ok(Self {
            cmd_tx,
            event_tx,
            event_rx: Mutex::new(event_rx),
        })
    }

    pub fn generate(&self, request_id: RequestId, request: ScrapingRequest) {
        self.submit(EngineCommand::Generate {
            request_id,
            request,
        });
    }

    pub fn regenerate(
        &self,
        request_id: RequestId,
        request: ScrapingRequest,
        previous_code: impl Into<String>,
        feedback: impl Into<String>,
    ) {
        self.submit(EngineCommand::Regenerate {
            request_id,
            request,
            previous_code: previous_code.into(),
            feedback: feedback.into(),
        });
    }

    fn submit(&self, command: EngineCommand) {
        if let Err(mpsc::SendError(command)) = self.cmd_tx.send(command) {
            forge_error!(
                "Engine worker is gone; {} request {} not sent",
                command.kind(),
                command.request_id()
            );
            let _ = self
                .event_tx
                .send(command.aborted("the generation engine has stopped"));
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.receiver().try_recv().ok()
    }

    /// Waits up to `timeout` for the next completion.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        self.receiver().recv_timeout(timeout)
    }

    fn receiver(&self) -> std::sync::MutexGuard<'_, mpsc::Receiver<EngineEvent>> {
        self.event_rx.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs `command` in its own task so a panic still produces a completion.
async fn supervise(
    client: Arc<dyn GenerationClient>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let request_id = command.request_id();
    let kind = command.kind();
    let fallback = command.aborted("the generation task stopped unexpectedly");

    let event = match tokio::spawn(run_command(client, command)).await {
        Ok(result) => EngineEvent::GenerationCompleted {
            request_id,
            kind,
            result,
        },
        Err(err) => {
            forge_error!("{} request {} aborted: {}", kind, request_id, err);
            fallback
        }
    };
    if event_tx.send(event).is_err() {
        forge_debug!("Completion for request {} dropped; receiver gone", request_id);
    }
}

async fn run_command(
    client: Arc<dyn GenerationClient>,
    command: EngineCommand,
) -> Result<GeneratedCode, GenerationError> {
    match command {
        EngineCommand::Generate { request, .. } => client.generate(&request).await,
        EngineCommand::Regenerate {
            request,
            previous_code,
            feedback,
            ..
        } => client.regenerate(&request, &previous_code, &feedback).await,
    }
}
