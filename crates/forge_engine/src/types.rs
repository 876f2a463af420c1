use std::fmt;

use forge_core::{GeneratedCode, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Generate,
    Regenerate,
}

impl GenerationKind {
    /// Message used when a failure carries no cause of its own.
    pub fn fallback_message(self) -> &'static str {
        match self {
            GenerationKind::Generate => {
                "generation failed, check the network or the URL and try again"
            }
            GenerationKind::Regenerate => "regeneration failed",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationKind::Generate => write!(f, "generate"),
            GenerationKind::Regenerate => write!(f, "regenerate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    GenerationCompleted {
        request_id: RequestId,
        kind: GenerationKind,
        result: Result<GeneratedCode, GenerationError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct GenerationError {
    pub kind: GenerationFailure,
    pub message: String,
}

impl GenerationError {
    pub(crate) fn new(kind: GenerationFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Replaces a blank message with the operation's fallback text.
    pub(crate) fn or_fallback(mut self, operation: GenerationKind) -> Self {
        if self.message.trim().is_empty() {
            self.message = operation.fallback_message().to_string();
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    MissingApiKey,
    InvalidEndpoint,
    Network,
    Timeout,
    HttpStatus(u16),
    EmptyResponse,
    MalformedResponse,
    /// The engine could not run the call to completion.
    Aborted,
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationFailure::MissingApiKey => write!(f, "missing api key"),
            GenerationFailure::InvalidEndpoint => write!(f, "invalid endpoint"),
            GenerationFailure::Network => write!(f, "network error"),
            GenerationFailure::Timeout => write!(f, "timeout"),
            GenerationFailure::HttpStatus(code) => write!(f, "http status {code}"),
            GenerationFailure::EmptyResponse => write!(f, "empty response"),
            GenerationFailure::MalformedResponse => write!(f, "malformed response"),
            GenerationFailure::Aborted => write!(f, "aborted"),
        }
    }
}
