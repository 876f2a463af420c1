//! XPath Forge engine: generation client, background execution and history storage.
mod client;
mod decode;
mod engine;
mod gemini;
mod history;
mod persist;
mod prompt;
mod schema;
mod types;

pub use client::{
    GeminiClient, GenerationClient, GenerationSettings, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
pub use decode::{decode_generated_code, DecodeError};
pub use engine::EngineHandle;
pub use history::{
    FileHistoryStorage, HistoryStorage, HistoryStore, MemoryHistoryStorage, StorageError,
};
pub use persist::{ensure_parent_dir, write_atomically, PersistError};
pub use prompt::{build_generation_prompt, build_regeneration_prompt};
pub use schema::{generation_config, response_schema};
pub use types::{EngineEvent, GenerationError, GenerationFailure, GenerationKind};
