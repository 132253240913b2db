//! Groq API clients (OpenAI-compatible endpoints)
//!
//! Two external collaborator boundaries, each behind an async trait so the
//! controller and recorder can be exercised with fakes:
//! - `CompletionBackend` / `GroqChat`: POST /chat/completions
//! - `TranscriptionBackend` / `GroqTranscription`: POST /audio/transcriptions

mod chat;
mod transcription;

pub use chat::{ChatMessage, CompletionBackend, GroqChat};
pub use transcription::{GroqTranscription, TranscriptionBackend};
