//! AI tutor conversation service
//!
//! Voice-and-text chat backend: a push-to-talk recorder feeds a Groq
//! Whisper transcription, and transcripts or typed messages drive a Groq
//! chat completion over an append-only conversation.

pub mod audio;
pub mod chat;
pub mod config;
pub mod error;
pub mod groq;
pub mod http;
pub mod recording;

pub use chat::{ChatController, Notice, SendOutcome, Speaker, Turn};
pub use config::Config;
pub use error::{TutorError, TutorResult};
pub use http::{create_router, AppState};
pub use recording::{Recorder, RecorderState};
