//! Error types for the AI tutor service

use crate::recording::RecorderState;
use thiserror::Error;

/// Result type alias for tutor operations
pub type TutorResult<T> = std::result::Result<T, TutorError>;

/// Errors that can occur in the chat and recording pipeline
#[derive(Error, Debug)]
pub enum TutorError {
    /// The audio device could not be acquired (denied or absent).
    #[error("Audio device unavailable: {0}")]
    Permission(String),

    /// The requested operation is not valid for the current recorder state.
    #[error("{operation} is not valid while the recorder is {state}")]
    InvalidState {
        operation: &'static str,
        state: RecorderState,
    },

    /// The remote transcription call failed.
    #[error("Transcription failed: {0}")]
    Transcription(String),

    /// The remote chat-completion call failed.
    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("Audio stream error: {0}")]
    AudioStream(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
