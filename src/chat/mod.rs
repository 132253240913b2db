//! Conversation state and turn management
//!
//! This module provides the `ChatController` abstraction that owns:
//! - The append-only sequence of conversation turns
//! - The awaiting-response guard (at most one completion in flight)
//! - The recording state machine driving speech-to-text input
//! - User-visible error notices

mod controller;
mod turn;

pub use controller::{
    ChatController, ControllerStats, Notice, SendOutcome, COMPLETION_FAILURE_NOTICE,
    EMPTY_COMPLETION_FALLBACK,
};
pub use turn::{Speaker, Turn};
