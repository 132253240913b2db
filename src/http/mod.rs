//! HTTP API server for external frontends
//!
//! This module provides a REST API over the single conversation controller:
//! - POST /chat/messages - Send one user message
//! - GET /chat/turns - Full conversation
//! - GET /chat/notices - User-visible error notices
//! - POST /recording/start - Acquire the microphone
//! - POST /recording/stop - Stop, transcribe, and send the transcript
//! - POST /recording/cancel - Discard the active recording
//! - GET /recording/state - Recorder/controller snapshot
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
