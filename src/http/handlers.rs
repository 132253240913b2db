use super::state::AppState;
use crate::audio::{CaptureBackendFactory, CaptureSource};
use crate::chat::{SendOutcome, Turn};
use crate::error::TutorError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::error;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub status: String,
    pub user: Turn,
    pub assistant: Turn,
}

#[derive(Debug, Serialize)]
pub struct RecordingResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /chat/messages
/// Send one user message and wait for the assistant reply
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> impl IntoResponse {
    match state.controller.send_message(&req.text).await {
        SendOutcome::Replied { user, assistant } => (
            StatusCode::OK,
            Json(SendMessageResponse {
                status: "replied".to_string(),
                user,
                assistant,
            }),
        )
            .into_response(),
        SendOutcome::Ignored => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "message was empty or a response is already pending".to_string(),
            }),
        )
            .into_response(),
        SendOutcome::CompletionFailed { notice, .. } => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: notice.message,
            }),
        )
            .into_response(),
        SendOutcome::RecordingFailed { notice } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: notice.message,
            }),
        )
            .into_response(),
    }
}

/// POST /recording/start
/// Acquire the microphone and begin buffering audio
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    let backend =
        match CaptureBackendFactory::create(CaptureSource::Microphone, state.capture.clone()) {
            Ok(backend) => backend,
            Err(e) => {
                error!("Failed to create capture backend: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: e.to_string(),
                    }),
                )
                    .into_response();
            }
        };

    match state.controller.start_recording(backend).await {
        Ok(()) => (
            StatusCode::OK,
            Json(RecordingResponse {
                status: "recording".to_string(),
                message: "Recording started".to_string(),
            }),
        )
            .into_response(),
        Err(e @ TutorError::InvalidState { .. }) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start recording: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /recording/stop
/// Stop recording, transcribe the clip, and send the transcript
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.send_via_recording().await {
        SendOutcome::Replied { user, assistant } => (
            StatusCode::OK,
            Json(SendMessageResponse {
                status: "replied".to_string(),
                user,
                assistant,
            }),
        )
            .into_response(),
        SendOutcome::Ignored => (
            StatusCode::OK,
            Json(RecordingResponse {
                status: "empty".to_string(),
                message: "No speech recognized".to_string(),
            }),
        )
            .into_response(),
        SendOutcome::CompletionFailed { notice, .. } => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: notice.message,
            }),
        )
            .into_response(),
        SendOutcome::RecordingFailed { notice } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: notice.message,
            }),
        )
            .into_response(),
    }
}

/// POST /recording/cancel
/// Discard the active recording without transcribing
pub async fn cancel_recording(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.cancel_recording().await;
    (
        StatusCode::OK,
        Json(RecordingResponse {
            status: "idle".to_string(),
            message: "Recording cancelled".to_string(),
        }),
    )
}

/// GET /recording/state
/// Snapshot of recorder and controller state
pub async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.stats().await)
}

/// GET /chat/turns
/// Full conversation so far
pub async fn get_turns(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.turns().await)
}

/// GET /chat/notices
/// User-visible error notices recorded so far
pub async fn get_notices(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.notices().await)
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
