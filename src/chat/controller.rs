use super::turn::Turn;
use crate::audio::CaptureBackend;
use crate::error::TutorResult;
use crate::groq::{ChatMessage, CompletionBackend};
use crate::recording::{Recorder, RecorderState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Fallback assistant reply when the completion succeeds without content
pub const EMPTY_COMPLETION_FALLBACK: &str =
    "I apologize, but I couldn't generate a response. Please try again.";

/// Notice shown when the completion request fails outright
pub const COMPLETION_FAILURE_NOTICE: &str =
    "Failed to get response from AI tutor. Please try again.";

/// A user-visible error notification.
///
/// Every recovered failure produces exactly one of these; the conversation
/// itself is never rolled back.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a send attempt
#[derive(Debug)]
pub enum SendOutcome {
    /// Empty input, or a completion/transcription already in flight
    Ignored,

    /// The exchange completed; both turns were appended
    Replied { user: Turn, assistant: Turn },

    /// Completion failed; the user turn stays, one notice was recorded
    CompletionFailed { user: Turn, notice: Notice },

    /// Recording stop or transcription failed; no turn was appended
    RecordingFailed { notice: Notice },
}

/// Snapshot of controller state for the status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ControllerStats {
    pub recorder_state: RecorderState,
    pub turn_count: usize,
    pub notice_count: usize,
    pub awaiting_response: bool,
}

/// Owns the conversation for one session: the ordered turn list, the
/// awaiting-response guard, and the recording state machine.
///
/// All methods take `&self`; shared state lives behind the same
/// atomic-flag-plus-mutex layout the recording side uses, so one
/// controller can be shared across HTTP handlers.
pub struct ChatController {
    completion: Arc<dyn CompletionBackend>,

    /// Append-only conversation; insertion order is chronological order
    turns: Arc<Mutex<Vec<Turn>>>,

    /// User-visible error notifications, append-only
    notices: Arc<Mutex<Vec<Notice>>>,

    /// True while exactly one completion request is in flight
    awaiting_response: Arc<AtomicBool>,

    recorder: Arc<Mutex<Recorder>>,

    recorder_watch: crate::recording::RecorderWatch,
}

impl ChatController {
    pub fn new(completion: Arc<dyn CompletionBackend>, recorder: Recorder) -> Self {
        let recorder_watch = recorder.watch();
        Self {
            completion,
            turns: Arc::new(Mutex::new(Vec::new())),
            notices: Arc::new(Mutex::new(Vec::new())),
            awaiting_response: Arc::new(AtomicBool::new(false)),
            recorder: Arc::new(Mutex::new(recorder)),
            recorder_watch,
        }
    }

    /// Full conversation so far
    pub async fn turns(&self) -> Vec<Turn> {
        self.turns.lock().await.clone()
    }

    /// All notices recorded so far
    pub async fn notices(&self) -> Vec<Notice> {
        self.notices.lock().await.clone()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response.load(Ordering::SeqCst)
    }

    pub async fn stats(&self) -> ControllerStats {
        ControllerStats {
            recorder_state: self.recorder_watch.state(),
            turn_count: self.turns.lock().await.len(),
            notice_count: self.notices.lock().await.len(),
            awaiting_response: self.is_awaiting_response(),
        }
    }

    /// Send one user message and await the assistant reply.
    ///
    /// The user turn is appended synchronously before the completion call
    /// is issued; a failed send leaves it in place with no assistant reply
    /// and no retry.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        // Refuse sends while a stopped recording is still transcribing
        if self.recorder_watch.state() == RecorderState::Transcribing {
            return SendOutcome::Ignored;
        }

        // At most one completion in flight
        if self.awaiting_response.swap(true, Ordering::SeqCst) {
            return SendOutcome::Ignored;
        }

        // Optimistic append: the user turn is visible before the remote call
        let user = Turn::user(text);
        let request: Vec<ChatMessage> = {
            let mut turns = self.turns.lock().await;
            turns.push(user.clone());
            turns
                .iter()
                .map(|turn| ChatMessage {
                    role: turn.speaker.as_role().to_string(),
                    content: turn.content.clone(),
                })
                .collect()
        };

        let result = self.completion.complete(&request).await;
        self.awaiting_response.store(false, Ordering::SeqCst);

        match result {
            Ok(content) => {
                let content = content
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| EMPTY_COMPLETION_FALLBACK.to_string());

                let assistant = Turn::assistant(content);
                self.turns.lock().await.push(assistant.clone());
                info!("Assistant replied ({} chars)", assistant.content.len());

                SendOutcome::Replied { user, assistant }
            }
            Err(e) => {
                error!("Completion request failed: {}", e);
                let notice = self.push_notice(COMPLETION_FAILURE_NOTICE).await;
                SendOutcome::CompletionFailed { user, notice }
            }
        }
    }

    /// Stop the active recording, transcribe it, and send the transcript
    /// as a user message. An empty transcript sends nothing; a stop or
    /// transcription failure appends no turn.
    pub async fn send_via_recording(&self) -> SendOutcome {
        // A completion in flight blocks this path too; the live session is
        // left untouched so the recording can still be stopped later.
        if self.is_awaiting_response() {
            return SendOutcome::Ignored;
        }

        let stopped = {
            let mut recorder = self.recorder.lock().await;
            recorder.stop().await
        };

        match stopped {
            Ok(text) => {
                if text.trim().is_empty() {
                    info!("Transcription empty; nothing to send");
                    return SendOutcome::Ignored;
                }
                self.send_message(&text).await
            }
            Err(e) => {
                warn!("Recording stop failed: {}", e);
                let notice = self.push_notice(&e.to_string()).await;
                SendOutcome::RecordingFailed { notice }
            }
        }
    }

    /// Acquire the given capture backend and start recording
    pub async fn start_recording(&self, backend: Box<dyn CaptureBackend>) -> TutorResult<()> {
        self.recorder.lock().await.start(backend).await
    }

    /// Discard the active recording, if any
    pub async fn cancel_recording(&self) {
        self.recorder.lock().await.cancel().await;
    }

    async fn push_notice(&self, message: &str) -> Notice {
        let notice = Notice {
            message: message.to_string(),
            created_at: Utc::now(),
        };
        self.notices.lock().await.push(notice.clone());
        notice
    }
}
