use crate::audio::{AudioClip, AudioFrame, CaptureBackend};
use crate::error::{TutorError, TutorResult};
use crate::groq::TranscriptionBackend;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Lifecycle of the microphone between start and stop/cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderState {
    Idle,
    Recording,
    Transcribing,
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecorderState::Idle => write!(f, "idle"),
            RecorderState::Recording => write!(f, "recording"),
            RecorderState::Transcribing => write!(f, "transcribing"),
        }
    }
}

/// Recording state machine: `Idle -> Recording -> Transcribing -> Idle`,
/// with `Recording -> Idle` also reachable via cancellation.
pub struct Recorder {
    /// Transcription client invoked on stop
    transcriber: Arc<dyn TranscriptionBackend>,

    /// Whether a capture session is currently open
    is_recording: Arc<AtomicBool>,

    /// Whether a stopped clip is currently being transcribed
    is_transcribing: Arc<AtomicBool>,

    /// The live session; `None` outside `Recording`
    session: Option<Session>,
}

/// Transient capture session. At most one exists per recorder.
struct Session {
    backend: Box<dyn CaptureBackend>,
    frames: Arc<Mutex<Vec<AudioFrame>>>,
    buffer_task: JoinHandle<()>,
}

/// Read-only view of the recorder state, shareable across tasks
#[derive(Clone)]
pub(crate) struct RecorderWatch {
    is_recording: Arc<AtomicBool>,
    is_transcribing: Arc<AtomicBool>,
}

impl RecorderWatch {
    pub(crate) fn state(&self) -> RecorderState {
        if self.is_recording.load(Ordering::SeqCst) {
            RecorderState::Recording
        } else if self.is_transcribing.load(Ordering::SeqCst) {
            RecorderState::Transcribing
        } else {
            RecorderState::Idle
        }
    }
}

impl Recorder {
    pub fn new(transcriber: Arc<dyn TranscriptionBackend>) -> Self {
        Self {
            transcriber,
            is_recording: Arc::new(AtomicBool::new(false)),
            is_transcribing: Arc::new(AtomicBool::new(false)),
            session: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        if self.is_recording.load(Ordering::SeqCst) {
            RecorderState::Recording
        } else if self.is_transcribing.load(Ordering::SeqCst) {
            RecorderState::Transcribing
        } else {
            RecorderState::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state() == RecorderState::Recording
    }

    pub(crate) fn watch(&self) -> RecorderWatch {
        RecorderWatch {
            is_recording: Arc::clone(&self.is_recording),
            is_transcribing: Arc::clone(&self.is_transcribing),
        }
    }

    /// Acquire the device and begin buffering fragments.
    ///
    /// A second `start` while a session is open is rejected rather than
    /// silently reacquiring the device.
    pub async fn start(&mut self, mut backend: Box<dyn CaptureBackend>) -> TutorResult<()> {
        let state = self.state();
        if state != RecorderState::Idle {
            return Err(TutorError::InvalidState {
                operation: "start recording",
                state,
            });
        }

        let mut frame_rx = backend.start().await?;
        info!("Recording started ({})", backend.name());

        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&frames);

        // Buffer fragments until the backend closes the channel on stop
        let buffer_task = tokio::spawn(async move {
            while let Some(frame) = frame_rx.recv().await {
                sink.lock().await.push(frame);
            }
        });

        self.session = Some(Session {
            backend,
            frames,
            buffer_task,
        });
        self.is_recording.store(true, Ordering::SeqCst);

        Ok(())
    }

    /// Stop capturing, finalize the clip, and hand it to the transcription
    /// client. The device is released before the network call, on every
    /// path. Resolves with the transcribed text, which may be empty.
    pub async fn stop(&mut self) -> TutorResult<String> {
        let state = self.state();
        if state != RecorderState::Recording {
            return Err(TutorError::InvalidState {
                operation: "stop recording",
                state,
            });
        }

        // Transcribing is flagged before Recording clears so no observer
        // sees a transient Idle between the two states.
        self.is_transcribing.store(true, Ordering::SeqCst);
        self.is_recording.store(false, Ordering::SeqCst);

        let clip = self.finish_session().await;

        let result = match clip {
            Some(clip) => {
                info!("Transcribing clip ({:.1}s)", clip.duration_seconds());
                self.transcriber.transcribe(clip.into_mono_16k()).await
            }
            None => {
                info!("Recording produced no audio; skipping transcription");
                Ok(String::new())
            }
        };

        self.is_transcribing.store(false, Ordering::SeqCst);
        result
    }

    /// Release the device and discard buffered fragments without invoking
    /// transcription. No-op outside `Recording`.
    pub async fn cancel(&mut self) {
        if self.state() != RecorderState::Recording {
            return;
        }

        self.is_recording.store(false, Ordering::SeqCst);
        let _ = self.finish_session().await;
        info!("Recording cancelled");
    }

    /// Tear down the live session: stop the backend (releasing the device),
    /// let the buffer task drain, and assemble the clip.
    async fn finish_session(&mut self) -> Option<AudioClip> {
        let Session {
            mut backend,
            frames,
            buffer_task,
        } = self.session.take()?;

        if let Err(e) = backend.stop().await {
            warn!("Failed to stop capture backend: {}", e);
        }

        if let Err(e) = buffer_task.await {
            warn!("Frame buffering task panicked: {}", e);
        }

        let frames = frames.lock().await;
        AudioClip::from_frames(&frames)
    }
}
