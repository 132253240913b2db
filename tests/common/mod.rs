//! Shared test doubles for the controller and recorder tests

#![allow(dead_code)]

use ai_tutor::audio::{AudioClip, AudioFrame, CaptureBackend};
use ai_tutor::error::{TutorError, TutorResult};
use ai_tutor::groq::{ChatMessage, CompletionBackend, TranscriptionBackend};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Semaphore};

/// Completion backend that replays a scripted queue of results and
/// records every request it receives.
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<TutorResult<Option<String>>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedCompletion {
    pub fn with_replies(replies: Vec<TutorResult<Option<String>>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Each call blocks on the semaphore before replying, so a test can
    /// hold a completion in flight.
    pub fn gated(replies: Vec<TutorResult<Option<String>>>, gate: Arc<Semaphore>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            gate: Some(gate),
        })
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl CompletionBackend for ScriptedCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> TutorResult<Option<String>> {
        if let Some(gate) = &self.gate {
            // The permit is returned on drop so the gate acts as a latch:
            // once opened, later completions proceed without new permits.
            let _permit = gate.acquire().await.unwrap();
        }

        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Some("ok".to_string())))
    }
}

/// What a `FakeTranscriber` does when invoked
pub enum TranscriberScript {
    Text(String),
    Fail(String),
}

/// Transcription backend that returns a scripted result and records the
/// clips it was handed.
pub struct FakeTranscriber {
    script: TranscriberScript,
    calls: AtomicUsize,
    seen: Mutex<Vec<AudioClip>>,
    /// When set, asserts the capture device was released before the
    /// transcription call was issued.
    require_released: Option<Arc<AtomicBool>>,
}

impl FakeTranscriber {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            script: TranscriberScript::Text(text.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            require_released: None,
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            script: TranscriberScript::Fail(message.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            require_released: None,
        })
    }

    pub fn returning_after_release(text: &str, released: Arc<AtomicBool>) -> Arc<Self> {
        Arc::new(Self {
            script: TranscriberScript::Text(text.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            require_released: Some(released),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_clips(&self) -> Vec<AudioClip> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TranscriptionBackend for FakeTranscriber {
    async fn transcribe(&self, clip: AudioClip) -> TutorResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(released) = &self.require_released {
            assert!(
                released.load(Ordering::SeqCst),
                "capture device must be released before transcription starts"
            );
        }

        self.seen.lock().unwrap().push(clip);

        match &self.script {
            TranscriberScript::Text(text) => Ok(text.clone()),
            TranscriberScript::Fail(message) => Err(TutorError::Transcription(message.clone())),
        }
    }
}

/// Observes a `FakeCapture` from outside the recorder
#[derive(Clone)]
pub struct CaptureProbe {
    pub started: Arc<AtomicBool>,
    pub released: Arc<AtomicBool>,
}

/// Capture backend that emits a fixed set of frames and keeps the frame
/// channel open until `stop`, like a live device would.
pub struct FakeCapture {
    frames: Vec<AudioFrame>,
    tx: Option<mpsc::Sender<AudioFrame>>,
    started: Arc<AtomicBool>,
    released: Arc<AtomicBool>,
    fail_start: bool,
}

impl FakeCapture {
    pub fn with_frames(frames: Vec<AudioFrame>) -> (Box<dyn CaptureBackend>, CaptureProbe) {
        let probe = CaptureProbe {
            started: Arc::new(AtomicBool::new(false)),
            released: Arc::new(AtomicBool::new(false)),
        };
        let backend = Box::new(Self {
            frames,
            tx: None,
            started: Arc::clone(&probe.started),
            released: Arc::clone(&probe.released),
            fail_start: false,
        });
        (backend, probe)
    }

    pub fn failing_permission() -> Box<dyn CaptureBackend> {
        Box::new(Self {
            frames: Vec::new(),
            tx: None,
            started: Arc::new(AtomicBool::new(false)),
            released: Arc::new(AtomicBool::new(false)),
            fail_start: true,
        })
    }
}

#[async_trait::async_trait]
impl CaptureBackend for FakeCapture {
    async fn start(&mut self) -> TutorResult<mpsc::Receiver<AudioFrame>> {
        if self.fail_start {
            return Err(TutorError::Permission(
                "microphone access denied".to_string(),
            ));
        }

        let (tx, rx) = mpsc::channel(self.frames.len().max(1) + 1);
        for frame in self.frames.drain(..) {
            tx.send(frame).await.unwrap();
        }

        // Keep the sender alive so the channel only closes on stop
        self.tx = Some(tx);
        self.started.store(true, Ordering::SeqCst);
        Ok(rx)
    }

    async fn stop(&mut self) -> TutorResult<()> {
        self.tx = None;
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.tx.is_some()
    }

    fn name(&self) -> &str {
        "fake capture"
    }
}

/// A mono 16 kHz frame with the given samples
pub fn frame(samples: Vec<i16>, timestamp_ms: u64) -> AudioFrame {
    AudioFrame {
        samples,
        sample_rate: 16_000,
        channels: 1,
        timestamp_ms,
    }
}
