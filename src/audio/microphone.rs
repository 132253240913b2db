use super::backend::{AudioFrame, CaptureBackend, CaptureConfig};
use crate::error::{TutorError, TutorResult};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Exclusive microphone capture via cpal.
///
/// cpal streams are not `Send`, so the stream lives on a dedicated thread
/// and is torn down through a stop signal. The device is held from the
/// moment `start` resolves until `stop` joins the thread; dropping the
/// stream releases it.
pub struct MicrophoneBackend {
    config: CaptureConfig,
    worker: Option<CaptureWorker>,
}

struct CaptureWorker {
    stop_tx: std::sync::mpsc::Sender<()>,
    handle: std::thread::JoinHandle<()>,
}

impl MicrophoneBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            worker: None,
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MicrophoneBackend {
    async fn start(&mut self) -> TutorResult<mpsc::Receiver<AudioFrame>> {
        if self.worker.is_some() {
            return Err(TutorError::AudioStream(
                "microphone capture already running".to_string(),
            ));
        }

        // getUserMedia-style constraints; cpal exposes no such knobs, so
        // these remain hints for platforms whose audio stack applies them.
        info!(
            "Acquiring microphone (fragment={}ms, noise_suppression={}, echo_cancellation={})",
            self.config.fragment_ms, self.config.noise_suppression, self.config.echo_cancellation
        );

        let (frame_tx, frame_rx) = mpsc::channel(100);
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();
        let (stop_tx, stop_rx) = std::sync::mpsc::channel();
        let fragment_ms = self.config.fragment_ms;

        let handle = std::thread::spawn(move || {
            run_capture(fragment_ms, frame_tx, ready_tx, stop_rx);
        });

        // Wait for the stream to come up (or fail) without blocking the runtime
        let ready = tokio::task::spawn_blocking(move || ready_rx.recv())
            .await
            .map_err(|e| TutorError::AudioStream(format!("capture startup task failed: {}", e)))?;

        match ready {
            Ok(Ok(())) => {
                self.worker = Some(CaptureWorker { stop_tx, handle });
                Ok(frame_rx)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(TutorError::Permission(
                    "capture thread exited before the stream was ready".to_string(),
                ))
            }
        }
    }

    async fn stop(&mut self) -> TutorResult<()> {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let joined = tokio::task::spawn_blocking(move || worker.handle.join())
                .await
                .map_err(|e| TutorError::AudioStream(format!("capture stop task failed: {}", e)))?;
            if joined.is_err() {
                warn!("Capture thread panicked during shutdown");
            }
            info!("Microphone released");
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.worker.is_some()
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

/// Thread body: owns the cpal stream for the session's lifetime.
fn run_capture(
    fragment_ms: u64,
    frame_tx: mpsc::Sender<AudioFrame>,
    ready_tx: std::sync::mpsc::Sender<TutorResult<()>>,
    stop_rx: std::sync::mpsc::Receiver<()>,
) {
    let stream = match build_stream(fragment_ms, frame_tx) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(TutorError::AudioStream(e.to_string())));
        return;
    }

    let _ = ready_tx.send(Ok(()));

    // Block until stop (or the backend is dropped); dropping the stream
    // releases the device.
    let _ = stop_rx.recv();
    drop(stream);
}

fn build_stream(
    fragment_ms: u64,
    frame_tx: mpsc::Sender<AudioFrame>,
) -> TutorResult<cpal::Stream> {
    let device = cpal::default_host()
        .default_input_device()
        .ok_or_else(|| TutorError::Permission("no audio input device available".to_string()))?;

    info!(
        "Using input device: {}",
        device.name().unwrap_or_else(|_| "unknown".to_string())
    );

    let supported = device
        .default_input_config()
        .map_err(|e| TutorError::Permission(format!("failed to query input device: {}", e)))?;

    let sample_format = supported.sample_format();
    let stream_config: cpal::StreamConfig = supported.into();
    let sample_rate = stream_config.sample_rate.0;
    let channels = stream_config.channels;
    let fragment_len =
        ((sample_rate as u64 * fragment_ms / 1000) as usize * channels as usize).max(1);

    let err_fn = |err| warn!("Audio stream error: {}", err);

    let stream = match sample_format {
        cpal::SampleFormat::F32 => device.build_input_stream(
            &stream_config,
            {
                let mut batcher =
                    FragmentBatcher::new(fragment_len, sample_rate, channels, frame_tx);
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    batcher.extend(
                        data.iter()
                            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16),
                    );
                }
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::I16 => device.build_input_stream(
            &stream_config,
            {
                let mut batcher =
                    FragmentBatcher::new(fragment_len, sample_rate, channels, frame_tx);
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    batcher.extend(data.iter().copied());
                }
            },
            err_fn,
            None,
        ),
        other => {
            return Err(TutorError::AudioStream(format!(
                "unsupported input sample format: {:?}",
                other
            )))
        }
    }
    .map_err(|e| TutorError::Permission(format!("failed to open input stream: {}", e)))?;

    Ok(stream)
}

/// Accumulates callback samples into fragment-sized frames.
struct FragmentBatcher {
    buffer: Vec<i16>,
    fragment_len: usize,
    sample_rate: u32,
    channels: u16,
    started: Instant,
    tx: mpsc::Sender<AudioFrame>,
}

impl FragmentBatcher {
    fn new(
        fragment_len: usize,
        sample_rate: u32,
        channels: u16,
        tx: mpsc::Sender<AudioFrame>,
    ) -> Self {
        Self {
            buffer: Vec::with_capacity(fragment_len),
            fragment_len,
            sample_rate,
            channels,
            started: Instant::now(),
            tx,
        }
    }

    fn extend(&mut self, samples: impl Iterator<Item = i16>) {
        for sample in samples {
            self.buffer.push(sample);
            if self.buffer.len() >= self.fragment_len {
                self.flush();
            }
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let frame = AudioFrame {
            samples: std::mem::take(&mut self.buffer),
            sample_rate: self.sample_rate,
            channels: self.channels,
            timestamp_ms: self.started.elapsed().as_millis() as u64,
        };

        // try_send: the audio callback must never block
        if self.tx.try_send(frame).is_err() {
            warn!("Audio fragment dropped (receiver full or gone)");
        }

        self.buffer.reserve(self.fragment_len);
    }
}
