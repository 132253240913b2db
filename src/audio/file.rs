use super::backend::{AudioFrame, CaptureBackend, CaptureConfig};
use crate::error::{TutorError, TutorResult};
use hound::WavReader;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::info;

/// Capture backend that replays a WAV file as if it were a live device.
///
/// Used by tests and batch runs; frames are carved to the configured
/// fragment size and the channel closes once the file is exhausted.
pub struct WavFileBackend {
    path: PathBuf,
    config: CaptureConfig,
    capturing: bool,
}

impl WavFileBackend {
    pub fn new(path: impl AsRef<Path>, config: CaptureConfig) -> TutorResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(TutorError::Permission(format!(
                "audio file not found: {}",
                path.display()
            )));
        }

        Ok(Self {
            path,
            config,
            capturing: false,
        })
    }
}

#[async_trait::async_trait]
impl CaptureBackend for WavFileBackend {
    async fn start(&mut self) -> TutorResult<mpsc::Receiver<AudioFrame>> {
        let reader = WavReader::open(&self.path).map_err(|e| {
            TutorError::Permission(format!("failed to open {}: {}", self.path.display(), e))
        })?;

        let spec = reader.spec();
        if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
            return Err(TutorError::AudioStream(format!(
                "expected 16-bit PCM WAV, got {}-bit {:?}",
                spec.bits_per_sample, spec.sample_format
            )));
        }

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| TutorError::AudioStream(format!("failed to read samples: {}", e)))?;

        info!(
            "Replaying audio file: {} ({} samples, {}Hz, {} channels)",
            self.path.display(),
            samples.len(),
            spec.sample_rate,
            spec.channels
        );

        let fragment_ms = self.config.fragment_ms;
        let frame_len = ((spec.sample_rate as u64 * fragment_ms / 1000) as usize
            * spec.channels as usize)
            .max(1);

        let (tx, rx) = mpsc::channel(100);

        tokio::spawn(async move {
            for (index, chunk) in samples.chunks(frame_len).enumerate() {
                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate: spec.sample_rate,
                    channels: spec.channels,
                    timestamp_ms: index as u64 * fragment_ms,
                };

                if tx.send(frame).await.is_err() {
                    break; // Receiver gone
                }
            }
            // Dropping the sender closes the channel, signaling end of capture
        });

        self.capturing = true;
        Ok(rx)
    }

    async fn stop(&mut self) -> TutorResult<()> {
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "wav-file"
    }
}
