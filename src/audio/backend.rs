use crate::error::TutorResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// One buffered fragment of captured audio (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration shared by all capture backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Fragment buffering interval in milliseconds
    #[serde(default = "default_fragment_ms")]
    pub fragment_ms: u64,

    /// Noise suppression hint; honored where the host audio stack supports it
    #[serde(default = "default_true")]
    pub noise_suppression: bool,

    /// Echo cancellation hint; honored where the host audio stack supports it
    #[serde(default = "default_true")]
    pub echo_cancellation: bool,
}

fn default_fragment_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            fragment_ms: default_fragment_ms(),
            noise_suppression: true,
            echo_cancellation: true,
        }
    }
}

/// Audio capture backend trait
///
/// A started backend owns its input device exclusively until `stop` is
/// called; `stop` must release the device and close the frame channel.
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Acquire the device and start capturing audio
    ///
    /// Returns a channel receiver that will receive buffered fragments
    async fn start(&mut self) -> TutorResult<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing and release the device
    async fn stop(&mut self) -> TutorResult<()>;

    /// Check if the backend currently holds the device
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Audio source type
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Default microphone input
    Microphone,
    /// WAV file input (for testing/batch processing)
    File(PathBuf),
}

/// Capture backend factory
pub struct CaptureBackendFactory;

impl CaptureBackendFactory {
    pub fn create(
        source: CaptureSource,
        config: CaptureConfig,
    ) -> TutorResult<Box<dyn CaptureBackend>> {
        match source {
            CaptureSource::Microphone => {
                use super::microphone::MicrophoneBackend;
                Ok(Box::new(MicrophoneBackend::new(config)))
            }
            CaptureSource::File(path) => {
                use super::file::WavFileBackend;
                let backend = WavFileBackend::new(path, config)?;
                Ok(Box::new(backend))
            }
        }
    }
}
