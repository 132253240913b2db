pub mod backend;
pub mod clip;
pub mod file;
pub mod microphone;

pub use backend::{
    AudioFrame, CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureSource,
};
pub use clip::{AudioClip, CLIP_SAMPLE_RATE};
pub use file::WavFileBackend;
pub use microphone::MicrophoneBackend;
