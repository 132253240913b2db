//! Recording state machine
//!
//! This module provides the `Recorder` abstraction that manages:
//! - Exclusive microphone acquisition via a capture backend
//! - Fragment buffering on a fixed interval
//! - The record/stop/cancel lifecycle
//! - Clip finalization and hand-off to the transcription client

mod recorder;

pub use recorder::{Recorder, RecorderState};
pub(crate) use recorder::RecorderWatch;
