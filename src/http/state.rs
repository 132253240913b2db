use crate::audio::CaptureConfig;
use crate::chat::ChatController;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single conversation controller for this process
    pub controller: Arc<ChatController>,

    /// Capture settings applied when a recording starts
    pub capture: CaptureConfig,
}

impl AppState {
    pub fn new(controller: Arc<ChatController>, capture: CaptureConfig) -> Self {
        Self {
            controller,
            capture,
        }
    }
}
