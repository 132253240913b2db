use crate::audio::AudioClip;
use crate::config::TranscriptionModelConfig;
use crate::error::{TutorError, TutorResult};
use std::time::Duration;
use tracing::info;

/// Speech-to-text boundary consumed by the recording state machine
#[async_trait::async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Best-effort transcription of one clip; empty when nothing was
    /// recognized. The clip is consumed by the upload.
    async fn transcribe(&self, clip: AudioClip) -> TutorResult<String>;
}

/// Groq speech-to-text client.
///
/// Multipart WAV upload with a fixed model and language; decoding
/// temperature is pinned to zero for deterministic output.
pub struct GroqTranscription {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    config: TranscriptionModelConfig,
}

impl GroqTranscription {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        config: TranscriptionModelConfig,
    ) -> TutorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TutorError::Transcription(e.to_string()))?;

        let api_base: String = api_base.into();

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            config,
        })
    }
}

#[async_trait::async_trait]
impl TranscriptionBackend for GroqTranscription {
    async fn transcribe(&self, clip: AudioClip) -> TutorResult<String> {
        if clip.is_empty() {
            return Ok(String::new());
        }

        let wav = clip.to_wav_bytes()?;
        info!("Uploading clip for transcription ({} bytes)", wav.len());

        let url = format!("{}/audio/transcriptions", self.api_base);

        let part = reqwest::multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TutorError::Transcription(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("language", self.config.language.clone())
            .text("temperature", "0")
            .text("response_format", "text");

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TutorError::Transcription(format!("request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TutorError::Transcription(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let text = res
            .text()
            .await
            .map_err(|e| TutorError::Transcription(format!("response read failed: {}", e)))?;

        Ok(text.trim().to_string())
    }
}
