use crate::audio::AudioFrame;
use crate::error::{TutorError, TutorResult};

/// Sample rate Whisper-style transcription models expect
pub const CLIP_SAMPLE_RATE: u32 = 16_000;

/// Finalized audio payload handed to the transcription client.
///
/// Built once from the fragments of a finished recording session and
/// consumed by a single upload; never retained.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}

impl AudioClip {
    /// Concatenate session fragments into one clip.
    ///
    /// Returns `None` when the session produced no audio. Format metadata
    /// comes from the first non-empty fragment.
    pub fn from_frames(frames: &[AudioFrame]) -> Option<Self> {
        let first = frames.iter().find(|f| !f.samples.is_empty())?;
        let sample_rate = first.sample_rate;
        let channels = first.channels;

        let samples: Vec<i16> = frames
            .iter()
            .flat_map(|f| f.samples.iter().copied())
            .collect();

        Some(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }

    /// Convert to the format the transcription model expects: mono,
    /// decimated toward 16 kHz. Rates that are not an integer multiple of
    /// the target (44.1 kHz input) land on the nearest rate decimation can
    /// reach, and the clip is stamped with that true rate.
    pub fn into_mono_16k(self) -> Self {
        self.downmix_to_mono().decimate_to(CLIP_SAMPLE_RATE)
    }

    /// Convert stereo to mono by summing channels
    fn downmix_to_mono(self) -> Self {
        if self.channels == 1 {
            return self;
        }

        if self.channels != 2 {
            return self; // Only support stereo -> mono
        }

        let mut mono_samples = Vec::with_capacity(self.samples.len() / 2);

        // Sum left and right channels (no division to preserve volume)
        for chunk in self.samples.chunks_exact(2) {
            let left = chunk[0] as i32;
            let right = chunk[1] as i32;
            let sum = left + right;
            mono_samples.push(sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16);
        }

        Self {
            samples: mono_samples,
            sample_rate: self.sample_rate,
            channels: 1,
        }
    }

    /// Downsample by decimation
    fn decimate_to(self, target_rate: u32) -> Self {
        if self.sample_rate == target_rate {
            return self;
        }

        let ratio = self.sample_rate / target_rate;
        if ratio <= 1 {
            return self; // Can't upsample
        }

        let downsampled: Vec<i16> = self
            .samples
            .iter()
            .step_by(ratio as usize)
            .copied()
            .collect();

        // Keeping every ratio-th sample divides the rate by the whole
        // ratio, not necessarily down to target_rate (44100/2 = 22050);
        // the header must carry the rate the samples actually have.
        Self {
            samples: downsampled,
            sample_rate: self.sample_rate / ratio,
            channels: self.channels,
        }
    }

    /// Encode as 16-bit PCM WAV for the transcription upload
    pub fn to_wav_bytes(&self) -> TutorResult<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| TutorError::AudioStream(format!("WAV encode failed: {}", e)))?;

            for &sample in &self.samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| TutorError::AudioStream(format!("WAV encode failed: {}", e)))?;
            }

            writer
                .finalize()
                .map_err(|e| TutorError::AudioStream(format!("WAV encode failed: {}", e)))?;
        }

        Ok(cursor.into_inner())
    }
}
