//! Clip assembly and WAV encoding

mod common;

use ai_tutor::audio::{AudioClip, AudioFrame, CLIP_SAMPLE_RATE};
use common::frame;

#[test]
fn from_frames_concatenates_in_order() {
    let frames = vec![
        frame(vec![1, 2], 0),
        frame(vec![], 100),
        frame(vec![3, 4, 5], 200),
    ];

    let clip = AudioClip::from_frames(&frames).unwrap();
    assert_eq!(clip.samples, vec![1, 2, 3, 4, 5]);
    assert_eq!(clip.sample_rate, 16_000);
    assert_eq!(clip.channels, 1);
}

#[test]
fn from_frames_with_no_audio_is_none() {
    assert!(AudioClip::from_frames(&[]).is_none());
    assert!(AudioClip::from_frames(&[frame(vec![], 0)]).is_none());
}

#[test]
fn format_comes_from_first_nonempty_frame() {
    let frames = vec![
        AudioFrame {
            samples: vec![],
            sample_rate: 8_000,
            channels: 1,
            timestamp_ms: 0,
        },
        AudioFrame {
            samples: vec![7, 8],
            sample_rate: 48_000,
            channels: 2,
            timestamp_ms: 100,
        },
    ];

    let clip = AudioClip::from_frames(&frames).unwrap();
    assert_eq!(clip.sample_rate, 48_000);
    assert_eq!(clip.channels, 2);
}

#[test]
fn stereo_is_summed_to_mono() {
    let clip = AudioClip {
        samples: vec![100, 200, -50, 25],
        sample_rate: CLIP_SAMPLE_RATE,
        channels: 2,
    };

    let mono = clip.into_mono_16k();
    assert_eq!(mono.channels, 1);
    assert_eq!(mono.samples, vec![300, -25]);
}

#[test]
fn mono_summing_clamps_instead_of_wrapping() {
    let clip = AudioClip {
        samples: vec![i16::MAX, i16::MAX, i16::MIN, i16::MIN],
        sample_rate: CLIP_SAMPLE_RATE,
        channels: 2,
    };

    let mono = clip.into_mono_16k();
    assert_eq!(mono.samples, vec![i16::MAX, i16::MIN]);
}

#[test]
fn high_rate_audio_is_decimated_to_16k() {
    let clip = AudioClip {
        samples: (0..480).collect(),
        sample_rate: 48_000,
        channels: 1,
    };

    let converted = clip.into_mono_16k();
    assert_eq!(converted.sample_rate, CLIP_SAMPLE_RATE);
    assert_eq!(converted.samples.len(), 160);
    assert_eq!(&converted.samples[..4], &[0, 3, 6, 9]);
}

#[test]
fn uneven_rate_decimation_stamps_the_true_rate() {
    // 44.1 kHz halves to 22.05 kHz; the header must say so, or the clip
    // plays slow at the transcription end
    let clip = AudioClip {
        samples: vec![0; 44_100],
        sample_rate: 44_100,
        channels: 1,
    };

    let converted = clip.into_mono_16k();
    assert_eq!(converted.samples.len(), 22_050);
    assert_eq!(converted.sample_rate, 22_050);
    assert!((converted.duration_seconds() - 1.0).abs() < 1e-9);
}

#[test]
fn mono_16k_audio_passes_through_unchanged() {
    let clip = AudioClip {
        samples: vec![1, 2, 3],
        sample_rate: CLIP_SAMPLE_RATE,
        channels: 1,
    };

    let converted = clip.clone().into_mono_16k();
    assert_eq!(converted.samples, clip.samples);
}

#[test]
fn duration_accounts_for_rate_and_channels() {
    let clip = AudioClip {
        samples: vec![0; 32_000],
        sample_rate: 16_000,
        channels: 2,
    };
    assert!((clip.duration_seconds() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn wav_bytes_carry_a_valid_pcm_header() {
    let clip = AudioClip {
        samples: vec![0, 1, -1, 1000],
        sample_rate: 16_000,
        channels: 1,
    };

    let wav = clip.to_wav_bytes().unwrap();

    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");

    // Channel count and sample rate from the fmt chunk
    assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 1);
    assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), 16_000);

    // Readable back with the same samples
    let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
    let samples: Vec<i16> = reader.into_samples().map(Result::unwrap).collect();
    assert_eq!(samples, vec![0, 1, -1, 1000]);
}
