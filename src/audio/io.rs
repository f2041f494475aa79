//! Audio decode boundary
//!
//! Turns a WAV byte source into a [`PcmBuffer`]. This is the upstream
//! "decode" collaborator of the scheduler: callers decode before building a
//! timeline, and a decode failure is surfaced once, never retried here.
//!
//! Buffers keep their source sample rate; rate conversion, if any, belongs
//! to the playback device.

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::audio::buffer::PcmBuffer;
use crate::error::{CuelineError, Result};

/// Import a WAV file as a decoded PCM buffer
///
/// Reads the file, converts all supported sample formats to 32-bit float,
/// and de-interleaves into per-channel storage.
///
/// # Arguments
/// * `path` - Path to the WAV file
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a readable WAV file
/// * `UnsupportedFormat` - If the bit depth is not 8/16/24/32
/// * `EmptyAudio` - If the file contains no samples
pub fn import_wav(path: &Path) -> Result<PcmBuffer> {
    if !path.exists() {
        return Err(CuelineError::FileNotFound {
            path: path.display().to_string(),
            source: None,
        });
    }

    let reader = WavReader::open(path).map_err(|e| CuelineError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    let samples_f32 = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

    if samples_f32.is_empty() || channels == 0 {
        return Err(CuelineError::EmptyAudio);
    }

    PcmBuffer::from_channels(deinterleave(&samples_f32, channels), sample_rate)
}

/// Import a WAV file on a blocking worker thread
///
/// Async wrapper over [`import_wav`] for callers that decode while a UI or
/// event loop stays responsive. The scheduler itself never awaits decode;
/// buffers must be resolved before `play()`.
#[cfg(feature = "async-decode")]
pub async fn import_wav_async(path: std::path::PathBuf) -> Result<PcmBuffer> {
    tokio::task::spawn_blocking(move || import_wav(&path))
        .await
        .map_err(|e| CuelineError::InvalidAudio {
            reason: format!("Decode task failed: {}", e),
            source: None,
        })?
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// Read samples from a WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| CuelineError::InvalidAudio {
                reason: format!("Failed to read float samples: {}", e),
                source: Some(Box::new(e)),
            }),
        SampleFormat::Int => match bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| CuelineError::InvalidAudio {
                    reason: format!("Failed to read 8-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| CuelineError::InvalidAudio {
                    reason: format!("Failed to read 16-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            24 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 8388608.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| CuelineError::InvalidAudio {
                    reason: format!("Failed to read 24-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| CuelineError::InvalidAudio {
                    reason: format!("Failed to read 32-bit int samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            _ => Err(CuelineError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits_per_sample),
            }),
        },
    }
}

/// De-interleave samples from [L,R,L,R,...] to [[L,L,...], [R,R,...]]
fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut result = vec![Vec::with_capacity(frames); channels];

    for (i, sample) in samples.iter().enumerate() {
        result[i % channels].push(*sample);
    }

    result
}
