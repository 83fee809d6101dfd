use std::path::Path;

use crate::foundation::error::{ReelError, ReelResult};

/// Sample rate used across decode, soundtrack rendering and encoding.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Decoded interleaved floating-point PCM.
#[derive(Clone, Debug)]
pub struct AudioPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

/// Decode any audio file `ffmpeg` understands to stereo interleaved `f32` PCM at `sample_rate`.
#[cfg(feature = "media-ffmpeg")]
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> ReelResult<AudioPcm> {
    if !path.is_file() {
        return Err(ReelError::decode(format!(
            "audio file '{}' does not exist",
            path.display()
        )));
    }
    let rate = sample_rate.to_string();
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args(["-vn", "-ac", "2", "-ar", rate.as_str()])
        .args(["-acodec", "pcm_f32le", "-f", "f32le", "pipe:1"])
        .output()
        .map_err(|e| ReelError::decode(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(ReelError::decode(format!(
            "ffmpeg could not decode '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32: f32le_to_samples(&out.stdout)?,
    })
}

/// Decode audio from a media file to stereo interleaved `f32` PCM.
///
/// Always fails without the `media-ffmpeg` feature; exports then proceed silently.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn decode_audio_f32_stereo(path: &Path, _sample_rate: u32) -> ReelResult<AudioPcm> {
    Err(ReelError::decode(format!(
        "cannot decode '{}': built without the 'media-ffmpeg' feature",
        path.display()
    )))
}

fn f32le_to_samples(bytes: &[u8]) -> ReelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(ReelError::decode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
