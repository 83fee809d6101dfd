use std::path::Path;

use crate::audio::envelope::{AudioMode, GainEnvelope};
use crate::audio::track::AudioTrack;
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};

/// How the soundtrack is laid under an export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundtrackPlan {
    pub mode: AudioMode,
    /// Track position heard at show time 0.
    pub start_offset_secs: f64,
    pub envelope: GainEnvelope,
}

/// Render `frame_count` frames worth of soundtrack as interleaved PCM at `sample_rate`.
///
/// The output sample clock is derived from `fps` exactly like frame timestamps are, so the encoded
/// audio stays aligned with video for any export length. `Loop` wraps the track; `FadeOut` plays it
/// once and leaves silence after it ends.
pub fn render_soundtrack(
    track: &AudioTrack,
    plan: &SoundtrackPlan,
    fps: Fps,
    frame_count: u64,
    sample_rate: u32,
    channels: u16,
) -> Vec<f32> {
    let total = frame_to_sample(frame_count, fps, sample_rate) as usize;
    let out_ch = usize::from(channels.max(1));
    let mut out = vec![0.0f32; total * out_ch];

    let src = track.samples.as_ref();
    let src_ch = usize::from(track.channels);
    let src_frames = track.frames();
    if src_frames == 0 || sample_rate == 0 {
        return out;
    }
    let track_secs = track.duration_secs();

    for i in 0..total {
        let t = i as f64 / f64::from(sample_rate);
        let mut src_sec = plan.start_offset_secs + t;
        match plan.mode {
            AudioMode::Loop => src_sec = src_sec.rem_euclid(track_secs),
            AudioMode::FadeOut => {
                if src_sec >= track_secs {
                    break;
                }
            }
        }

        let src_pos = src_sec * f64::from(track.sample_rate);
        if !src_pos.is_finite() || src_pos < 0.0 {
            break;
        }
        let f0 = (src_pos.floor() as usize).min(src_frames - 1);
        let f1 = match plan.mode {
            AudioMode::Loop => (f0 + 1) % src_frames,
            AudioMode::FadeOut => (f0 + 1).min(src_frames - 1),
        };
        let frac = (src_pos - src_pos.floor()) as f32;
        let gain = plan.envelope.gain_at(t);

        for c in 0..out_ch {
            let sc = c.min(src_ch - 1);
            let v0 = src[f0 * src_ch + sc];
            let v1 = src[f1 * src_ch + sc];
            let v = v0 + (v1 - v0) * frac;
            out[i * out_ch + c] = (v * gain).clamp(-1.0, 1.0);
        }
    }
    out
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::audio_setup(format!(
                "failed to create audio staging directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::audio_setup(format!(
            "failed to write soundtrack file '{}': {e}",
            out_path.display()
        ))
    })
}

/// Convert a frame count to the nearest sample count at `sample_rate`.
pub fn frame_to_sample(frames: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frames) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num.max(1));
    ((num + (den / 2)) / den) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/render.rs"]
mod tests;
