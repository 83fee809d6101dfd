//! Audio sync and fade planning.

/// Longest fade-out applied at the end of a show, seconds.
pub const MAX_FADE_SECS: f64 = 2.0;
/// Gain the fade-out ramps down to; a true zero clicks on some decoders.
pub const FADE_FLOOR_GAIN: f32 = 0.001;

/// What the soundtrack does relative to the show length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioMode {
    /// Repeat the track for the whole show at constant gain.
    #[default]
    Loop,
    /// Play the track once and fade it out when the show ends first.
    FadeOut,
}

/// Time-varying gain over the show timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GainEnvelope {
    /// Unity gain throughout.
    Constant,
    /// Unity gain until `start_secs`, then a linear ramp to [`FADE_FLOOR_GAIN`] at `end_secs`.
    FadeOut { start_secs: f64, end_secs: f64 },
}

impl GainEnvelope {
    /// Gain at show time `t_secs`.
    pub fn gain_at(&self, t_secs: f64) -> f32 {
        match *self {
            GainEnvelope::Constant => 1.0,
            GainEnvelope::FadeOut {
                start_secs,
                end_secs,
            } => {
                if t_secs < start_secs {
                    return 1.0;
                }
                if t_secs >= end_secs {
                    return FADE_FLOOR_GAIN;
                }
                let span = end_secs - start_secs;
                if span <= 0.0 {
                    return FADE_FLOOR_GAIN;
                }
                let u = ((t_secs - start_secs) / span) as f32;
                1.0 + (FADE_FLOOR_GAIN - 1.0) * u
            }
        }
    }
}

/// Where in the track playback starts when the show starts at `current_slide`.
///
/// Unknown (non-finite) or empty tracks start at 0.
pub fn compute_start_offset(current_slide: usize, period_secs: f64, track_duration_secs: f64) -> f64 {
    if !track_duration_secs.is_finite() || track_duration_secs <= 0.0 || !period_secs.is_finite() {
        return 0.0;
    }
    let offset = (current_slide as f64 * period_secs).rem_euclid(track_duration_secs);
    if offset.is_finite() { offset } else { 0.0 }
}

/// Plan the gain envelope for a show of `total_secs` over a track of `track_duration_secs`.
///
/// Fade-out only engages when the show is shorter than the track; it lasts
/// `min(MAX_FADE_SECS, transition_duration_secs)` and ends with the show. A fade that would start
/// before 0 spans the whole show.
pub fn plan_envelope(
    mode: AudioMode,
    total_secs: f64,
    track_duration_secs: f64,
    transition_duration_secs: f64,
) -> GainEnvelope {
    match mode {
        AudioMode::Loop => GainEnvelope::Constant,
        AudioMode::FadeOut => {
            if !track_duration_secs.is_finite() || !(total_secs < track_duration_secs) {
                return GainEnvelope::Constant;
            }
            let fade = MAX_FADE_SECS.min(transition_duration_secs.max(0.0));
            let start = total_secs - fade;
            GainEnvelope::FadeOut {
                start_secs: start.max(0.0),
                end_secs: total_secs,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/envelope.rs"]
mod tests;
