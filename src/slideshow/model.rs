use crate::foundation::error::{ReelError, ReelResult};

/// Stable identity of a slide, independent of its position in the show.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SlideId(pub String);

impl SlideId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SlideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Camera-like motion applied across a slide's steady display time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    #[default]
    None,
    ZoomIn,
    ZoomOut,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    Rotate,
}

impl MotionKind {
    pub const ALL: [MotionKind; 8] = [
        MotionKind::None,
        MotionKind::ZoomIn,
        MotionKind::ZoomOut,
        MotionKind::PanLeft,
        MotionKind::PanRight,
        MotionKind::PanUp,
        MotionKind::PanDown,
        MotionKind::Rotate,
    ];
}

/// Transition selector as stored by the editor.
///
/// Only a linear alpha cross-fade is rendered; the other values are kept so projects round-trip
/// and the UI can show the user's choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionEffect {
    #[default]
    Fade,
    Slide,
    ZoomIn,
    ZoomOut,
}

/// One still image plus its assigned motion effect.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slide {
    pub id: SlideId,
    /// Image reference, relative to the project's assets root.
    pub source: String,
    #[serde(default)]
    pub motion: MotionKind,
}

impl Slide {
    pub fn new(id: impl Into<String>, source: impl Into<String>, motion: MotionKind) -> Self {
        Self {
            id: SlideId::new(id),
            source: source.into(),
            motion,
        }
    }

    /// Reassign the motion effect; the only mutation a slide supports.
    pub fn set_motion(&mut self, motion: MotionKind) {
        self.motion = motion;
    }
}

/// Timing settings shared by every slide.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Steady display time per slide, seconds (> 0).
    pub slide_duration_secs: f64,
    /// Cross-fade time between consecutive slides, seconds (>= 0).
    #[serde(default)]
    pub transition_duration_secs: f64,
    #[serde(default)]
    pub transition_effect: TransitionEffect,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slide_duration_secs: 4.0,
            transition_duration_secs: 1.0,
            transition_effect: TransitionEffect::Fade,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> ReelResult<()> {
        if !self.slide_duration_secs.is_finite() || self.slide_duration_secs <= 0.0 {
            return Err(ReelError::invalid_input(
                "slide_duration_secs must be finite and > 0",
            ));
        }
        if !self.transition_duration_secs.is_finite() || self.transition_duration_secs < 0.0 {
            return Err(ReelError::invalid_input(
                "transition_duration_secs must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Repeating unit of the timeline: slide duration plus transition duration.
    pub fn period_secs(&self) -> f64 {
        self.slide_duration_secs + self.transition_duration_secs
    }
}

/// Derived timeline of a show; never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    pub slide_count: usize,
    pub slide_duration_secs: f64,
    pub transition_duration_secs: f64,
    pub period_secs: f64,
    pub total_duration_secs: f64,
}

impl Timeline {
    /// Build the timeline for `slide_count` slides under `settings`.
    pub fn new(settings: &Settings, slide_count: usize) -> ReelResult<Self> {
        settings.validate()?;
        if slide_count == 0 {
            return Err(ReelError::invalid_input(
                "a slideshow needs at least one slide",
            ));
        }
        let period_secs = settings.period_secs();
        Ok(Self {
            slide_count,
            slide_duration_secs: settings.slide_duration_secs,
            transition_duration_secs: settings.transition_duration_secs,
            period_secs,
            total_duration_secs: slide_count as f64 * period_secs,
        })
    }
}
