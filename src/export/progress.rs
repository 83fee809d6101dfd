use crate::foundation::core::FrameIndex;

/// Lifecycle of an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExportPhase {
    #[default]
    Idle,
    Initializing,
    Rendering,
    Finalizing,
    Done,
    Failed,
}

/// Per-frame progress report.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameProgress {
    pub frame: FrameIndex,
    /// Slide reported to the user (the outgoing slide during a transition).
    pub slide: usize,
    pub slide_count: usize,
    /// Fraction of the timeline rendered, `elapsed / total` in `[0, 1]`.
    pub fraction: f64,
    /// Human-readable status, see [`status_line`].
    pub status: String,
}

/// Events emitted by [`ExportDriver`](crate::export::driver::ExportDriver).
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    Phase(ExportPhase),
    Frame(FrameProgress),
    /// A recoverable failure the export degraded around.
    Warning(String),
    Done { frames: u64 },
    Failed(String),
}

/// Receiver of export progress.
pub trait ProgressObserver {
    fn on_event(&mut self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&ProgressEvent),
{
    fn on_event(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_event(&mut self, _event: &ProgressEvent) {}
}

/// `"<slide+1> of <count> (<percent>%)"`, percent rounded to a whole number.
pub fn status_line(slide: usize, slide_count: usize, fraction: f64) -> String {
    let pct = if fraction.is_finite() {
        (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
    } else {
        0
    };
    format!("{} of {} ({pct}%)", slide + 1, slide_count)
}
