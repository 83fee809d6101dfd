//! Timeline scheduler: maps render time to the slide(s) on screen.

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::slideshow::model::Timeline;

/// Classification of one timeline instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// A single slide is on screen, `progress` through its motion.
    Steady { slide: usize, progress: f64 },
    /// Cross-fading from `from` into `to`.
    Transitioning {
        from: usize,
        to: usize,
        progress: f64,
    },
    /// The timeline is over; nothing is rendered.
    End,
}

impl Phase {
    /// Slide whose number is reported to the user for this instant.
    pub fn display_slide(&self) -> Option<usize> {
        match *self {
            Phase::Steady { slide, .. } => Some(slide),
            Phase::Transitioning { from, .. } => Some(from),
            Phase::End => None,
        }
    }
}

/// Locate `elapsed_secs` on a timeline of `slide_count` slides.
///
/// The last slide has no successor, so its transition window holds the final motion frame
/// (`Steady { progress: 1.0 }`). Export never wraps: instants at or past
/// `slide_count * period_secs` are [`Phase::End`].
pub fn locate(
    elapsed_secs: f64,
    period_secs: f64,
    slide_duration_secs: f64,
    transition_duration_secs: f64,
    slide_count: usize,
) -> Phase {
    if slide_count == 0 || !(period_secs > 0.0) || !(slide_duration_secs > 0.0) {
        return Phase::End;
    }
    let elapsed = if elapsed_secs.is_finite() {
        elapsed_secs.max(0.0)
    } else if elapsed_secs == f64::INFINITY {
        return Phase::End;
    } else {
        0.0
    };
    if elapsed >= slide_count as f64 * period_secs {
        return Phase::End;
    }

    let mut index = (elapsed / period_secs).floor() as usize;
    let mut t = elapsed - index as f64 * period_secs;
    if t >= period_secs {
        index += 1;
        t -= period_secs;
    }
    let t = t.max(0.0);
    if index >= slide_count {
        return Phase::End;
    }

    if transition_duration_secs <= 0.0 || t < slide_duration_secs {
        return Phase::Steady {
            slide: index,
            progress: (t / slide_duration_secs).min(1.0),
        };
    }

    let to = index + 1;
    if to >= slide_count {
        return Phase::Steady {
            slide: index,
            progress: 1.0,
        };
    }
    Phase::Transitioning {
        from: index,
        to,
        progress: ((t - slide_duration_secs) / transition_duration_secs).clamp(0.0, 1.0),
    }
}

impl Timeline {
    /// [`locate`] with this timeline's parameters.
    pub fn locate(&self, elapsed_secs: f64) -> Phase {
        locate(
            elapsed_secs,
            self.period_secs,
            self.slide_duration_secs,
            self.transition_duration_secs,
            self.slide_count,
        )
    }

    /// Number of frames an export at `fps` renders: those timestamped before the end.
    pub fn frame_count(&self, fps: Fps) -> u64 {
        fps.frames_before(self.total_duration_secs)
    }

    /// Iterate the frames of an export at `fps`, in order.
    pub fn frame_schedule(&self, fps: Fps) -> FrameSchedule {
        FrameSchedule {
            timeline: *self,
            fps,
            next: 0,
            count: self.frame_count(fps),
        }
    }
}

/// One export frame: its index, simulated timestamp, and what is on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledFrame {
    pub idx: FrameIndex,
    pub elapsed_secs: f64,
    pub phase: Phase,
}

/// Frames of an export, timestamped at `frame / fps` and ending before the timeline's end.
#[derive(Clone, Debug)]
pub struct FrameSchedule {
    timeline: Timeline,
    fps: Fps,
    next: u64,
    count: u64,
}

impl FrameSchedule {
    /// Total frames this schedule yields from the start.
    pub fn total_frames(&self) -> u64 {
        self.count
    }
}

impl Iterator for FrameSchedule {
    type Item = ScheduledFrame;

    fn next(&mut self) -> Option<ScheduledFrame> {
        if self.next >= self.count {
            return None;
        }
        let idx = self.next;
        self.next += 1;
        let elapsed_secs = self.fps.frames_to_secs(idx);
        Some(ScheduledFrame {
            idx: FrameIndex(idx),
            elapsed_secs,
            phase: self.timeline.locate(elapsed_secs),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.count - self.next).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}

/// Index cursor for a live preview player.
///
/// Unlike export, preview wraps: after the last slide it returns to the first, advancing once
/// per `period_secs` while playing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewCursor {
    current: usize,
    slide_count: usize,
    period_secs: f64,
}

impl PreviewCursor {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            current: 0,
            slide_count: timeline.slide_count,
            period_secs: timeline.period_secs,
        }
    }

    /// Jump to `index` (e.g. the user clicked a thumbnail).
    pub fn seek(&mut self, index: usize) -> ReelResult<()> {
        if index >= self.slide_count {
            return Err(ReelError::invalid_input(format!(
                "slide {index} is out of range for {} slides",
                self.slide_count
            )));
        }
        self.current = index;
        Ok(())
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Timer interval between automatic advances.
    pub fn period_secs(&self) -> f64 {
        self.period_secs
    }

    /// Advance to `(current + 1) mod slide_count` and return the new index.
    pub fn advance(&mut self) -> usize {
        self.current = next_index(self.current, self.slide_count);
        self.current
    }
}

/// Successor of `current` in a looping show of `slide_count` slides.
pub fn next_index(current: usize, slide_count: usize) -> usize {
    if slide_count == 0 {
        return 0;
    }
    (current + 1) % slide_count
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/scheduler.rs"]
mod tests;
