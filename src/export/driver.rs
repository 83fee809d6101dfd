use std::path::PathBuf;
use std::time::Duration;

use crate::assets::image::PreparedImage;
use crate::assets::media::MIX_SAMPLE_RATE;
use crate::audio::envelope::{compute_start_offset, plan_envelope};
use crate::audio::render::{SoundtrackPlan, render_soundtrack, write_f32le_file};
use crate::audio::track::wait_ready;
use crate::encode::sink::{AudioInputConfig, EncodedArtifact, FrameSink, SinkConfig};
use crate::export::context::{ExportAudio, ExportContext, PreviewAudioGuard, TempFileGuard};
use crate::export::progress::{
    ExportPhase, FrameProgress, ProgressEvent, ProgressObserver, status_line,
};
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::FrameRGBA;
use crate::render::compositor::Compositor;
use crate::slideshow::model::Timeline;

/// Knobs for [`ExportDriver`].
#[derive(Clone, Debug)]
pub struct ExportOpts {
    /// Longest wait for the soundtrack to decode before exporting silently.
    pub audio_ready_timeout: Duration,
    /// Yield the thread after each frame so other work on the host is not starved.
    pub yield_between_frames: bool,
    pub audio_sample_rate: u32,
    pub audio_channels: u16,
    /// Directory for the staged PCM soundtrack; the system temp dir when `None`.
    pub staging_dir: Option<PathBuf>,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            audio_ready_timeout: Duration::from_secs(10),
            yield_between_frames: true,
            audio_sample_rate: MIX_SAMPLE_RATE,
            audio_channels: 2,
            staging_dir: None,
        }
    }
}

/// Summary of a finished export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOutcome {
    pub artifact: EncodedArtifact,
    pub frames: u64,
    /// Timeline length in seconds.
    pub duration_secs: f64,
    /// Recoverable failures the export degraded around.
    pub warnings: Vec<String>,
}

/// Runs exports frame by frame into a [`FrameSink`].
///
/// `Idle -> Initializing -> Rendering -> Finalizing -> Done`; any fatal error moves to `Failed`,
/// aborts the sink, and returns to `Idle`. Frames are produced as fast as the host allows and
/// stamped at `frame / fps`, so render speed never affects playback speed.
#[derive(Debug, Default)]
pub struct ExportDriver {
    opts: ExportOpts,
    phase: ExportPhase,
}

impl ExportDriver {
    pub fn new(opts: ExportOpts) -> Self {
        Self {
            opts,
            phase: ExportPhase::Idle,
        }
    }

    pub fn phase(&self) -> ExportPhase {
        self.phase
    }

    pub fn opts(&self) -> &ExportOpts {
        &self.opts
    }

    /// Export `ctx` into `sink`, reporting to `progress`.
    ///
    /// Zero slides or invalid settings fail before the sink is started. Image failures render a
    /// placeholder and audio failures export silently; both are reported as warnings. Everything
    /// else (compositor, sink, cancellation) is fatal.
    #[tracing::instrument(
        skip_all,
        fields(slides = ctx.slides.len(), width = ctx.canvas.width, height = ctx.canvas.height)
    )]
    pub fn run(
        &mut self,
        ctx: ExportContext<'_>,
        sink: &mut dyn FrameSink,
        progress: &mut dyn ProgressObserver,
    ) -> ReelResult<ExportOutcome> {
        let timeline = match validate(&ctx) {
            Ok(timeline) => timeline,
            Err(e) => {
                tracing::warn!(error = %e, "export rejected");
                progress.on_event(&ProgressEvent::Failed(e.to_string()));
                return Err(e);
            }
        };

        match self.run_validated(ctx, &timeline, sink, progress) {
            Ok(outcome) => {
                self.enter(ExportPhase::Done, progress);
                progress.on_event(&ProgressEvent::Done {
                    frames: outcome.frames,
                });
                tracing::info!(
                    frames = outcome.frames,
                    warnings = outcome.warnings.len(),
                    "export done"
                );
                Ok(outcome)
            }
            Err(e) => {
                sink.abort();
                tracing::error!(error = %e, "export failed");
                self.enter(ExportPhase::Failed, progress);
                progress.on_event(&ProgressEvent::Failed(e.to_string()));
                self.enter(ExportPhase::Idle, progress);
                Err(e)
            }
        }
    }

    fn run_validated(
        &mut self,
        ctx: ExportContext<'_>,
        timeline: &Timeline,
        sink: &mut dyn FrameSink,
        progress: &mut dyn ProgressObserver,
    ) -> ReelResult<ExportOutcome> {
        let ExportContext {
            slides,
            settings: _,
            canvas,
            fps,
            images: image_source,
            audio,
            start_slide,
            cancel,
            preview_audio,
        } = ctx;

        self.enter(ExportPhase::Initializing, progress);
        let _preview = PreviewAudioGuard::acquire(preview_audio);
        let mut warnings = Vec::new();

        let mut images = Vec::with_capacity(slides.len());
        for slide in slides {
            if cancel.is_cancelled() {
                return Err(ReelError::Cancelled);
            }
            match image_source.load(slide) {
                Ok(img) => images.push(img),
                Err(e) => {
                    warn(
                        &mut warnings,
                        progress,
                        format!("slide '{}' renders blank: {e}", slide.id),
                    );
                    images.push(PreparedImage::placeholder());
                }
            }
        }

        let frame_count = timeline.frame_count(fps);
        let mut audio_tmp = TempFileGuard(None);
        let audio_cfg = match audio {
            Some(audio) => match self.stage_soundtrack(
                &audio,
                timeline,
                fps,
                frame_count,
                start_slide,
                &mut audio_tmp,
            ) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    warn(
                        &mut warnings,
                        progress,
                        format!("exporting without audio ({}): {e}", audio.source.describe()),
                    );
                    None
                }
            },
            None => None,
        };
        if cancel.is_cancelled() {
            return Err(ReelError::Cancelled);
        }

        let mut compositor = Compositor::new(canvas)?;
        let mut frame = FrameRGBA::new(canvas)?;
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps,
            audio: audio_cfg,
        })?;

        self.enter(ExportPhase::Rendering, progress);
        let total = timeline.total_duration_secs;
        let mut rendered = 0u64;
        for scheduled in timeline.frame_schedule(fps) {
            if cancel.is_cancelled() {
                tracing::debug!(frame = scheduled.idx.0, "export cancelled");
                return Err(ReelError::Cancelled);
            }
            if !compositor.render_phase(&mut frame, scheduled.phase, slides, &images)? {
                break;
            }
            sink.push_frame(scheduled.idx, &frame)?;
            rendered += 1;

            let slide = scheduled.phase.display_slide().unwrap_or(0);
            let fraction = (fps.frames_to_secs(rendered) / total).min(1.0);
            progress.on_event(&ProgressEvent::Frame(FrameProgress {
                frame: scheduled.idx,
                slide,
                slide_count: slides.len(),
                fraction,
                status: status_line(slide, slides.len(), fraction),
            }));
            if self.opts.yield_between_frames {
                std::thread::yield_now();
            }
        }

        self.enter(ExportPhase::Finalizing, progress);
        let artifact = sink.end()?;
        drop(audio_tmp);

        Ok(ExportOutcome {
            artifact,
            frames: rendered,
            duration_secs: total,
            warnings,
        })
    }

    /// Decode the soundtrack within the readiness bound and stage it as raw PCM for the sink.
    #[allow(clippy::too_many_arguments)]
    fn stage_soundtrack(
        &self,
        audio: &ExportAudio,
        timeline: &Timeline,
        fps: Fps,
        frame_count: u64,
        start_slide: usize,
        staged: &mut TempFileGuard,
    ) -> ReelResult<AudioInputConfig> {
        let track = wait_ready(audio.source.clone(), self.opts.audio_ready_timeout).into_result()?;
        let track_secs = track.duration_secs();
        let plan = SoundtrackPlan {
            mode: audio.mode,
            start_offset_secs: compute_start_offset(start_slide, timeline.period_secs, track_secs),
            envelope: plan_envelope(
                audio.mode,
                timeline.total_duration_secs,
                track_secs,
                timeline.transition_duration_secs,
            ),
        };
        tracing::debug!(?plan, track_secs, "soundtrack planned");

        let samples = render_soundtrack(
            &track,
            &plan,
            fps,
            frame_count,
            self.opts.audio_sample_rate,
            self.opts.audio_channels,
        );
        let dir = self
            .opts
            .staging_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let path = dir.join(format!(
            "slidereel_audio_{}_{}.f32le",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        staged.0 = Some(path.clone());
        write_f32le_file(&samples, &path)?;

        Ok(AudioInputConfig {
            path,
            sample_rate: self.opts.audio_sample_rate,
            channels: self.opts.audio_channels,
        })
    }

    fn enter(&mut self, phase: ExportPhase, progress: &mut dyn ProgressObserver) {
        tracing::debug!(from = ?self.phase, to = ?phase, "export phase");
        self.phase = phase;
        progress.on_event(&ProgressEvent::Phase(phase));
    }
}

fn warn(warnings: &mut Vec<String>, progress: &mut dyn ProgressObserver, msg: String) {
    tracing::warn!("{msg}");
    progress.on_event(&ProgressEvent::Warning(msg.clone()));
    warnings.push(msg);
}

fn validate(ctx: &ExportContext<'_>) -> ReelResult<Timeline> {
    if ctx.slides.is_empty() {
        return Err(ReelError::invalid_input("cannot export a slideshow with no slides"));
    }
    Fps::new(ctx.fps.num, ctx.fps.den)?;
    ctx.canvas.validate()?;
    if ctx.start_slide >= ctx.slides.len() {
        return Err(ReelError::invalid_input(format!(
            "start slide {} is out of range for {} slides",
            ctx.start_slide,
            ctx.slides.len()
        )));
    }
    Timeline::new(&ctx.settings, ctx.slides.len())
}

#[cfg(test)]
#[path = "../../tests/unit/export/driver.rs"]
mod tests;
