use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::assets::image::ImageSource;
use crate::audio::envelope::AudioMode;
use crate::audio::track::AudioSource;
use crate::foundation::core::{Canvas, Fps};
use crate::slideshow::model::{Settings, Slide};

/// Shared flag used to abort an export between frames.
///
/// Clones observe the same flag, so a host can keep one and hand another to the export.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Live-preview audio owned by the host, silenced while an export runs.
pub trait PreviewAudio {
    /// Stop and mute preview playback before export audio starts.
    fn suspend(&mut self);
    /// Return preview playback to its stopped, unmuted state.
    fn restore(&mut self);
}

/// Suspends preview audio for its lifetime and restores it when dropped.
pub(crate) struct PreviewAudioGuard<'a> {
    audio: Option<&'a mut dyn PreviewAudio>,
}

impl<'a> PreviewAudioGuard<'a> {
    pub(crate) fn acquire(audio: Option<&'a mut dyn PreviewAudio>) -> Self {
        let mut guard = Self { audio };
        if let Some(a) = guard.audio.as_deref_mut() {
            a.suspend();
        }
        guard
    }
}

impl Drop for PreviewAudioGuard<'_> {
    fn drop(&mut self) {
        if let Some(a) = self.audio.as_deref_mut() {
            a.restore();
        }
    }
}

/// Removes a staged file when dropped.
pub(crate) struct TempFileGuard(pub(crate) Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Soundtrack attached to an export.
#[derive(Clone)]
pub struct ExportAudio {
    pub source: Arc<dyn AudioSource>,
    pub mode: AudioMode,
}

impl std::fmt::Debug for ExportAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportAudio")
            .field("source", &self.source.describe())
            .field("mode", &self.mode)
            .finish()
    }
}

/// Everything one export reads, passed explicitly through the pipeline.
///
/// Slides and settings are borrowed for the duration of the export and never mutated.
pub struct ExportContext<'a> {
    pub slides: &'a [Slide],
    pub settings: Settings,
    pub canvas: Canvas,
    pub fps: Fps,
    pub images: &'a dyn ImageSource,
    pub audio: Option<ExportAudio>,
    /// Slide the preview was showing; seeds the soundtrack start offset.
    pub start_slide: usize,
    pub cancel: CancelToken,
    pub preview_audio: Option<&'a mut dyn PreviewAudio>,
}

impl<'a> ExportContext<'a> {
    pub fn new(
        slides: &'a [Slide],
        settings: Settings,
        canvas: Canvas,
        fps: Fps,
        images: &'a dyn ImageSource,
    ) -> Self {
        Self {
            slides,
            settings,
            canvas,
            fps,
            images,
            audio: None,
            start_slide: 0,
            cancel: CancelToken::new(),
            preview_audio: None,
        }
    }

    pub fn with_audio(mut self, source: Arc<dyn AudioSource>, mode: AudioMode) -> Self {
        self.audio = Some(ExportAudio { source, mode });
        self
    }

    pub fn with_start_slide(mut self, start_slide: usize) -> Self {
        self.start_slide = start_slide;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_preview_audio(mut self, preview: &'a mut dyn PreviewAudio) -> Self {
        self.preview_audio = Some(preview);
        self
    }
}
