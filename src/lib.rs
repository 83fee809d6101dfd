//! Slidereel renders still-image slideshows into video.
//!
//! The export pipeline is a single producer:
//!
//! - [`Timeline`] locates each frame instant as a steady slide or a cross-fade ([`Phase`])
//! - [`Compositor`] draws the slide(s) with their motion into a reused [`FrameRGBA`]
//! - [`ExportDriver`] pushes frames into a [`FrameSink`] and stages the soundtrack alongside
#![forbid(unsafe_code)]

pub mod assets;
pub mod audio;
pub mod encode;
pub mod export;
pub mod foundation;
pub mod motion;
pub mod render;
pub mod slideshow;
pub mod timeline;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Size, Vec2};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::image::{FsImageSource, ImageSource, PreparedImage, decode_image};
pub use crate::audio::envelope::{AudioMode, GainEnvelope, compute_start_offset, plan_envelope};
pub use crate::audio::track::{AudioSource, AudioTrack, FileAudioSource, MemoryAudioSource};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{
    AudioInputConfig, CapturedFrame, EncodedArtifact, FrameSink, InMemorySink, SinkConfig,
};
pub use crate::export::context::{CancelToken, ExportContext, PreviewAudio};
pub use crate::export::driver::{ExportDriver, ExportOpts, ExportOutcome};
pub use crate::export::progress::{
    ExportPhase, NoProgress, ProgressEvent, ProgressObserver, status_line,
};
pub use crate::motion::transform::{MotionTransform, Placement, transform};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::compositor::Compositor;
pub use crate::slideshow::model::{MotionKind, Settings, Slide, SlideId, Timeline, TransitionEffect};
pub use crate::slideshow::project::{AudioSpec, SlideshowProject};
pub use crate::timeline::scheduler::{Phase, PreviewCursor, locate};
