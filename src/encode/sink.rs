use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] when an export starts.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Declared output frame rate.
    pub fps: Fps,
    /// Soundtrack staged as raw PCM, if the export has one.
    pub audio: Option<AudioInputConfig>,
}

/// Raw PCM soundtrack handed to sinks that encode audio.
#[derive(Debug, Clone)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Result of a finished encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    /// Encoded file on disk; `None` for sinks that keep frames in memory.
    pub path: Option<PathBuf>,
    /// Frames accepted by the sink.
    pub frames: u64,
    /// Whether an audio stream was muxed in.
    pub has_audio: bool,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order between
/// `begin` and `end`. After `abort` the sink must not produce an artifact.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push one frame. The sink copies what it needs; the buffer is reused by the caller.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()>;
    /// Finish the stream and hand back the encoded artifact.
    fn end(&mut self) -> ReelResult<EncodedArtifact>;
    /// Stop without finishing, releasing resources and discarding partial output.
    fn abort(&mut self);
}

/// One frame captured by [`InMemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub idx: FrameIndex,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<CapturedFrame>,
    finished: bool,
    aborted: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames in timeline order.
    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    /// `true` once `end` has succeeded.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `true` if the last stream was aborted.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ReelError::encoder("sink width/height must be non-zero"));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::encoder("in-memory sink not started"))?;
        if let Some(last) = self.frames.last()
            && idx <= last.idx
        {
            return Err(ReelError::encoder(format!(
                "out-of-order frame index {} after {}",
                idx.0, last.idx.0
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::encoder(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.frames.push(CapturedFrame {
            idx,
            data: frame.data().to_vec(),
        });
        Ok(())
    }

    fn end(&mut self) -> ReelResult<EncodedArtifact> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| ReelError::encoder("in-memory sink not started"))?;
        self.finished = true;
        Ok(EncodedArtifact {
            path: None,
            frames: self.frames.len() as u64,
            has_audio: cfg.audio.is_some(),
        })
    }

    fn abort(&mut self) {
        self.cfg = None;
        self.frames.clear();
        self.aborted = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
