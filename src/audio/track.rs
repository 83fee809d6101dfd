use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crate::assets::media::{self, decode_audio_f32_stereo};
use crate::foundation::error::{ReelError, ReelResult};

/// A decoded, seekable soundtrack.
#[derive(Clone, Debug)]
pub struct AudioTrack {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples.
    pub samples: Arc<Vec<f32>>,
}

impl AudioTrack {
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> ReelResult<Self> {
        if sample_rate == 0 || channels == 0 {
            return Err(ReelError::decode(
                "audio track needs a non-zero sample rate and channel count",
            ));
        }
        if !samples.len().is_multiple_of(usize::from(channels)) {
            return Err(ReelError::decode(
                "audio sample count is not a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            samples: Arc::new(samples),
        })
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    /// Track length in seconds; `NaN` when the length is unknown.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return f64::NAN;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Provider of a soundtrack, opened off the render thread.
pub trait AudioSource: Send + Sync {
    /// Human-readable name for logs and warnings.
    fn describe(&self) -> String;
    /// Load and decode the whole track.
    fn open(&self) -> ReelResult<AudioTrack>;
}

/// Audio file decoded through `ffmpeg` at [`media::MIX_SAMPLE_RATE`].
#[derive(Clone, Debug)]
pub struct FileAudioSource {
    pub path: PathBuf,
}

impl AudioSource for FileAudioSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> ReelResult<AudioTrack> {
        let pcm = decode_audio_f32_stereo(&self.path, media::MIX_SAMPLE_RATE)?;
        AudioTrack::new(pcm.sample_rate, pcm.channels, pcm.interleaved_f32)
    }
}

/// In-memory source, mostly for tests and hosts that decode audio themselves.
#[derive(Clone, Debug)]
pub struct MemoryAudioSource(pub AudioTrack);

impl AudioSource for MemoryAudioSource {
    fn describe(&self) -> String {
        format!(
            "in-memory track ({:.2}s @ {} Hz)",
            self.0.duration_secs(),
            self.0.sample_rate
        )
    }

    fn open(&self) -> ReelResult<AudioTrack> {
        Ok(self.0.clone())
    }
}

/// Outcome of waiting for a soundtrack.
#[derive(Debug)]
pub enum AudioReadiness {
    Ready(AudioTrack),
    Failed(ReelError),
    TimedOut,
}

impl AudioReadiness {
    /// Collapse into a result, turning a timeout into [`ReelError::Timeout`].
    pub fn into_result(self) -> ReelResult<AudioTrack> {
        match self {
            AudioReadiness::Ready(track) => Ok(track),
            AudioReadiness::Failed(e) => Err(e),
            AudioReadiness::TimedOut => Err(ReelError::timeout(
                "audio track was not ready in time",
            )),
        }
    }
}

/// Open `source` on a helper thread and wait at most `timeout` for it.
///
/// On timeout the helper is detached; its result is dropped when it finishes.
pub fn wait_ready(source: Arc<dyn AudioSource>, timeout: Duration) -> AudioReadiness {
    let (tx, rx) = mpsc::sync_channel::<ReelResult<AudioTrack>>(1);
    let spawned = std::thread::Builder::new()
        .name("slidereel-audio-load".to_string())
        .spawn(move || {
            let _ = tx.send(source.open());
        });
    if let Err(e) = spawned {
        return AudioReadiness::Failed(ReelError::audio_setup(format!(
            "failed to spawn audio loader thread: {e}"
        )));
    }

    match rx.recv_timeout(timeout) {
        Ok(Ok(track)) => AudioReadiness::Ready(track),
        Ok(Err(e)) => AudioReadiness::Failed(e),
        Err(mpsc::RecvTimeoutError::Timeout) => AudioReadiness::TimedOut,
        Err(mpsc::RecvTimeoutError::Disconnected) => AudioReadiness::Failed(ReelError::decode(
            "audio loader stopped without a result",
        )),
    }
}
