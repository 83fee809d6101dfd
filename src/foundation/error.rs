pub type ReelResult<T> = Result<T, ReelError>;

/// Failure taxonomy of the export pipeline.
///
/// Audio-only failures (`Decode` of a track, `Timeout`, `AudioSetup`) are recovered by the export
/// driver and surfaced as warnings; everything touching frame production or the encoder is fatal.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Inputs that must never start an export (zero slides, bad durations, bad canvas).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An image or audio source could not be read or decoded.
    #[error("decode failure: {0}")]
    Decode(String),

    /// A bounded wait (audio readiness) elapsed.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The encoder sink rejected a frame or failed to finalize.
    #[error("encoder failure: {0}")]
    Encoder(String),

    /// Audio staging for the encoder could not be set up.
    #[error("audio setup failure: {0}")]
    AudioSetup(String),

    /// Frame rendering broke an internal invariant.
    #[error("render failure: {0}")]
    Render(String),

    /// The export was aborted through its cancel token.
    #[error("export cancelled")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder(msg.into())
    }

    pub fn audio_setup(msg: impl Into<String>) -> Self {
        Self::AudioSetup(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Whether the export may continue in a degraded mode after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::Timeout(_) | Self::AudioSetup(_)
        )
    }
}
