//! Encoder sinks.
//!
//! Sinks consume composited frames in timeline order and are driven by
//! [`ExportDriver`](crate::export::driver::ExportDriver).

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Frame sink trait and the in-memory sink.
pub mod sink;
