//! Soundtrack planning, loading and offline rendering.

pub mod envelope;
pub mod render;
pub mod track;
