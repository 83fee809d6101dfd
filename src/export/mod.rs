//! Export orchestration: explicit context, progress reporting, and the frame loop.

pub mod context;
pub mod driver;
pub mod progress;
