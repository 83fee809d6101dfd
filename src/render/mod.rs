//! Frame buffers and slide compositing.

pub mod backend;
pub mod compositor;
