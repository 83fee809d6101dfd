use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};

/// A frame buffer of RGBA8 pixels, reused across frames.
///
/// Pixels are **premultiplied alpha**; after compositing over the opaque background every pixel
/// has `a == 255`.
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for FrameRGBA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRGBA")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl FrameRGBA {
    /// Allocate a transparent frame of `canvas` size.
    pub fn new(canvas: Canvas) -> ReelResult<Self> {
        let (w, h) = surface_dims(canvas)?;
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// RGBA8 bytes, tightly packed, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Straight RGBA8 value of pixel `(x, y)`; frames are opaque so this equals the stored bytes.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }
}

pub(crate) fn surface_dims(canvas: Canvas) -> ReelResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ReelError::invalid_input("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ReelError::invalid_input("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ReelError::invalid_input("surface width/height must be non-zero"));
    }
    Ok((w, h))
}
