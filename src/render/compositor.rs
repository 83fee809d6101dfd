//! Frame compositor: paints slides into a reusable frame buffer with `vello_cpu`.

use crate::assets::image::PreparedImage;
use crate::foundation::core::{Affine, Canvas, Size};
use crate::foundation::error::{ReelError, ReelResult};
use crate::motion::transform::transform;
use crate::render::backend::{FrameRGBA, surface_dims};
use crate::slideshow::model::Slide;
use crate::timeline::scheduler::Phase;

/// Opaque black drawn under every frame.
pub const BACKGROUND_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Draws slides into [`FrameRGBA`] buffers.
///
/// Owns one raster context that is reset and reused for every frame.
pub struct Compositor {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
}

impl Compositor {
    pub fn new(canvas: Canvas) -> ReelResult<Self> {
        let (w, h) = surface_dims(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Background fill, then `slide` at `progress` through its motion.
    pub fn render_frame(
        &mut self,
        frame: &mut FrameRGBA,
        slide: &Slide,
        image: &PreparedImage,
        progress: f64,
    ) -> ReelResult<()> {
        self.check_frame(frame)?;
        self.begin();
        self.draw_slide(slide, image, progress, 1.0);
        self.finish(frame);
        Ok(())
    }

    /// Cross-fade: `from` at the end of its motion, then `to` at the start of its motion with
    /// alpha `progress`, both into the same buffer.
    ///
    /// Every configured transition effect renders as this linear cross-fade.
    #[allow(clippy::too_many_arguments)]
    pub fn render_transition(
        &mut self,
        frame: &mut FrameRGBA,
        from: &Slide,
        from_image: &PreparedImage,
        to: &Slide,
        to_image: &PreparedImage,
        progress: f64,
    ) -> ReelResult<()> {
        self.check_frame(frame)?;
        let alpha = if progress.is_finite() {
            progress.clamp(0.0, 1.0) as f32
        } else {
            0.0
        };
        self.begin();
        self.draw_slide(from, from_image, 1.0, 1.0);
        self.draw_slide(to, to_image, 0.0, alpha);
        self.finish(frame);
        Ok(())
    }

    /// Dispatch a scheduler [`Phase`]. Returns `false` (leaving `frame` untouched) for
    /// [`Phase::End`].
    ///
    /// `slides` and `images` are parallel slices indexed by slide position.
    pub fn render_phase(
        &mut self,
        frame: &mut FrameRGBA,
        phase: Phase,
        slides: &[Slide],
        images: &[PreparedImage],
    ) -> ReelResult<bool> {
        if slides.len() != images.len() {
            return Err(ReelError::render(format!(
                "{} slides but {} images",
                slides.len(),
                images.len()
            )));
        }
        let lookup = |i: usize| {
            slides.get(i).zip(images.get(i)).ok_or_else(|| {
                ReelError::render(format!("phase references missing slide {i}"))
            })
        };

        match phase {
            Phase::Steady { slide, progress } => {
                let (s, img) = lookup(slide)?;
                self.render_frame(frame, s, img, progress)?;
                Ok(true)
            }
            Phase::Transitioning { from, to, progress } => {
                let (fs, fi) = lookup(from)?;
                let (ts, ti) = lookup(to)?;
                self.render_transition(frame, fs, fi, ts, ti, progress)?;
                Ok(true)
            }
            Phase::End => Ok(false),
        }
    }

    fn check_frame(&self, frame: &FrameRGBA) -> ReelResult<()> {
        if frame.canvas() != self.canvas {
            return Err(ReelError::render(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.canvas.width, self.canvas.height
            )));
        }
        Ok(())
    }

    fn begin(&mut self) {
        let (w, h) = self.canvas.size_f64();
        let [r, g, b, a] = BACKGROUND_RGBA;
        self.ctx.reset();
        self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    }

    fn draw_slide(&mut self, slide: &Slide, image: &PreparedImage, progress: f64, opacity: f32) {
        if opacity <= 0.0 {
            return;
        }
        let (fw, fh) = self.canvas.size_f64();
        let placement = transform(slide.motion, progress, Size::new(fw, fh), image.size());
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));

        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(placement.affine()));
        self.ctx.set_paint(image.paint());
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
    }

    fn finish(&mut self, frame: &mut FrameRGBA) {
        self.ctx.flush();
        self.ctx.render_to_pixmap(frame.pixmap_mut());
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
