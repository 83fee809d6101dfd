//! Motion transform engine.
//!
//! Maps `(motion, progress, frame size, image size)` to an image placement. Everything here is a
//! pure function of its arguments.

use crate::foundation::core::{Affine, Rect, Size, Vec2};
use crate::slideshow::model::MotionKind;

/// Scale held by pans (and the start of zoom-out) so panning never reveals the background.
pub const BASE_SCALE: f64 = 1.15;
/// Scale change across a full zoom.
pub const ZOOM_SPAN: f64 = 0.15;
/// Pan travel as a fraction of the frame dimension.
pub const PAN_SPAN: f64 = 0.1;
/// Scale held while rotating.
pub const ROTATE_SCALE: f64 = 1.2;
/// Total sweep of the rotate motion, degrees.
pub const ROTATE_SWEEP_DEG: f64 = 2.0;

/// Camera parameters for one instant of a motion effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTransform {
    pub scale: f64,
    /// Horizontal offset in frame pixels.
    pub dx: f64,
    /// Vertical offset in frame pixels.
    pub dy: f64,
    pub rotation_rad: f64,
}

impl MotionTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        dx: 0.0,
        dy: 0.0,
        rotation_rad: 0.0,
    };
}

/// Where an image lands in the frame: its scaled cover rect plus a rotation about the frame
/// center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub motion: MotionTransform,
    /// Destination rect before rotation, in frame pixels.
    pub rect: Rect,
    /// Frame center the rotation pivots on.
    pub pivot: Vec2,
    /// Source image size in pixels.
    pub image: Size,
}

impl Placement {
    /// Affine mapping image pixel space into frame pixel space.
    pub fn affine(&self) -> Affine {
        let sx = if self.image.width > 0.0 {
            self.rect.width() / self.image.width
        } else {
            1.0
        };
        let sy = if self.image.height > 0.0 {
            self.rect.height() / self.image.height
        } else {
            1.0
        };
        Affine::translate(self.pivot)
            * Affine::rotate(self.motion.rotation_rad)
            * Affine::translate(-self.pivot)
            * Affine::translate(Vec2::new(self.rect.x0, self.rect.y0))
            * Affine::scale_non_uniform(sx, sy)
    }
}

/// Camera parameters for `motion` at `progress` in `[0, 1]` over a `frame`-sized output.
pub fn motion_at(motion: MotionKind, progress: f64, frame: Size) -> MotionTransform {
    let p = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let panned = |dx: f64, dy: f64| MotionTransform {
        scale: BASE_SCALE,
        dx,
        dy,
        rotation_rad: 0.0,
    };

    match motion {
        MotionKind::None => MotionTransform::IDENTITY,
        MotionKind::ZoomIn => MotionTransform {
            scale: 1.0 + p * ZOOM_SPAN,
            ..MotionTransform::IDENTITY
        },
        MotionKind::ZoomOut => MotionTransform {
            scale: BASE_SCALE - p * ZOOM_SPAN,
            ..MotionTransform::IDENTITY
        },
        MotionKind::PanLeft => panned((0.5 - p) * PAN_SPAN * frame.width, 0.0),
        MotionKind::PanRight => panned((p - 0.5) * PAN_SPAN * frame.width, 0.0),
        MotionKind::PanUp => panned(0.0, (0.5 - p) * PAN_SPAN * frame.height),
        MotionKind::PanDown => panned(0.0, (p - 0.5) * PAN_SPAN * frame.height),
        MotionKind::Rotate => MotionTransform {
            scale: ROTATE_SCALE,
            rotation_rad: (p - 0.5) * ROTATE_SWEEP_DEG.to_radians(),
            ..MotionTransform::IDENTITY
        },
    }
}

/// Size of `image` scaled to cover `frame` exactly (before motion scale).
///
/// Images relatively wider than the frame fit by height; all others fit by width.
pub fn cover_size(frame: Size, image: Size) -> Size {
    if image.width <= 0.0 || image.height <= 0.0 || frame.height <= 0.0 {
        return frame;
    }
    let image_aspect = image.width / image.height;
    let frame_aspect = frame.width / frame.height;
    if image_aspect > frame_aspect {
        Size::new(frame.height * image_aspect, frame.height)
    } else {
        Size::new(frame.width, frame.width / image_aspect)
    }
}

/// Place `image` in `frame` for `motion` at `progress`.
pub fn transform(motion: MotionKind, progress: f64, frame: Size, image: Size) -> Placement {
    let m = motion_at(motion, progress, frame);
    let cover = cover_size(frame, image);
    let w = cover.width * m.scale;
    let h = cover.height * m.scale;
    let x = (frame.width - w) / 2.0 + m.dx;
    let y = (frame.height - h) / 2.0 + m.dy;

    Placement {
        motion: m,
        rect: Rect::new(x, y, x + w, y + h),
        pivot: Vec2::new(frame.width / 2.0, frame.height / 2.0),
        image,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/transform.rs"]
mod tests;
