use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::Size;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::slideshow::model::Slide;
use crate::slideshow::project::resolve_asset_path;

/// Decoded slide image, ready to be painted by the rasterizer.
///
/// Cloning is cheap; pixels are shared.
#[derive(Clone)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
    pub(crate) pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for PreparedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PreparedImage {
    /// Build from premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ReelResult<Self> {
        let pixmap = image_premul_bytes_to_pixmap(&rgba8_premul, width, height)?;
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            pixmap: Arc::new(pixmap),
        })
    }

    /// Opaque black 1x1 image used when a slide's image cannot be decoded.
    pub fn placeholder() -> Self {
        let pixel = vello_cpu::peniko::color::PremulRgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        };
        Self {
            width: 1,
            height: 1,
            rgba8_premul: Arc::new(vec![0, 0, 0, 255]),
            pixmap: Arc::new(vello_cpu::Pixmap::from_parts_with_opacity(
                vec![pixel],
                1,
                1,
                false,
            )),
        }
    }

    /// Natural size in pixels.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(self.pixmap.clone()),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into a [`PreparedImage`].
///
/// Images with an edge beyond the rasterizer limit are downscaled to fit, keeping aspect ratio.
pub fn decode_image(bytes: &[u8]) -> ReelResult<PreparedImage> {
    let mut dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ReelError::decode(format!("decode image from memory: {e}")))?;
    let max = u32::from(u16::MAX);
    if dyn_img.width() > max || dyn_img.height() > max {
        dyn_img = dyn_img.resize(max, max, image::imageops::FilterType::Triangle);
    }
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ReelError::decode("image has zero width or height"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage::from_premul_rgba8(width, height, rgba8_premul)
}

/// Provider of decoded slide images.
pub trait ImageSource {
    fn load(&self, slide: &Slide) -> ReelResult<PreparedImage>;
}

/// Loads slide images from files under an assets root.
#[derive(Clone, Debug)]
pub struct FsImageSource {
    pub root: PathBuf,
}

impl FsImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageSource for FsImageSource {
    fn load(&self, slide: &Slide) -> ReelResult<PreparedImage> {
        let path = resolve_asset_path(&self.root, &slide.source)?;
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read image '{}'", path.display()))
            .map_err(|e| ReelError::decode(format!("{e:#}")))?;
        decode_image(&bytes)
    }
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::decode("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::decode("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ReelError::decode("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}
