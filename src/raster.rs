//! # Raster
//!
//! The in-memory image every pipeline stage consumes and produces.
//!
//! A [`Raster`] is a width × height pixel grid in one of three color modes:
//!
//! | Mode | Storage | Values |
//! |------|---------|--------|
//! | Grayscale | `GrayImage` | 0-255 luminance |
//! | Rgb | `RgbImage` | 8-bit channels |
//! | Bilevel | `GrayImage` | exactly 0 (black) or 255 (white) |
//!
//! Stages never mutate a raster in place; they build a new one. Decoded
//! images with an alpha channel are flattened onto white paper, since
//! transparent regions of a PNG are expected to print as blank.

use std::borrow::Cow;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Pixel, Rgb, RgbImage, imageops};
use tracing::debug;

use crate::error::{Result, TopstartError};

/// Luminance of paper.
pub const WHITE: u8 = 255;

/// Luminance of a printed dot.
pub const BLACK: u8 = 0;

/// Color mode of a [`Raster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Grayscale,
    Rgb,
    Bilevel,
}

/// Pixel storage behind a raster.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Buffer {
    Luma(GrayImage),
    Rgb(RgbImage),
}

/// A 2D pixel grid with a color mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    buffer: Buffer,
    mode: ColorMode,
}

impl Raster {
    /// Wrap a decoded image.
    ///
    /// 8-bit grayscale stays grayscale and 8-bit RGB stays RGB. Formats with
    /// alpha are composited over white first; every other format is
    /// converted to RGB or grayscale depending on whether it carries color.
    ///
    /// Fails with [`TopstartError::InvalidImage`] when either dimension is 0.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        check_dimensions(image.width(), image.height())?;

        let raster = match image {
            DynamicImage::ImageLuma8(gray) => Self::from_buffer(Buffer::Luma(gray), ColorMode::Grayscale),
            DynamicImage::ImageRgb8(rgb) => Self::from_buffer(Buffer::Rgb(rgb), ColorMode::Rgb),
            wide @ DynamicImage::ImageLuma16(_) => {
                Self::from_buffer(Buffer::Luma(wide.to_luma8()), ColorMode::Grayscale)
            }
            other if other.color().has_alpha() => {
                let flattened = flatten_alpha(&other);
                if other.color().has_color() {
                    Self::from_buffer(Buffer::Rgb(flattened), ColorMode::Rgb)
                } else {
                    let gray = GrayImage::from_fn(flattened.width(), flattened.height(), |x, y| {
                        // All channels are equal for a flattened gray+alpha source.
                        Luma([flattened.get_pixel(x, y)[0]])
                    });
                    Self::from_buffer(Buffer::Luma(gray), ColorMode::Grayscale)
                }
            }
            other => Self::from_buffer(Buffer::Rgb(other.to_rgb8()), ColorMode::Rgb),
        };

        Ok(raster)
    }

    /// Build a grayscale raster.
    pub fn grayscale(image: GrayImage) -> Result<Self> {
        check_dimensions(image.width(), image.height())?;
        Ok(Self::from_buffer(Buffer::Luma(image), ColorMode::Grayscale))
    }

    /// Build an RGB raster.
    pub fn rgb(image: RgbImage) -> Result<Self> {
        check_dimensions(image.width(), image.height())?;
        Ok(Self::from_buffer(Buffer::Rgb(image), ColorMode::Rgb))
    }

    /// Build a bilevel raster. Any pixel that is not 0 or 255 is rejected.
    pub fn bilevel(image: GrayImage) -> Result<Self> {
        check_dimensions(image.width(), image.height())?;
        if let Some(p) = image.pixels().find(|p| p[0] != BLACK && p[0] != WHITE) {
            return Err(TopstartError::InvalidImage(format!(
                "bilevel raster contains luminance {}",
                p[0]
            )));
        }
        Ok(Self::from_buffer(Buffer::Luma(image), ColorMode::Bilevel))
    }

    /// A white raster of the given size.
    pub fn blank(width: u32, height: u32, mode: ColorMode) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self::white(width, height, mode))
    }

    /// White canvas without the dimension check. Zero-height results are
    /// only produced by the offset stage.
    pub(crate) fn white(width: u32, height: u32, mode: ColorMode) -> Self {
        let buffer = match mode {
            ColorMode::Rgb => Buffer::Rgb(RgbImage::from_pixel(width, height, Rgb([WHITE; 3]))),
            ColorMode::Grayscale | ColorMode::Bilevel => {
                Buffer::Luma(GrayImage::from_pixel(width, height, Luma([WHITE])))
            }
        };
        Self { buffer, mode }
    }

    pub(crate) fn from_buffer(buffer: Buffer, mode: ColorMode) -> Self {
        debug_assert!(!(mode == ColorMode::Rgb && matches!(buffer, Buffer::Luma(_))));
        debug_assert!(!(mode != ColorMode::Rgb && matches!(buffer, Buffer::Rgb(_))));
        Self { buffer, mode }
    }

    pub(crate) fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[inline]
    pub fn width(&self) -> u32 {
        match &self.buffer {
            Buffer::Luma(img) => img.width(),
            Buffer::Rgb(img) => img.width(),
        }
    }

    #[inline]
    pub fn height(&self) -> u32 {
        match &self.buffer {
            Buffer::Luma(img) => img.height(),
            Buffer::Rgb(img) => img.height(),
        }
    }

    #[inline]
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// True for the zero-height raster left behind when an offset consumes
    /// the whole image.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Luminance view of the raster.
    ///
    /// Grayscale and bilevel rasters are borrowed; RGB is converted with the
    /// ITU-R 601 weights `(19595 R + 38470 G + 7471 B + 0x8000) >> 16`.
    pub fn to_luma(&self) -> Cow<'_, GrayImage> {
        match &self.buffer {
            Buffer::Luma(img) => Cow::Borrowed(img),
            Buffer::Rgb(img) => Cow::Owned(GrayImage::from_fn(img.width(), img.height(), |x, y| {
                let [r, g, b] = img.get_pixel(x, y).0;
                Luma([luma(r, g, b)])
            })),
        }
    }

    /// Rows `[top, bottom)` as a new raster of the same mode.
    ///
    /// `bottom` is clamped to the height and `top` to `bottom`, so the
    /// result may be zero rows tall.
    pub fn crop_rows(&self, top: u32, bottom: u32) -> Self {
        let bottom = bottom.min(self.height());
        let top = top.min(bottom);
        let buffer = match &self.buffer {
            Buffer::Luma(img) => Buffer::Luma(crop_rows(img, top, bottom)),
            Buffer::Rgb(img) => Buffer::Rgb(crop_rows(img, top, bottom)),
        };
        Self::from_buffer(buffer, self.mode)
    }

    /// Whether the pixel at (x, y) prints as a dot. Only meaningful for
    /// bilevel rasters; other modes compare luminance against 128.
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        match &self.buffer {
            Buffer::Luma(img) => img.get_pixel(x, y)[0] < 128,
            Buffer::Rgb(img) => {
                let [r, g, b] = img.get_pixel(x, y).0;
                luma(r, g, b) < 128
            }
        }
    }

    /// Packed 1-bit rows, MSB first, 1 = black.
    ///
    /// See [`pack_raster`](crate::render::dither::pack_raster).
    pub fn packed_rows(&self) -> Result<Vec<u8>> {
        crate::render::dither::pack_raster(self)
    }

    /// Convert back to an `image` type, e.g. for saving.
    pub fn to_dynamic(&self) -> DynamicImage {
        match &self.buffer {
            Buffer::Luma(img) => DynamicImage::ImageLuma8(img.clone()),
            Buffer::Rgb(img) => DynamicImage::ImageRgb8(img.clone()),
        }
    }

    /// Save as PNG (or any format `image` infers from the extension).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if self.is_empty() {
            return Err(TopstartError::InvalidImage(
                "cannot save a zero-height raster".into(),
            ));
        }
        self.to_dynamic()
            .save(path)
            .map_err(|e| TopstartError::Io(std::io::Error::other(format!(
                "Failed to save {}: {}",
                path.display(),
                e
            ))))
    }
}

/// Decode an image file into a [`Raster`].
///
/// Unreadable or malformed files fail with [`TopstartError::Decode`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<Raster> {
    let path = path.as_ref();
    let image = image::open(path)
        .map_err(|e| TopstartError::Decode(format!("{}: {}", path.display(), e)))?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "Decoded image"
    );
    Raster::from_dynamic(image)
}

/// ITU-R 601 luma, as 8-bit.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((19595 * r as u32 + 38470 * g as u32 + 7471 * b as u32 + 0x8000) >> 16) as u8
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(TopstartError::InvalidImage(format!(
            "dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

fn crop_rows<P>(img: &ImageBuffer<P, Vec<u8>>, top: u32, bottom: u32) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    imageops::crop_imm(img, 0, top, img.width(), bottom - top).to_image()
}

/// Composite an image with alpha over white.
fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + WHITE as u32 * (255 - a) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

// ============================================================================
// TESTS
// ============================================================================
