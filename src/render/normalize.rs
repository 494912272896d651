//! # Geometry Normalization
//!
//! Fits an arbitrary raster to the print head's fixed width.
//!
//! ```text
//! wider than target     →  Lanczos3 downscale, aspect ratio kept
//! narrower than target  →  pasted onto a white canvas, horizontally centered
//! exactly target        →  unchanged
//! ```
//!
//! Height only changes in the downscale branch:
//! `new_height = round(height × target / width)`.

use image::{ImageBuffer, Luma, Pixel, Rgb, imageops, imageops::FilterType};
use tracing::debug;

use crate::error::{Result, TopstartError};
use crate::raster::{Buffer, ColorMode, Raster, WHITE};

/// Rescale or center `image` to exactly `target_width` pixels wide.
///
/// ## Example
///
/// ```
/// use topstart::raster::{ColorMode, Raster};
/// use topstart::render::normalize::normalize;
///
/// let wide = Raster::blank(500, 1000, ColorMode::Rgb)?;
/// let out = normalize(&wide, 384)?;
/// assert_eq!((out.width(), out.height()), (384, 768));
/// # Ok::<(), topstart::error::TopstartError>(())
/// ```
pub fn normalize(image: &Raster, target_width: u32) -> Result<Raster> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(TopstartError::InvalidImage(format!(
            "cannot normalize a {}x{} image",
            width, height
        )));
    }
    if target_width == 0 {
        return Err(TopstartError::InvalidImage("target width must be > 0".into()));
    }

    debug!(width, height, target_width, "Normalizing image geometry");

    let normalized = if width > target_width {
        let new_height = scaled_height(width, height, target_width);
        debug!(new_width = target_width, new_height, "Scaling down");
        scale_down(image, target_width, new_height)
    } else if width < target_width {
        let offset_x = center_offset(width, target_width);
        debug!(offset_x, "Centering on white canvas");
        center(image, target_width, offset_x)
    } else {
        debug!("Width already matches target");
        image.clone()
    };

    debug!(
        width = normalized.width(),
        height = normalized.height(),
        "Normalized image"
    );
    Ok(normalized)
}

/// Height after scaling `width` down to `target_width`, never below one row.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = (height as f64 * target_width as f64 / width as f64).round();
    (scaled as u32).max(1)
}

/// Left edge of an image of `width` centered in `target_width`.
#[inline]
pub fn center_offset(width: u32, target_width: u32) -> u32 {
    (target_width - width) / 2
}

fn scale_down(image: &Raster, new_width: u32, new_height: u32) -> Raster {
    match image.buffer() {
        // A resampled bilevel image has intermediate grays, so it becomes grayscale.
        Buffer::Luma(img) => Raster::from_buffer(
            Buffer::Luma(imageops::resize(img, new_width, new_height, FilterType::Lanczos3)),
            ColorMode::Grayscale,
        ),
        Buffer::Rgb(img) => Raster::from_buffer(
            Buffer::Rgb(imageops::resize(img, new_width, new_height, FilterType::Lanczos3)),
            ColorMode::Rgb,
        ),
    }
}

fn center(image: &Raster, target_width: u32, offset_x: u32) -> Raster {
    let buffer = match image.buffer() {
        Buffer::Luma(img) => Buffer::Luma(paste_on_white(img, target_width, offset_x, Luma([WHITE]))),
        Buffer::Rgb(img) => Buffer::Rgb(paste_on_white(img, target_width, offset_x, Rgb([WHITE; 3]))),
    };
    Raster::from_buffer(buffer, image.mode())
}

fn paste_on_white<P>(
    img: &ImageBuffer<P, Vec<u8>>,
    target_width: u32,
    offset_x: u32,
    white: P,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let mut canvas = ImageBuffer::from_pixel(target_width, img.height(), white);
    imageops::replace(&mut canvas, img, offset_x as i64, 0);
    canvas
}

// ============================================================================
// TESTS
// ============================================================================
