//! # Vertical Offset
//!
//! Manual correction for printers that start feeding a little early or
//! late. The offset is given in millimeters and converted with the
//! device's pixel density.
//!
//! | Offset | Effect |
//! |--------|--------|
//! | `> 0` | white rows added above the image (content moves down) |
//! | `< 0` | rows removed from the top (content moves up) |
//! | `0` | unchanged |
//!
//! Removing at least as many rows as the image has leaves an empty,
//! zero-height raster of the same width and mode. Nothing is printed for
//! it, but the job framing is still emitted.

use image::{ImageBuffer, Luma, Pixel, Rgb, imageops};
use tracing::{debug, warn};

use crate::error::{Result, TopstartError};
use crate::printer::{PixelDensity, PrintGeometry, PrinterConfig};
use crate::raster::{Buffer, Raster, WHITE};

/// Shift `image` vertically by `offset_mm`.
///
/// The result may be at most one full default roll long
/// ([`PrinterConfig::THERMAL_58MM`] at `density`). Use
/// [`apply_offset_within`] for another limit.
///
/// ## Errors
///
/// - [`TopstartError::Config`] if the offset is NaN or infinite
/// - [`TopstartError::ImageTooTall`] if the padded image would exceed the roll
///
/// ## Example
///
/// ```
/// use topstart::printer::PixelDensity;
/// use topstart::raster::{ColorMode, Raster};
/// use topstart::render::offset::apply_offset;
///
/// let img = Raster::blank(384, 100, ColorMode::Grayscale)?;
/// let down = apply_offset(&img, 2.0, PixelDensity::DOTS_8_PER_MM)?;
/// assert_eq!(down.height(), 116);
///
/// let up = apply_offset(&img, -2.0, PixelDensity::DOTS_8_PER_MM)?;
/// assert_eq!(up.height(), 84);
/// # Ok::<(), topstart::error::TopstartError>(())
/// ```
pub fn apply_offset(image: &Raster, offset_mm: f32, density: PixelDensity) -> Result<Raster> {
    let roll = PrintGeometry {
        width_px: image.width(),
        max_length_mm: PrinterConfig::THERMAL_58MM.max_paper_length_mm,
    };
    apply_offset_within(image, offset_mm, density, roll.max_height_px(density))
}

/// [`apply_offset`] with an explicit limit on the resulting height.
pub fn apply_offset_within(
    image: &Raster,
    offset_mm: f32,
    density: PixelDensity,
    max_height: u32,
) -> Result<Raster> {
    if !offset_mm.is_finite() {
        return Err(TopstartError::Config(format!(
            "offset must be a finite number of millimeters, got {}",
            offset_mm
        )));
    }

    let offset_px = density.mm_to_px(offset_mm);
    shift_rows(image, offset_px, max_height)
}

/// Shift `image` vertically by a signed number of rows.
///
/// Padding is checked against `max_height` before anything is allocated.
/// Fails with [`TopstartError::ImageTooTall`] if the result would be taller.
pub fn shift_rows(image: &Raster, offset_px: i64, max_height: u32) -> Result<Raster> {
    let height = image.height();

    if offset_px == 0 {
        return Ok(image.clone());
    }

    if offset_px > 0 {
        let new_height = (height as i64).saturating_add(offset_px);
        if new_height > max_height as i64 {
            return Err(TopstartError::ImageTooTall {
                height: u32::try_from(new_height).unwrap_or(u32::MAX),
                max: max_height,
            });
        }
        // new_height fits in u32, so does the row count
        let rows = (new_height - height as i64) as u32;
        debug!(rows, "Adding blank lead-in");
        return Ok(pad_top(image, rows));
    }

    let rows = offset_px.unsigned_abs();
    if rows < height as u64 {
        debug!(rows, "Removing lead-in rows");
        Ok(image.crop_rows(rows as u32, height))
    } else {
        warn!(
            rows,
            height, "Offset removes the whole image, nothing will be printed"
        );
        Ok(image.crop_rows(height, height))
    }
}

fn pad_top(image: &Raster, rows: u32) -> Raster {
    let buffer = match image.buffer() {
        Buffer::Luma(img) => Buffer::Luma(pad_buffer(img, rows, Luma([WHITE]))),
        Buffer::Rgb(img) => Buffer::Rgb(pad_buffer(img, rows, Rgb([WHITE; 3]))),
    };
    Raster::from_buffer(buffer, image.mode())
}

fn pad_buffer<P>(img: &ImageBuffer<P, Vec<u8>>, rows: u32, white: P) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let mut canvas = ImageBuffer::from_pixel(img.width(), img.height() + rows, white);
    imageops::replace(&mut canvas, img, 0, rows as i64);
    canvas
}

// ============================================================================
// TESTS
// ============================================================================
