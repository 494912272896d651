//! # Monochrome Quantization
//!
//! This module converts grayscale or color rasters to strict bilevel output
//! suitable for a thermal print head, which can only burn a dot or leave
//! the paper white.
//!
//! ## Methods
//!
//! | Method | Speed | Best For | Artifacts |
//! |--------|-------|----------|-----------|
//! | Threshold | Fastest | Text, line art, receipts | Banding on photos |
//! | Dither (Floyd-Steinberg) | Slower | Photos, gradients | Noise, worms |
//!
//! ### Threshold
//!
//! Every pixel is compared against a fixed midpoint:
//!
//! ```text
//! luma < 128  → black (print)
//! luma ≥ 128  → white (no print)
//! ```
//!
//! ### Floyd-Steinberg Error Diffusion
//!
//! Pixels are visited in raster-scan order. Each one is snapped to black or
//! white and the rounding error is pushed onto neighbors that have not been
//! visited yet:
//!
//! ```text
//!              ┌───────┬───────┐
//!              │   *   │ 7/16  │
//!      ┌───────┼───────┼───────┤
//!      │ 3/16  │ 5/16  │ 1/16  │
//!      └───────┴───────┴───────┘
//! ```
//!
//! The local average of the output then tracks the input tone, so gray
//! areas become dot patterns of matching density.
//!
//! ## Bit Packing
//!
//! ```
//! use topstart::render::dither;
//!
//! // Pack a row of boolean values into bytes (true = black)
//! let row: Vec<bool> = vec![true, true, false, false, true, false, true, false];
//! let packed = dither::pack_row(&row);
//! assert_eq!(packed, vec![0b11001010]); // 0xCA
//! ```

use std::fmt;
use std::str::FromStr;

use image::GrayImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TopstartError};
use crate::raster::{BLACK, Buffer, ColorMode, Raster, WHITE};

/// Fixed midpoint separating black from white.
pub const MIDPOINT: u8 = 128;

/// Bilevel conversion method.
///
/// Config files and the command line accept the same names, parsed by
/// [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum QuantizeMethod {
    /// Fixed threshold at [`MIDPOINT`].
    #[default]
    Threshold,
    /// Floyd-Steinberg error diffusion.
    Dither,
}

impl FromStr for QuantizeMethod {
    type Err = TopstartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "threshold" => Ok(QuantizeMethod::Threshold),
            "dither" | "floyd-steinberg" | "floyd_steinberg" | "fs" => Ok(QuantizeMethod::Dither),
            other => Err(TopstartError::UnsupportedMode(format!(
                "unknown image mode '{}' (expected threshold or dither)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for QuantizeMethod {
    type Error = TopstartError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for QuantizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuantizeMethod::Threshold => "threshold",
            QuantizeMethod::Dither => "dither",
        })
    }
}

/// Convert `image` to a bilevel raster with `method`.
///
/// ## Example
///
/// ```
/// use image::{GrayImage, Luma};
/// use topstart::raster::{ColorMode, Raster};
/// use topstart::render::dither::{to_bilevel, QuantizeMethod};
///
/// let gray = Raster::grayscale(GrayImage::from_pixel(8, 8, Luma([127])))?;
/// let mono = to_bilevel(&gray, QuantizeMethod::Threshold);
/// assert_eq!(mono.mode(), ColorMode::Bilevel);
/// assert!(mono.is_black(0, 0));
/// # Ok::<(), topstart::error::TopstartError>(())
/// ```
pub fn to_bilevel(image: &Raster, method: QuantizeMethod) -> Raster {
    let luma = image.to_luma();
    debug!(
        width = luma.width(),
        height = luma.height(),
        %method,
        "Converting to bilevel"
    );

    let mono = match method {
        QuantizeMethod::Threshold => threshold(&luma),
        QuantizeMethod::Dither => floyd_steinberg(&luma),
    };

    Raster::from_buffer(Buffer::Luma(mono), ColorMode::Bilevel)
}

/// Fixed-midpoint threshold. Rows are processed in parallel.
pub fn threshold(luma: &GrayImage) -> GrayImage {
    let mut out = luma.clone();
    let width = out.width() as usize;
    if width == 0 {
        return out;
    }

    out.par_chunks_mut(width).for_each(|row| {
        for px in row.iter_mut() {
            *px = if *px < MIDPOINT { BLACK } else { WHITE };
        }
    });

    out
}

/// Floyd-Steinberg error diffusion in raster-scan order.
pub fn floyd_steinberg(luma: &GrayImage) -> GrayImage {
    let width = luma.width() as usize;
    let height = luma.height() as usize;

    // i16 holds accumulated error without overflow
    let mut buffer: Vec<i16> = luma.as_raw().iter().map(|&v| v as i16).collect();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = buffer[idx];
            let new = if old < MIDPOINT as i16 { BLACK as i16 } else { WHITE as i16 };
            buffer[idx] = new;

            let error = old - new;
            if error == 0 {
                continue;
            }

            if x + 1 < width {
                buffer[idx + 1] += error * 7 / 16;
            }
            if y + 1 < height {
                let below = idx + width;
                if x > 0 {
                    buffer[below - 1] += error * 3 / 16;
                }
                buffer[below] += error * 5 / 16;
                if x + 1 < width {
                    buffer[below + 1] += error / 16;
                }
            }
        }
    }

    let data = buffer.into_iter().map(|v| v as u8).collect();
    GrayImage::from_raw(width as u32, height as u32, data)
        .unwrap_or_else(|| GrayImage::new(width as u32, height as u32))
}

/// Pack a row of boolean pixel values into bytes.
///
/// Converts a slice of bool values (true = black, false = white) into
/// a byte array suitable for printer graphics commands.
///
/// ## Bit Packing
///
/// - Bit 7 (MSB) = leftmost pixel
/// - Bit 0 (LSB) = rightmost pixel
/// - 1 = black (print dot), 0 = white (no dot)
///
/// ## Padding
///
/// If the row length is not a multiple of 8, the last byte is padded
/// with zeros (white) on the right.
///
/// ## Example
///
/// ```
/// use topstart::render::dither::pack_row;
///
/// // 12 pixels pack into 2 bytes (4 bits padding)
/// let row = vec![true; 12];
/// assert_eq!(pack_row(&row), vec![0xFF, 0xF0]); // 11111111 11110000
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            let byte_idx = i / 8;
            let bit_idx = 7 - (i % 8); // MSB first
            bytes[byte_idx] |= 1 << bit_idx;
        }
    }

    bytes
}

/// Pack a bilevel raster row by row.
///
/// Length = `ceil(width / 8) × height` bytes. Fails with
/// [`TopstartError::UnsupportedMode`] for non-bilevel input.
pub fn pack_raster(image: &Raster) -> Result<Vec<u8>> {
    if image.mode() != ColorMode::Bilevel {
        return Err(TopstartError::UnsupportedMode(format!(
            "raster data must be bilevel, got {:?}",
            image.mode()
        )));
    }

    let luma = image.to_luma();
    let width = luma.width() as usize;
    let mut data = Vec::with_capacity(width.div_ceil(8) * luma.height() as usize);
    if width == 0 {
        return Ok(data);
    }

    for row in luma.as_raw().chunks(width) {
        let pixels: Vec<bool> = row.iter().map(|&v| v == BLACK).collect();
        data.extend(pack_row(&pixels));
    }

    Ok(data)
}

/// Expand packed rows back into a grayscale image (black = 0, white = 255).
pub fn unpack_raster(width: u32, height: u32, data: &[u8]) -> GrayImage {
    let width_bytes = (width as usize).div_ceil(8);
    GrayImage::from_fn(width, height, |x, y| {
        let byte_idx = y as usize * width_bytes + x as usize / 8;
        let bit_idx = 7 - (x as usize % 8);
        let is_black = data
            .get(byte_idx)
            .is_some_and(|byte| (byte >> bit_idx) & 1 == 1);
        image::Luma([if is_black { BLACK } else { WHITE }])
    })
}

// ============================================================================
// TESTS
// ============================================================================
