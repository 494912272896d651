//! # Content Bounds Detection
//!
//! Finds the vertical extent of ink in a raster so blank paper can be
//! trimmed before printing.
//!
//! ## Row Classification
//!
//! A row is *content* when more than `min_dark_ratio` of its pixels are
//! darker than `luminance_threshold`:
//!
//! ```text
//! dark_pixels = count(luma < luminance_threshold)
//! content     = dark_pixels > width × min_dark_ratio
//! ```
//!
//! With the defaults (threshold 250, ratio 1%) a 384-dot row needs at least
//! four dark pixels; isolated specks from JPEG noise do not count.
//!
//! ## Scanning
//!
//! ```text
//! row 0    ░░░░░░░░░░   ┐
//! row 1    ░░░░░░░░░░   ┘ leading margin
//! row 2    ░░██████░░   ← top
//! ...
//! row h-3  ░░░████░░░   ← bottom - 1
//! row h-2  ░░░░░░░░░░   ┐ trailing margin
//! row h-1  ░░░░░░░░░░   ┘
//! ```
//!
//! The top scan walks down from row 0, the bottom scan walks up from the
//! last row. Each stops at the first content row it meets.

use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::raster::Raster;

/// Default luminance below which a pixel counts as ink.
pub const DEFAULT_LUMINANCE_THRESHOLD: u8 = 250;

/// Default fraction of dark pixels a row needs to count as content.
pub const DEFAULT_MIN_DARK_RATIO: f32 = 0.01;

/// Parameters for row classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsOptions {
    pub luminance_threshold: u8,
    pub min_dark_ratio: f32,
}

impl Default for BoundsOptions {
    fn default() -> Self {
        Self {
            luminance_threshold: DEFAULT_LUMINANCE_THRESHOLD,
            min_dark_ratio: DEFAULT_MIN_DARK_RATIO,
        }
    }
}

/// Vertical extent of content: rows `[top, bottom)`.
///
/// Always `0 <= top <= bottom <= height`. When no row has content the bounds
/// cover the whole image, so nothing gets trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBounds {
    pub top: u32,
    pub bottom: u32,
}

impl ContentBounds {
    /// Number of rows between the bounds.
    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Locate the first and last content rows of `image`.
///
/// ## Example
///
/// ```
/// use image::{GrayImage, Luma};
/// use topstart::raster::Raster;
/// use topstart::render::bounds::{detect_bounds, BoundsOptions};
///
/// let img = GrayImage::from_fn(10, 10, |_, y| Luma([if (3..7).contains(&y) { 0 } else { 255 }]));
/// let bounds = detect_bounds(&Raster::grayscale(img)?, BoundsOptions::default());
/// assert_eq!((bounds.top, bounds.bottom), (3, 7));
/// # Ok::<(), topstart::error::TopstartError>(())
/// ```
pub fn detect_bounds(image: &Raster, opts: BoundsOptions) -> ContentBounds {
    let luma = image.to_luma();
    let height = luma.height();

    let top = (0..height)
        .find(|&y| is_content_row(&luma, y, opts))
        .unwrap_or(0);

    let bottom = (0..height)
        .rev()
        .find(|&y| is_content_row(&luma, y, opts))
        .map(|y| y + 1)
        .unwrap_or(height);

    debug!(top, bottom, height, "Detected content bounds");
    ContentBounds { top, bottom }
}

/// Height of the content region, ignoring blank margins on both ends.
pub fn content_height(image: &Raster, opts: BoundsOptions) -> u32 {
    detect_bounds(image, opts).height()
}

/// Whether row `y` carries enough dark pixels to count as content.
pub fn is_content_row(luma: &GrayImage, y: u32, opts: BoundsOptions) -> bool {
    let width = luma.width() as usize;
    let row = &luma.as_raw()[y as usize * width..(y as usize + 1) * width];
    let dark = row
        .iter()
        .filter(|&&l| l < opts.luminance_threshold)
        .count();
    dark as f32 > width as f32 * opts.min_dark_ratio
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ColorMode;
    use image::{Luma, Rgb, RgbImage};

    /// White image with fully black rows in `rows`.
    fn banded(width: u32, height: u32, rows: std::ops::Range<u32>) -> Raster {
        let img = GrayImage::from_fn(width, height, |_, y| {
            Luma([if rows.contains(&y) { 0 } else { 255 }])
        });
        Raster::grayscale(img).unwrap()
    }

    #[test]
    fn test_all_white_is_whole_image() {
        let img = Raster::blank(384, 50, ColorMode::Grayscale).unwrap();
        let bounds = detect_bounds(&img, BoundsOptions::default());
        assert_eq!(bounds, ContentBounds { top: 0, bottom: 50 });
    }

    #[test]
    fn test_finds_both_edges() {
        let bounds = detect_bounds(&banded(100, 100, 12..80), BoundsOptions::default());
        assert_eq!(bounds, ContentBounds { top: 12, bottom: 80 });
        assert_eq!(bounds.height(), 68);
    }

    #[test]
    fn test_content_touching_edges() {
        let bounds = detect_bounds(&banded(100, 30, 0..30), BoundsOptions::default());
        assert_eq!(bounds, ContentBounds { top: 0, bottom: 30 });
    }

    #[test]
    fn test_ratio_is_strictly_greater() {
        // 100 px wide at 1% → needs more than 1 dark pixel
        let mut img = GrayImage::from_pixel(100, 5, Luma([255]));
        img.put_pixel(50, 1, Luma([0]));
        img.put_pixel(10, 3, Luma([0]));
        img.put_pixel(11, 3, Luma([0]));
        let bounds = detect_bounds(&Raster::grayscale(img).unwrap(), BoundsOptions::default());
        assert_eq!(bounds, ContentBounds { top: 3, bottom: 4 });
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Luminance exactly at the threshold is paper, one below is ink
        let img = GrayImage::from_fn(10, 4, |_, y| Luma([if y == 2 { 249 } else { 250 }]));
        let bounds = detect_bounds(&Raster::grayscale(img).unwrap(), BoundsOptions::default());
        assert_eq!(bounds, ContentBounds { top: 2, bottom: 3 });
    }

    #[test]
    fn test_rgb_uses_luminance() {
        let img = RgbImage::from_fn(20, 6, |_, y| {
            if y == 4 { Rgb([0, 0, 200]) } else { Rgb([255, 255, 255]) }
        });
        let bounds = detect_bounds(&Raster::rgb(img).unwrap(), BoundsOptions::default());
        assert_eq!(bounds, ContentBounds { top: 4, bottom: 5 });
    }

    #[test]
    fn test_custom_options() {
        let img = GrayImage::from_fn(10, 6, |_, y| Luma([if y == 1 { 200 } else { 255 }]));
        let raster = Raster::grayscale(img).unwrap();

        let strict = BoundsOptions {
            luminance_threshold: 150,
            ..Default::default()
        };
        assert_eq!(detect_bounds(&raster, strict), ContentBounds { top: 0, bottom: 6 });
        assert_eq!(
            detect_bounds(&raster, BoundsOptions::default()),
            ContentBounds { top: 1, bottom: 2 }
        );
    }

    #[test]
    fn test_content_height() {
        assert_eq!(content_height(&banded(50, 40, 5..25), BoundsOptions::default()), 20);
    }
}
