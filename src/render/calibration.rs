//! # Test Page
//!
//! Pattern for checking alignment before printing real images.
//!
//! ```text
//! ████████████████████████████████  top rule: must touch the paper edge
//! █─                             █
//! █──                            █  ruler: a tick every millimeter,
//! █─                             █  a long one every 5mm
//! █─     ░░░▒▒▒▒▓▓▓▓████         █  gray ramp: white to black
//! █──    ░░░▒▒▒▒▓▓▓▓████         █
//! ```
//!
//! If the top rule is cut short or preceded by blank paper, the measured
//! gap on the ruler is the offset to configure.

use image::{GrayImage, Luma};

use crate::error::Result;
use crate::printer::PixelDensity;
use crate::raster::{BLACK, Raster, WHITE};

/// Parameters for the test page.
#[derive(Debug, Clone)]
pub struct Params {
    /// Page length in millimeters. Default: 25
    pub length_mm: f32,
    /// Thickness of the top rule in rows. Default: 2
    pub rule_rows: u32,
    /// Side border width in pixels. Default: 4
    pub border_width: u32,
    /// Length of a 1mm tick. Default: 12
    pub short_tick: u32,
    /// Length of a 5mm tick. Default: 24
    pub long_tick: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            length_mm: 25.0,
            rule_rows: 2,
            border_width: 4,
            short_tick: 12,
            long_tick: 24,
        }
    }
}

/// Luminance of the test page at a pixel.
pub fn shade(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    density: PixelDensity,
    params: &Params,
) -> u8 {
    let rule = y < params.rule_rows;
    let border = x < params.border_width || x + params.border_width >= width;

    // Rows where a tick starts: y = round(n × density)
    let mm = (y as f32 / density.get()).round();
    let tick_row = density.mm_to_px(mm) == y as i64;
    let tick_len = if mm as u32 % 5 == 0 {
        params.long_tick
    } else {
        params.short_tick
    };
    let tick = tick_row && x < params.border_width + tick_len;

    if rule || border || tick {
        return BLACK;
    }

    // Ramp fills the lower half, right of the longest tick
    let ramp_left = params.border_width + params.long_tick * 2;
    let ramp_right = width.saturating_sub(params.border_width * 2);
    if y >= height / 2 && y + params.rule_rows < height && x >= ramp_left && x < ramp_right {
        let span = (ramp_right - ramp_left).max(1) as f32;
        let t = (x - ramp_left) as f32 / span;
        return (WHITE as f32 * (1.0 - t)).round() as u8;
    }

    WHITE
}

/// Render the test page for a print head `width` dots wide.
///
/// ## Example
///
/// ```
/// use topstart::printer::PixelDensity;
/// use topstart::render::calibration::{test_page, Params};
///
/// let page = test_page(384, PixelDensity::DOTS_8_PER_MM, &Params::default())?;
/// assert_eq!((page.width(), page.height()), (384, 200));
/// # Ok::<(), topstart::error::TopstartError>(())
/// ```
pub fn test_page(width: u32, density: PixelDensity, params: &Params) -> Result<Raster> {
    let height = density.mm_to_px(params.length_mm).max(1) as u32;
    let img = GrayImage::from_fn(width, height, |x, y| {
        Luma([shade(x, y, width, height, density, params)])
    });
    Raster::grayscale(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Raster {
        test_page(384, PixelDensity::DOTS_8_PER_MM, &Params::default()).unwrap()
    }

    #[test]
    fn test_top_rule_spans_width() {
        let page = page();
        let luma = page.to_luma();
        for x in 0..384 {
            assert_eq!(luma.get_pixel(x, 0)[0], BLACK);
            assert_eq!(luma.get_pixel(x, 1)[0], BLACK);
        }
        assert_eq!(luma.get_pixel(200, 2)[0], WHITE);
    }

    #[test]
    fn test_ruler_ticks_every_millimeter() {
        let page = page();
        let luma = page.to_luma();
        let params = Params::default();

        // 8 rows per mm; a 1mm tick at row 8, a 5mm tick at row 40
        let short_end = params.border_width + params.short_tick;
        let long_end = params.border_width + params.long_tick;
        assert_eq!(luma.get_pixel(short_end - 1, 8)[0], BLACK);
        assert_eq!(luma.get_pixel(short_end, 8)[0], WHITE);
        assert_eq!(luma.get_pixel(long_end - 1, 40)[0], BLACK);
        assert_eq!(luma.get_pixel(short_end, 12)[0], WHITE);
    }

    #[test]
    fn test_ramp_goes_white_to_black() {
        let page = page();
        let luma = page.to_luma();
        let params = Params::default();
        let y = 150;
        let left = params.border_width + params.long_tick * 2;
        let right = 384 - params.border_width * 2 - 1;

        assert_eq!(luma.get_pixel(left, y)[0], WHITE);
        assert!(luma.get_pixel(right, y)[0] < 5);
        assert!(luma.get_pixel(left + 100, y)[0] > luma.get_pixel(left + 200, y)[0]);
    }

    #[test]
    fn test_page_follows_density() {
        let page = test_page(576, PixelDensity::new(12.0).unwrap(), &Params::default()).unwrap();
        assert_eq!((page.width(), page.height()), (576, 300));
    }
}
