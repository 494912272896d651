//! # Margin Trimming
//!
//! Removes blank paper around the content so printing starts exactly where
//! the ink does. Built on [`detect_bounds`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bounds::{BoundsOptions, detect_bounds};
use crate::error::TopstartError;
use crate::raster::Raster;

/// Which margins the pipeline removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TrimMode {
    /// Print the image as-is.
    None,
    /// Drop leading blank rows only.
    #[default]
    Top,
    /// Drop leading and trailing blank rows.
    Auto,
}

impl TrimMode {
    /// Apply this trim mode to `image`.
    pub fn apply(self, image: &Raster, opts: BoundsOptions) -> Raster {
        match self {
            TrimMode::None => image.clone(),
            TrimMode::Top => trim_top_margin(image, opts),
            TrimMode::Auto => auto_crop_content(image, opts),
        }
    }
}

impl FromStr for TrimMode {
    type Err = TopstartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Ok(TrimMode::None),
            "top" => Ok(TrimMode::Top),
            "auto" | "both" => Ok(TrimMode::Auto),
            other => Err(TopstartError::UnsupportedMode(format!(
                "unknown trim mode '{}' (expected none, top or auto)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for TrimMode {
    type Error = TopstartError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for TrimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrimMode::None => "none",
            TrimMode::Top => "top",
            TrimMode::Auto => "auto",
        })
    }
}

/// Drop the blank rows above the first content row.
///
/// Returns the input unchanged when the content already starts at row 0,
/// which makes this idempotent.
pub fn trim_top_margin(image: &Raster, opts: BoundsOptions) -> Raster {
    let bounds = detect_bounds(image, opts);
    if bounds.top > 0 {
        debug!(rows = bounds.top, "Removing top margin");
        image.crop_rows(bounds.top, image.height())
    } else {
        image.clone()
    }
}

/// Trim the top margin, then cut everything below the last content row.
pub fn auto_crop_content(image: &Raster, opts: BoundsOptions) -> Raster {
    let trimmed = trim_top_margin(image, opts);
    let bounds = detect_bounds(&trimmed, opts);
    if bounds.bottom < trimmed.height() {
        debug!(
            rows = trimmed.height() - bounds.bottom,
            "Removing bottom margin"
        );
        trimmed.crop_rows(0, bounds.bottom)
    } else {
        trimmed
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ColorMode;
    use image::{GrayImage, Luma};

    fn banded(height: u32, rows: std::ops::Range<u32>) -> Raster {
        let img = GrayImage::from_fn(64, height, |x, y| {
            Luma([if rows.contains(&y) { (x * 3) as u8 } else { 255 }])
        });
        Raster::grayscale(img).unwrap()
    }

    #[test]
    fn test_trim_top_removes_leading_rows() {
        let out = trim_top_margin(&banded(100, 40..90), BoundsOptions::default());
        assert_eq!(out.height(), 60);
        assert_eq!(out.to_luma().get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_trim_top_keeps_trailing_rows() {
        let out = trim_top_margin(&banded(100, 40..50), BoundsOptions::default());
        assert_eq!(out.height(), 60);
    }

    #[test]
    fn test_trim_top_idempotent() {
        let once = trim_top_margin(&banded(100, 25..75), BoundsOptions::default());
        let twice = trim_top_margin(&once, BoundsOptions::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_trim_blank_is_noop() {
        let blank = Raster::blank(64, 30, ColorMode::Grayscale).unwrap();
        assert_eq!(trim_top_margin(&blank, BoundsOptions::default()), blank);
        assert_eq!(auto_crop_content(&blank, BoundsOptions::default()), blank);
    }

    #[test]
    fn test_auto_crop_both_ends() {
        let out = auto_crop_content(&banded(100, 10..30), BoundsOptions::default());
        assert_eq!(out.height(), 20);
    }

    #[test]
    fn test_trim_mode_apply() {
        let img = banded(50, 5..20);
        let opts = BoundsOptions::default();
        assert_eq!(TrimMode::None.apply(&img, opts).height(), 50);
        assert_eq!(TrimMode::Top.apply(&img, opts).height(), 45);
        assert_eq!(TrimMode::Auto.apply(&img, opts).height(), 15);
    }

    #[test]
    fn test_trim_mode_parse() {
        assert_eq!("TOP".parse::<TrimMode>().unwrap(), TrimMode::Top);
        assert_eq!("auto".parse::<TrimMode>().unwrap(), TrimMode::Auto);
        assert_eq!("none".parse::<TrimMode>().unwrap(), TrimMode::None);
        assert!(matches!(
            "sideways".parse::<TrimMode>(),
            Err(TopstartError::UnsupportedMode(_))
        ));
    }

    #[test]
    fn test_trim_mode_serde_matches_parse() {
        let names = [
            ("off", TrimMode::None),
            ("both", TrimMode::Auto),
            ("Top", TrimMode::Top),
        ];
        for (name, mode) in names {
            assert_eq!(name.parse::<TrimMode>().unwrap(), mode);
            let json = format!("\"{}\"", name);
            assert_eq!(serde_json::from_str::<TrimMode>(&json).unwrap(), mode);
        }
        assert_eq!(serde_json::to_string(&TrimMode::Auto).unwrap(), "\"auto\"");
        assert!(serde_json::from_str::<TrimMode>("\"sideways\"").is_err());
    }
}
