//! # Printer Configuration
//!
//! This module defines the hardware profile of the target thermal printer.
//!
//! ## Supported Printers
//!
//! | Profile | Paper | Width (dots) | Resolution | Max roll |
//! |---------|-------|--------------|------------|----------|
//! | Thermal 58mm | 58mm | 384 | 203 DPI (8 dots/mm) | 2000mm |
//!
//! ## Usage
//!
//! ```
//! use topstart::printer::PrinterConfig;
//!
//! let config = PrinterConfig::THERMAL_58MM;
//! println!("Print width: {} dots ({} bytes)",
//!          config.width_dots,
//!          config.width_bytes());
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TopstartError};

/// Pixels per millimeter of paper.
///
/// Always finite and strictly positive. Deserializes from a plain number and
/// rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct PixelDensity(f32);

impl PixelDensity {
    /// 203 DPI thermal heads, rounded to the 8 dots/mm they are sold as.
    pub const DOTS_8_PER_MM: Self = Self(8.0);

    pub fn new(px_per_mm: f32) -> Result<Self> {
        if px_per_mm.is_finite() && px_per_mm > 0.0 {
            Ok(Self(px_per_mm))
        } else {
            Err(TopstartError::Config(format!(
                "pixel density must be a positive number, got {}",
                px_per_mm
            )))
        }
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    /// Convert a signed millimeter distance to whole pixels.
    ///
    /// ```
    /// use topstart::printer::PixelDensity;
    ///
    /// let d = PixelDensity::DOTS_8_PER_MM;
    /// assert_eq!(d.mm_to_px(-10.0), -80);
    /// assert_eq!(d.mm_to_px(0.06), 0);
    /// ```
    #[inline]
    pub fn mm_to_px(self, mm: f32) -> i64 {
        (mm as f64 * self.0 as f64).round() as i64
    }
}

impl TryFrom<f32> for PixelDensity {
    type Error = TopstartError;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PixelDensity> for f32 {
    fn from(value: PixelDensity) -> Self {
        value.0
    }
}

/// Output geometry: the addressable raster width and the longest print the
/// roll allows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintGeometry {
    /// Target output width in pixels.
    pub width_px: u32,
    /// Maximum paper length in millimeters.
    pub max_length_mm: f32,
}

impl PrintGeometry {
    /// Tallest raster, in rows, that fits on the roll at `density`.
    pub fn max_height_px(&self, density: PixelDensity) -> u32 {
        (self.max_length_mm * density.get()).floor().max(0.0) as u32
    }
}

/// # Printer Configuration
///
/// Defines the hardware characteristics of a thermal printer.
///
/// ## Physical Properties
///
/// - **width_dots**: Addressable raster width in dots, minus the margin the
///   print head cannot reach
/// - **dots_per_mm**: Pixel density used for every mm↔dots conversion
/// - **max_paper_length_mm**: Length of a full roll
///
/// ## Transport Tuning
///
/// - **max_chunk_rows**: Maximum rows per raster frame, so a single frame
///   fits the printer's receive buffer
///
/// ## Calculations
///
/// ```text
/// For the 58mm profile:
///   theoretical width = 58mm × 8 = 464 dots
///   usable width      = 384 dots (head margins)
///   max height        = 2000mm × 8 = 16000 rows
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Printer profile name
    pub name: Cow<'static, str>,

    /// Paper roll width in millimeters
    pub paper_width_mm: f32,

    /// Pixel density
    pub dots_per_mm: PixelDensity,

    /// Usable print width in dots (pixels)
    pub width_dots: u32,

    /// Roll length in millimeters
    pub max_paper_length_mm: f32,

    /// Maximum rows per raster frame
    pub max_chunk_rows: u32,
}

impl PrinterConfig {
    /// # Generic 58mm ESC/POS Thermal Printer
    ///
    /// ## Print Area
    ///
    /// ```text
    /// ├─ 5mm ─┼──── 48mm printable ────┼─ 5mm ─┤
    /// │margin │       384 dots         │margin │
    /// ```
    pub const THERMAL_58MM: Self = Self {
        name: Cow::Borrowed("Thermal 58mm"),
        paper_width_mm: 58.0,
        dots_per_mm: PixelDensity::DOTS_8_PER_MM,
        width_dots: 384,
        max_paper_length_mm: 2000.0,
        max_chunk_rows: 256,
    };

    /// Print width in bytes (one bit per dot, rounded up)
    #[inline]
    pub fn width_bytes(&self) -> u32 {
        self.width_dots.div_ceil(8)
    }

    #[inline]
    pub fn density(&self) -> PixelDensity {
        self.dots_per_mm
    }

    pub fn geometry(&self) -> PrintGeometry {
        PrintGeometry {
            width_px: self.width_dots,
            max_length_mm: self.max_paper_length_mm,
        }
    }

    /// Tallest raster the roll can hold, in rows.
    pub fn max_height_dots(&self) -> u32 {
        self.geometry().max_height_px(self.dots_per_mm)
    }

    /// Convert millimeters to dots (signed, rounded).
    #[inline]
    pub fn mm_to_dots(&self, mm: f32) -> i64 {
        self.dots_per_mm.mm_to_px(mm)
    }

    /// Convert dots to millimeters
    #[inline]
    pub fn dots_to_mm(&self, dots: u32) -> f32 {
        dots as f32 / self.dots_per_mm.get()
    }

    /// Reject profiles the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.width_dots == 0 {
            return Err(TopstartError::Config("width_dots must be > 0".into()));
        }
        if !(self.max_paper_length_mm.is_finite() && self.max_paper_length_mm > 0.0) {
            return Err(TopstartError::Config(format!(
                "max_paper_length_mm must be > 0, got {}",
                self.max_paper_length_mm
            )));
        }
        if self.max_chunk_rows == 0 || self.max_chunk_rows > u16::MAX as u32 {
            return Err(TopstartError::Config(format!(
                "max_chunk_rows must be in 1..=65535, got {}",
                self.max_chunk_rows
            )));
        }
        if self.width_bytes() > u16::MAX as u32 {
            return Err(TopstartError::Config(format!(
                "width_dots {} is too wide for a raster frame",
                self.width_dots
            )));
        }
        Ok(())
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::THERMAL_58MM
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thermal_58mm_dimensions() {
        let config = PrinterConfig::THERMAL_58MM;
        assert_eq!(config.width_dots, 384);
        assert_eq!(config.width_bytes(), 48);
        assert_eq!(config.dots_per_mm.get(), 8.0);
    }

    #[test]
    fn test_max_height() {
        // 2000mm × 8 dots/mm
        assert_eq!(PrinterConfig::THERMAL_58MM.max_height_dots(), 16000);
    }

    #[test]
    fn test_mm_to_dots() {
        let config = PrinterConfig::THERMAL_58MM;
        assert_eq!(config.mm_to_dots(10.0), 80);
        assert_eq!(config.mm_to_dots(-5.0), -40);
        assert_eq!(config.mm_to_dots(0.0), 0);
    }

    #[test]
    fn test_dots_to_mm() {
        let config = PrinterConfig::THERMAL_58MM;
        assert!((config.dots_to_mm(384) - 48.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_density_rejects_non_positive() {
        assert!(PixelDensity::new(0.0).is_err());
        assert!(PixelDensity::new(-8.0).is_err());
        assert!(PixelDensity::new(f32::NAN).is_err());
        assert!(PixelDensity::new(f32::INFINITY).is_err());
        assert!(PixelDensity::new(11.8).is_ok());
    }

    #[test]
    fn test_dots_and_mm_agree() {
        let config = PrinterConfig::THERMAL_58MM;
        let rows = config.mm_to_dots(12.5);
        assert_eq!(rows, 100);
        assert_eq!(config.dots_to_mm(rows as u32), 12.5);
    }

    #[test]
    fn test_density_is_the_only_resolution_field() {
        let json = serde_json::to_value(PrinterConfig::THERMAL_58MM).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "dots_per_mm",
                "max_chunk_rows",
                "max_paper_length_mm",
                "name",
                "paper_width_mm",
                "width_dots"
            ]
        );
    }

    #[test]
    fn test_default_is_thermal_58mm() {
        assert_eq!(PrinterConfig::default(), PrinterConfig::THERMAL_58MM);
    }

    #[test]
    fn test_validate() {
        assert!(PrinterConfig::THERMAL_58MM.validate().is_ok());

        let mut config = PrinterConfig::THERMAL_58MM;
        config.width_dots = 0;
        assert!(config.validate().is_err());

        let mut config = PrinterConfig::THERMAL_58MM;
        config.max_chunk_rows = 0;
        assert!(config.validate().is_err());

        let mut config = PrinterConfig::THERMAL_58MM;
        config.max_paper_length_mm = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip_rejects_bad_density() {
        let json = serde_json::to_string(&PrinterConfig::THERMAL_58MM).unwrap();
        let parsed: PrinterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PrinterConfig::THERMAL_58MM);

        let bad = json.replace("\"dots_per_mm\":8.0", "\"dots_per_mm\":0.0");
        assert!(serde_json::from_str::<PrinterConfig>(&bad).is_err());
    }
}
