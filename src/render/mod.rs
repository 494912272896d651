//! # Rendering Module
//!
//! The image stages of the print pipeline. Each stage is a pure function
//! from one [`Raster`](crate::raster::Raster) to a new one.
//!
//! ## Modules
//!
//! - [`normalize`]: Resize or center to the print head width
//! - [`bounds`]: Detect the rows that carry ink
//! - [`trim`]: Remove blank leading (and trailing) rows
//! - [`offset`]: Manual vertical offset in millimeters
//! - [`dither`]: Threshold / Floyd-Steinberg bilevel conversion and bit packing
//! - [`calibration`]: Test page for checking alignment and offset
//!
//! ## Usage Example
//!
//! ```
//! use topstart::printer::PrinterConfig;
//! use topstart::raster::{ColorMode, Raster};
//! use topstart::render::{bounds::BoundsOptions, dither, normalize, offset, trim};
//!
//! let config = PrinterConfig::THERMAL_58MM;
//! let image = Raster::blank(640, 480, ColorMode::Rgb)?;
//!
//! let fitted = normalize::normalize(&image, config.width_dots)?;
//! let trimmed = trim::trim_top_margin(&fitted, BoundsOptions::default());
//! let shifted = offset::apply_offset(&trimmed, 3.0, config.density())?;
//! let mono = dither::to_bilevel(&shifted, dither::QuantizeMethod::Threshold);
//!
//! assert_eq!(mono.width(), 384);
//! # Ok::<(), topstart::error::TopstartError>(())
//! ```

pub mod bounds;
pub mod calibration;
pub mod dither;
pub mod normalize;
pub mod offset;
pub mod trim;
