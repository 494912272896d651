//! # Topstart - Thermal Printer Image Pipeline
//!
//! Topstart prints images on 58mm ESC/POS thermal printers so that the ink
//! starts at the very top of the paper. It provides:
//!
//! - **Geometry normalization**: fit any image to the print head width
//! - **Margin trimming**: drop blank paper above (and below) the content
//! - **Offset correction**: shift the image by a millimeter amount
//! - **Monochrome conversion**: threshold or Floyd-Steinberg dithering
//! - **Protocol encoding**: ESC/POS raster frames, feed and cut
//! - **Transport**: device node, raw file and PNG fallbacks
//!
//! ## Quick Start
//!
//! ```no_run
//! use topstart::{
//!     pipeline::{Pipeline, PipelineConfig},
//!     raster,
//!     transport::{DeviceTransport, print_copies},
//! };
//!
//! // Decode the image
//! let image = raster::load("label.png")?;
//!
//! // Normalize, trim, offset and quantize, then encode as ESC/POS
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let job = pipeline.prepare_job(&image)?;
//!
//! // Print two copies
//! let mut printer = DeviceTransport::new("/dev/usb/lp0");
//! let report = print_copies(&mut printer, &job, 2);
//! assert!(report.all_succeeded());
//!
//! # Ok::<(), topstart::error::TopstartError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`raster`] | Owned image buffer and decoding |
//! | [`render`] | Normalize, trim, offset and quantize stages |
//! | [`pipeline`] | Stages wired together with their configuration |
//! | [`ir`] | Command stream and byte generation |
//! | [`protocol`] | ESC/POS command builders |
//! | [`transport`] | Communication backends and copy accounting |
//! | [`printer`] | Printer profiles |
//! | [`config`] | JSON configuration files |
//! | [`history`] | Recently printed files |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Generic 58mm ESC/POS receipt printers at 203 DPI (384 usable dots).
//! Other widths work with a custom [`PrinterConfig`].

pub mod config;
pub mod error;
pub mod history;
pub mod ir;
pub mod pipeline;
pub mod printer;
pub mod protocol;
pub mod raster;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use error::TopstartError;
pub use pipeline::{Pipeline, PipelineConfig};
pub use printer::PrinterConfig;
pub use raster::Raster;
