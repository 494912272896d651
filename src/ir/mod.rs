//! # Command Stream (IR)
//!
//! This module provides the layer between a finished bilevel raster and raw
//! ESC/POS bytes. A print job is first built as a list of ops, which can be
//! inspected and tested without a printer, then compiled to bytes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────┐     ┌───────────┐
//! │Bilevel raster│ ──► │ CommandStream │ ──► │ Codegen  │ ──► │ Transport │
//! │              │     │  (Vec<Op>)    │     │ (bytes)  │     │           │
//! └──────────────┘     └───────────────┘     └──────────┘     └───────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use topstart::ir::{CommandStream, Op};
//! use topstart::printer::PrinterConfig;
//! use topstart::raster::{ColorMode, Raster};
//!
//! let image = Raster::blank(384, 40, ColorMode::Bilevel)?;
//! let stream = CommandStream::encode(&image, &PrinterConfig::THERMAL_58MM)?;
//!
//! // Inspect the ops
//! assert_eq!(stream.count(|op| *op == Op::Cut), 1);
//!
//! // Generate bytes
//! let bytes = stream.to_bytes();
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! # Ok::<(), topstart::error::TopstartError>(())
//! ```

mod codegen;
mod encode;
mod ops;
mod preview;

pub use encode::FEED_LINES;
pub use ops::*;
