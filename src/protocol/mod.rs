//! # ESC/POS Protocol Implementation
//!
//! This module provides low-level command builders for the ESC/POS protocol
//! spoken by generic thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Control commands (init, line spacing, align, feed, cut)
//! - [`graphics`]: Raster bit image command and row chunking
//!
//! ## Usage Example
//!
//! ```
//! use topstart::protocol::{commands, graphics};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(commands::line_spacing(0));
//! data.extend(commands::align_left());
//!
//! // A 384-dot wide, 24-row striped image
//! let stripes = vec![0xAA; 48 * 24];
//! data.extend(graphics::raster(384, 24, &stripes));
//!
//! data.extend(commands::feed_lines(2));
//! data.extend(commands::cut());
//!
//! // Send `data` to printer via transport...
//! ```

pub mod commands;
pub mod graphics;
