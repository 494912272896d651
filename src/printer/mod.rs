//! # Printer Module
//!
//! This module provides printer-specific configurations and utilities.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware profile, pixel density and print geometry

pub mod config;

pub use config::{PixelDensity, PrintGeometry, PrinterConfig};
