//! # Error Types
//!
//! This module defines error types used throughout the topstart library.
//!
//! Pipeline stages fail fast: each fatal condition aborts the stage and is
//! surfaced with a specific variant. No partially processed raster is ever
//! returned alongside an error.

use thiserror::Error;

/// Main error type for topstart operations
#[derive(Debug, Error)]
pub enum TopstartError {
    /// Raster with a zero dimension, or an otherwise unusable image
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Source file could not be read or decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Unknown quantization method or a raster in the wrong color mode
    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    /// Raster is longer than the paper roll can hold
    #[error("Image too tall: {height} rows exceeds the {max} row limit")]
    ImageTooTall { height: u32, max: u32 },

    /// Transport-level errors (connection, I/O)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid configuration value or unreadable config file
    #[error("Config error: {0}")]
    Config(String),

    /// Recent-file history could not be read or written
    #[error("History error: {0}")]
    History(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, TopstartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_too_tall_message() {
        let err = TopstartError::ImageTooTall {
            height: 20000,
            max: 16000,
        };
        assert_eq!(
            err.to_string(),
            "Image too tall: 20000 rows exceeds the 16000 row limit"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TopstartError = io.into();
        assert!(matches!(err, TopstartError::Io(_)));
    }
}
