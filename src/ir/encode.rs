//! # Job Encoding
//!
//! Frames a bilevel raster as a complete print job:
//!
//! ```text
//! Init → LineSpacing(0) → Align(Left) → Raster × n → Feed(2) → Cut
//! ```
//!
//! The encoder emits exactly one copy. Repeating the job is left to
//! [`print_copies`](crate::transport::print_copies) so each copy can
//! succeed or fail on its own.

use tracing::{debug, warn};

use super::ops::{CommandStream, Op};
use crate::error::{Result, TopstartError};
use crate::printer::PrinterConfig;
use crate::protocol::commands::Alignment;
use crate::protocol::graphics;
use crate::raster::{ColorMode, Raster};

/// Lines fed after the image so it clears the tear bar.
pub const FEED_LINES: u8 = 2;

impl CommandStream {
    /// Build the print job for a bilevel raster.
    ///
    /// ## Errors
    ///
    /// - [`TopstartError::UnsupportedMode`] if `image` is not bilevel
    /// - [`TopstartError::ImageTooTall`] if it is longer than the roll
    /// - [`TopstartError::InvalidImage`] if it is too wide for a raster frame
    ///
    /// A zero-height raster produces the control sequence without any raster
    /// frame. An all-white raster is still sent as raster frames.
    ///
    /// ## Example
    ///
    /// ```
    /// use topstart::ir::{CommandStream, Op};
    /// use topstart::printer::PrinterConfig;
    /// use topstart::raster::{ColorMode, Raster};
    ///
    /// let blank = Raster::blank(384, 10, ColorMode::Bilevel)?;
    /// let stream = CommandStream::encode(&blank, &PrinterConfig::THERMAL_58MM)?;
    /// assert_eq!(stream.ops.first(), Some(&Op::Init));
    /// assert_eq!(stream.ops.last(), Some(&Op::Cut));
    /// # Ok::<(), topstart::error::TopstartError>(())
    /// ```
    pub fn encode(image: &Raster, config: &PrinterConfig) -> Result<Self> {
        if image.mode() != ColorMode::Bilevel {
            return Err(TopstartError::UnsupportedMode(format!(
                "encoder needs a bilevel raster, got {:?}",
                image.mode()
            )));
        }

        let max = config.max_height_dots();
        if image.height() > max {
            return Err(TopstartError::ImageTooTall {
                height: image.height(),
                max,
            });
        }

        let width = u16::try_from(image.width()).map_err(|_| {
            TopstartError::InvalidImage(format!(
                "{} dots is too wide for a raster frame",
                image.width()
            ))
        })?;
        if image.width() > config.width_dots {
            warn!(
                width = image.width(),
                head = config.width_dots,
                "Image is wider than the print head and will be clipped"
            );
        }

        let mut stream = CommandStream::new();
        stream.push(Op::Init);
        stream.push(Op::LineSpacing(0));
        stream.push(Op::Align(Alignment::Left));

        let data = image.packed_rows()?;
        let width_bytes = width.div_ceil(8) as usize;
        let max_rows = config.max_chunk_rows.min(u16::MAX as u32) as u16;
        for (rows, chunk) in graphics::chunk_rows(width_bytes, &data, max_rows) {
            stream.push(Op::Raster {
                width,
                height: rows,
                data: chunk.to_vec(),
            });
        }

        stream.push(Op::Feed { lines: FEED_LINES });
        stream.push(Op::Cut);

        debug!(
            width,
            height = image.height(),
            frames = stream.count(Op::is_raster),
            "Encoded print job"
        );
        Ok(stream)
    }
}
