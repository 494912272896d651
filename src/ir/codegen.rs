//! # Code Generation
//!
//! Converts command streams to ESC/POS protocol bytes.

use super::ops::{CommandStream, Op};
use crate::protocol::{commands, graphics};

impl CommandStream {
    /// Compile the stream to ESC/POS bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();

        for op in &self.ops {
            match op {
                Op::Init => out.extend(commands::init()),
                Op::LineSpacing(n) => out.extend(commands::line_spacing(*n)),
                Op::Align(alignment) => out.extend(commands::align(*alignment)),
                Op::Raster {
                    width,
                    height,
                    data,
                } => out.extend(graphics::raster(*width, *height, data)),
                Op::Feed { lines } => out.extend(commands::feed_lines(*lines)),
                Op::Cut => out.extend(commands::cut()),
            }
        }

        out
    }
}
