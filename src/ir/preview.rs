//! # Stream Preview
//!
//! Decodes the raster frames of a command stream back into an image, which
//! is exactly what the print head would burn.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma, imageops};

use super::ops::{CommandStream, Op};
use crate::error::{Result, TopstartError};
use crate::raster::WHITE;
use crate::render::dither;

impl CommandStream {
    /// Stack all raster frames into one grayscale image.
    ///
    /// Returns `None` when the stream has no raster rows.
    pub fn to_preview_image(&self) -> Option<GrayImage> {
        let width = self
            .iter()
            .filter_map(|op| match op {
                Op::Raster { width, .. } => Some(*width as u32),
                _ => None,
            })
            .max()?;
        let height = self.raster_height();
        if width == 0 || height == 0 {
            return None;
        }

        let mut canvas = GrayImage::from_pixel(width, height, Luma([WHITE]));
        let mut y = 0i64;
        for op in self.iter() {
            if let Op::Raster {
                width,
                height,
                data,
            } = op
            {
                let frame = dither::unpack_raster(*width as u32, *height as u32, data);
                imageops::replace(&mut canvas, &frame, 0, y);
                y += *height as i64;
            }
        }

        Some(canvas)
    }

    /// Encode [`to_preview_image`](Self::to_preview_image) as PNG bytes.
    pub fn to_preview_png(&self) -> Result<Vec<u8>> {
        let image = self.to_preview_image().ok_or_else(|| {
            TopstartError::InvalidImage("stream has no raster data to preview".into())
        })?;

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| TopstartError::Io(std::io::Error::other(format!("PNG encoding failed: {}", e))))?;
        Ok(png)
    }
}
