//! # ESC/POS Raster Graphics
//!
//! This module implements the raster bit image command used to print a
//! bilevel image on ESC/POS thermal printers.
//!
//! ## Coordinate System
//!
//! ```text
//! (0,0) ──────────────────────► X (horizontal, 384 dots max on 58mm)
//!   │
//!   │   ████████  ← Each dot is ~0.125mm (203 DPI)
//!   │   ████████
//!   ▼
//!   Y (vertical, paper feed direction)
//! ```
//!
//! ## Bit Packing
//!
//! Graphics data is packed as bytes where each bit represents one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! ```

use super::commands::{GS, u16_le};

/// Bytes before the pixel data in a raster frame.
pub const RASTER_HEADER_LEN: usize = 8;

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// Prints a raster image of arbitrary height.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `m`: Scale mode (0 = normal density)
/// - `xL, xH`: Width in bytes, little-endian
/// - `yL, yH`: Height in dots, little-endian
/// - `d1...dk`: Image data, k = width_bytes × height bytes, row-major
///
/// ## Example
///
/// ```
/// use topstart::protocol::graphics;
///
/// // 384-dot wide (48 bytes), 100-row image
/// let data = vec![0xAA; 48 * 100];
/// let cmd = graphics::raster(384, 100, &data);
///
/// assert_eq!(&cmd[0..4], &[0x1D, 0x76, 0x30, 0x00]);
/// assert_eq!(cmd[4], 48);  // xL
/// assert_eq!(cmd[5], 0);   // xH
/// assert_eq!(cmd[6], 100); // yL
/// assert_eq!(cmd[7], 0);   // yH
/// ```
pub fn raster(width_dots: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let width_bytes = width_dots.div_ceil(8);
    let expected_len = width_bytes as usize * height as usize;

    debug_assert!(
        data.len() == expected_len,
        "Raster data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        expected_len,
        width_bytes,
        height,
        data.len()
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(RASTER_HEADER_LEN + data.len());
    cmd.push(GS);
    cmd.push(b'v');
    cmd.push(b'0');
    cmd.push(0); // m = 0 (normal)
    cmd.push(xl);
    cmd.push(xh);
    cmd.push(yl);
    cmd.push(yh);
    cmd.extend_from_slice(data);
    cmd
}

/// Split packed rows into frames of at most `max_rows` rows.
///
/// Yields `(rows, data)` pairs covering `data` in order. Long images are
/// sent as several frames so each one fits the printer's receive buffer.
///
/// ## Example
///
/// ```
/// use topstart::protocol::graphics;
///
/// let data = vec![0u8; 48 * 600];
/// let chunks: Vec<_> = graphics::chunk_rows(48, &data, 256).collect();
/// let heights: Vec<u16> = chunks.iter().map(|(h, _)| *h).collect();
/// assert_eq!(heights, vec![256, 256, 88]);
/// ```
pub fn chunk_rows(
    width_bytes: usize,
    data: &[u8],
    max_rows: u16,
) -> impl Iterator<Item = (u16, &[u8])> {
    let step = (width_bytes * max_rows.max(1) as usize).max(1);
    data.chunks(step)
        .map(move |chunk| ((chunk.len() / width_bytes.max(1)) as u16, chunk))
}

// ============================================================================
// TESTS
// ============================================================================
