//! # ESC/POS Control Commands
//!
//! This module implements the fixed control sequences a print job needs on
//! generic ESC/POS thermal printers (58mm and 80mm receipt printers).
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Two bytes: `ESC @`
//! - Three bytes with a parameter: `ESC 3 n`, `ESC a n`, `ESC d n`, `GS V m`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`
//!
//! ## Job Framing
//!
//! | Command | Bytes | Meaning |
//! |---------|-------|---------|
//! | [`init`] | `1B 40` | reset printer state |
//! | [`line_spacing`]`(0)` | `1B 33 00` | no gap between raster rows |
//! | [`align_left`] | `1B 61 00` | left-align subsequent content |
//! | [`feed_lines`]`(2)` | `1B 64 02` | feed 2 lines |
//! | [`cut`] | `1D 56 00` | cut the paper |
//!
//! These exact sequences are what the supported printers expect; changing
//! them breaks hardware compatibility.

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for graphics and cutter commands.
pub const GS: u8 = 0x1D;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state. Sent at the start of
/// every job so settings left over from a previous job cannot leak in.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ## Example
///
/// ```
/// use topstart::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// LAYOUT COMMANDS
// ============================================================================

/// # Set Line Spacing (ESC 3 n)
///
/// Sets the line spacing to `n` motion units. Zero keeps consecutive raster
/// frames touching, without white seams between them.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC 3 n  |
/// | Hex     | 1B 33 n  |
#[inline]
pub fn line_spacing(n: u8) -> Vec<u8> {
    vec![ESC, b'3', n]
}

/// Text and graphics justification for [`align`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// # Select Justification (ESC a n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
///
/// `n` = 0 left, 1 center, 2 right.
#[inline]
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

/// Left justification (`1B 61 00`).
#[inline]
pub fn align_left() -> Vec<u8> {
    align(Alignment::Left)
}

// ============================================================================
// PAPER FEED AND CUTTER COMMANDS
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// Prints the buffer and feeds `n` lines. Two lines are enough to move the
/// last printed row past the tear bar on most 58mm mechanisms.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC d n  |
/// | Hex     | 1B 64 n  |
///
/// ## Example
///
/// ```
/// use topstart::protocol::commands;
///
/// assert_eq!(commands::feed_lines(2), vec![0x1B, 0x64, 0x02]);
/// ```
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

/// # Cut Paper (GS V 0)
///
/// Cuts at the current position. Printers without a cutter ignore it.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 0   |
/// | Hex     | 1D 56 00 |
#[inline]
pub fn cut() -> Vec<u8> {
    vec![GS, b'V', 0]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ## Example
///
/// ```
/// use topstart::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(384), [0x80, 0x01]); // 384 = 0x0180
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_line_spacing_zero() {
        assert_eq!(line_spacing(0), vec![0x1B, 0x33, 0x00]);
    }

    #[test]
    fn test_align() {
        assert_eq!(align_left(), vec![0x1B, 0x61, 0x00]);
        assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
        assert_eq!(align(Alignment::Right), vec![0x1B, 0x61, 0x02]);
    }

    #[test]
    fn test_feed_lines() {
        assert_eq!(feed_lines(2), vec![0x1B, 0x64, 0x02]);
        assert_eq!(feed_lines(0), vec![0x1B, 0x64, 0x00]);
    }

    #[test]
    fn test_cut() {
        assert_eq!(cut(), vec![0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x0000), [0x00, 0x00]);
        assert_eq!(u16_le(0x00FF), [0xFF, 0x00]);
        assert_eq!(u16_le(0xFF00), [0x00, 0xFF]);
        assert_eq!(u16_le(48), [0x30, 0x00]); // 384 dots = 48 bytes
    }
}
