//! # Command Stream Ops
//!
//! The ordered sequence of protocol frames that makes up one print job.
//!
//! Each op is a single, atomic printer command. A [`CommandStream`] can be
//! inspected (`{:#?}`), counted in tests, rendered back to a preview, and
//! compiled to ESC/POS bytes.

use crate::protocol::commands::Alignment;

/// One protocol frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    // ========== Printer Control ==========
    /// Initialize printer (ESC @). Resets to default state.
    Init,

    /// Line spacing in motion units (ESC 3 n).
    LineSpacing(u8),

    /// Justification (ESC a n).
    Align(Alignment),

    // ========== Graphics ==========
    /// Raster bit image (GS v 0). `data` is `ceil(width/8) × height` bytes.
    Raster {
        width: u16,
        height: u16,
        data: Vec<u8>,
    },

    // ========== Paper Handling ==========
    /// Print and feed n lines (ESC d n).
    Feed { lines: u8 },

    /// Cut paper (GS V 0).
    Cut,
}

impl Op {
    #[inline]
    pub fn is_raster(&self) -> bool {
        matches!(self, Op::Raster { .. })
    }
}

/// An ordered sequence of ops for one print job.
///
/// Built once per job, handed to a transport, then dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandStream {
    pub ops: Vec<Op>,
}

impl CommandStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Add an op to the stream.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Add multiple ops to the stream.
    pub fn extend(&mut self, ops: impl IntoIterator<Item = Op>) {
        self.ops.extend(ops);
    }

    /// Get the number of ops in the stream.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the stream is empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over ops.
    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter()
    }

    /// Number of ops matching `pred`.
    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Total rows carried by raster frames.
    pub fn raster_height(&self) -> u32 {
        self.ops
            .iter()
            .map(|op| match op {
                Op::Raster { height, .. } => *height as u32,
                _ => 0,
            })
            .sum()
    }
}

impl FromIterator<Op> for CommandStream {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CommandStream {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a CommandStream {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_new() {
        let stream = CommandStream::new();
        assert!(stream.is_empty());
    }

    #[test]
    fn test_stream_push_and_count() {
        let mut stream = CommandStream::new();
        stream.push(Op::Init);
        stream.push(Op::Feed { lines: 2 });
        stream.push(Op::Cut);
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.count(|op| *op == Op::Cut), 1);
    }

    #[test]
    fn test_raster_height() {
        let stream: CommandStream = vec![
            Op::Init,
            Op::Raster { width: 8, height: 3, data: vec![0; 3] },
            Op::Raster { width: 8, height: 2, data: vec![0; 2] },
            Op::Cut,
        ]
        .into_iter()
        .collect();
        assert_eq!(stream.raster_height(), 5);
        assert_eq!(stream.count(Op::is_raster), 2);
    }
}
