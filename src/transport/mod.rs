//! # Printer Transport Layer
//!
//! This module provides the backends a finished [`CommandStream`] can be
//! sent to.
//!
//! ## Available Transports
//!
//! - [`device`]: printer device node (USB line printer, serial, RFCOMM)
//! - [`file`]: raw ESC/POS bytes to a file, or a PNG of the raster frames
//!
//! ## Fallbacks
//!
//! [`FallbackTransport`] tries an ordered list of transports until one
//! accepts the job. The CLI uses `device → output file → png`, so a job is
//! never silently lost when the printer is unplugged.
//!
//! ## Copies
//!
//! A stream holds exactly one copy of a job. [`print_copies`] sends it
//! repeatedly and reports per copy, so two good copies out of three are
//! reported as such rather than as a single failure.

pub mod device;
pub mod file;

use tracing::{info, warn};

use crate::error::{Result, TopstartError};
use crate::ir::CommandStream;

pub use device::DeviceTransport;
pub use file::{FileTransport, PngTransport};

/// Something a print job can be sent to.
pub trait Transport {
    /// Short human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Deliver one complete job.
    fn send(&mut self, stream: &CommandStream) -> Result<()>;
}

/// An ordered list of transports, tried until one succeeds.
#[derive(Default)]
pub struct FallbackTransport {
    transports: Vec<Box<dyn Transport>>,
    last_used: Option<usize>,
}

impl FallbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transport to the end of the chain.
    pub fn with(mut self, transport: impl Transport + 'static) -> Self {
        self.push(Box::new(transport));
        self
    }

    pub fn push(&mut self, transport: Box<dyn Transport>) {
        self.transports.push(transport);
    }

    pub fn len(&self) -> usize {
        self.transports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    /// Name of the transport that accepted the last job.
    pub fn last_used(&self) -> Option<&str> {
        self.last_used
            .and_then(|i| self.transports.get(i))
            .map(|t| t.name())
    }
}

impl Transport for FallbackTransport {
    fn name(&self) -> &str {
        "fallback"
    }

    fn send(&mut self, stream: &CommandStream) -> Result<()> {
        let mut errors = Vec::new();

        for (i, transport) in self.transports.iter_mut().enumerate() {
            match transport.send(stream) {
                Ok(()) => {
                    info!(transport = transport.name(), "Job delivered");
                    self.last_used = Some(i);
                    return Ok(());
                }
                Err(e) => {
                    warn!(transport = transport.name(), error = %e, "Transport failed, trying next");
                    errors.push(format!("{}: {}", transport.name(), e));
                }
            }
        }

        self.last_used = None;
        if errors.is_empty() {
            return Err(TopstartError::Transport("no transport configured".into()));
        }
        Err(TopstartError::Transport(format!(
            "all transports failed ({})",
            errors.join("; ")
        )))
    }
}

/// Outcome of a multi-copy print.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyReport {
    pub requested: u32,
    pub succeeded: u32,
    /// `(copy number starting at 1, error message)` for each failed copy
    pub failures: Vec<(u32, String)>,
}

impl CopyReport {
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.requested
    }

    pub fn is_partial(&self) -> bool {
        self.succeeded > 0 && self.succeeded < self.requested
    }
}

/// Send `stream` `copies` times.
///
/// Copies go out one after another. A failed copy is recorded and the
/// remaining copies are still attempted.
pub fn print_copies(
    transport: &mut dyn Transport,
    stream: &CommandStream,
    copies: u32,
) -> CopyReport {
    let mut report = CopyReport {
        requested: copies,
        ..CopyReport::default()
    };

    for copy in 1..=copies {
        match transport.send(stream) {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                warn!(copy, of = copies, error = %e, "Copy failed");
                report.failures.push((copy, e.to_string()));
            }
        }
    }

    info!(
        requested = report.requested,
        succeeded = report.succeeded,
        transport = transport.name(),
        "Print finished"
    );
    report
}

// ============================================================================
// TESTS
// ============================================================================
