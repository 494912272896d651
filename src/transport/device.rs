//! # Device Transport
//!
//! Writes print jobs straight to a printer device node:
//!
//! | Connection | Typical path |
//! |------------|--------------|
//! | USB printer class | `/dev/usb/lp0` |
//! | USB serial adapter | `/dev/ttyUSB0` |
//! | Bluetooth SPP | `/dev/rfcomm0` |
//!
//! ## TTY Configuration
//!
//! Serial devices (anything that answers `isatty`) are switched to raw mode
//! before the first write, so binary raster data is transmitted unmodified:
//!
//! - **No input processing**: Disable IGNBRK, BRKINT, PARMRK, ISTRIP, etc.
//! - **No output processing**: Disable OPOST (no CR/LF translation)
//! - **8-bit characters**: CS8 (8 data bits, no parity)
//! - **No echo**: Disable ECHO, ECHONL
//! - **Non-canonical mode**: Disable ICANON (no line buffering)
//!
//! USB printer-class nodes are not TTYs and are written as-is.
//!
//! ## Chunked Writes
//!
//! Large jobs are written in chunks with a short pause between them so
//! cheap printers with small receive buffers keep up.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::Transport;
use crate::error::{Result, TopstartError};
use crate::ir::CommandStream;

/// Default device path
pub const DEFAULT_DEVICE: &str = "/dev/usb/lp0";

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// # Device Transport
///
/// The device is opened per job, so a printer that is switched off and on
/// between copies is picked up again.
///
/// ## Example
///
/// ```no_run
/// use topstart::ir::{CommandStream, Op};
/// use topstart::transport::{DeviceTransport, Transport};
///
/// let mut printer = DeviceTransport::new("/dev/usb/lp0");
/// let job: CommandStream = vec![Op::Init, Op::Cut].into_iter().collect();
/// printer.send(&job)?;
/// # Ok::<(), topstart::error::TopstartError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DeviceTransport {
    path: PathBuf,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl DeviceTransport {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the chunk size for large writes. Default is 4096 bytes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks. Default is 2ms.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    /// Open the device for writing, in raw mode if it is a TTY.
    fn open(&self) -> Result<File> {
        let file = OpenOptions::new().write(true).open(&self.path).map_err(|e| {
            TopstartError::Transport(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        if make_raw_if_tty(&file)? {
            debug!(device = %self.path.display(), "Configured raw TTY");
        }

        Ok(file)
    }

    /// Write `data` to `out`, chunked.
    fn write_chunked<W: Write>(&self, out: &mut W, data: &[u8]) -> Result<()> {
        if data.len() <= self.chunk_size {
            out.write_all(data)
                .map_err(|e| TopstartError::Transport(format!("Write failed: {}", e)))?;
        } else {
            for chunk in data.chunks(self.chunk_size) {
                out.write_all(chunk)
                    .map_err(|e| TopstartError::Transport(format!("Write failed: {}", e)))?;

                if !self.chunk_delay.is_zero() {
                    thread::sleep(self.chunk_delay);
                }
            }
        }

        out.flush()
            .map_err(|e| TopstartError::Transport(format!("Flush failed: {}", e)))
    }
}

impl Default for DeviceTransport {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE)
    }
}

impl Transport for DeviceTransport {
    fn name(&self) -> &str {
        "device"
    }

    fn send(&mut self, stream: &CommandStream) -> Result<()> {
        let data = stream.to_bytes();
        let mut file = self.open()?;
        self.write_chunked(&mut file, &data)?;
        debug!(device = %self.path.display(), bytes = data.len(), "Wrote job to device");
        Ok(())
    }
}

/// Switch `file` to raw mode if it is a TTY. Returns whether it was one.
#[cfg(unix)]
fn make_raw_if_tty(file: &File) -> Result<bool> {
    use std::os::unix::io::AsRawFd;

    let fd = file.as_raw_fd();
    if unsafe { libc::isatty(fd) } != 1 {
        return Ok(false);
    }
    configure_tty_raw(fd)?;
    Ok(true)
}

/// Without termios every device is written as-is.
#[cfg(not(unix))]
fn make_raw_if_tty(_file: &File) -> Result<bool> {
    Ok(false)
}

/// Configure a file descriptor for raw TTY mode.
///
/// Note: IXON/IXOFF/IXANY disable XON/XOFF software flow control. 0x11 and
/// 0x13 appear in raster data all the time.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> Result<()> {
    use std::io;
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(TopstartError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    // Input flags: disable all processing
    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    // Output flags: disable post-processing
    termios.c_oflag &= !libc::OPOST;

    // Local flags: disable echo, canonical mode, signals
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    // Control flags: 8-bit characters, no parity
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(TopstartError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Op;
    use std::io;

    /// Counts individual `write` calls.
    #[derive(Default)]
    struct Recorder {
        writes: Vec<usize>,
        data: Vec<u8>,
    }

    impl Write for Recorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes.push(buf.len());
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn quick(chunk: usize) -> DeviceTransport {
        let mut t = DeviceTransport::new("/dev/null");
        t.set_chunk_size(chunk);
        t.set_chunk_delay(Duration::ZERO);
        t
    }

    #[test]
    fn test_small_write_is_single() {
        let mut out = Recorder::default();
        quick(16).write_chunked(&mut out, &[1, 2, 3]).unwrap();
        assert_eq!(out.writes, vec![3]);
    }

    #[test]
    fn test_large_write_is_chunked() {
        let mut out = Recorder::default();
        let data: Vec<u8> = (0..40).collect();
        quick(16).write_chunked(&mut out, &data).unwrap();
        assert_eq!(out.writes, vec![16, 16, 8]);
        assert_eq!(out.data, data);
    }

    #[test]
    fn test_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = DeviceTransport::new(dir.path().join("lp9"));
        let job: CommandStream = vec![Op::Init].into_iter().collect();
        assert!(matches!(t.send(&job), Err(TopstartError::Transport(_))));
    }

    #[test]
    fn test_regular_file_is_not_tty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake-lp");
        std::fs::write(&path, b"").unwrap();

        let mut t = DeviceTransport::new(&path);
        let job: CommandStream = vec![Op::Init, Op::Cut].into_iter().collect();
        t.send(&job).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), job.to_bytes());
    }

    #[test]
    fn test_regular_file_stays_cooked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake-lp");
        let file = File::create(&path).unwrap();
        assert!(!make_raw_if_tty(&file).unwrap());
    }
}
