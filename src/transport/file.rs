//! # File Transports
//!
//! Last-resort destinations when no printer answers.
//!
//! - [`FileTransport`] dumps the raw ESC/POS bytes, which can later be sent
//!   with `cat job.bin > /dev/usb/lp0`.
//! - [`PngTransport`] renders the raster frames to a PNG that can be printed
//!   from any image viewer.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Transport;
use crate::error::{Result, TopstartError};
use crate::ir::CommandStream;

/// Writes the raw job bytes to a file, replacing its contents.
#[derive(Debug, Clone)]
pub struct FileTransport {
    path: PathBuf,
}

impl FileTransport {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Transport for FileTransport {
    fn name(&self) -> &str {
        "file"
    }

    fn send(&mut self, stream: &CommandStream) -> Result<()> {
        let data = stream.to_bytes();
        fs::write(&self.path, &data).map_err(|e| {
            TopstartError::Transport(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), bytes = data.len(), "Wrote job to file");
        Ok(())
    }
}

/// Saves a PNG of what the job would print.
#[derive(Debug, Clone)]
pub struct PngTransport {
    path: PathBuf,
}

impl PngTransport {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Transport for PngTransport {
    fn name(&self) -> &str {
        "png"
    }

    fn send(&mut self, stream: &CommandStream) -> Result<()> {
        let png = stream
            .to_preview_png()
            .map_err(|e| TopstartError::Transport(format!("No preview: {}", e)))?;
        fs::write(&self.path, &png).map_err(|e| {
            TopstartError::Transport(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), bytes = png.len(), "Saved job preview");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Op;
    use crate::printer::PrinterConfig;
    use crate::raster::{ColorMode, Raster};
    use pretty_assertions::assert_eq;

    fn job(height: u32) -> CommandStream {
        let img = Raster::blank(384, height, ColorMode::Bilevel).unwrap();
        CommandStream::encode(&img, &PrinterConfig::THERMAL_58MM).unwrap()
    }

    #[test]
    fn test_file_gets_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.bin");
        let stream = job(20);

        let mut t = FileTransport::new(&path);
        t.send(&stream).unwrap();
        assert_eq!(fs::read(&path).unwrap(), stream.to_bytes());

        // Overwritten, not appended
        t.send(&stream).unwrap();
        assert_eq!(fs::read(&path).unwrap().len(), stream.to_bytes().len());
    }

    #[test]
    fn test_file_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = FileTransport::new(dir.path().join("missing").join("job.bin"));
        assert!(matches!(
            t.send(&job(1)),
            Err(TopstartError::Transport(_))
        ));
    }

    #[test]
    fn test_png_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.png");

        PngTransport::new(&path).send(&job(300)).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (384, 300));
    }

    #[test]
    fn test_png_without_raster_fails() {
        let dir = tempfile::tempdir().unwrap();
        let stream: CommandStream = vec![Op::Init, Op::Cut].into_iter().collect();
        let mut t = PngTransport::new(dir.path().join("job.png"));
        assert!(matches!(t.send(&stream), Err(TopstartError::Transport(_))));
    }
}
