//! # Recent Files
//!
//! Remembers which images were printed most recently, newest first.
//! Stored on disk as a plain JSON array of paths:
//!
//! ```json
//! ["/home/me/label.png", "/home/me/receipt.jpg"]
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TopstartError};

/// Number of entries kept.
pub const MAX_ENTRIES: usize = 10;

/// Most-recent-first list of printed files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<PathBuf>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` as the most recent entry.
    ///
    /// An existing entry for the same path moves to the front instead of
    /// being duplicated. The oldest entries fall off past [`MAX_ENTRIES`].
    pub fn add<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        self.entries.retain(|p| *p != path);
        self.entries.insert(0, path);
        self.entries.truncate(MAX_ENTRIES);
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn most_recent(&self) -> Option<&Path> {
        self.entries.first().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Load history from `path`. A missing file is an empty history.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => {
                return Err(TopstartError::History(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let mut history: History = serde_json::from_str(&text).map_err(|e| {
            TopstartError::History(format!("Corrupt history file {}: {}", path.display(), e))
        })?;
        history.entries.truncate(MAX_ENTRIES);
        debug!(path = %path.display(), entries = history.len(), "Loaded history");
        Ok(history)
    }

    /// Write history to `path`, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                TopstartError::History(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TopstartError::History(format!("Failed to serialize history: {}", e)))?;
        fs::write(path, json).map_err(|e| {
            TopstartError::History(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

/// Default history location: `$XDG_STATE_HOME/topstart/history.json`,
/// falling back to `~/.local/state/topstart/history.json`.
pub fn default_path() -> Option<PathBuf> {
    let state = std::env::var_os("XDG_STATE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/state"))
        })?;
    Some(state.join("topstart").join("history.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_most_recent_first() {
        let mut history = History::new();
        history.add("a.png");
        history.add("b.png");
        assert_eq!(
            history.entries(),
            &[PathBuf::from("b.png"), PathBuf::from("a.png")]
        );
        assert_eq!(history.most_recent(), Some(Path::new("b.png")));
    }

    #[test]
    fn test_re_add_moves_to_front() {
        let mut history = History::new();
        history.add("a.png");
        history.add("b.png");
        history.add("c.png");
        history.add("a.png");
        assert_eq!(
            history.entries(),
            &[
                PathBuf::from("a.png"),
                PathBuf::from("c.png"),
                PathBuf::from("b.png")
            ]
        );
    }

    #[test]
    fn test_capped() {
        let mut history = History::new();
        for i in 0..15 {
            history.add(format!("{}.png", i));
        }
        assert_eq!(history.len(), MAX_ENTRIES);
        assert_eq!(history.most_recent(), Some(Path::new("14.png")));
        assert_eq!(history.entries()[9], PathBuf::from("5.png"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("history.json");

        let mut history = History::new();
        history.add("/tmp/one.png");
        history.add("/tmp/two.jpg");
        history.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.trim_start().starts_with('['));
        assert_eq!(History::load(&path).unwrap(), history);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::load(dir.path().join("missing.json")).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{ not a list").unwrap();
        assert!(matches!(
            History::load(&path),
            Err(TopstartError::History(_))
        ));
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.add("a.png");
        history.clear();
        assert!(history.is_empty());
    }
}
