//! PID file handling.
//!
//! The PID file is the only record of which process is managed. It holds the
//! decimal process identifier as text.

use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What the PID file currently says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PidRecord {
    /// No PID file exists
    Absent,
    /// The file holds a usable process identifier
    Valid(u32),
    /// The file exists but its content is not a usable identifier
    Invalid(String),
}

/// Location of the PID file plus read/write/remove helpers.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads and classifies the PID file.
    ///
    /// Read failures other than "not found" are reported as
    /// [`PidRecord::Invalid`] so callers treat them like any other stale
    /// record.
    pub fn read(&self) -> PidRecord {
        match fs::read_to_string(&self.path) {
            Ok(content) => match parse_pid(&content) {
                Some(pid) => PidRecord::Valid(pid),
                None => PidRecord::Invalid(content.trim().to_string()),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => PidRecord::Absent,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read PID file");
                PidRecord::Invalid(format!("<unreadable: {}>", e))
            }
        }
    }

    /// Records `pid`, creating the parent directory if needed.
    pub fn write(&self, pid: u32) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{}\n", pid))?;
        Ok(())
    }

    /// Deletes the PID file. A file that is already gone is not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Parses PID file content.
///
/// Only positive identifiers that fit a signed 32-bit pid are accepted; zero
/// and negative values would address process groups when signalled.
pub fn parse_pid(content: &str) -> Option<u32> {
    let pid: u32 = content.trim().parse().ok()?;
    (pid > 0 && i32::try_from(pid).is_ok()).then_some(pid)
}
