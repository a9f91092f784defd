//! Reading the application log.

use crate::error::Result;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Result of a `logs` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTail {
    /// The log file does not exist yet
    Missing(PathBuf),
    /// The last lines of the log, oldest first
    Lines(Vec<String>),
}

/// Reads the last `lines` lines from a log file.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the read;
/// the application decides what it writes to its log.
pub fn tail_log(log_path: &Path, lines: usize) -> Result<Vec<String>> {
    let file = File::open(log_path)?;
    let mut reader = BufReader::new(file);

    let mut tail = VecDeque::with_capacity(lines);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if tail.len() == lines {
            tail.pop_front();
        }
        if lines > 0 {
            let line = String::from_utf8_lossy(&buf);
            tail.push_back(line.trim_end_matches(['\n', '\r']).to_string());
        }
    }

    Ok(tail.into())
}
