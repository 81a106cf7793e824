// src/utils/log.rs

//! Plain-text run log.
//!
//! Console logging goes through the `log` macros and `env_logger`; this
//! module handles the separate run log file that accumulates one summary
//! per scheduled invocation.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;

/// Appender for the run log file.
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Create an appender for the given log file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one timestamped line to the log file.
    pub fn line(&self, message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let stamped = format!(
            "[{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        );
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(stamped.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_are_appended() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("run.log");
        let run_log = RunLog::new(&path);

        run_log.line("first run").unwrap();
        run_log.line("second run").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("first run"));
        assert!(lines[1].contains("second run"));
    }

    #[test]
    fn test_creates_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logs").join("run.log");
        RunLog::new(&path).line("hello").unwrap();
        assert!(path.exists());
    }
}
