//! JSONL audit log — append-only record of recommendation calls.
//!
//! Features:
//! - Append-only JSONL format for easy parsing
//! - Automatic log rotation when the file exceeds `MAX_LOG_SIZE`
//! - Rotated files named `.1`, `.2`, etc. (max 5 rotations)

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

/// Maximum audit log size before rotation (50 MB).
const MAX_LOG_SIZE: u64 = 50 * 1024 * 1024;

/// Maximum number of rotated log files to keep.
const MAX_ROTATIONS: u32 = 5;

/// A single audit event.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub timestamp: String,
    /// Random ID so support can correlate a customer report with one line.
    pub request_id: String,
    pub client_id: String,
    pub endpoint: String,
    pub target_url: Option<String>,
    pub origin: Option<String>,
    pub duration_ms: u64,
    pub status: String,
}

/// Append-only JSONL audit logger with automatic rotation.
pub struct AuditLogger {
    file: File,
    path: PathBuf,
    /// Approximate current size (may drift slightly; re-checked on rotation).
    current_size: u64,
    /// Rotation threshold, `MAX_LOG_SIZE` outside of tests.
    max_size: u64,
}

impl AuditLogger {
    /// Open or create the audit log file.
    pub fn open(path: &PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open audit log: {}", path.display()))?;

        let current_size = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            file,
            path: path.clone(),
            current_size,
            max_size: MAX_LOG_SIZE,
        })
    }

    /// Open the default audit log at ~/.beacon/audit.jsonl.
    pub fn default_logger() -> Result<Self> {
        let path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".beacon")
            .join("audit.jsonl");
        Self::open(&path)
    }

    /// Log an audit event. Write failures are returned, not swallowed, so
    /// callers can report a broken audit trail.
    pub fn log(&mut self, event: &AuditEvent) -> Result<()> {
        if self.current_size >= self.max_size {
            self.rotate()?;
        }

        let json = serde_json::to_string(event)?;
        writeln!(self.file, "{json}")
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        self.current_size += json.len() as u64 + 1;
        Ok(())
    }

    /// Log an endpoint call with timing.
    pub fn log_call(
        &mut self,
        client_id: &str,
        endpoint: &str,
        target_url: Option<&str>,
        origin: Option<&str>,
        duration_ms: u64,
        status: &str,
    ) -> Result<()> {
        self.log(&AuditEvent {
            timestamp: Utc::now().to_rfc3339(),
            request_id: Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            endpoint: endpoint.to_string(),
            target_url: target_url.map(String::from),
            origin: origin.map(String::from),
            duration_ms,
            status: status.to_string(),
        })
    }

    /// Rotate log files: audit.jsonl → audit.jsonl.1, .1 → .2, etc.
    fn rotate(&mut self) -> Result<()> {
        self.file.flush()?;

        for i in (1..MAX_ROTATIONS).rev() {
            let from = rotation_path(&self.path, i);
            let to = rotation_path(&self.path, i + 1);
            if from.exists() {
                let _ = std::fs::rename(&from, &to);
            }
        }

        let first_rotation = rotation_path(&self.path, 1);
        let _ = std::fs::rename(&self.path, &first_rotation);

        let oldest = rotation_path(&self.path, MAX_ROTATIONS);
        if oldest.exists() {
            let _ = std::fs::remove_file(&oldest);
        }

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| "failed to reopen audit log after rotation")?;
        self.current_size = 0;

        Ok(())
    }
}

/// Build path for a rotated log file: `audit.jsonl.1`, `audit.jsonl.2`, etc.
fn rotation_path(base: &std::path::Path, index: u32) -> PathBuf {
    let name = format!(
        "{}.{index}",
        base.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audit.jsonl")
    );
    base.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_appends_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut logger = AuditLogger::open(&path).unwrap();

        logger
            .log_call("demo", "recommend", Some("https://example.com"), None, 42, "ok")
            .unwrap();
        logger
            .log_call("demo", "usage", None, None, 1, "ok")
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert!(first["request_id"].as_str().is_some());
        assert_eq!(first["client_id"], "demo");
        assert_eq!(first["endpoint"], "recommend");
        assert_eq!(first["target_url"], "https://example.com");
        assert_eq!(first["duration_ms"], 42);
    }

    #[test]
    fn test_write_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut logger = AuditLogger::open(&path).unwrap();

        // Swap in a read-only handle so the append fails.
        logger.file = File::open(&path).unwrap();
        assert!(logger
            .log_call("demo", "recommend", None, None, 1, "ok")
            .is_err());
    }

    #[test]
    fn test_rotates_past_max_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut logger = AuditLogger::open(&path).unwrap();
        logger.max_size = 1;

        logger.log_call("demo", "recommend", None, None, 1, "ok").unwrap();
        logger.log_call("demo", "recommend", None, None, 2, "ok").unwrap();

        assert!(rotation_path(&path, 1).exists());
        let current = std::fs::read_to_string(&path).unwrap();
        assert_eq!(current.lines().count(), 1);
    }

    #[test]
    fn test_rotation_path_naming() {
        let base = PathBuf::from("/tmp/audit.jsonl");
        assert_eq!(rotation_path(&base, 1), PathBuf::from("/tmp/audit.jsonl.1"));
        assert_eq!(rotation_path(&base, 3), PathBuf::from("/tmp/audit.jsonl.3"));
    }
}
