//! Environment-driven configuration.
//!
//! All knobs come from `BEACON_*` variables with sane defaults; data files
//! live under `~/.beacon/`.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default per-fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
/// Default response body cap (2 MB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the REST API binds to.
    pub bind: SocketAddr,
    /// Path to the JSON client registry (None → BEACON_DEMO_KEY fallback).
    pub keys_file: Option<PathBuf>,
    /// Path to the SQLite usage store.
    pub usage_db: PathBuf,
    /// Path to the JSONL audit log.
    pub audit_log: PathBuf,
    /// Whether the recommend endpoint may fetch target websites.
    pub fetch_enabled: bool,
    /// Per-fetch timeout in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Maximum bytes read from a fetched body.
    pub max_body_bytes: usize,
}

fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".beacon")
}

impl Config {
    /// Resolve configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("BEACON_PORT") {
            Ok(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("BEACON_PORT is not a valid port: '{v}'"))?,
            Err(_) => DEFAULT_PORT,
        };
        let host = std::env::var("BEACON_BIND").unwrap_or_else(|_| "127.0.0.1".to_string());
        let bind: SocketAddr = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("invalid bind address '{host}:{port}'"))?;

        let keys_file = std::env::var("BEACON_KEYS_FILE").ok().map(PathBuf::from);

        let usage_db = std::env::var("BEACON_USAGE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir().join("usage.db"));

        let audit_log = std::env::var("BEACON_AUDIT_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir().join("audit.jsonl"));

        let fetch_enabled = std::env::var("BEACON_FETCH")
            .map(|v| v.trim() != "0" && !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        let fetch_timeout_ms = std::env::var("BEACON_FETCH_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_MS);

        let max_body_bytes = std::env::var("BEACON_MAX_BODY_BYTES")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        Ok(Self {
            bind,
            keys_file,
            usage_db,
            audit_log,
            fetch_enabled,
            fetch_timeout_ms,
            max_body_bytes,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            keys_file: None,
            usage_db: data_dir().join("usage.db"),
            audit_log: data_dir().join("audit.jsonl"),
            fetch_enabled: true,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
