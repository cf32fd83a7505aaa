//! API key registry: static mapping from bearer key to client identity.
//!
//! Clients are loaded from a JSON file at startup. For quick setups the
//! registry can also pick up a single demo client from the `BEACON_DEMO_KEY`
//! environment variable, which mirrors how early deployments passed keys
//! through the environment.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Optional white-label branding returned to embedding widgets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branding {
    /// Product name shown in the widget header.
    pub product_name: String,
    /// Hex accent color, e.g. "#1a73e8".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

/// A single registered API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Stable identifier used for usage accounting.
    pub client_id: String,
    /// Human-readable label ("Tamed Media").
    #[serde(default)]
    pub label: String,
    /// The opaque bearer key ("sk_live_...").
    pub key: String,
    /// Domains this key may be used from. Empty = no origin lock.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Optional branding block echoed back in responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
}

/// In-memory key → client lookup table.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyRegistry {
    by_key: HashMap<String, ClientRecord>,
}

impl ApiKeyRegistry {
    /// Build a registry from a list of client records.
    ///
    /// Duplicate keys are rejected — silently shadowing a customer's key
    /// would misattribute their usage.
    pub fn from_records(records: Vec<ClientRecord>) -> Result<Self> {
        let mut by_key = HashMap::with_capacity(records.len());
        for record in records {
            if record.key.is_empty() {
                bail!("client '{}' has an empty key", record.client_id);
            }
            if let Some(prev) = by_key.insert(record.key.clone(), record) {
                bail!("duplicate API key for client '{}'", prev.client_id);
            }
        }
        Ok(Self { by_key })
    }

    /// Load the registry from a JSON file containing an array of clients.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read keys file: {}", path.display()))?;
        let records: Vec<ClientRecord> = serde_json::from_str(&data)
            .with_context(|| format!("invalid keys file: {}", path.display()))?;
        Self::from_records(records)
    }

    /// Load from the configured file, falling back to `BEACON_DEMO_KEY`.
    ///
    /// Priority:
    /// 1. keys file (if `path` is Some) — normal deployments
    /// 2. `BEACON_DEMO_KEY` env — single unrestricted demo client
    pub fn load_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        if let Ok(key) = std::env::var("BEACON_DEMO_KEY") {
            if key.len() < 8 {
                bail!("BEACON_DEMO_KEY is too short ({} chars)", key.len());
            }
            return Self::from_records(vec![ClientRecord {
                client_id: "demo".to_string(),
                label: "Demo".to_string(),
                key,
                allowed_origins: Vec::new(),
                branding: None,
            }]);
        }
        bail!(
            "no API keys configured. Set BEACON_KEYS_FILE to a JSON client list \
             or BEACON_DEMO_KEY for a single demo key."
        );
    }

    /// Look up the client record for a bearer key.
    pub fn lookup(&self, key: &str) -> Option<&ClientRecord> {
        self.by_key.get(key)
    }

    /// Number of registered clients.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Iterate over client records in unspecified order.
    pub fn clients(&self) -> impl Iterator<Item = &ClientRecord> {
        self.by_key.values()
    }
}
