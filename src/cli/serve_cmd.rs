//! Run the Beacon API server.

use crate::audit::AuditLogger;
use crate::auth::Authenticator;
use crate::config::Config;
use crate::fetch::PageFetcher;
use crate::registry::ApiKeyRegistry;
use crate::rest::{self, SharedState};
use crate::usage::UsageStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Start the server.
///
/// `port` overrides `BEACON_PORT`; `ephemeral` swaps the SQLite usage store
/// for an in-memory one and disables the audit log.
pub async fn run(port: Option<u16>, ephemeral: bool, verbose: bool) -> Result<()> {
    let directive = if verbose { "beacon=debug" } else { "beacon=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().expect("static directive parses")),
        )
        .init();

    let mut config = Config::from_env()?;
    if let Some(port) = port {
        config.bind.set_port(port);
    }

    let registry = ApiKeyRegistry::load_default(config.keys_file.as_deref())
        .context("failed to load API key registry")?;
    info!(
        "loaded {} client(s), starting Beacon v{}",
        registry.len(),
        env!("CARGO_PKG_VERSION")
    );

    let usage = if ephemeral {
        UsageStore::in_memory()?
    } else {
        UsageStore::open(&config.usage_db)?
    };

    let audit = if ephemeral {
        None
    } else {
        Some(AuditLogger::open(&config.audit_log)?)
    };

    let fetcher = config
        .fetch_enabled
        .then(|| PageFetcher::new(config.fetch_timeout_ms, config.max_body_bytes));
    if fetcher.is_none() {
        info!("website fetching disabled (BEACON_FETCH=0)");
    }

    let state = Arc::new(SharedState::new(
        Authenticator::new(registry),
        usage,
        audit,
        fetcher,
    ));

    rest::start(config.bind, state).await
}
