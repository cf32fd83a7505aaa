// Copyright 2026 Beacon Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for Beacon.
//!
//! Thin axum surface over the authenticator, scorer, fetcher, and usage
//! store. Responses are plain JSON; errors use the shared
//! `{"error":{"code","message"}}` shape from [`crate::error::ApiError`].

use crate::audit::AuditLogger;
use crate::auth::Authenticator;
use crate::error::ApiError;
use crate::fetch::{self, PageFetcher};
use crate::scoring::{self, ScoringInput, CATALOG, DEFAULT_TOP_N};
use crate::usage::UsageStore;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared state passed to request handlers.
pub struct SharedState {
    pub started_at: Instant,
    pub auth: Authenticator,
    /// Usage counters. rusqlite connections are not Sync, hence the lock;
    /// critical sections are single statements.
    pub usage: Mutex<UsageStore>,
    /// Audit log (None in tests and ephemeral runs without a log path).
    pub audit: Option<Mutex<AuditLogger>>,
    /// Website fetcher (None when fetching is disabled).
    pub fetcher: Option<PageFetcher>,
}

impl SharedState {
    pub fn new(
        auth: Authenticator,
        usage: UsageStore,
        audit: Option<AuditLogger>,
        fetcher: Option<PageFetcher>,
    ) -> Self {
        Self {
            started_at: Instant::now(),
            auth,
            usage: Mutex::new(usage),
            audit: audit.map(Mutex::new),
            fetcher,
        }
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<SharedState>) -> Router {
    // Per-key origin enforcement happens in the authenticator; the CORS
    // layer itself stays permissive so browsers can reach the API at all.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/recommend", post(handle_recommend))
        .route("/api/v1/usage", get(handle_usage))
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server on the given address.
pub async fn start(addr: SocketAddr, state: Arc<SharedState>) -> anyhow::Result<()> {
    let app = router(state);
    info!("Beacon API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────

/// Pull the auth and origin headers out of a request.
///
/// Origin wins over Referer when both are present.
fn auth_headers(headers: &HeaderMap) -> (Option<&str>, Option<&str>) {
    let authorization = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let origin = headers
        .get(axum::http::header::ORIGIN)
        .or_else(|| headers.get(axum::http::header::REFERER))
        .and_then(|v| v.to_str().ok());
    (authorization, origin)
}

/// Fetch one pre-vetted URL and return its signal text, or None on any
/// network/content failure (best-effort).
async fn scan_url(fetcher: &PageFetcher, url: &str) -> Option<String> {
    match fetcher.get(url).await {
        Ok(page) if page.status < 400 => {
            let text = fetch::extract_page_text(&page.body);
            Some(text.combined())
        }
        Ok(page) => {
            warn!("scan skipped: {} returned HTTP {}", page.final_url, page.status);
            None
        }
        Err(e) => {
            warn!("scan failed for {url}: {e:#}");
            None
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn handle_status(State(state): State<Arc<SharedState>>) -> Json<Value> {
    let uptime_s = state.started_at.elapsed().as_secs_f64();
    let clients = state.auth.registry().len();
    let total_requests = {
        let usage = state.usage.lock().await;
        usage.total().unwrap_or(0)
    };

    Json(serde_json::json!({
        "running": true,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": uptime_s,
        "clients": clients,
        "requests_served": total_requests,
        "fetch_enabled": state.fetcher.is_some(),
    }))
}

/// Body of a recommend call.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub company_name: String,
    pub industry: String,
    #[serde(default)]
    pub company_size: String,
    pub goal: String,
    /// Company website to scan for signals.
    #[serde(default)]
    pub website_url: Option<String>,
    /// Page embedding the widget, scanned as a secondary signal source.
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
    /// Set false to skip fetching even when URLs are supplied.
    #[serde(default)]
    pub scan_site: Option<bool>,
}

async fn handle_recommend(
    State(state): State<Arc<SharedState>>,
    headers: HeaderMap,
    Json(body): Json<RecommendRequest>,
) -> Result<Json<Value>, ApiError> {
    let begun = Instant::now();
    let (authorization, origin) = auth_headers(&headers);
    let client = state.auth.authenticate(authorization, origin)?.clone();

    if body.industry.trim().is_empty() {
        return Err(ApiError::InvalidParams("'industry' must not be empty".into()));
    }
    if body.goal.trim().is_empty() {
        return Err(ApiError::InvalidParams("'goal' must not be empty".into()));
    }

    // Best-effort site scan: guard violations are caller errors, but network
    // and parse failures just degrade to industry/goal scoring.
    let scan_requested = body.scan_site.unwrap_or(true);
    let mut site_text = String::new();
    let mut site_scanned = false;
    if scan_requested {
        if let Some(fetcher) = &state.fetcher {
            let mut targets = Vec::new();
            for raw_url in [&body.website_url, &body.page_url].into_iter().flatten() {
                targets.push(fetch::validate_target(raw_url)?);
            }
            let scans = futures::future::join_all(
                targets.iter().map(|url| scan_url(fetcher, url.as_str())),
            )
            .await;
            for text in scans.into_iter().flatten() {
                site_text.push_str(&text);
                site_text.push(' ');
                site_scanned = true;
            }
        }
    }

    let scoring_input = ScoringInput {
        industry: body.industry.clone(),
        goal: body.goal.clone(),
        company_size: body.company_size.clone(),
        site_text: if site_scanned { Some(site_text) } else { None },
    };
    let top_n = body
        .max_results
        .unwrap_or(DEFAULT_TOP_N)
        .clamp(1, CATALOG.len());
    let ranked = scoring::score_services(&scoring_input, top_n);

    let requests = {
        let mut usage = state.usage.lock().await;
        usage.record(&client.client_id)?
    };

    if let Some(audit) = &state.audit {
        let mut audit = audit.lock().await;
        if let Err(e) = audit.log_call(
            &client.client_id,
            "recommend",
            body.website_url.as_deref(),
            origin,
            begun.elapsed().as_millis() as u64,
            "ok",
        ) {
            warn!("audit write failed: {e:#}");
        }
    }

    info!(
        client = %client.client_id,
        company = %body.company_name,
        results = ranked.len(),
        site_scanned,
        "recommend served"
    );

    let mut response = serde_json::json!({
        "client": client.client_id,
        "recommended_services": ranked,
        "site_scanned": site_scanned,
        "usage": { "requests": requests },
    });
    if let Some(branding) = &client.branding {
        response["branding"] = serde_json::to_value(branding).unwrap_or(Value::Null);
    }
    Ok(Json(response))
}

async fn handle_usage(
    State(state): State<Arc<SharedState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let (authorization, origin) = auth_headers(&headers);
    let client = state.auth.authenticate(authorization, origin)?.clone();

    // Every authenticated call is billed, reads included.
    let requests = {
        let mut usage = state.usage.lock().await;
        usage.record(&client.client_id)?
    };

    Ok(Json(serde_json::json!({
        "client": client.client_id,
        "requests": requests,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{AUTHORIZATION, ORIGIN, REFERER};

    #[test]
    fn test_auth_headers_prefers_origin() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer sk_x".parse().unwrap());
        headers.insert(ORIGIN, "https://a.com".parse().unwrap());
        headers.insert(REFERER, "https://b.com/page".parse().unwrap());

        let (auth, origin) = auth_headers(&headers);
        assert_eq!(auth, Some("Bearer sk_x"));
        assert_eq!(origin, Some("https://a.com"));
    }

    #[test]
    fn test_auth_headers_falls_back_to_referer() {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, "https://b.com/page".parse().unwrap());
        let (auth, origin) = auth_headers(&headers);
        assert_eq!(auth, None);
        assert_eq!(origin, Some("https://b.com/page"));
    }
}
