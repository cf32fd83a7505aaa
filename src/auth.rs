//! Bearer-token authentication and per-key origin locks.
//!
//! A request authenticates with `Authorization: Bearer <key>`. If the matched
//! client carries an allowed-origin list, the request's `Origin` header (or
//! `Referer`, when no `Origin` is present) must point at one of those domains.
//! Requests without either header pass the lock — server-to-server callers
//! have no origin to present.

use crate::registry::{ApiKeyRegistry, ClientRecord};
use thiserror::Error;
use url::Url;

/// Authentication failures, split by the HTTP status they map to.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No Authorization header at all → 401.
    #[error("missing API key")]
    MissingKey,
    /// Header present but not `Bearer <token>` → 401.
    #[error("invalid authorization format, expected 'Bearer <key>'")]
    MalformedHeader,
    /// Well-formed key that is not in the registry → 403.
    #[error("invalid API key")]
    UnknownKey,
    /// Key is valid but locked to other origins → 403.
    #[error("API key is not allowed from origin '{0}'")]
    OriginDenied(String),
}

/// Extract the bearer token from an Authorization header value.
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Pull the host out of an Origin/Referer header value.
///
/// Accepts full URLs ("https://app.example.com/page") and bare hosts
/// ("app.example.com"). Returns None for values with no usable host.
fn origin_host(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        if let Some(host) = url.host_str() {
            return Some(host.to_ascii_lowercase());
        }
    }
    // Bare host, possibly with a port
    let host = trimmed
        .split('/')
        .next()
        .unwrap_or(trimmed)
        .split(':')
        .next()
        .unwrap_or(trimmed);
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

/// True if `host` is `domain` or a subdomain of it.
fn host_matches(host: &str, domain: &str) -> bool {
    let domain = domain.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Validates bearer keys against the registry and enforces origin locks.
#[derive(Debug, Clone)]
pub struct Authenticator {
    registry: ApiKeyRegistry,
}

impl Authenticator {
    pub fn new(registry: ApiKeyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ApiKeyRegistry {
        &self.registry
    }

    /// Authenticate a request.
    ///
    /// `origin` should be the `Origin` header when present, otherwise the
    /// `Referer` header, otherwise None.
    pub fn authenticate(
        &self,
        authorization: Option<&str>,
        origin: Option<&str>,
    ) -> Result<&ClientRecord, AuthError> {
        let header = authorization.ok_or(AuthError::MissingKey)?;
        let token = parse_bearer(header)?;
        let client = self.registry.lookup(token).ok_or(AuthError::UnknownKey)?;

        if client.allowed_origins.is_empty() {
            return Ok(client);
        }

        let Some(host) = origin.and_then(origin_host) else {
            // No origin to check — headless/server-side caller.
            return Ok(client);
        };

        if client
            .allowed_origins
            .iter()
            .any(|domain| host_matches(&host, domain))
        {
            Ok(client)
        } else {
            Err(AuthError::OriginDenied(host))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClientRecord;

    fn authenticator() -> Authenticator {
        let records = vec![
            ClientRecord {
                client_id: "open".to_string(),
                label: String::new(),
                key: "sk_open".to_string(),
                allowed_origins: Vec::new(),
                branding: None,
            },
            ClientRecord {
                client_id: "locked".to_string(),
                label: String::new(),
                key: "sk_locked".to_string(),
                allowed_origins: vec!["example.com".to_string()],
                branding: None,
            },
        ];
        Authenticator::new(ApiKeyRegistry::from_records(records).unwrap())
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer sk_x"), Ok("sk_x"));
        assert_eq!(parse_bearer("bearer sk_x"), Err(AuthError::MalformedHeader));
        assert_eq!(parse_bearer("Bearer"), Err(AuthError::MalformedHeader));
        assert_eq!(
            parse_bearer("Bearer a b"),
            Err(AuthError::MalformedHeader)
        );
    }

    #[test]
    fn test_missing_and_malformed() {
        let auth = authenticator();
        assert_eq!(
            auth.authenticate(None, None).unwrap_err(),
            AuthError::MissingKey
        );
        assert_eq!(
            auth.authenticate(Some("Token sk_open"), None).unwrap_err(),
            AuthError::MalformedHeader
        );
    }

    #[test]
    fn test_unknown_key() {
        let auth = authenticator();
        assert_eq!(
            auth.authenticate(Some("Bearer sk_nope"), None).unwrap_err(),
            AuthError::UnknownKey
        );
    }

    #[test]
    fn test_unlocked_key_ignores_origin() {
        let auth = authenticator();
        let client = auth
            .authenticate(Some("Bearer sk_open"), Some("https://anywhere.io"))
            .unwrap();
        assert_eq!(client.client_id, "open");
    }

    #[test]
    fn test_origin_lock_allows_listed_domain_and_subdomains() {
        let auth = authenticator();
        for origin in [
            "https://example.com",
            "https://app.example.com/widget",
            "example.com",
        ] {
            let client = auth
                .authenticate(Some("Bearer sk_locked"), Some(origin))
                .unwrap();
            assert_eq!(client.client_id, "locked");
        }
    }

    #[test]
    fn test_origin_lock_denies_other_domains() {
        let auth = authenticator();
        let err = auth
            .authenticate(Some("Bearer sk_locked"), Some("https://evil.io"))
            .unwrap_err();
        assert_eq!(err, AuthError::OriginDenied("evil.io".to_string()));

        // Suffix tricks don't count as subdomains
        let err = auth
            .authenticate(Some("Bearer sk_locked"), Some("https://notexample.com"))
            .unwrap_err();
        assert!(matches!(err, AuthError::OriginDenied(_)));
    }

    #[test]
    fn test_origin_lock_passes_headless_callers() {
        let auth = authenticator();
        assert!(auth.authenticate(Some("Bearer sk_locked"), None).is_ok());
        assert!(auth
            .authenticate(Some("Bearer sk_locked"), Some("null"))
            .is_ok());
    }
}
