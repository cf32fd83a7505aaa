//! List configured API clients.

use crate::config::Config;
use crate::registry::ApiKeyRegistry;
use anyhow::Result;

/// Mask a key for display: keep the prefix, drop the secret tail.
fn mask_key(key: &str) -> String {
    if key.chars().count() <= 8 {
        return "****".to_string();
    }
    let prefix: String = key.chars().take(8).collect();
    format!("{prefix}…")
}

pub fn run(json: bool) -> Result<()> {
    let config = Config::from_env()?;
    let registry = ApiKeyRegistry::load_default(config.keys_file.as_deref())?;

    let mut clients: Vec<_> = registry.clients().collect();
    clients.sort_by(|a, b| a.client_id.cmp(&b.client_id));

    if json {
        let list: Vec<serde_json::Value> = clients
            .iter()
            .map(|c| {
                serde_json::json!({
                    "client_id": c.client_id,
                    "label": c.label,
                    "key": mask_key(&c.key),
                    "allowed_origins": c.allowed_origins,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for client in clients {
        let origins = if client.allowed_origins.is_empty() {
            "any origin".to_string()
        } else {
            client.allowed_origins.join(", ")
        };
        println!(
            "  {:<16} {:<12} {}",
            client.client_id,
            mask_key(&client.key),
            origins
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key_keeps_prefix_only() {
        assert_eq!(mask_key("sk_live_abc12345"), "sk_live_…");
        assert_eq!(mask_key("short"), "****");
    }
}
