//! One-shot recommendation from the command line.
//!
//! Runs the same fetch → scan → score pipeline as the API, without auth or
//! usage accounting. Handy for tuning the catalog.

use crate::config::Config;
use crate::fetch::{self, PageFetcher};
use crate::scoring::{self, ScoringInput, DEFAULT_TOP_N};
use anyhow::Result;

pub async fn run(
    industry: &str,
    goal: &str,
    company_size: &str,
    url: Option<&str>,
    max_results: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = Config::from_env().unwrap_or_default();

    let mut site_text = None;
    if let Some(raw_url) = url {
        let target = fetch::validate_target(raw_url)?;
        let fetcher = PageFetcher::new(config.fetch_timeout_ms, config.max_body_bytes);
        match fetcher.get(target.as_str()).await {
            Ok(page) => {
                site_text = Some(fetch::extract_page_text(&page.body).combined());
            }
            Err(e) => eprintln!("  warning: could not fetch {raw_url}: {e:#}"),
        }
    }

    let site_scanned = site_text.is_some();
    let input = ScoringInput {
        industry: industry.to_string(),
        goal: goal.to_string(),
        company_size: company_size.to_string(),
        site_text,
    };
    let ranked = scoring::score_services(&input, max_results.unwrap_or(DEFAULT_TOP_N));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "recommended_services": ranked,
                "site_scanned": site_scanned,
            }))?
        );
        return Ok(());
    }

    if ranked.is_empty() {
        println!("  no matching services");
        return Ok(());
    }
    for (i, rec) in ranked.iter().enumerate() {
        println!("  {}. {} ({:.2})", i + 1, rec.service, rec.score);
        println!("     {}", rec.why);
    }
    Ok(())
}
