//! Service ranking: keyword containment over the static catalog.
//!
//! Industry matches weigh most, goals next, on-site signal hits least. Every
//! match contributes a fragment to the human-readable "why" string, so the
//! caller can see exactly what the score came from.

use crate::scoring::catalog::{ServiceDef, CATALOG};
use serde::Serialize;

/// Default number of services returned.
pub const DEFAULT_TOP_N: usize = 5;

/// Weight of an industry keyword match.
const INDUSTRY_WEIGHT: f32 = 3.0;
/// Weight of a goal keyword match.
const GOAL_WEIGHT: f32 = 2.5;
/// Weight of each distinct site-signal hit.
const SIGNAL_WEIGHT: f32 = 0.75;
/// At most this many signal hits count per service.
const MAX_SIGNAL_HITS: usize = 3;
/// Boost for strategy-level services when the company is enterprise-sized.
const ENTERPRISE_BOOST: f32 = 0.5;

/// Inputs to one scoring run.
#[derive(Debug, Clone, Default)]
pub struct ScoringInput {
    pub industry: String,
    pub goal: String,
    pub company_size: String,
    /// Visible text scraped from the target site, if any.
    pub site_text: Option<String>,
}

/// One ranked recommendation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedService {
    pub service: String,
    pub score: f32,
    pub why: String,
}

/// True when either string contains the other (both already normalized).
fn contains_either(input: &str, keyword: &str) -> bool {
    !input.is_empty() && (input.contains(keyword) || keyword.contains(input))
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Company sizes that read as enterprise-scale.
fn is_enterprise(size: &str) -> bool {
    ["enterprise", "large", "200", "500", "1000"]
        .iter()
        .any(|kw| size.contains(kw))
}

/// Score one service against the inputs. Returns (score, why-fragments).
fn score_one(service: &ServiceDef, input: &NormalizedInput) -> (f32, Vec<String>) {
    let mut score = service.base_score;
    let mut reasons = Vec::new();

    if service
        .industries
        .iter()
        .any(|kw| contains_either(&input.industry, kw))
    {
        score += INDUSTRY_WEIGHT;
        reasons.push(format!("fits the {} space", input.industry));
    }

    if service
        .goals
        .iter()
        .any(|kw| contains_either(&input.goal, kw))
    {
        score += GOAL_WEIGHT;
        reasons.push(format!("aligned with your goal of {}", input.goal));
    }

    if let Some(site_text) = &input.site_text {
        let hits: Vec<&str> = service
            .signals
            .iter()
            .filter(|kw| site_text.contains(*kw))
            .take(MAX_SIGNAL_HITS)
            .copied()
            .collect();
        if !hits.is_empty() {
            score += SIGNAL_WEIGHT * hits.len() as f32;
            let quoted: Vec<String> = hits.iter().map(|h| format!("'{h}'")).collect();
            reasons.push(format!("your site mentions {}", quoted.join(", ")));
        }
    }

    if service.strategic && input.enterprise {
        score += ENTERPRISE_BOOST;
    }

    (score, reasons)
}

struct NormalizedInput {
    industry: String,
    goal: String,
    site_text: Option<String>,
    enterprise: bool,
}

/// Rank the catalog against the inputs and return the top `n` services.
///
/// Services with no matches are dropped unless nothing matched at all, in
/// which case the base-scored fallback services (content strategy, site
/// audit) carry the response.
pub fn score_services(input: &ScoringInput, n: usize) -> Vec<RankedService> {
    let normalized = NormalizedInput {
        industry: normalize(&input.industry),
        goal: normalize(&input.goal),
        site_text: input.site_text.as_deref().map(normalize),
        enterprise: is_enterprise(&normalize(&input.company_size)),
    };

    let mut ranked: Vec<RankedService> = CATALOG
        .iter()
        .filter_map(|service| {
            let (score, reasons) = score_one(service, &normalized);
            if score <= 0.0 {
                return None;
            }
            let why = if reasons.is_empty() {
                format!("Good baseline for most teams — {}.", service.blurb)
            } else {
                let mut sentence = reasons.join(", ");
                if let Some(first) = sentence.get_mut(..1) {
                    first.make_ascii_uppercase();
                }
                format!("{sentence} — {}.", service.blurb)
            };
            Some(RankedService {
                service: service.name.to_string(),
                score,
                why,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.service.cmp(&b.service))
    });
    ranked.truncate(n.max(1));
    ranked
}
