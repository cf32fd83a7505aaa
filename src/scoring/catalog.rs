//! Static catalog of marketing/growth services and their keyword tables.
//!
//! Each service lists the industry terms, goal terms, and on-site signal
//! phrases that make it relevant. Matching is plain lowercase containment,
//! so keywords stay short and generic.

/// One service the engine can recommend.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDef {
    /// Display name returned to callers.
    pub name: &'static str,
    /// Industry keywords (strong signal).
    pub industries: &'static [&'static str],
    /// Business-goal keywords (medium signal).
    pub goals: &'static [&'static str],
    /// Phrases scanned for in the target site's visible text (weak signal).
    pub signals: &'static [&'static str],
    /// Score floor so fallback services surface when nothing matches.
    pub base_score: f32,
    /// Template fragment used in the "why" string.
    pub blurb: &'static str,
    /// Strategy-level service: gets the enterprise-size boost.
    pub strategic: bool,
}

/// The full service catalog, in stable order.
pub const CATALOG: &[ServiceDef] = &[
    ServiceDef {
        name: "Copy editing",
        industries: &["publishing", "media", "press", "books"],
        goals: &["quality", "editorial"],
        signals: &["manuscript", "editor", "author", "chapters"],
        base_score: 0.0,
        blurb: "polishes long-form copy before it ships",
        strategic: false,
    },
    ServiceDef {
        name: "Proofreading",
        industries: &["publishing", "press", "books"],
        goals: &["quality"],
        signals: &["manuscript", "typo", "proof"],
        base_score: 0.0,
        blurb: "catches errors in finished drafts",
        strategic: false,
    },
    ServiceDef {
        name: "Content distribution",
        industries: &["publishing", "media", "news"],
        goals: &["reach", "audience", "awareness"],
        signals: &["newsletter", "subscribe", "syndicat", "rss"],
        base_score: 0.0,
        blurb: "gets existing content in front of a wider audience",
        strategic: false,
    },
    ServiceDef {
        name: "Website copywriting",
        industries: &["saas", "software", "agency", "services"],
        goals: &["lead generation", "leads", "conversion", "sales"],
        signals: &["contact us", "get a quote", "free trial", "demo"],
        base_score: 0.0,
        blurb: "rewrites key pages to speak to buyers",
        strategic: false,
    },
    ServiceDef {
        name: "Landing page creation",
        industries: &["saas", "software", "ecommerce", "retail"],
        goals: &["lead generation", "leads", "campaign", "launch"],
        signals: &["sign up", "signup", "webinar", "download"],
        base_score: 0.0,
        blurb: "builds dedicated pages for campaigns and offers",
        strategic: false,
    },
    ServiceDef {
        name: "SEO optimization",
        industries: &["ecommerce", "retail", "saas", "local"],
        goals: &["lead generation", "traffic", "search", "organic", "visibility"],
        signals: &["blog", "search engine", "seo", "keywords", "ranking"],
        base_score: 0.0,
        blurb: "improves organic search visibility",
        strategic: false,
    },
    ServiceDef {
        name: "Email marketing",
        industries: &["ecommerce", "retail", "dtc"],
        goals: &["retention", "repeat", "nurture", "engagement"],
        signals: &["newsletter", "subscribe", "mailing list", "inbox"],
        base_score: 0.0,
        blurb: "turns subscribers into repeat customers",
        strategic: false,
    },
    ServiceDef {
        name: "Social media management",
        industries: &["hospitality", "restaurants", "retail", "fitness", "events"],
        goals: &["awareness", "brand", "community", "followers"],
        signals: &["instagram", "tiktok", "facebook", "follow us"],
        base_score: 0.0,
        blurb: "keeps social channels active and on-brand",
        strategic: false,
    },
    ServiceDef {
        name: "Conversion rate optimization",
        industries: &["ecommerce", "saas", "retail"],
        goals: &["conversion", "sales", "checkout", "revenue"],
        signals: &["cart", "checkout", "pricing", "buy now", "add to cart"],
        base_score: 0.0,
        blurb: "finds and fixes drop-off points in the funnel",
        strategic: false,
    },
    ServiceDef {
        name: "Paid search management",
        industries: &["ecommerce", "legal", "home services", "healthcare"],
        goals: &["leads", "sales", "fast", "immediate"],
        signals: &["book now", "call us", "appointment", "quote"],
        base_score: 0.0,
        blurb: "runs search ads where intent is highest",
        strategic: false,
    },
    ServiceDef {
        name: "Content strategy",
        industries: &[],
        goals: &["awareness", "authority", "thought leadership"],
        signals: &["blog", "resources", "case stud", "whitepaper"],
        base_score: 0.5,
        blurb: "plans what to publish and why",
        strategic: true,
    },
    ServiceDef {
        name: "Website content audit",
        industries: &[],
        goals: &["refresh", "rebrand", "cleanup"],
        signals: &[],
        base_score: 0.4,
        blurb: "maps what's on the site today and what's missing",
        strategic: true,
    },
    ServiceDef {
        name: "Brand messaging",
        industries: &["startups", "saas", "agency"],
        goals: &["rebrand", "positioning", "brand"],
        signals: &["about us", "our story", "mission"],
        base_score: 0.0,
        blurb: "sharpens how the company talks about itself",
        strategic: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names_unique() {
        let mut names: Vec<&str> = CATALOG.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for service in CATALOG {
            for kw in service
                .industries
                .iter()
                .chain(service.goals)
                .chain(service.signals)
            {
                assert_eq!(*kw, kw.to_lowercase(), "keyword '{kw}' must be lowercase");
            }
        }
    }

    #[test]
    fn test_fallback_services_have_base_scores() {
        let strategy = CATALOG.iter().find(|s| s.name == "Content strategy").unwrap();
        let audit = CATALOG
            .iter()
            .find(|s| s.name == "Website content audit")
            .unwrap();
        assert!(strategy.base_score > audit.base_score);
        assert!(audit.base_score > 0.0);
    }
}
