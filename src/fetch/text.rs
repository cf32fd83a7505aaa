//! Visible-text extraction from raw HTML.
//!
//! Uses the `scraper` crate. Everything here is synchronous on purpose:
//! scraper's DOM types are not Send, so they must never be held across an
//! await point in the calling handler.

use scraper::{Html, Selector};

/// Maximum bytes of body text kept for keyword scanning (cut on a char
/// boundary, so the kept text can be slightly shorter).
const MAX_TEXT_BYTES: usize = 20_000;

/// Subtrees that never contain user-visible text.
const SKIP_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "head", "iframe",
];

/// Text signals extracted from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    /// Contents of `<title>`, whitespace-collapsed.
    pub title: Option<String>,
    /// `meta[name="description"]` content attribute.
    pub meta_description: Option<String>,
    /// Visible body text, whitespace-collapsed and capped.
    pub body_text: String,
}

impl PageText {
    /// All signal text joined for keyword scanning.
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.body_text.len() + 256);
        if let Some(title) = &self.title {
            out.push_str(title);
            out.push(' ');
        }
        if let Some(desc) = &self.meta_description {
            out.push_str(desc);
            out.push(' ');
        }
        out.push_str(&self.body_text);
        out
    }
}

/// Extract title, meta description, and visible text from an HTML document.
pub fn extract_page_text(html: &str) -> PageText {
    let doc = Html::parse_document(html);

    let title = Selector::parse("title").ok().and_then(|sel| {
        doc.select(&sel)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
            .filter(|t| !t.is_empty())
    });

    let meta_description = Selector::parse(r#"meta[name="description"]"#)
        .ok()
        .and_then(|sel| {
            doc.select(&sel)
                .next()
                .and_then(|el| el.value().attr("content"))
                .map(collapse_whitespace)
                .filter(|d| !d.is_empty())
        });

    let mut raw = String::new();
    for node in doc.tree.nodes() {
        let scraper::Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            matches!(a.value(), scraper::Node::Element(el)
                if SKIP_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            raw.push(' ');
            raw.push_str(&text.text);
        }
    }
    let mut body_text = collapse_whitespace(&raw);
    if body_text.len() > MAX_TEXT_BYTES {
        let cut = body_text
            .char_indices()
            .take_while(|(i, c)| i + c.len_utf8() <= MAX_TEXT_BYTES)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        body_text.truncate(cut);
    }

    PageText {
        title,
        meta_description,
        body_text,
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
