//! Fetcher behavior against a local mock server: body caps, content-type
//! filtering, retry on 5xx, and the fetch → extract → score pipeline.
//!
//! These hit the fetcher directly — the SSRF guard (tested in unit tests)
//! would reject the mock server's loopback address.

use beacon::fetch::{extract_page_text, PageFetcher};
use beacon::scoring::{score_services, ScoringInput};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE_HTML: &str = r#"<!doctype html>
<html>
  <head>
    <title>Acme Outfitters</title>
    <meta name="description" content="Outdoor gear, delivered.">
    <script>window.analytics = {};</script>
  </head>
  <body>
    <h1>Acme Outfitters</h1>
    <p>Read our blog for search engine tips and SEO guides.</p>
    <a href="/checkout">Add to cart</a>
  </body>
</html>"#;

#[tokio::test]
async fn test_fetch_and_extract() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SITE_HTML)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(5_000, 1024 * 1024);
    let page = fetcher.get(&server.uri()).await.unwrap();
    assert_eq!(page.status, 200);
    assert!(!page.truncated);

    let text = extract_page_text(&page.body);
    assert_eq!(text.title.as_deref(), Some("Acme Outfitters"));
    assert!(text.body_text.contains("SEO guides"));
    assert!(!text.body_text.contains("analytics"));
}

#[tokio::test]
async fn test_fetched_signals_flow_into_scoring() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SITE_HTML)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(5_000, 1024 * 1024);
    let page = fetcher.get(&server.uri()).await.unwrap();
    let site_text = extract_page_text(&page.body).combined();

    let input = ScoringInput {
        industry: "retail".to_string(),
        goal: "more organic traffic".to_string(),
        company_size: "11-50".to_string(),
        site_text: Some(site_text),
    };
    let ranked = score_services(&input, 5);
    assert_eq!(ranked[0].service, "SEO optimization");
    assert!(ranked[0].why.contains("your site mentions"));
}

#[tokio::test]
async fn test_body_truncated_at_cap() {
    let server = MockServer::start().await;
    let big_body = format!("<html><body>{}</body></html>", "x".repeat(100_000));
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(big_body)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let cap = 4 * 1024;
    let fetcher = PageFetcher::new(5_000, cap);
    let page = fetcher.get(&server.uri()).await.unwrap();
    assert!(page.truncated);
    assert_eq!(page.body.len(), cap);
}

#[tokio::test]
async fn test_non_html_content_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("{\"not\": \"html\"}", "application/json"),
        )
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(5_000, 1024 * 1024);
    assert!(fetcher.get(&server.uri()).await.is_err());
}

#[tokio::test]
async fn test_retries_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SITE_HTML)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(5_000, 1024 * 1024);
    let page = fetcher.get(&server.uri()).await.unwrap();
    assert_eq!(page.status, 200);
}
