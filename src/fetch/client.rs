//! Async HTTP fetcher wrapping reqwest.
//!
//! Not a browser — just capped HTTP GETs. Handles redirects, timeouts,
//! retry on 5xx, exponential backoff on 429, and truncates oversized bodies
//! so a hostile target can't balloon memory.

use anyhow::{bail, Result};
use std::time::Duration;

/// Response from a capped GET request.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Content-Type header, if any.
    pub content_type: Option<String>,
    /// Response body as text, truncated at the configured cap.
    pub body: String,
    /// Whether the body was cut off at the cap.
    pub truncated: bool,
}

/// HTTP client for website scanning.
#[derive(Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    timeout_ms: u64,
    max_body_bytes: usize,
}

impl PageFetcher {
    /// Create a fetcher with a standard Chrome user-agent.
    pub fn new(timeout_ms: u64, max_body_bytes: usize) -> Self {
        let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                  AppleWebKit/537.36 (KHTML, like Gecko) \
                  Chrome/131.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(ua)
            .build()
            .unwrap_or_default();

        Self {
            client,
            timeout_ms,
            max_body_bytes,
        }
    }

    /// Fetch a page with retry on 5xx and backoff on 429.
    ///
    /// Non-HTML/non-text responses are rejected without reading the body.
    /// Callers treat any error here as "no site signals", never a hard failure.
    pub async fn get(&self, url: &str) -> Result<FetchedPage> {
        let mut retries = 0u32;
        let max_retries = 2;

        loop {
            let resp = self
                .client
                .get(url)
                .timeout(Duration::from_millis(self.timeout_ms))
                .send()
                .await;

            match resp {
                Ok(r) => {
                    let status = r.status().as_u16();
                    let final_url = r.url().to_string();

                    // Retry on 5xx
                    if status >= 500 && retries < max_retries {
                        retries += 1;
                        let delay = Duration::from_millis(500 * 2u64.pow(retries - 1));
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    // Backoff on 429
                    if status == 429 && retries < max_retries {
                        retries += 1;
                        let retry_after = r
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(2);
                        let delay = Duration::from_secs(retry_after.min(10));
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    let content_type = r
                        .headers()
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .map(|s| s.to_string());

                    if let Some(ct) = &content_type {
                        let ct = ct.to_ascii_lowercase();
                        if !ct.contains("text/html")
                            && !ct.contains("application/xhtml")
                            && !ct.contains("text/plain")
                        {
                            bail!("unsupported content type '{ct}' for {url}");
                        }
                    }

                    let (body, truncated) = self.read_capped(r).await?;

                    return Ok(FetchedPage {
                        url: url.to_string(),
                        final_url,
                        status,
                        content_type,
                        body,
                        truncated,
                    });
                }
                Err(e) => {
                    if retries < max_retries {
                        retries += 1;
                        let delay = Duration::from_millis(500 * 2u64.pow(retries - 1));
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Read the response body in chunks, stopping at the byte cap.
    async fn read_capped(&self, mut resp: reqwest::Response) -> Result<(String, bool)> {
        let mut buf: Vec<u8> = Vec::with_capacity(8 * 1024);
        let mut truncated = false;

        while let Some(chunk) = resp.chunk().await? {
            let remaining = self.max_body_bytes.saturating_sub(buf.len());
            if chunk.len() >= remaining {
                buf.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                break;
            }
            buf.extend_from_slice(&chunk);
        }

        Ok((String::from_utf8_lossy(&buf).into_owned(), truncated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = PageFetcher::new(10_000, 1024 * 1024);
        assert_eq!(fetcher.max_body_bytes, 1024 * 1024);
    }
}
