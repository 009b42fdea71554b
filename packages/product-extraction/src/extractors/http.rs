//! Direct-fetch extractor (fallback tier).
//!
//! One GET with browser-like headers, then the shared page parser over the
//! raw server-rendered HTML. No retries; no JavaScript rendering.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ExtractError, ExtractResult};
use crate::html::parse_page;
use crate::traits::extractor::SourceExtractor;
use crate::types::{PipelineConfig, ScrapedContent};

/// Desktop Chrome user agent; many storefronts serve bots a stripped page.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP extractor that fetches a page directly and parses the raw HTML.
///
/// Suitable for server-rendered pages. For JavaScript-heavy sites, the
/// orchestrator tries `FirecrawlExtractor` first.
///
/// # Example
///
/// ```rust,ignore
/// use product_extraction::{HttpExtractor, SourceExtractor};
///
/// let extractor = HttpExtractor::new()?;
/// let content = extractor.extract_or_empty("https://example.com/product").await;
/// ```
pub struct HttpExtractor {
    client: reqwest::Client,
    user_agent: String,
    config: PipelineConfig,
}

impl HttpExtractor {
    /// Create a new HTTP extractor with default settings.
    pub fn new() -> ExtractResult<Self> {
        Self::from_builder(reqwest::Client::builder())
    }

    /// Create from a caller-prepared client builder (proxy, TLS settings).
    /// The redirect limit is applied on top.
    pub fn from_builder(builder: reqwest::ClientBuilder) -> ExtractResult<Self> {
        let client = builder
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            user_agent: BROWSER_USER_AGENT.to_string(),
            config: PipelineConfig::default(),
        })
    }

    /// Accept headers a real browser sends. Accept-Encoding is added by
    /// reqwest from its enabled decoders.
    fn browser_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );
        headers
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a custom HTTP client.
    ///
    /// Browser headers, user agent and timeout are still sent with every
    /// request. The redirect policy is whatever `client` was built with.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Set the pipeline limits used when parsing.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetch raw HTML from a URL.
    async fn fetch_html(&self, url: &str) -> ExtractResult<String> {
        debug!(url = %url, "HTTP fetch starting");
        let response = self
            .client
            .get(url)
            .headers(Self::browser_headers())
            .header(header::USER_AGENT, &self.user_agent)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                ExtractError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl SourceExtractor for HttpExtractor {
    async fn extract(&self, url: &str) -> ExtractResult<ScrapedContent> {
        let html = self.fetch_html(url).await?;
        let content = parse_page(url, &html, &self.config);

        info!(
            url = %url,
            html_length = html.len(),
            images = content.image_urls.len(),
            videos = content.video_urls.len(),
            has_price = content.price.is_some(),
            "Direct fetch parsed"
        );

        Ok(content)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const PAGE: &str = r#"<html><head><title>Lamp</title>
        <meta name="description" content="Desk lamp"></head>
        <body><img src="/img/lamp.jpg"><p>Only $39.00 - 4.7 out of 5 stars - 210 reviews</p>
        <iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ"></iframe></body></html>"#;

    #[test]
    fn test_create_extractor() {
        let extractor = HttpExtractor::new().unwrap();
        assert_eq!(extractor.name(), "http");
        assert!(extractor.is_configured());
    }

    #[test]
    fn test_browser_headers() {
        let headers = HttpExtractor::browser_headers();
        assert!(headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html")));
        assert!(headers.contains_key(header::ACCEPT_LANGUAGE));
    }

    fn loopback_extractor() -> HttpExtractor {
        HttpExtractor::from_builder(reqwest::Client::builder().no_proxy()).unwrap()
    }

    #[tokio::test]
    async fn test_extract_from_live_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/lamp")
                    .header("user-agent", BROWSER_USER_AGENT);
                then.status(200)
                    .header("content-type", "text/html; charset=utf-8")
                    .body(PAGE);
            })
            .await;

        let content = loopback_extractor()
            .extract(&server.url("/lamp"))
            .await
            .unwrap();
        mock.assert_async().await;

        assert_eq!(content.title, "Lamp");
        assert_eq!(content.description, "Desk lamp");
        assert_eq!(content.image_urls, vec![server.url("/img/lamp.jpg")]);
        assert_eq!(
            content.video_urls,
            vec!["https://www.youtube.com/watch?v=dQw4w9WgXcQ"]
        );
        assert_eq!(content.price.as_deref(), Some("$39.00"));
        assert_eq!(content.rating, Some(4.7));
        assert_eq!(content.review_count, Some(210));
    }

    #[tokio::test]
    async fn test_custom_client_still_sends_browser_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/lamp")
                    .header("accept-language", "en-US,en;q=0.9")
                    .header("cache-control", "no-cache")
                    .header("user-agent", "catalog-bot/1.0");
                then.status(200)
                    .header("content-type", "text/html")
                    .body(PAGE);
            })
            .await;

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let extractor = HttpExtractor::new()
            .unwrap()
            .with_client(client)
            .with_user_agent("catalog-bot/1.0");

        let content = extractor.extract(&server.url("/lamp")).await.unwrap();
        mock.assert_async().await;
        assert_eq!(content.title, "Lamp");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error_and_degrades_to_empty() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/p");
                then.status(403)
                    .header("content-type", "text/html")
                    .body("<h1>Forbidden</h1>");
            })
            .await;
        let extractor = loopback_extractor();

        let result = extractor.extract(&server.url("/p")).await;
        assert!(matches!(result, Err(ExtractError::Status { status: 403, .. })));

        let content = extractor.extract_or_empty(&server.url("/p")).await;
        assert!(content.is_empty());
        assert_eq!(mock.hits_async().await, 2);
    }

    #[tokio::test]
    async fn test_connection_failure_degrades_to_empty() {
        let extractor = loopback_extractor();
        // Port 9 (discard) on loopback is expected to refuse connections.
        let content = extractor.extract_or_empty("http://127.0.0.1:9/").await;
        assert!(content.is_empty());
    }
}
