//! Mock extractor for testing.
//!
//! Provides a configurable mock implementation of the SourceExtractor trait.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::error::{ExtractError, ExtractResult};
use crate::html::parse_page;
use crate::traits::extractor::SourceExtractor;
use crate::types::{PipelineConfig, ScrapedContent};

/// Mock extractor for testing.
///
/// Returns canned content per URL, fails for URLs marked as failing, and
/// records every call. Clones share state, so a test can hand one clone to
/// the orchestrator and inspect calls through another.
///
/// # Example
///
/// ```rust
/// use product_extraction::extractors::MockExtractor;
/// use product_extraction::ScrapedContent;
///
/// let mock = MockExtractor::new()
///     .with_content("https://shop.example/a", ScrapedContent::empty().with_title("A"))
///     .failing("https://shop.example/down");
///
/// // Unknown URLs fail like an unreachable host
/// ```
#[derive(Default)]
pub struct MockExtractor {
    /// Canned results indexed by URL
    pages: Arc<RwLock<HashMap<String, ScrapedContent>>>,
    /// URLs that return an error
    failures: Arc<RwLock<HashSet<String>>>,
    /// Track calls for verification
    calls: Arc<RwLock<Vec<String>>>,
    configured: bool,
    name: String,
}

impl MockExtractor {
    /// Create a new empty mock extractor.
    pub fn new() -> Self {
        Self {
            configured: true,
            name: "mock".to_string(),
            ..Default::default()
        }
    }

    /// Add canned content for a URL.
    pub fn add_content(&self, url: impl Into<String>, content: ScrapedContent) {
        self.pages.write().unwrap().insert(url.into(), content);
    }

    /// Return `content` for `url` (builder pattern).
    pub fn with_content(self, url: impl Into<String>, content: ScrapedContent) -> Self {
        self.add_content(url, content);
        self
    }

    /// Return whatever the shared page parser finds in `html` for `url`.
    pub fn with_html(self, url: impl Into<String>, html: &str) -> Self {
        let url = url.into();
        let content = parse_page(&url, html, &PipelineConfig::default());
        self.with_content(url, content)
    }

    /// Fail every extraction of `url`.
    pub fn failing(self, url: impl Into<String>) -> Self {
        self.failures.write().unwrap().insert(url.into());
        self
    }

    /// Report as unconfigured, like a rendering service with no API key.
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Override the reported name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the number of times extract was called.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Get the URLs that were requested, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Clear all recorded calls.
    pub fn reset_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

impl Clone for MockExtractor {
    fn clone(&self) -> Self {
        Self {
            pages: Arc::clone(&self.pages),
            failures: Arc::clone(&self.failures),
            calls: Arc::clone(&self.calls),
            configured: self.configured,
            name: self.name.clone(),
        }
    }
}

#[async_trait]
impl SourceExtractor for MockExtractor {
    async fn extract(&self, url: &str) -> ExtractResult<ScrapedContent> {
        self.calls.write().unwrap().push(url.to_string());

        if self.failures.read().unwrap().contains(url) {
            return Err(ExtractError::ServiceFailure {
                service: self.name.clone(),
                url: url.to_string(),
                reason: "configured to fail".to_string(),
            });
        }

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| ExtractError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for creating mock extractors with a fluent API.
#[derive(Default)]
pub struct MockExtractorBuilder {
    pages: Vec<(String, ScrapedContent)>,
    html_pages: Vec<(String, String)>,
    failures: Vec<String>,
    unconfigured: bool,
}

impl MockExtractorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add canned content.
    pub fn content(mut self, url: impl Into<String>, content: ScrapedContent) -> Self {
        self.pages.push((url.into(), content));
        self
    }

    /// Add a page whose content is parsed from markup.
    pub fn html(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.html_pages.push((url.into(), html.into()));
        self
    }

    /// Add a failing URL.
    pub fn failure(mut self, url: impl Into<String>) -> Self {
        self.failures.push(url.into());
        self
    }

    pub fn unconfigured(mut self) -> Self {
        self.unconfigured = true;
        self
    }

    /// Build the mock extractor.
    pub fn build(self) -> MockExtractor {
        let mut mock = MockExtractor::new();
        for (url, content) in self.pages {
            mock = mock.with_content(url, content);
        }
        for (url, html) in self.html_pages {
            mock = mock.with_html(url, &html);
        }
        for url in self.failures {
            mock = mock.failing(url);
        }
        if self.unconfigured {
            mock = mock.unconfigured();
        }
        mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_content() {
        let mock = MockExtractor::new().with_content(
            "https://shop.example/a",
            ScrapedContent::empty().with_title("Widget"),
        );

        let content = mock.extract("https://shop.example/a").await.unwrap();
        assert_eq!(content.title, "Widget");
        assert_eq!(mock.calls(), vec!["https://shop.example/a"]);
    }

    #[tokio::test]
    async fn test_unknown_url_fails() {
        let mock = MockExtractor::new();
        assert!(mock.extract("https://shop.example/missing").await.is_err());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_wins_over_content() {
        let mock = MockExtractor::new()
            .with_content("https://shop.example/a", ScrapedContent::empty().with_text("x"))
            .failing("https://shop.example/a");

        let result = mock.extract("https://shop.example/a").await;
        assert!(matches!(result, Err(ExtractError::ServiceFailure { .. })));
    }

    #[tokio::test]
    async fn test_with_html_uses_page_parser() {
        let mock = MockExtractor::new().with_html(
            "https://shop.example/p",
            r#"<html><head><title>Mug</title></head>
            <body><img src="/mug.jpg"><p>$12.00</p></body></html>"#,
        );

        let content = mock.extract("https://shop.example/p").await.unwrap();
        assert_eq!(content.title, "Mug");
        assert_eq!(content.image_urls, vec!["https://shop.example/mug.jpg"]);
        assert_eq!(content.price.as_deref(), Some("$12.00"));
    }

    #[tokio::test]
    async fn test_clones_share_calls() {
        let mock = MockExtractor::new();
        let clone = mock.clone();
        let _ = clone.extract("https://shop.example/x").await;
        assert_eq!(mock.call_count(), 1);

        mock.reset_calls();
        assert_eq!(clone.call_count(), 0);
    }

    #[tokio::test]
    async fn test_builder() {
        let mock = MockExtractorBuilder::new()
            .content("https://a.example/", ScrapedContent::empty().with_text("a"))
            .failure("https://b.example/")
            .unconfigured()
            .build();

        assert!(!mock.is_configured());
        assert!(mock.extract("https://a.example/").await.is_ok());
        assert!(mock.extract("https://b.example/").await.is_err());
    }
}
