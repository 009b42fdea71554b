//! Extractor trait for the tiered extraction strategy.
//!
//! The rendering-service tier and the direct-fetch tier are two
//! implementations of one capability: turn a source URL into a
//! [`ScrapedContent`]. The orchestrator picks between them; the pattern
//! library and normalizer are shared, not duplicated per tier.
//!
//! # Usage
//!
//! ```rust,ignore
//! use product_extraction::{HttpExtractor, SourceExtractor, ValidatedExtractor};
//!
//! let extractor = ValidatedExtractor::new(HttpExtractor::new()?);
//!
//! // Err means the tier failed and the next tier should run
//! let content = extractor.extract("https://example.com/product").await?;
//!
//! // Or degrade failure to an empty result
//! let content = extractor.extract_or_empty("https://example.com/product").await;
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::error::{ExtractError, ExtractResult};
use crate::security::UrlValidator;
use crate::types::ScrapedContent;

/// One extraction tier.
///
/// Implementations:
/// - `FirecrawlExtractor` - rendering service (JavaScript, lazy-loaded assets)
/// - `HttpExtractor` - direct fetch of server-rendered markup
/// - `MockExtractor` - canned results for tests
///
/// # SSRF Protection
///
/// Wrap tiers that fetch caller URLs with `ValidatedExtractor` in production:
///
/// ```rust,ignore
/// let extractor = ValidatedExtractor::new(HttpExtractor::new()?);
/// ```
#[async_trait]
pub trait SourceExtractor: Send + Sync {
    /// Extract content from one source URL.
    ///
    /// An `Err` signals that this tier failed for the URL (network failure,
    /// service failure, unconfigured, insufficient output) and that the
    /// caller should fall through to the next tier.
    async fn extract(&self, url: &str) -> ExtractResult<ScrapedContent>;

    /// Extract content, degrading any failure to an empty result.
    async fn extract_or_empty(&self, url: &str) -> ScrapedContent {
        match self.extract(url).await {
            Ok(content) => content,
            Err(e) => {
                warn!(url = %url, extractor = %self.name(), error = %e, "Extraction failed, using empty result");
                ScrapedContent::empty()
            }
        }
    }

    /// Whether the tier can run at all.
    ///
    /// An unconfigured rendering service reports `false`, and the
    /// orchestrator goes straight to the fallback tier.
    fn is_configured(&self) -> bool {
        true
    }

    /// Get the extractor name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<T: SourceExtractor + ?Sized> SourceExtractor for Arc<T> {
    async fn extract(&self, url: &str) -> ExtractResult<ScrapedContent> {
        (**self).extract(url).await
    }

    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: SourceExtractor + ?Sized> SourceExtractor for Box<T> {
    async fn extract(&self, url: &str) -> ExtractResult<ScrapedContent> {
        (**self).extract(url).await
    }

    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// An extractor that validates URLs before fetching (SSRF protection).
///
/// Blocked URLs fail the tier with [`ExtractError::Security`], which the
/// orchestrator treats like any other tier failure.
pub struct ValidatedExtractor<E: SourceExtractor> {
    inner: E,
    validator: UrlValidator,
    resolve_dns: bool,
}

impl<E: SourceExtractor> ValidatedExtractor<E> {
    /// Create a new validated extractor with default security rules.
    pub fn new(extractor: E) -> Self {
        Self {
            inner: extractor,
            validator: UrlValidator::new(),
            resolve_dns: true,
        }
    }

    /// Create with a custom validator.
    pub fn with_validator(extractor: E, validator: UrlValidator) -> Self {
        Self {
            inner: extractor,
            validator,
            resolve_dns: true,
        }
    }

    /// Skip the DNS rebinding check (static checks still apply).
    pub fn without_dns_check(mut self) -> Self {
        self.resolve_dns = false;
        self
    }

    /// Validate a URL, returning an error if blocked.
    async fn validate_url(&self, url: &str) -> ExtractResult<()> {
        let result = if self.resolve_dns {
            self.validator.validate_with_dns(url).await
        } else {
            self.validator.validate(url)
        };
        result.map_err(ExtractError::Security)
    }
}

#[async_trait]
impl<E: SourceExtractor> SourceExtractor for ValidatedExtractor<E> {
    async fn extract(&self, url: &str) -> ExtractResult<ScrapedContent> {
        if let Err(e) = self.validate_url(url).await {
            warn!(url = %url, error = %e, "Skipping blocked URL");
            return Err(e);
        }
        self.inner.extract(url).await
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
