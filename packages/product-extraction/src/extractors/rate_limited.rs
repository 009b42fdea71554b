//! Rate-limited extractor wrapper.
//!
//! Wraps any SourceExtractor with rate limiting using the governor crate.
//! Mostly useful in front of the rendering service, whose quota is the
//! tightest constraint on a request.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::error::ExtractResult;
use crate::traits::extractor::SourceExtractor;
use crate::types::ScrapedContent;

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Zero rates are clamped to one per second.
fn per_second(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap_or(nonzero!(1u32))
}

/// An extractor wrapper that enforces rate limits.
///
/// Clones of the wrapped extractor behind one `RateLimitedExtractor` share a
/// single budget; separate wrappers do not.
pub struct RateLimitedExtractor<E: SourceExtractor> {
    inner: E,
    limiter: Arc<DefaultRateLimiter>,
}

impl<E: SourceExtractor> RateLimitedExtractor<E> {
    /// Create a new rate-limited extractor.
    ///
    /// # Arguments
    /// * `extractor` - The underlying extractor to wrap
    /// * `requests_per_second` - Maximum requests per second
    pub fn new(extractor: E, requests_per_second: u32) -> Self {
        Self::with_quota(extractor, Quota::per_second(per_second(requests_per_second)))
    }

    /// Create with a custom quota.
    pub fn with_quota(extractor: E, quota: Quota) -> Self {
        Self {
            inner: extractor,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Create with burst support.
    pub fn with_burst(extractor: E, requests_per_second: u32, burst: u32) -> Self {
        let quota = Quota::per_second(per_second(requests_per_second)).allow_burst(per_second(burst));
        Self::with_quota(extractor, quota)
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

#[async_trait]
impl<E: SourceExtractor> SourceExtractor for RateLimitedExtractor<E> {
    async fn extract(&self, url: &str) -> ExtractResult<ScrapedContent> {
        self.limiter.until_ready().await;
        self.inner.extract(url).await
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Extension trait for easy rate limiting.
pub trait ExtractorExt: SourceExtractor + Sized {
    /// Wrap this extractor with rate limiting.
    fn rate_limited(self, requests_per_second: u32) -> RateLimitedExtractor<Self> {
        RateLimitedExtractor::new(self, requests_per_second)
    }
}

impl<E: SourceExtractor + Sized> ExtractorExt for E {}
