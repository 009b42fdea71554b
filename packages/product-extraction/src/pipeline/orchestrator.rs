//! Per-URL tier selection.
//!
//! The rendering tier runs first. Its output is kept only when it found at
//! least one image; otherwise the direct-fetch tier runs and its output
//! replaces the primary result wholesale. Text, video and price signals do
//! not affect the gate.

use tracing::{debug, info, warn};

use crate::traits::extractor::SourceExtractor;
use crate::types::{ExtractionAttempt, ScrapedContent};

/// Chooses between the primary and fallback extractor for one URL.
pub struct Orchestrator {
    primary: Option<Box<dyn SourceExtractor>>,
    fallback: Box<dyn SourceExtractor>,
}

impl Orchestrator {
    /// Create an orchestrator with both tiers.
    pub fn new(
        primary: impl SourceExtractor + 'static,
        fallback: impl SourceExtractor + 'static,
    ) -> Self {
        Self {
            primary: Some(Box::new(primary)),
            fallback: Box::new(fallback),
        }
    }

    /// Create an orchestrator with only the direct-fetch tier.
    pub fn fallback_only(fallback: impl SourceExtractor + 'static) -> Self {
        Self {
            primary: None,
            fallback: Box::new(fallback),
        }
    }

    /// Whether the primary tier will be attempted.
    pub fn has_primary(&self) -> bool {
        self.primary.as_ref().is_some_and(|p| p.is_configured())
    }

    /// Extract one URL, returning the kept content and how it was obtained.
    ///
    /// Never fails. Once the fallback runs its result replaces the primary
    /// one outright, so a failed fallback yields empty content.
    pub async fn extract_with_attempt(&self, url: &str) -> (ScrapedContent, ExtractionAttempt) {
        let primary = match self.primary.as_deref() {
            Some(primary) if primary.is_configured() => primary,
            _ => {
                debug!(url = %url, "Primary tier not configured, using fallback");
                let content = self.fallback.extract_or_empty(url).await;
                return (content, ExtractionAttempt::fallback_only());
            }
        };

        match primary.extract(url).await {
            Ok(content) if !content.image_urls.is_empty() => {
                debug!(
                    url = %url,
                    extractor = %primary.name(),
                    images = content.image_urls.len(),
                    "Primary result sufficient"
                );
                return (content, ExtractionAttempt::primary());
            }
            Ok(_) => {
                info!(url = %url, reason = "no images", "Falling back to direct fetch");
            }
            Err(e) => {
                info!(url = %url, reason = %e, "Falling back to direct fetch");
            }
        }

        let content = self.fallback.extract(url).await.unwrap_or_else(|e| {
            warn!(url = %url, error = %e, "Fallback failed");
            ScrapedContent::empty()
        });

        (content, ExtractionAttempt::primary_then_fallback())
    }

    /// Extract one URL. Never fails; see [`Self::extract_with_attempt`].
    pub async fn extract(&self, url: &str) -> ScrapedContent {
        let (content, attempt) = self.extract_with_attempt(url).await;
        debug!(
            url = %url,
            strategy = %attempt.strategy_used,
            sufficient = attempt.sufficient,
            "Extraction finished"
        );
        content
    }
}
