//! Aggregated pipeline output and per-URL attempt bookkeeping.

use serde::{Deserialize, Serialize};

/// The capped, deduplicated result of processing every source URL for one
/// request.
///
/// Built fresh per invocation by [`crate::pipeline::Aggregator`] and never
/// mutated after it is returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedBundle {
    /// One formatted block per source URL that produced content
    pub narrative_sections: Vec<String>,

    /// First-found-first-kept images across sources
    pub scraped_images: Vec<String>,

    /// First-found-first-kept videos across sources
    pub scraped_videos: Vec<String>,

    pub scraped_price: Option<String>,

    pub scraped_rating: Option<f64>,

    pub scraped_review_count: Option<u64>,
}

impl AggregatedBundle {
    /// Whether no source contributed anything.
    pub fn is_empty(&self) -> bool {
        self.narrative_sections.is_empty()
            && self.scraped_images.is_empty()
            && self.scraped_videos.is_empty()
            && self.scraped_price.is_none()
            && self.scraped_rating.is_none()
            && self.scraped_review_count.is_none()
    }
}

/// Which tiers produced the content the orchestrator kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionStrategy {
    /// Primary output was sufficient
    Primary,
    /// No primary tier configured, fallback ran alone
    Fallback,
    /// Primary ran, was insufficient or failed, fallback ran after it
    PrimaryThenFallback,
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStrategy::Primary => write!(f, "primary"),
            ExtractionStrategy::Fallback => write!(f, "fallback"),
            ExtractionStrategy::PrimaryThenFallback => write!(f, "primary-then-fallback"),
        }
    }
}

/// Internal record of how one URL was extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionAttempt {
    pub strategy_used: ExtractionStrategy,

    /// Whether the primary output passed the sufficiency gate
    pub sufficient: bool,
}

impl ExtractionAttempt {
    pub fn primary() -> Self {
        Self {
            strategy_used: ExtractionStrategy::Primary,
            sufficient: true,
        }
    }

    pub fn fallback_only() -> Self {
        Self {
            strategy_used: ExtractionStrategy::Fallback,
            sufficient: false,
        }
    }

    pub fn primary_then_fallback() -> Self {
        Self {
            strategy_used: ExtractionStrategy::PrimaryThenFallback,
            sufficient: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_display_matches_serde() {
        let json = serde_json::to_string(&ExtractionStrategy::PrimaryThenFallback).unwrap();
        assert_eq!(json, "\"primary-then-fallback\"");
        assert_eq!(
            ExtractionStrategy::PrimaryThenFallback.to_string(),
            "primary-then-fallback"
        );
    }

    #[test]
    fn test_default_bundle_is_empty() {
        assert!(AggregatedBundle::default().is_empty());
    }
}
