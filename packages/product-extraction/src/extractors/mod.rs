//! Extractor implementations for the two tiers.
//!
//! # Available Extractors
//!
//! - `FirecrawlExtractor` - rendering service (primary tier)
//! - `HttpExtractor` - direct fetch with browser headers (fallback tier)
//! - `MockExtractor` - for testing
//!
//! # Example
//!
//! ```rust,ignore
//! use product_extraction::extractors::{FirecrawlExtractor, HttpExtractor, ValidatedExtractor};
//! use product_extraction::pipeline::Orchestrator;
//!
//! let orchestrator = Orchestrator::new(
//!     ValidatedExtractor::new(FirecrawlExtractor::from_env()?),
//!     ValidatedExtractor::new(HttpExtractor::new()?),
//! );
//! let content = orchestrator.extract("https://example.com/product").await;
//! ```

mod firecrawl;
mod http;
mod mock;
mod rate_limited;

pub use firecrawl::{
    build_content, FirecrawlExtractor, OneOrMany, PageMetadata, ScrapeData, FIRECRAWL_API_URL,
};
pub use http::{HttpExtractor, BROWSER_USER_AGENT};
pub use mock::{MockExtractor, MockExtractorBuilder};
pub use rate_limited::{ExtractorExt, RateLimitedExtractor};

// Re-export from traits for convenience
pub use crate::traits::extractor::{SourceExtractor, ValidatedExtractor};
