//! Product Page Extraction Library
//!
//! Turns third-party product-page URLs into a normalized bundle of reusable
//! content (text, image URLs, video URLs, price, rating, review count) for a
//! downstream copy-writing step.
//!
//! # Design
//!
//! - Two tiers behind one trait: a rendering service first, a direct fetch
//!   as the safety net
//! - One pattern library and one URL normalizer, shared by both tiers
//! - Best-effort recall: failures degrade to empty data, never abort
//! - Bounded work per request: at most three sources, processed in order
//!
//! # Usage
//!
//! ```rust,ignore
//! use product_extraction::{
//!     Aggregator, FirecrawlExtractor, HttpExtractor, Orchestrator, ValidatedExtractor,
//! };
//!
//! let orchestrator = Orchestrator::new(
//!     ValidatedExtractor::new(FirecrawlExtractor::from_env()?),
//!     ValidatedExtractor::new(HttpExtractor::new()?),
//! );
//! let bundle = Aggregator::new(orchestrator)
//!     .aggregate(&["https://example.com/product-a"])
//!     .await;
//! ```
//!
//! # Modules
//!
//! - [`patterns`] - Image, video and fact recognizers
//! - [`normalize`] - URL absolutization, filtering and dedup
//! - [`extractors`] - Firecrawl, direct HTTP and mock tiers
//! - [`pipeline`] - Orchestrator, Aggregator and the caller boundary
//! - [`security`] - Credential handling and SSRF protection
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod extractors;
pub mod html;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ExtractError, GenerationError, SecurityError};
pub use error::{ExtractResult, GenerationResult, SecurityResult};
pub use traits::{
    extractor::{SourceExtractor, ValidatedExtractor},
    generator::ContentGenerator,
};
pub use types::{
    AggregatedBundle, ExtractionAttempt, ExtractionStrategy, GeneratedContent, GeneratedCopy,
    PipelineConfig, ProductContentRequest, ProductContentResponse, ScrapedContent,
};

// Re-export extractors
pub use extractors::{FirecrawlExtractor, HttpExtractor, RateLimitedExtractor};

// Re-export pipeline components
pub use pipeline::{
    build_generation_context, format_narrative_section, generate_product_content, Aggregator,
    Orchestrator,
};

pub use normalize::{AssetKind, Normalizer};
pub use security::{SecretString, UrlValidator};
