//! Data types for the extraction pipeline.

pub mod bundle;
pub mod config;
pub mod content;
pub mod request;

pub use bundle::{AggregatedBundle, ExtractionAttempt, ExtractionStrategy};
pub use config::PipelineConfig;
pub use content::ScrapedContent;
pub use request::{GeneratedContent, GeneratedCopy, ProductContentRequest, ProductContentResponse};
