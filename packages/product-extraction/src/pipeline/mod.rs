//! Orchestration of the extraction tiers across source URLs.
//!
//! - [`Orchestrator`] picks a tier per URL
//! - [`Aggregator`] merges up to `max_sources` URLs into a bundle
//! - [`generate_product_content`] is the caller-facing entry point

pub mod aggregate;
pub mod generate;
pub mod orchestrator;

pub use aggregate::{format_narrative_section, Aggregator};
pub use generate::{build_generation_context, generate_product_content};
pub use orchestrator::Orchestrator;
