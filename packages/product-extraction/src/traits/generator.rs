//! Downstream content-generation seam.
//!
//! The language model that writes product copy is not part of this crate.
//! Applications implement [`ContentGenerator`] over whatever provider they
//! use; the pipeline hands it the request and the context rendered from the
//! aggregated bundle.

use async_trait::async_trait;

use crate::error::GenerationResult;
use crate::types::{GeneratedCopy, ProductContentRequest};

/// Writes product copy from caller input plus scraped context.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate name, description, tags and specifications.
    ///
    /// `context` is the text produced by
    /// [`crate::pipeline::build_generation_context`]: the caller's product
    /// info, one narrative section per useful source, and the scraped image
    /// list.
    async fn generate(
        &self,
        request: &ProductContentRequest,
        context: &str,
    ) -> GenerationResult<GeneratedCopy>;

    /// Get the generator name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
