//! Configuration types for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Default number of source URLs processed per request.
///
/// Sources are processed one after another to stay under the rendering
/// service's rate limits and to bound traffic against third-party sites.
pub const DEFAULT_MAX_SOURCES: usize = 3;

/// Default cap on images in an [`crate::AggregatedBundle`].
pub const DEFAULT_MAX_IMAGES: usize = 8;

/// Default cap on videos in an [`crate::AggregatedBundle`].
pub const DEFAULT_MAX_VIDEOS: usize = 5;

/// Default truncation length for `text_content`, in characters.
pub const DEFAULT_TEXT_LIMIT: usize = 3000;

/// Rendered HTML shorter than this is treated as a failed render.
pub const DEFAULT_MIN_RENDERED_HTML: usize = 100;

/// Candidate URLs at or above this length are treated as encoded garbage.
pub const DEFAULT_MAX_URL_LENGTH: usize = 2000;

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum source URLs processed per aggregation.
    ///
    /// Default: 3.
    pub max_sources: usize,

    /// Maximum images kept in the bundle. Default: 8.
    pub max_images: usize,

    /// Maximum videos kept in the bundle. Default: 5.
    pub max_videos: usize,

    /// Characters of body text kept per source. Default: 3000.
    pub text_limit: usize,

    /// Minimum rendered HTML length for the primary tier to count as a
    /// success. Default: 100.
    pub min_rendered_html: usize,

    /// Upper bound on accepted asset URL length. Default: 2000.
    pub max_url_length: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_sources: DEFAULT_MAX_SOURCES,
            max_images: DEFAULT_MAX_IMAGES,
            max_videos: DEFAULT_MAX_VIDEOS,
            text_limit: DEFAULT_TEXT_LIMIT,
            min_rendered_html: DEFAULT_MIN_RENDERED_HTML,
            max_url_length: DEFAULT_MAX_URL_LENGTH,
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of source URLs processed.
    pub fn with_max_sources(mut self, max: usize) -> Self {
        self.max_sources = max;
        self
    }

    /// Set the image cap.
    pub fn with_max_images(mut self, max: usize) -> Self {
        self.max_images = max;
        self
    }

    /// Set the video cap.
    pub fn with_max_videos(mut self, max: usize) -> Self {
        self.max_videos = max;
        self
    }

    /// Set the text truncation length.
    pub fn with_text_limit(mut self, limit: usize) -> Self {
        self.text_limit = limit;
        self
    }

    /// Set the minimum rendered HTML length.
    pub fn with_min_rendered_html(mut self, min: usize) -> Self {
        self.min_rendered_html = min;
        self
    }

    /// Set the maximum asset URL length.
    pub fn with_max_url_length(mut self, max: usize) -> Self {
        self.max_url_length = max;
        self
    }
}
