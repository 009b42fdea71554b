//! Request/response shapes at the caller boundary.
//!
//! The HTTP framework that receives these is not part of this crate; these
//! types only fix the JSON contract on both sides of the pipeline.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::bundle::AggregatedBundle;

/// Input from the caller (e.g. an HTTP handler).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductContentRequest {
    pub product_name: String,

    #[serde(default)]
    pub basic_description: String,

    #[serde(default)]
    pub category: String,

    /// Candidate source URLs; only the first few are processed
    #[serde(default)]
    pub sales_links: Vec<String>,

    /// Already-attached images, used only for context
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductContentRequest {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.basic_description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_sales_link(mut self, url: impl Into<String>) -> Self {
        self.sales_links.push(url.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }
}

/// Fields the downstream model writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCopy {
    pub product_name: String,

    pub description: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Specification name to value, in the order the model produced them
    #[serde(default)]
    pub specifications: IndexMap<String, String>,
}

/// Output content: model-written copy plus the scraped raw material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub product_name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub specifications: IndexMap<String, String>,
    pub scraped_images: Vec<String>,
    pub scraped_videos: Vec<String>,
    pub scraped_price: Option<String>,
    pub scraped_rating: Option<f64>,
    pub scraped_review_count: Option<u64>,
}

impl GeneratedContent {
    /// Merge model-written copy with the bundle it was generated from.
    pub fn from_parts(copy: GeneratedCopy, bundle: AggregatedBundle) -> Self {
        Self {
            product_name: copy.product_name,
            description: copy.description,
            tags: copy.tags,
            specifications: copy.specifications,
            scraped_images: bundle.scraped_images,
            scraped_videos: bundle.scraped_videos,
            scraped_price: bundle.scraped_price,
            scraped_rating: bundle.scraped_rating,
            scraped_review_count: bundle.scraped_review_count,
        }
    }
}

/// Boundary response: `{success: true, content}` or `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductContentResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<GeneratedContent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Suggested HTTP status for the handler
    #[serde(skip)]
    pub status: u16,
}

impl ProductContentResponse {
    pub fn ok(content: GeneratedContent) -> Self {
        Self {
            success: true,
            content: Some(content),
            error: None,
            status: 200,
        }
    }

    pub fn failure(error: impl Into<String>, status: u16) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(error.into()),
            status,
        }
    }
}
