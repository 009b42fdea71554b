//! Per-source extraction result.

use serde::{Deserialize, Serialize};

/// Everything one source URL yielded.
///
/// `image_urls` and `video_urls` are absolute, deduplicated (exact string
/// match, first occurrence wins) and never contain data URIs. Both extractor
/// tiers build them through [`crate::normalize::AssetSet`], which enforces this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedContent {
    /// Cleaned body text, truncated to the configured text limit
    pub text_content: String,

    /// Product image URLs in discovery order
    #[serde(default)]
    pub image_urls: Vec<String>,

    /// Direct video files or canonical platform links
    #[serde(default)]
    pub video_urls: Vec<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// First plausible currency-formatted token
    pub price: Option<String>,

    /// Star rating within [0, 5]
    pub rating: Option<f64>,

    pub review_count: Option<u64>,
}

impl ScrapedContent {
    /// An all-empty result, what a failed tier degrades to.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = text.into();
        self
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the page description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the image list.
    pub fn with_images(mut self, images: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.image_urls = images.into_iter().map(Into::into).collect();
        self
    }

    /// Set the video list.
    pub fn with_videos(mut self, videos: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.video_urls = videos.into_iter().map(Into::into).collect();
        self
    }

    /// Set the price.
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Set the rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set the review count.
    pub fn with_review_count(mut self, count: u64) -> Self {
        self.review_count = Some(count);
        self
    }

    /// Whether the result has any text.
    pub fn has_text(&self) -> bool {
        !self.text_content.trim().is_empty()
    }

    /// Whether the result contributes anything to a bundle.
    ///
    /// A source counts when it has text, at least one image, or at least one
    /// video. Scalar facts alone do not make a narrative section.
    pub fn has_content(&self) -> bool {
        self.has_text() || !self.image_urls.is_empty() || !self.video_urls.is_empty()
    }

    /// Whether nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        !self.has_content()
            && self.title.is_empty()
            && self.description.is_empty()
            && self.price.is_none()
            && self.rating.is_none()
            && self.review_count.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content() {
        let content = ScrapedContent::empty();
        assert!(content.is_empty());
        assert!(!content.has_content());
    }

    #[test]
    fn test_whitespace_text_is_not_content() {
        let content = ScrapedContent::empty().with_text("   \n ");
        assert!(!content.has_text());
        assert!(!content.has_content());
    }

    #[test]
    fn test_scalars_alone_are_not_content() {
        let content = ScrapedContent::empty().with_price("$10.00");
        assert!(!content.has_content());
        assert!(!content.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let content = ScrapedContent::empty()
            .with_images(["https://example.com/a.jpg"])
            .with_review_count(12);

        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["imageUrls"][0], "https://example.com/a.jpg");
        assert_eq!(json["reviewCount"], 12);
        assert!(json.get("textContent").is_some());
    }
}
