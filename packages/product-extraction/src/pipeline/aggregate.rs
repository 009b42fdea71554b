//! Multi-source aggregation.
//!
//! Source URLs are processed strictly one after another; the cap on how
//! many are processed lives in [`PipelineConfig::max_sources`].

use std::fmt::Write;
use tracing::{debug, info};

use super::orchestrator::Orchestrator;
use crate::normalize::dedup_preserving_order;
use crate::types::{AggregatedBundle, PipelineConfig, ScrapedContent};

const NOT_FOUND: &str = "Not found";

/// Runs the orchestrator over a bounded list of source URLs and merges the
/// results into one [`AggregatedBundle`].
pub struct Aggregator {
    orchestrator: Orchestrator,
    config: PipelineConfig,
}

impl Aggregator {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process up to `max_sources` URLs in input order.
    ///
    /// Blank entries are skipped before the cap is applied. A URL that
    /// fails both tiers contributes nothing and does not stop the rest.
    pub async fn aggregate<S: AsRef<str>>(&self, urls: &[S]) -> AggregatedBundle {
        let mut bundle = AggregatedBundle::default();
        let mut images: Vec<String> = Vec::new();
        let mut videos: Vec<String> = Vec::new();

        let sources = urls
            .iter()
            .map(|u| u.as_ref().trim())
            .filter(|u| !u.is_empty())
            .take(self.config.max_sources);

        for (index, url) in sources.enumerate() {
            let content = self.orchestrator.extract(url).await;

            // Set-if-absent, from any processed source
            if bundle.scraped_price.is_none() {
                bundle.scraped_price = content.price.clone().filter(|p| !p.is_empty());
            }
            if bundle.scraped_rating.is_none() {
                bundle.scraped_rating = content.rating;
            }
            if bundle.scraped_review_count.is_none() {
                bundle.scraped_review_count = content.review_count;
            }

            if !content.has_content() {
                debug!(url = %url, "Source produced no content");
                continue;
            }

            bundle
                .narrative_sections
                .push(format_narrative_section(index + 1, url, &content));
            images.extend(content.image_urls);
            videos.extend(content.video_urls);

            debug!(
                url = %url,
                images_so_far = images.len(),
                videos_so_far = videos.len(),
                "Source merged"
            );
        }

        // Caps apply to the merged lists before cross-source duplicates are
        // dropped, so a bundle can hold fewer than the cap.
        images.truncate(self.config.max_images);
        videos.truncate(self.config.max_videos);
        bundle.scraped_images = dedup_preserving_order(images);
        bundle.scraped_videos = dedup_preserving_order(videos);

        info!(
            sources = bundle.narrative_sections.len(),
            images = bundle.scraped_images.len(),
            videos = bundle.scraped_videos.len(),
            has_price = bundle.scraped_price.is_some(),
            has_rating = bundle.scraped_rating.is_some(),
            "Aggregation complete"
        );

        bundle
    }
}

/// Render one source's findings as a context block for the generator.
pub fn format_narrative_section(index: usize, url: &str, content: &ScrapedContent) -> String {
    let or_not_found = |value: Option<String>| value.unwrap_or_else(|| NOT_FOUND.to_string());

    let mut section = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(section, "Source {}: {}", index, url);
    let _ = writeln!(section, "Title: {}", content.title);
    let _ = writeln!(section, "Description: {}", content.description);
    let _ = writeln!(section, "Content: {}", content.text_content);
    let _ = writeln!(section, "Price: {}", or_not_found(content.price.clone()));
    let _ = writeln!(
        section,
        "Rating: {}",
        or_not_found(content.rating.map(|r| r.to_string()))
    );
    let _ = writeln!(
        section,
        "Review Count: {}",
        or_not_found(content.review_count.map(|c| c.to_string()))
    );
    let _ = writeln!(section, "Images Found: {}", content.image_urls.len());
    let _ = write!(section, "Videos Found: {}", content.video_urls.len());
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::MockExtractor;

    fn aggregator(mock: MockExtractor) -> Aggregator {
        Aggregator::new(Orchestrator::fallback_only(mock))
    }

    #[test]
    fn test_narrative_section_format() {
        let content = ScrapedContent::empty()
            .with_title("Widget")
            .with_description("A widget")
            .with_text("Body")
            .with_price("$5.00")
            .with_images(["https://a.example/1.jpg", "https://a.example/2.jpg"]);

        let section = format_narrative_section(2, "https://a.example/p", &content);

        assert_eq!(
            section,
            "Source 2: https://a.example/p\n\
             Title: Widget\n\
             Description: A widget\n\
             Content: Body\n\
             Price: $5.00\n\
             Rating: Not found\n\
             Review Count: Not found\n\
             Images Found: 2\n\
             Videos Found: 0"
        );
    }

    #[tokio::test]
    async fn test_scalars_from_contentless_source() {
        // Price only: no narrative, but the fact still counts
        let mock = MockExtractor::new()
            .with_content("https://a.example/", ScrapedContent::empty().with_price("$7.00"))
            .with_content(
                "https://b.example/",
                ScrapedContent::empty().with_text("b").with_price("$9.00").with_rating(4.0),
            );

        let bundle = aggregator(mock)
            .aggregate(&["https://a.example/", "https://b.example/"])
            .await;

        assert_eq!(bundle.narrative_sections.len(), 1);
        assert!(bundle.narrative_sections[0].starts_with("Source 2: https://b.example/"));
        assert_eq!(bundle.scraped_price.as_deref(), Some("$7.00"));
        assert_eq!(bundle.scraped_rating, Some(4.0));
    }

    #[tokio::test]
    async fn test_dedups_across_sources() {
        let mock = MockExtractor::new()
            .with_content(
                "https://a.example/",
                ScrapedContent::empty().with_images(["https://cdn.example/1.jpg", "https://cdn.example/2.jpg"]),
            )
            .with_content(
                "https://b.example/",
                ScrapedContent::empty().with_images(["https://cdn.example/2.jpg", "https://cdn.example/3.jpg"]),
            );

        let bundle = aggregator(mock)
            .aggregate(&["https://a.example/", "https://b.example/"])
            .await;

        assert_eq!(
            bundle.scraped_images,
            vec![
                "https://cdn.example/1.jpg",
                "https://cdn.example/2.jpg",
                "https://cdn.example/3.jpg"
            ]
        );
    }

    #[tokio::test]
    async fn test_caps_apply_before_dedup() {
        let first: Vec<String> = (1..=5)
            .map(|i| format!("https://cdn.example/{}.jpg", i))
            .collect();
        let second: Vec<String> = (1..=8)
            .map(|i| format!("https://cdn.example/{}.jpg", i))
            .collect();
        let mock = MockExtractor::new()
            .with_content("https://a.example/", ScrapedContent::empty().with_images(first.clone()))
            .with_content("https://b.example/", ScrapedContent::empty().with_images(second));

        let bundle = aggregator(mock)
            .aggregate(&["https://a.example/", "https://b.example/"])
            .await;

        // 5 from the first source plus 3 repeats from the second fill the cap
        assert_eq!(bundle.scraped_images, first);
    }

    #[tokio::test]
    async fn test_blank_links_are_skipped() {
        let mock = MockExtractor::new();
        let bundle = aggregator(mock.clone())
            .aggregate(&["", "  ", "https://a.example/"])
            .await;

        assert!(bundle.is_empty());
        assert_eq!(mock.calls(), vec!["https://a.example/"]);
    }

    #[tokio::test]
    async fn test_custom_source_cap() {
        let mock = MockExtractor::new();
        let aggregator = aggregator(mock.clone()).with_config(PipelineConfig::new().with_max_sources(1));

        aggregator
            .aggregate(&["https://a.example/", "https://b.example/"])
            .await;

        assert_eq!(mock.call_count(), 1);
    }
}
