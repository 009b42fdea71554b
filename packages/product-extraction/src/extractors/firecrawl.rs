//! Firecrawl-based extractor (primary tier).
//!
//! Uses the Firecrawl scrape API to render JavaScript-heavy product pages.
//! The request waits for dynamic content, scrolls to trigger lazy-loaded
//! assets, and waits again before returning rendered HTML, a markdown
//! projection and the in-page link list.

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ExtractError, ExtractResult};
use crate::html::{extract_description, extract_title, truncate_chars, visible_text};
use crate::normalize::{has_extension, AssetSet, Normalizer, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::patterns::{
    canonical_video_url, find_image_candidates_in, find_video_candidates_in, vimeo_id, youtube_id,
    PageFacts,
};
use crate::security::SecretString;
use crate::traits::extractor::SourceExtractor;
use crate::types::{PipelineConfig, ScrapedContent};

/// Default Firecrawl API root.
pub const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";

const SERVICE: &str = "firecrawl";

/// Firecrawl-based extractor for JavaScript-rendered pages.
///
/// # Example
///
/// ```rust,ignore
/// use product_extraction::{FirecrawlExtractor, SourceExtractor};
///
/// let extractor = FirecrawlExtractor::from_env()?;
/// if extractor.is_configured() {
///     let content = extractor.extract("https://example.com/product").await?;
/// }
/// ```
pub struct FirecrawlExtractor {
    client: Client,
    api_key: SecretString,
    base_url: String,
    /// Initial wait before the page is captured (milliseconds)
    wait_for_ms: u64,
    /// Wait after scrolling, for lazy-loaded assets (milliseconds)
    settle_ms: u64,
    config: PipelineConfig,
}

// Request/Response types for the Firecrawl scrape API

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 3],
    only_main_content: bool,
    wait_for: u64,
    actions: Vec<PageAction>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum PageAction {
    Wait { milliseconds: u64 },
    Scroll { direction: &'static str },
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

/// The `data` object of a scrape response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeData {
    pub html: Option<String>,
    pub raw_html: Option<String>,
    pub markdown: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
    /// Structured image list, when the service provides one
    #[serde(default)]
    pub images: Vec<serde_json::Value>,
    /// Alternate name some service versions use for the image list
    #[serde(default)]
    pub image_urls: Vec<serde_json::Value>,
    pub metadata: Option<PageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<OneOrMany>,
}

/// A metadata field that is either a single string or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl FirecrawlExtractor {
    /// Create a new Firecrawl extractor with the given API key.
    pub fn new(api_key: impl Into<SecretString>) -> ExtractResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: FIRECRAWL_API_URL.to_string(),
            wait_for_ms: 2000,
            settle_ms: 2000,
            config: PipelineConfig::default(),
        })
    }

    /// Create from `FIRECRAWL_API_KEY` and optional `FIRECRAWL_API_URL`.
    ///
    /// A missing key is not an error: the extractor reports itself as
    /// unconfigured and the orchestrator skips it.
    pub fn from_env() -> ExtractResult<Self> {
        let api_key = std::env::var("FIRECRAWL_API_KEY").unwrap_or_default();
        let extractor = Self::new(api_key)?;
        Ok(match std::env::var("FIRECRAWL_API_URL") {
            Ok(base_url) if !base_url.trim().is_empty() => extractor.with_base_url(base_url),
            _ => extractor,
        })
    }

    /// Point at a different API root (self-hosted Firecrawl, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the wait before and after the scroll action (milliseconds).
    pub fn with_waits(mut self, wait_for_ms: u64, settle_ms: u64) -> Self {
        self.wait_for_ms = wait_for_ms;
        self.settle_ms = settle_ms;
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn scrape_request<'a>(&self, url: &'a str) -> ScrapeRequest<'a> {
        ScrapeRequest {
            url,
            formats: ["html", "markdown", "links"],
            only_main_content: false,
            wait_for: self.wait_for_ms,
            actions: vec![
                PageAction::Wait {
                    milliseconds: self.wait_for_ms,
                },
                PageAction::Scroll { direction: "down" },
                PageAction::Wait {
                    milliseconds: self.settle_ms,
                },
            ],
        }
    }

    async fn scrape(&self, url: &str) -> ExtractResult<ScrapeData> {
        let endpoint = format!("{}/scrape", self.base_url);
        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&self.scrape_request(url))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ExtractError::ServiceFailure {
                service: SERVICE.to_string(),
                url: url.to_string(),
                reason: format!("HTTP {} - {}", status, truncate_chars(&text, 200)),
            });
        }

        let body: ScrapeResponse = response.json().await?;
        match body {
            ScrapeResponse {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            ScrapeResponse { error, .. } => Err(ExtractError::ServiceFailure {
                service: SERVICE.to_string(),
                url: url.to_string(),
                reason: error.unwrap_or_else(|| "scrape reported failure".to_string()),
            }),
        }
    }
}

/// Pull URL strings out of a structured image list.
///
/// Entries are either plain strings or objects carrying `url`/`src`.
fn native_image_urls(values: &[serde_json::Value]) -> impl Iterator<Item = &str> {
    values.iter().filter_map(|value| match value {
        serde_json::Value::String(url) => Some(url.as_str()),
        serde_json::Value::Object(map) => map
            .get("url")
            .or_else(|| map.get("src"))
            .and_then(|url| url.as_str()),
        _ => None,
    })
}

fn link_is_video(link: &str) -> bool {
    if youtube_id(link).is_some() || vimeo_id(link).is_some() {
        return true;
    }
    Url::parse(link)
        .map(|parsed| has_extension(parsed.path(), VIDEO_EXTENSIONS))
        .unwrap_or(false)
}

fn link_is_image(link: &str) -> bool {
    Url::parse(link)
        .map(|parsed| has_extension(parsed.path(), IMAGE_EXTENSIONS))
        .unwrap_or(false)
}

/// Turn a scrape payload into [`ScrapedContent`].
///
/// Candidates are gathered highest-precision first: the service's link
/// list, then markup patterns over the rendered HTML, then any structured
/// image fields. Rendered HTML shorter than `config.min_rendered_html`
/// fails the call so the orchestrator falls back.
pub fn build_content(
    url: &str,
    data: ScrapeData,
    config: &PipelineConfig,
) -> ExtractResult<ScrapedContent> {
    let html = data.html.or(data.raw_html).unwrap_or_default();
    if html.trim().len() < config.min_rendered_html {
        return Err(ExtractError::InsufficientContent {
            url: url.to_string(),
            length: html.trim().len(),
        });
    }

    let normalizer = Normalizer::new(url)
        .ok_or_else(|| ExtractError::InvalidUrl {
            url: url.to_string(),
        })?
        .with_max_url_length(config.max_url_length);
    let mut assets = AssetSet::new(normalizer);

    for link in &data.links {
        if link_is_image(link) {
            assets.add_image(link);
        } else if link_is_video(link) {
            assets.add_video(&canonical_video_url(link));
        }
    }
    let link_images = assets.image_count();
    let link_videos = assets.video_count();

    let document = Html::parse_document(&html);
    assets.extend_images(find_image_candidates_in(&document));
    assets.extend_videos(find_video_candidates_in(&document, &html));

    let metadata = data.metadata.unwrap_or_default();
    assets.extend_images(native_image_urls(&data.images));
    assets.extend_images(native_image_urls(&data.image_urls));
    if let Some(og_image) = metadata.og_image {
        assets.extend_images(og_image.into_vec());
    }

    debug!(
        url = %url,
        link_images,
        link_videos,
        total_images = assets.image_count(),
        total_videos = assets.video_count(),
        "Rendered page candidates collected"
    );

    let markdown = data.markdown.unwrap_or_default();
    let text = if markdown.trim().is_empty() {
        visible_text(&document)
    } else {
        markdown.trim().to_string()
    };

    let mut facts = PageFacts::find(&html);
    facts.fill_missing(&markdown);

    let title = [metadata.title, metadata.og_title]
        .into_iter()
        .flatten()
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| extract_title(&document));
    let description = [metadata.description, metadata.og_description]
        .into_iter()
        .flatten()
        .map(|d| d.trim().to_string())
        .find(|d| !d.is_empty())
        .unwrap_or_else(|| extract_description(&document));

    let (image_urls, video_urls) = assets.into_parts();
    Ok(ScrapedContent {
        text_content: truncate_chars(&text, config.text_limit),
        image_urls,
        video_urls,
        title,
        description,
        price: facts.price,
        rating: facts.rating,
        review_count: facts.review_count,
    })
}

#[async_trait]
impl SourceExtractor for FirecrawlExtractor {
    async fn extract(&self, url: &str) -> ExtractResult<ScrapedContent> {
        if !self.is_configured() {
            return Err(ExtractError::NotConfigured {
                service: SERVICE.to_string(),
            });
        }

        debug!(url = %url, "Firecrawl scrape starting");
        let data = self.scrape(url).await.map_err(|e| {
            warn!(url = %url, error = %e, "Firecrawl scrape failed");
            e
        })?;

        let content = build_content(url, data, &self.config)?;
        info!(
            url = %url,
            images = content.image_urls.len(),
            videos = content.video_urls.len(),
            has_price = content.price.is_some(),
            "Rendered page parsed"
        );
        Ok(content)
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_blank()
    }

    fn name(&self) -> &str {
        SERVICE
    }
}
