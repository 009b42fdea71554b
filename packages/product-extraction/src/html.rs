//! Page-level HTML helpers shared by the extractor tiers.

use scraper::{ElementRef, Html};

use crate::normalize::{AssetSet, Normalizer};
use crate::patterns::{self, meta_contents, select_all, PageFacts};
use crate::types::{PipelineConfig, ScrapedContent};

/// Elements whose text never counts as body text.
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "noscript", "template",
];

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `limit` characters, on a char boundary.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Visible text of a document with script/style/nav/header/footer removed.
pub fn visible_text(document: &Html) -> String {
    let mut chunks = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let excluded = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|element| NON_CONTENT_TAGS.contains(&element.value().name()));
        if !excluded {
            chunks.push(&**text);
        }
    }

    collapse_whitespace(&chunks.join(" "))
}

/// `<title>` text, falling back to `og:title`.
pub fn extract_title(document: &Html) -> String {
    select_all(document, "title")
        .into_iter()
        .map(|title| collapse_whitespace(&title.text().collect::<String>()))
        .find(|title| !title.is_empty())
        .or_else(|| meta_contents(document, &["og:title"]).into_iter().next())
        .unwrap_or_default()
}

/// Meta description, falling back to `og:description`.
pub fn extract_description(document: &Html) -> String {
    meta_contents(document, &["description"])
        .into_iter()
        .chain(meta_contents(document, &["og:description"]))
        .next()
        .map(|description| collapse_whitespace(&description))
        .unwrap_or_default()
}

/// Build a [`ScrapedContent`] from raw server-rendered HTML.
///
/// Asset and fact recognizers run over the full raw HTML, so attributes
/// inside stripped regions still count. Facts the raw HTML does not yield
/// are then looked for in the visible text, which catches values split
/// across inline tags.
pub fn parse_page(url: &str, html: &str, config: &PipelineConfig) -> ScrapedContent {
    let document = Html::parse_document(html);
    let text = visible_text(&document);

    let (image_urls, video_urls) = match Normalizer::new(url) {
        Some(normalizer) => {
            let mut assets =
                AssetSet::new(normalizer.with_max_url_length(config.max_url_length));
            assets.extend_images(patterns::find_image_candidates_in(&document));
            assets.extend_videos(patterns::find_video_candidates_in(&document, html));
            assets.into_parts()
        }
        None => (Vec::new(), Vec::new()),
    };

    let mut facts = PageFacts::find(html);
    facts.fill_missing(&text);

    ScrapedContent {
        text_content: truncate_chars(&text, config.text_limit),
        image_urls,
        video_urls,
        title: extract_title(&document),
        description: extract_description(&document),
        price: facts.price,
        rating: facts.rating,
        review_count: facts.review_count,
    }
}
