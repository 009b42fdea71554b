//! Image candidate recognizers.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;

use super::{has_ancestor, last_srcset_candidate, meta_contents, select_all};
use crate::normalize::is_noise;

/// `<img>` attributes carrying a single URL, in priority order.
const IMG_URL_ATTRS: &[&str] = &[
    "src",
    "data-src",
    "data-lazy-src",
    "data-lazy",
    "data-original",
    "data-hi-res-src",
];

/// `<img>`/`<source>` attributes carrying a srcset.
const SRCSET_ATTRS: &[&str] = &["srcset", "data-srcset", "data-lazy-srcset"];

/// Meta tags naming a page's share image.
const IMAGE_META_KEYS: &[&str] = &[
    "og:image",
    "og:image:url",
    "og:image:secure_url",
    "twitter:image",
    "twitter:image:src",
];

lazy_static! {
    static ref CSS_URL: Regex = Regex::new(
        r#"(?i)background(?:-image)?\s*:[^;{}]*?url\(\s*['"]?([^'")]+?)['"]?\s*\)"#
    )
    .unwrap();

    // data-image, data-zoom-image, data-large-image, data-image-src, ...
    static ref DATA_IMAGE_ATTR: Regex =
        Regex::new(r"^data-(?:[a-z0-9]+-)*image(?:-(?:src|url))?$").unwrap();
}

/// Find raw image URL candidates in a markup blob.
pub fn find_image_candidates(markup: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    find_image_candidates_in(&document)
}

/// Find raw image URL candidates in an already parsed document.
///
/// Recognizers run in this order, each in document order:
/// `<img>` URL and lazy-load attributes, `<picture>`/`<source>` srcsets,
/// CSS `background-image`, `data-*-image` attributes, `<noscript>` fallbacks,
/// and finally Open Graph / Twitter card images.
pub fn find_image_candidates_in(document: &Html) -> Vec<String> {
    let mut candidates = Vec::new();

    for img in select_all(document, "img") {
        let element = img.value();
        let in_header = has_ancestor(&img, &["header"]);

        let mut found: Vec<String> = IMG_URL_ATTRS
            .iter()
            .filter_map(|attr| element.attr(attr))
            .map(|value| value.trim().to_string())
            .collect();
        found.extend(
            SRCSET_ATTRS
                .iter()
                .filter_map(|attr| element.attr(attr))
                .filter_map(last_srcset_candidate),
        );

        let logo_like = ["alt", "class", "id"]
            .iter()
            .filter_map(|attr| element.attr(attr))
            .any(|value| value.to_ascii_lowercase().contains("logo"));

        for url in found {
            if in_header && (logo_like || url.to_ascii_lowercase().contains("logo")) {
                continue;
            }
            candidates.push(url);
        }
    }

    for source in select_all(document, "picture source, source") {
        if source.value().attr("type").is_some_and(|t| t.starts_with("video/")) {
            continue;
        }
        candidates.extend(
            SRCSET_ATTRS
                .iter()
                .filter_map(|attr| source.value().attr(attr))
                .filter_map(last_srcset_candidate),
        );
    }

    for element in select_all(document, "[style]") {
        if let Some(style) = element.value().attr("style") {
            candidates.extend(find_css_image_urls(style));
        }
    }
    for style in select_all(document, "style") {
        candidates.extend(find_css_image_urls(&style.text().collect::<String>()));
    }

    for element in select_all(document, "*") {
        for (name, value) in element.value().attrs() {
            if DATA_IMAGE_ATTR.is_match(name) && !value.trim().is_empty() {
                candidates.push(value.trim().to_string());
            }
        }
    }

    // With scripting enabled the parser keeps <noscript> bodies as raw text,
    // which is where lazy-loading sites put their real <img> tags.
    for noscript in select_all(document, "noscript") {
        let inner = noscript.text().collect::<String>();
        if inner.contains('<') {
            let fragment = Html::parse_fragment(&inner);
            candidates.extend(find_image_candidates_in(&fragment));
        }
    }

    candidates.extend(meta_contents(document, IMAGE_META_KEYS));

    candidates.retain(|url| !url.is_empty() && !is_noise(url));
    candidates
}

/// Find `background`/`background-image` URLs in a CSS fragment.
pub fn find_css_image_urls(css: &str) -> Vec<String> {
    CSS_URL
        .captures_iter(css)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}
