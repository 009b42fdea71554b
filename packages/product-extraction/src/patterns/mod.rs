//! Recognizers for product assets and facts inside page markup.
//!
//! Everything here is stateless and infallible: malformed markup or a missing
//! match yields an empty list or `None`, never an error. Results are raw
//! candidates in discovery order; making them absolute, filtering and
//! deduplicating is the job of [`crate::normalize`].
//!
//! Markup is parsed into a DOM with `scraper`. Regexes are used only where
//! the input is not HTML: inline CSS, platform links that may sit in scripts
//! or JSON blobs, and the price/rating/review text patterns.

pub mod facts;
pub mod images;
pub mod videos;

pub use facts::{find_price, find_rating, find_review_count, PageFacts};
pub use images::{find_css_image_urls, find_image_candidates, find_image_candidates_in};
pub use videos::{
    canonical_video_url, find_video_candidates, find_video_candidates_in, vimeo_id, youtube_id,
};

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref SRCSET_SEPARATOR: Regex = Regex::new(r",\s+").unwrap();
}

/// Pick the last candidate URL of a `srcset` value.
///
/// Entries are usually ordered by width/density, so the last one is the
/// largest. Entries are split on `", "` when present so that commas inside
/// CDN transformation paths survive; otherwise on bare commas.
pub fn last_srcset_candidate(srcset: &str) -> Option<String> {
    let entries: Vec<&str> = if SRCSET_SEPARATOR.is_match(srcset) {
        SRCSET_SEPARATOR.split(srcset).collect()
    } else {
        srcset.split(',').collect()
    };

    entries
        .iter()
        .rev()
        .filter_map(|entry| entry.split_whitespace().next())
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

/// Run a CSS selector, yielding nothing if it fails to parse.
pub(crate) fn select_all<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// `content` of every `<meta>` whose `property` or `name` is in `keys`.
pub(crate) fn meta_contents(document: &Html, keys: &[&str]) -> Vec<String> {
    select_all(document, "meta")
        .into_iter()
        .filter(|meta| {
            let key = meta
                .value()
                .attr("property")
                .or_else(|| meta.value().attr("name"))
                .unwrap_or_default();
            keys.iter().any(|k| k.eq_ignore_ascii_case(key))
        })
        .filter_map(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .collect()
}

/// Whether any ancestor of `element` has one of the given tag names.
pub(crate) fn has_ancestor(element: &ElementRef<'_>, names: &[&str]) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| names.contains(&ancestor.value().name()))
}
