//! Video candidate recognizers.
//!
//! YouTube and Vimeo links are reported in canonical form
//! (`https://www.youtube.com/watch?v=<id>`, `https://vimeo.com/<id>`) so the
//! same video embedded three different ways collapses to one entry.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;

use super::{meta_contents, select_all};
use crate::normalize::{has_extension, VIDEO_EXTENSIONS};

const VIDEO_META_KEYS: &[&str] = &[
    "og:video",
    "og:video:url",
    "og:video:secure_url",
    "twitter:player:stream",
];

lazy_static! {
    static ref YOUTUBE: Regex = Regex::new(
        r"(?i)(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:[^\s\x22'<>]*?&(?:amp;)?)?v=|embed/|shorts/|v/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})"
    )
    .unwrap();

    static ref VIMEO: Regex =
        Regex::new(r"(?i)vimeo\.com/(?:video/|channels/[\w-]+/|groups/[\w-]+/videos/)?(\d+)")
            .unwrap();
}

/// Extract the 11-character id from any YouTube watch/short/embed link.
pub fn youtube_id(link: &str) -> Option<String> {
    YOUTUBE
        .captures(link)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the numeric id from a Vimeo link.
pub fn vimeo_id(link: &str) -> Option<String> {
    VIMEO
        .captures(link)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Rewrite YouTube/Vimeo links to canonical form; other links pass through.
pub fn canonical_video_url(link: &str) -> String {
    if let Some(id) = youtube_id(link) {
        format!("https://www.youtube.com/watch?v={}", id)
    } else if let Some(id) = vimeo_id(link) {
        format!("https://vimeo.com/{}", id)
    } else {
        link.to_string()
    }
}

/// Find raw video URL candidates in a markup blob.
pub fn find_video_candidates(markup: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    find_video_candidates_in(&document, markup)
}

/// Find raw video URL candidates in an already parsed document.
///
/// `markup` is the source the document was parsed from; platform links are
/// searched for in the raw text because they often live in scripts, JSON
/// blobs or iframe attributes.
pub fn find_video_candidates_in(document: &Html, markup: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    for video in select_all(document, "video") {
        for attr in ["src", "data-src"] {
            if let Some(src) = video.value().attr(attr) {
                candidates.push(src.trim().to_string());
            }
        }
    }

    for source in select_all(document, "source[src]") {
        let element = source.value();
        let src = element.attr("src").unwrap_or_default().trim();
        let typed_video = element.attr("type").is_some_and(|t| t.starts_with("video/"));
        let path = src.split(['?', '#']).next().unwrap_or_default();
        if typed_video || has_extension(path, VIDEO_EXTENSIONS) {
            candidates.push(src.to_string());
        }
    }

    for cap in YOUTUBE.captures_iter(markup) {
        if let Some(id) = cap.get(1) {
            candidates.push(format!("https://www.youtube.com/watch?v={}", id.as_str()));
        }
    }

    for cap in VIMEO.captures_iter(markup) {
        if let Some(id) = cap.get(1) {
            candidates.push(format!("https://vimeo.com/{}", id.as_str()));
        }
    }

    for element in select_all(document, "*") {
        for (name, value) in element.value().attrs() {
            if name.starts_with("data-video") && !value.trim().is_empty() {
                candidates.push(canonical_video_url(value.trim()));
            }
        }
    }

    candidates.extend(
        meta_contents(document, VIDEO_META_KEYS)
            .iter()
            .map(|link| canonical_video_url(link)),
    );

    candidates.retain(|url| !url.is_empty());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_and_source_tags() {
        let html = r#"
            <video src="/media/intro.mp4"></video>
            <video><source src="/media/demo.webm" type="video/webm"></video>
            <video><source src="/media/clip.mov?v=2"></video>
            <audio><source src="/media/song.mp3"></audio>
        "#;

        let found = find_video_candidates(html);
        assert_eq!(
            found,
            vec!["/media/intro.mp4", "/media/demo.webm", "/media/clip.mov?v=2"]
        );
    }

    #[test]
    fn test_youtube_forms_are_canonicalized() {
        let html = r#"
            <a href="https://www.youtube.com/watch?v=dQw4w9WgXcQ">watch</a>
            <iframe src="https://www.youtube.com/embed/9bZkp7q19f0?rel=0"></iframe>
            <a href="https://youtu.be/kJQP7kiw5Fk">short link</a>
            <a href="https://youtube.com/shorts/aqz-KE-bpKQ">short</a>
            <a href="https://www.youtube.com/watch?feature=share&amp;v=3JZ_D3ELwOQ">params</a>
        "#;

        let found = find_video_candidates(html);
        assert_eq!(
            found,
            vec![
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                "https://www.youtube.com/watch?v=9bZkp7q19f0",
                "https://www.youtube.com/watch?v=kJQP7kiw5Fk",
                "https://www.youtube.com/watch?v=aqz-KE-bpKQ",
                "https://www.youtube.com/watch?v=3JZ_D3ELwOQ",
            ]
        );
    }

    #[test]
    fn test_vimeo_ids_are_canonicalized() {
        let html = r#"
            <iframe src="https://player.vimeo.com/video/76979871?h=abc"></iframe>
            <a href="https://vimeo.com/148751763">vimeo</a>
        "#;

        let found = find_video_candidates(html);
        assert_eq!(
            found,
            vec!["https://vimeo.com/76979871", "https://vimeo.com/148751763"]
        );
    }

    #[test]
    fn test_data_video_attributes() {
        let html = r#"
            <div data-video-url="/media/spin.mp4"></div>
            <button data-video="https://youtu.be/dQw4w9WgXcQ"></button>
        "#;

        let found = find_video_candidates(html);
        assert!(found.contains(&"/media/spin.mp4".to_string()));
        assert!(found.contains(&"https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_id_helpers() {
        assert_eq!(
            youtube_id("https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=10"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(youtube_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(
            vimeo_id("https://vimeo.com/channels/staffpicks/123456"),
            Some("123456".to_string())
        );
        assert_eq!(
            canonical_video_url("/media/a.mp4"),
            "/media/a.mp4".to_string()
        );
    }

    #[test]
    fn test_no_videos() {
        assert!(find_video_candidates("<p>No media here</p>").is_empty());
        assert!(find_video_candidates("").is_empty());
    }
}
