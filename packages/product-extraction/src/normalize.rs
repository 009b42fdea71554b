//! URL normalization and asset filtering.
//!
//! Turns raw candidates from the pattern library into absolute asset URLs:
//!
//! 1. data URIs are rejected outright
//! 2. `//cdn/x.jpg` takes the base URL's scheme
//! 3. `/x.jpg` takes the base URL's scheme and host
//! 4. `./x.jpg` takes scheme and host, with the leading dot dropped
//! 5. anything else without a scheme is resolved against the host root
//!
//! The absolute URL is then accepted only if it looks like the requested
//! asset kind and stays under the length bound. Normalizing an already
//! normalized URL returns it unchanged.

use indexmap::IndexSet;
use url::Url;

use crate::types::config::DEFAULT_MAX_URL_LENGTH;

/// Recognized image file extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "avif"];

/// Recognized video file extensions.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v", "ogv", "ogg", "m3u8"];

/// Hosts whose links are videos regardless of path.
pub const VIDEO_PLATFORMS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "youtube-nocookie.com",
    "vimeo.com",
    "wistia.com",
    "wistia.net",
    "dailymotion.com",
];

/// Path substrings marking icons, tracking pixels and page chrome rather
/// than product imagery.
pub const NOISE_MARKERS: &[&str] = &[
    "favicon",
    "apple-touch-icon",
    "spacer.gif",
    "blank.gif",
    "transparent.gif",
    "pixel.gif",
    "/pixel.",
    "/pixel/",
    "/1x1.",
    "tracking",
    "analytics",
    "header-logo",
    "logo-header",
    "site-logo",
];

/// Ad and analytics hosts that never serve product imagery.
pub const NOISE_HOSTS: &[&str] = &[
    "doubleclick.net",
    "google-analytics.com",
    "googletagmanager.com",
];

/// Which kind of asset a candidate is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
}

/// Whether a candidate is page noise: its path carries one of the
/// [`NOISE_MARKERS`], or it is served from one of the [`NOISE_HOSTS`].
///
/// Only the path is inspected, so a store whose host or query string
/// happens to contain a marker keeps its images.
pub fn is_noise(candidate: &str) -> bool {
    let lower = candidate.trim().to_ascii_lowercase();
    let absolute = match lower.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("https://{}", rest)).ok(),
        None => Url::parse(&lower).ok(),
    };

    match absolute {
        Some(url) => {
            url.host_str().is_some_and(is_noise_host) || has_noise_marker(url.path())
        }
        None => {
            let path = lower.split(|c| c == '?' || c == '#').next().unwrap_or_default();
            has_noise_marker(path)
        }
    }
}

fn has_noise_marker(path: &str) -> bool {
    NOISE_MARKERS.iter().any(|marker| path.contains(marker))
}

fn is_noise_host(host: &str) -> bool {
    NOISE_HOSTS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

/// Whether a URL path ends in one of `extensions` (case-insensitive).
pub fn has_extension(path: &str, extensions: &[&str]) -> bool {
    let lower = path.to_ascii_lowercase();
    match lower.rsplit_once('.') {
        Some((_, ext)) => extensions.contains(&ext),
        None => false,
    }
}

/// Whether `host` is, or is a subdomain of, a known video platform.
pub fn is_video_platform(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    VIDEO_PLATFORMS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

/// Resolves candidates against one page URL.
#[derive(Debug, Clone)]
pub struct Normalizer {
    base: Url,
    max_url_length: usize,
}

impl Normalizer {
    /// Create a normalizer for the given page URL.
    ///
    /// Returns `None` when the base is not an absolute URL with a host.
    pub fn new(base_url: &str) -> Option<Self> {
        let base = Url::parse(base_url).ok()?;
        base.host_str()?;
        Some(Self {
            base,
            max_url_length: DEFAULT_MAX_URL_LENGTH,
        })
    }

    /// Set the maximum accepted URL length.
    pub fn with_max_url_length(mut self, max: usize) -> Self {
        self.max_url_length = max;
        self
    }

    /// The page URL candidates are resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Normalize one candidate, or reject it.
    pub fn normalize(&self, candidate: &str, kind: AssetKind) -> Option<String> {
        let candidate = candidate.trim();
        if candidate.is_empty() || candidate.len() >= self.max_url_length {
            return None;
        }
        if candidate
            .get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("data:"))
        {
            return None;
        }

        let url = Url::parse(&self.absolutize(candidate)).ok()?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return None;
        }

        let normalized = url.to_string();
        if normalized.len() >= self.max_url_length {
            return None;
        }

        let accepted = match kind {
            AssetKind::Image => {
                !is_noise(url.as_str()) && has_extension(url.path(), IMAGE_EXTENSIONS)
            }
            AssetKind::Video => {
                has_extension(url.path(), VIDEO_EXTENSIONS)
                    || url.host_str().is_some_and(is_video_platform)
            }
        };

        accepted.then_some(normalized)
    }

    fn absolutize(&self, candidate: &str) -> String {
        let origin = self.base.origin().ascii_serialization();

        if let Some(rest) = candidate.strip_prefix("//") {
            format!("{}://{}", self.base.scheme(), rest)
        } else if candidate.starts_with('/') {
            format!("{}{}", origin, candidate)
        } else if let Some(rest) = candidate.strip_prefix("./") {
            format!("{}/{}", origin, rest)
        } else if Url::parse(candidate).is_ok() {
            candidate.to_string()
        } else {
            format!("{}/{}", origin, candidate)
        }
    }
}

/// Normalize a single candidate against a base URL string.
pub fn normalize(candidate: &str, base_url: &str, kind: AssetKind) -> Option<String> {
    Normalizer::new(base_url)?.normalize(candidate, kind)
}

/// Exact-string, order-preserving deduplication (first occurrence wins).
pub fn dedup_preserving_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items
        .into_iter()
        .map(Into::into)
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Collects normalized image and video URLs for one page.
///
/// Every candidate goes through the [`Normalizer`]; accepted URLs are kept
/// once, in first-seen order.
#[derive(Debug, Clone)]
pub struct AssetSet {
    normalizer: Normalizer,
    images: IndexSet<String>,
    videos: IndexSet<String>,
}

impl AssetSet {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            images: IndexSet::new(),
            videos: IndexSet::new(),
        }
    }

    /// Add an image candidate. Returns `true` if it was accepted and new.
    pub fn add_image(&mut self, candidate: &str) -> bool {
        match self.normalizer.normalize(candidate, AssetKind::Image) {
            Some(url) => self.images.insert(url),
            None => false,
        }
    }

    /// Add a video candidate. Returns `true` if it was accepted and new.
    pub fn add_video(&mut self, candidate: &str) -> bool {
        match self.normalizer.normalize(candidate, AssetKind::Video) {
            Some(url) => self.videos.insert(url),
            None => false,
        }
    }

    pub fn extend_images<I, S>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for candidate in candidates {
            self.add_image(candidate.as_ref());
        }
    }

    pub fn extend_videos<I, S>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for candidate in candidates {
            self.add_video(candidate.as_ref());
        }
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn video_count(&self) -> usize {
        self.videos.len()
    }

    /// Consume into `(images, videos)`.
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (
            self.images.into_iter().collect(),
            self.videos.into_iter().collect(),
        )
    }
}
