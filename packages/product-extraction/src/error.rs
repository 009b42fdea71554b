//! Typed errors for the product extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Note that none of these escape the pipeline itself: the orchestrator and
//! aggregator degrade every [`ExtractError`] to empty or partial data. They
//! exist so each tier can say *why* it produced nothing.

use thiserror::Error;

/// Errors a single extraction tier can signal.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Security validation failed
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// HTTP request failed (DNS, timeout, connection reset, body decode)
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Remote answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The rendering service has no credentials configured
    #[error("{service} is not configured")]
    NotConfigured { service: String },

    /// The rendering service reported failure for this URL
    #[error("{service} failed for {url}: {reason}")]
    ServiceFailure {
        service: String,
        url: String,
        reason: String,
    },

    /// Rendered HTML missing or too short to be a real page
    #[error("insufficient content for {url}: {length} bytes of HTML")]
    InsufficientContent { url: String, length: usize },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    RateLimitExceeded,
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        ExtractError::Http(Box::new(err))
    }
}

/// Security-related errors, primarily for SSRF protection.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, internal IPs)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    DnsResolution(String),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Errors from the downstream content-generation collaborator.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No model is configured
    #[error("content generator not configured: {0}")]
    NotConfigured(String),

    /// The model answered with something we could not use
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// The model provider failed
    #[error("generation provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl GenerationError {
    /// HTTP status a boundary handler should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            GenerationError::NotConfigured(_) => 503,
            GenerationError::MalformedResponse(_) | GenerationError::JsonParse(_) => 502,
            GenerationError::Provider(_) => 502,
        }
    }
}

/// Result type alias for extraction tiers.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;

/// Result type alias for content generation.
pub type GenerationResult<T> = std::result::Result<T, GenerationError>;
