use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Rendering service key; absent means direct fetch only
    pub firecrawl_api_key: Option<String>,
    pub firecrawl_api_url: Option<String>,
    pub firecrawl_requests_per_second: u32,
    /// Skip the DNS half of the SSRF check (static checks still apply)
    pub skip_dns_check: bool,
}

impl CliConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            firecrawl_api_key: non_blank(env::var("FIRECRAWL_API_KEY").ok()),
            firecrawl_api_url: non_blank(env::var("FIRECRAWL_API_URL").ok()),
            firecrawl_requests_per_second: env::var("FIRECRAWL_REQUESTS_PER_SECOND")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("FIRECRAWL_REQUESTS_PER_SECOND must be a positive number")?,
            skip_dns_check: env::var("SCRAPE_SKIP_DNS_CHECK")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
