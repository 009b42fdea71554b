//! Command-line driver for the product extraction pipeline.
//!
//! Prints the aggregated bundle for the given URLs as JSON, or with
//! `--product` the context a copy-writing model would receive.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use product_extraction::{
    build_generation_context, Aggregator, FirecrawlExtractor, HttpExtractor, Orchestrator,
    PipelineConfig, ProductContentRequest, RateLimitedExtractor, SourceExtractor, UrlValidator,
    ValidatedExtractor,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CliConfig;

#[derive(Debug, Parser)]
#[command(name = "product-scrape", version, about = "Extract product assets and facts from sales pages")]
struct Cli {
    /// Product page URLs, in priority order
    #[arg(required = true)]
    urls: Vec<String>,

    /// Maximum number of URLs to process
    #[arg(short, long, default_value_t = product_extraction::types::config::DEFAULT_MAX_SOURCES)]
    limit: usize,

    /// Print the generation context for this product name instead of JSON
    #[arg(long, value_name = "NAME")]
    product: Option<String>,

    /// Basic description included in the generation context
    #[arg(long, requires = "product")]
    description: Option<String>,

    /// Category included in the generation context
    #[arg(long, requires = "product")]
    category: Option<String>,

    /// Skip the rendering service even if a key is configured
    #[arg(long)]
    no_primary: bool,
}

/// Wrap a tier in the SSRF guard configured for this run.
fn validated<E: SourceExtractor>(extractor: E, config: &CliConfig) -> ValidatedExtractor<E> {
    let validated = ValidatedExtractor::with_validator(extractor, UrlValidator::new());
    if config.skip_dns_check {
        validated.without_dns_check()
    } else {
        validated
    }
}

fn build_orchestrator(
    cli: &Cli,
    config: &CliConfig,
    pipeline: &PipelineConfig,
) -> Result<Orchestrator> {
    let fallback = validated(
        HttpExtractor::new()
            .context("Failed to build HTTP client")?
            .with_config(pipeline.clone()),
        config,
    );

    let key = match (&config.firecrawl_api_key, cli.no_primary) {
        (Some(key), false) => key.clone(),
        _ => {
            tracing::info!("Rendering service disabled, using direct fetch only");
            return Ok(Orchestrator::fallback_only(fallback));
        }
    };

    let mut firecrawl = FirecrawlExtractor::new(key)
        .context("Failed to build Firecrawl client")?
        .with_config(pipeline.clone());
    if let Some(url) = &config.firecrawl_api_url {
        firecrawl = firecrawl.with_base_url(url.clone());
    }

    let primary = RateLimitedExtractor::new(
        validated(firecrawl, config),
        config.firecrawl_requests_per_second,
    );
    Ok(Orchestrator::new(primary, fallback))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,product_extraction=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env()?;
    let pipeline = PipelineConfig::new().with_max_sources(cli.limit);

    let orchestrator = build_orchestrator(&cli, &config, &pipeline)?;
    let aggregator = Aggregator::new(orchestrator).with_config(pipeline);

    tracing::info!(urls = cli.urls.len(), limit = cli.limit, "Starting extraction");
    let bundle = aggregator.aggregate(cli.urls.as_slice()).await;

    let output = match &cli.product {
        Some(name) => {
            let mut request = ProductContentRequest::new(name.clone());
            if let Some(description) = &cli.description {
                request = request.with_description(description.clone());
            }
            if let Some(category) = &cli.category {
                request = request.with_category(category.clone());
            }
            request.sales_links = cli.urls.clone();
            build_generation_context(&request, &bundle)
        }
        None => serde_json::to_string_pretty(&bundle).context("Failed to serialize bundle")?,
    };

    println!("{}", output);
    Ok(())
}
