//! Integration tests for the extraction pipeline.
//!
//! These drive the Aggregator and Orchestrator end to end through mock
//! tiers (and, in one case, the real direct-fetch tier against a local
//! mock HTTP server):
//! 1. Per-URL tier selection
//! 2. Multi-source merging, caps and first-found facts
//! 3. The caller boundary with a mock generator

use httpmock::prelude::*;
use product_extraction::{
    extractors::{HttpExtractor, MockExtractor},
    generate_product_content,
    testing::MockGenerator,
    Aggregator, ExtractionStrategy, GeneratedCopy, Orchestrator, ProductContentRequest,
    ScrapedContent, SourceExtractor, ValidatedExtractor,
};

const PRODUCT_A: &str = "https://example.com/product-a";

const PRODUCT_A_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Product A</title></head>
<body>
    <img src="/img/photo1.jpg">
    <img src="data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==">
    <p class="price">$24.99</p>
    <p>4.5 out of 5 stars</p>
    <p>128 reviews</p>
</body>
</html>"#;

/// Helper to build an aggregator over a single fallback tier.
fn fallback_aggregator(mock: MockExtractor) -> Aggregator {
    Aggregator::new(Orchestrator::fallback_only(mock))
}

fn numbered(prefix: &str, n: usize, ext: &str) -> Vec<String> {
    (1..=n)
        .map(|i| format!("https://cdn.example.com/{}{}.{}", prefix, i, ext))
        .collect()
}

#[tokio::test]
async fn test_end_to_end_product_page() {
    let mock = MockExtractor::new().with_html(PRODUCT_A, PRODUCT_A_HTML);
    let request = ProductContentRequest::new("Product A").with_sales_link(PRODUCT_A);

    let bundle = fallback_aggregator(mock)
        .aggregate(request.sales_links.as_slice())
        .await;

    assert_eq!(bundle.scraped_images, vec!["https://example.com/img/photo1.jpg"]);
    assert_eq!(bundle.scraped_price.as_deref(), Some("$24.99"));
    assert_eq!(bundle.scraped_rating, Some(4.5));
    assert_eq!(bundle.scraped_review_count, Some(128));
    assert_eq!(bundle.narrative_sections.len(), 1);
    assert!(bundle.narrative_sections[0].contains("Price: $24.99"));
    assert!(bundle.narrative_sections[0].contains("Images Found: 1"));
}

#[tokio::test]
async fn test_end_to_end_through_direct_fetch() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/product-a");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(PRODUCT_A_HTML);
        })
        .await;
    let page = server.url("/product-a");
    let http = HttpExtractor::from_builder(reqwest::Client::builder().no_proxy()).unwrap();

    let bundle = Aggregator::new(Orchestrator::fallback_only(http))
        .aggregate(&[page.as_str()])
        .await;
    mock.assert_async().await;

    assert_eq!(bundle.scraped_images, vec![server.url("/img/photo1.jpg")]);
    assert_eq!(bundle.scraped_price.as_deref(), Some("$24.99"));
    assert_eq!(bundle.scraped_rating, Some(4.5));
    assert_eq!(bundle.scraped_review_count, Some(128));
}

#[tokio::test]
async fn test_only_first_three_links_processed() {
    let mock = MockExtractor::new();
    let links: Vec<String> = (1..=5)
        .map(|i| format!("https://shop{}.example.com/p", i))
        .collect();

    fallback_aggregator(mock.clone())
        .aggregate(links.as_slice())
        .await;

    assert_eq!(mock.call_count(), 3);
    assert_eq!(mock.calls(), links[..3].to_vec());
}

#[tokio::test]
async fn test_output_caps() {
    let mock = MockExtractor::new()
        .with_content(
            "https://a.example.com/p",
            ScrapedContent::empty()
                .with_images(numbered("a", 6, "jpg"))
                .with_videos(numbered("a", 4, "mp4")),
        )
        .with_content(
            "https://b.example.com/p",
            ScrapedContent::empty()
                .with_images(numbered("b", 6, "jpg"))
                .with_videos(numbered("b", 4, "mp4")),
        );

    let bundle = fallback_aggregator(mock)
        .aggregate(&["https://a.example.com/p", "https://b.example.com/p"])
        .await;

    assert_eq!(bundle.scraped_images.len(), 8);
    assert_eq!(bundle.scraped_videos.len(), 5);
    // First-found-first-kept
    assert_eq!(bundle.scraped_images[..6], numbered("a", 6, "jpg")[..]);
    assert_eq!(bundle.scraped_images[6], "https://cdn.example.com/b1.jpg");
    assert_eq!(bundle.scraped_videos[4], "https://cdn.example.com/b1.mp4");
}

#[tokio::test]
async fn test_first_found_price_wins() {
    let mock = MockExtractor::new()
        .with_content(
            "https://a.example.com/p",
            ScrapedContent::empty().with_text("A").with_price("$19.99"),
        )
        .with_content(
            "https://b.example.com/p",
            ScrapedContent::empty()
                .with_text("B")
                .with_price("$5.00")
                .with_rating(3.0)
                .with_review_count(12),
        );

    let bundle = fallback_aggregator(mock)
        .aggregate(&["https://a.example.com/p", "https://b.example.com/p"])
        .await;

    assert_eq!(bundle.scraped_price.as_deref(), Some("$19.99"));
    // Facts the first source lacked come from the next one
    assert_eq!(bundle.scraped_rating, Some(3.0));
    assert_eq!(bundle.scraped_review_count, Some(12));
}

#[tokio::test]
async fn test_imageless_primary_result_equals_fallback_result() {
    let primary = MockExtractor::new().with_content(
        PRODUCT_A,
        ScrapedContent::empty()
            .with_title("Rendered")
            .with_text("rendered text")
            .with_price("$1.00")
            .with_videos(["https://www.youtube.com/watch?v=dQw4w9WgXcQ"]),
    );
    let fallback = MockExtractor::new().with_html(PRODUCT_A, PRODUCT_A_HTML);
    let expected = MockExtractor::new()
        .with_html(PRODUCT_A, PRODUCT_A_HTML)
        .extract_or_empty(PRODUCT_A)
        .await;

    let orchestrator = Orchestrator::new(primary, fallback);
    let (content, attempt) = orchestrator.extract_with_attempt(PRODUCT_A).await;

    assert_eq!(content, expected);
    assert_eq!(attempt.strategy_used, ExtractionStrategy::PrimaryThenFallback);
}

#[tokio::test]
async fn test_partial_failure_does_not_abort() {
    let mock = MockExtractor::new()
        .failing("https://down.example.com/p")
        .with_content(
            "https://up.example.com/p",
            ScrapedContent::empty()
                .with_title("Up")
                .with_images(["https://up.example.com/a.jpg"]),
        );

    let bundle = fallback_aggregator(mock.clone())
        .aggregate(&["https://down.example.com/p", "https://up.example.com/p"])
        .await;

    assert_eq!(mock.call_count(), 2);
    assert_eq!(bundle.narrative_sections.len(), 1);
    assert!(bundle.narrative_sections[0].starts_with("Source 2: https://up.example.com/p"));
    assert_eq!(bundle.scraped_images, vec!["https://up.example.com/a.jpg"]);
}

#[tokio::test]
async fn test_zero_content_is_an_empty_bundle() {
    let mock = MockExtractor::new().failing("https://a.example.com/p");
    let bundle = fallback_aggregator(mock)
        .aggregate(&["https://a.example.com/p", "https://b.example.com/p"])
        .await;

    assert!(bundle.is_empty());
}

#[tokio::test]
async fn test_unconfigured_primary_goes_straight_to_fallback() {
    let primary = MockExtractor::new().unconfigured();
    let fallback = MockExtractor::new().with_html(PRODUCT_A, PRODUCT_A_HTML);
    let aggregator = Aggregator::new(Orchestrator::new(primary.clone(), fallback));

    let bundle = aggregator.aggregate(&[PRODUCT_A]).await;

    assert_eq!(primary.call_count(), 0);
    assert_eq!(bundle.scraped_price.as_deref(), Some("$24.99"));
}

#[tokio::test]
async fn test_blocked_source_is_skipped() {
    let mock = MockExtractor::new()
        .with_content("http://169.254.169.254/latest", ScrapedContent::empty().with_text("creds"))
        .with_content("https://shop.example.com/p", ScrapedContent::empty().with_text("ok"));
    let validated = ValidatedExtractor::new(mock.clone()).without_dns_check();

    let bundle = Aggregator::new(Orchestrator::fallback_only(validated))
        .aggregate(&["http://169.254.169.254/latest", "https://shop.example.com/p"])
        .await;

    assert_eq!(mock.calls(), vec!["https://shop.example.com/p"]);
    assert_eq!(bundle.narrative_sections.len(), 1);
    assert!(!bundle.narrative_sections[0].contains("creds"));
}

#[tokio::test]
async fn test_generate_product_content_merges_scrape() {
    let mock = MockExtractor::new().with_html(PRODUCT_A, PRODUCT_A_HTML);
    let generator = MockGenerator::new().with_copy(GeneratedCopy {
        product_name: "Product A".into(),
        description: "Written copy".into(),
        tags: vec!["gear".into()],
        specifications: [("Material".to_string(), "Steel".to_string())]
            .into_iter()
            .collect(),
    });
    let request = ProductContentRequest::new("Product A")
        .with_description("A thing")
        .with_sales_link(PRODUCT_A);

    let response =
        generate_product_content(&fallback_aggregator(mock), &generator, &request).await;

    assert!(response.success);
    assert_eq!(response.status, 200);
    let content = response.content.unwrap();
    assert_eq!(content.description, "Written copy");
    assert_eq!(content.scraped_images, vec!["https://example.com/img/photo1.jpg"]);
    assert_eq!(content.scraped_price.as_deref(), Some("$24.99"));

    let context = generator.last_context().unwrap();
    assert!(context.starts_with("Product Name: Product A\n"));
    assert!(context.contains("Source 1: https://example.com/product-a"));
    assert!(context.contains("- https://example.com/img/photo1.jpg"));
}

#[tokio::test]
async fn test_generate_product_content_without_scrape() {
    let generator = MockGenerator::new();
    let request = ProductContentRequest::new("Mug").with_category("Kitchen");

    let response =
        generate_product_content(&fallback_aggregator(MockExtractor::new()), &generator, &request)
            .await;

    let content = response.content.unwrap();
    assert_eq!(content.tags, vec!["kitchen"]);
    assert!(content.scraped_images.is_empty());
    assert!(content.scraped_price.is_none());
}

#[tokio::test]
async fn test_generator_failure_is_structured() {
    let generator = MockGenerator::new().not_configured();
    let request = ProductContentRequest::new("Mug").with_sales_link(PRODUCT_A);

    let response =
        generate_product_content(&fallback_aggregator(MockExtractor::new()), &generator, &request)
            .await;

    assert!(!response.success);
    assert_eq!(response.status, 503);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("not configured"));
    assert!(json.get("content").is_none());
}

#[tokio::test]
async fn test_blank_product_name_is_rejected() {
    let generator = MockGenerator::new();
    let response = generate_product_content(
        &fallback_aggregator(MockExtractor::new()),
        &generator,
        &ProductContentRequest::new("  "),
    )
    .await;

    assert_eq!(response.status, 400);
    assert_eq!(generator.call_count(), 0);
}
