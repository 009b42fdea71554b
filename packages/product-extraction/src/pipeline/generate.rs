//! The caller boundary: request in, aggregated scrape plus generated copy out.

use std::fmt::Write;
use tracing::{info, warn};

use super::aggregate::Aggregator;
use crate::traits::generator::ContentGenerator;
use crate::types::{
    AggregatedBundle, GeneratedContent, ProductContentRequest, ProductContentResponse,
};

/// Render the text handed to the downstream model.
///
/// Caller-supplied product info comes first, then one narrative section per
/// useful source, then the scraped image list. With nothing scraped, only
/// the caller's info is present.
pub fn build_generation_context(
    request: &ProductContentRequest,
    bundle: &AggregatedBundle,
) -> String {
    let mut context = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(context, "Product Name: {}", request.product_name);
    if !request.basic_description.trim().is_empty() {
        let _ = writeln!(context, "Basic Description: {}", request.basic_description);
    }
    if !request.category.trim().is_empty() {
        let _ = writeln!(context, "Category: {}", request.category);
    }
    let _ = writeln!(context, "Existing Images: {}", request.images.len());

    if !bundle.narrative_sections.is_empty() {
        context.push_str("\nScraped Sources:\n");
        context.push_str(&bundle.narrative_sections.join("\n\n"));
        context.push('\n');
    }

    if !bundle.scraped_images.is_empty() {
        context.push_str("\nScraped Images:\n");
        for image in &bundle.scraped_images {
            let _ = writeln!(context, "- {}", image);
        }
    }

    context
}

/// Scrape the request's sales links, generate copy and merge the two.
///
/// Scraping never fails the request; only the generator can. Generator
/// errors become `{success: false, error}` with the error's status.
pub async fn generate_product_content(
    aggregator: &Aggregator,
    generator: &dyn ContentGenerator,
    request: &ProductContentRequest,
) -> ProductContentResponse {
    if request.product_name.trim().is_empty() {
        return ProductContentResponse::failure("productName is required", 400);
    }

    let bundle = aggregator.aggregate(request.sales_links.as_slice()).await;
    let context = build_generation_context(request, &bundle);

    match generator.generate(request, &context).await {
        Ok(copy) => {
            info!(
                product = %request.product_name,
                generator = %generator.name(),
                tags = copy.tags.len(),
                specifications = copy.specifications.len(),
                "Product content generated"
            );
            ProductContentResponse::ok(GeneratedContent::from_parts(copy, bundle))
        }
        Err(e) => {
            warn!(product = %request.product_name, error = %e, "Content generation failed");
            ProductContentResponse::failure(e.to_string(), e.status_code())
        }
    }
}
