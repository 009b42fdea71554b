//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the extraction library
//! without calling a real model or a real remote site.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::error::{GenerationError, GenerationResult};
use crate::traits::generator::ContentGenerator;
use crate::types::{GeneratedCopy, ProductContentRequest};

pub use crate::extractors::{MockExtractor, MockExtractorBuilder};

/// Record of a call made to the mock generator.
#[derive(Debug, Clone)]
pub struct MockGeneratorCall {
    pub product_name: String,
    pub context: String,
}

/// What the mock generator does when called.
#[derive(Debug, Clone)]
enum MockGeneratorMode {
    /// Echo the request back as copy
    Echo,
    Canned(GeneratedCopy),
    NotConfigured,
    Malformed,
}

/// A mock content generator for testing.
///
/// By default it echoes the request: the product name and basic
/// description become the copy, the category becomes the only tag.
#[derive(Clone)]
pub struct MockGenerator {
    mode: MockGeneratorMode,
    calls: Arc<RwLock<Vec<MockGeneratorCall>>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            mode: MockGeneratorMode::Echo,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Always return `copy`.
    pub fn with_copy(mut self, copy: GeneratedCopy) -> Self {
        self.mode = MockGeneratorMode::Canned(copy);
        self
    }

    /// Fail as if no model were configured.
    pub fn not_configured(mut self) -> Self {
        self.mode = MockGeneratorMode::NotConfigured;
        self
    }

    /// Fail as if the model answered with garbage.
    pub fn malformed(mut self) -> Self {
        self.mode = MockGeneratorMode::Malformed;
        self
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<MockGeneratorCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Context string passed on the most recent call.
    pub fn last_context(&self) -> Option<String> {
        self.calls.read().unwrap().last().map(|c| c.context.clone())
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(
        &self,
        request: &ProductContentRequest,
        context: &str,
    ) -> GenerationResult<GeneratedCopy> {
        self.calls.write().unwrap().push(MockGeneratorCall {
            product_name: request.product_name.clone(),
            context: context.to_string(),
        });

        match &self.mode {
            MockGeneratorMode::Echo => Ok(GeneratedCopy {
                product_name: request.product_name.clone(),
                description: request.basic_description.clone(),
                tags: if request.category.is_empty() {
                    Vec::new()
                } else {
                    vec![request.category.to_lowercase()]
                },
                specifications: Default::default(),
            }),
            MockGeneratorMode::Canned(copy) => Ok(copy.clone()),
            MockGeneratorMode::NotConfigured => {
                Err(GenerationError::NotConfigured("mock model".to_string()))
            }
            MockGeneratorMode::Malformed => Err(GenerationError::MalformedResponse(
                "expected a JSON object with productName".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
