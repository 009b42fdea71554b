//! Price, rating and review-count recognizers.
//!
//! Each recognizer holds an ordered list of patterns. Patterns are tried in
//! priority order and each one scans the whole input before the next is
//! tried, so a `$` price anywhere beats a `€` price that appears earlier.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref PRICE_PATTERNS: Vec<Regex> = vec![
        // $24.99, $ 1,299.00
        Regex::new(r"\$\s?\d{1,3}(?:,\d{3})*(?:\.\d{2})?\b|\$\s?\d+(?:\.\d{2})?\b").unwrap(),
        // USD 24.99
        Regex::new(r"\bUSD\s?\d+(?:,\d{3})*(?:\.\d{2})?\b").unwrap(),
        // Price: 24.99
        Regex::new(r"(?i)\bprice:\s*([$€£]?\s?\d+(?:[.,]\d{3})*(?:[.,]\d{2})?)").unwrap(),
        // €24,99
        Regex::new(r"€\s?\d+(?:[.,]\d{3})*(?:[.,]\d{2})?").unwrap(),
        // £24.99
        Regex::new(r"£\s?\d+(?:,\d{3})*(?:\.\d{2})?").unwrap(),
        // 24.99 USD, 24,99 €
        Regex::new(r"\b\d+(?:[.,]\d{3})*(?:[.,]\d{2})?\s?(?:USD|EUR|GBP|€|£)").unwrap(),
    ];

    static ref RATING_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*out\s+of\s+\d+(?:\.\d+)?\s*stars?").unwrap(),
        Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*/\s*\d+(?:\.\d+)?\s*stars?").unwrap(),
        Regex::new(r"(?i)\brating:?\s*(\d+(?:\.\d+)?)").unwrap(),
        Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*stars?\b").unwrap(),
        Regex::new(r"\b(\d+(?:\.\d+)?)\s*⭐").unwrap(),
    ];

    static ref REVIEW_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(\d[\d,]*)\s*reviews?\b").unwrap(),
        Regex::new(r"(?i)\b(\d[\d,]*)\s*customer\s+reviews?\b").unwrap(),
        Regex::new(r"(?i)\b(\d[\d,]*)\s*ratings?\b").unwrap(),
        Regex::new(r"(?i)\bbased\s+on\s+(\d[\d,]*)\s*reviews?\b").unwrap(),
    ];
}

/// First plausible currency-formatted token, by pattern priority.
pub fn find_price(text: &str) -> Option<String> {
    PRICE_PATTERNS
        .iter()
        .find_map(|pattern| {
            pattern.captures(text).map(|cap| {
                cap.get(1)
                    .or_else(|| cap.get(0))
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default()
            })
        })
        .filter(|price| !price.is_empty())
}

/// First star rating within [0, 5], by pattern priority.
///
/// Matches outside the range are skipped, never clamped.
pub fn find_rating(text: &str) -> Option<f64> {
    RATING_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .find(|value| (0.0..=5.0).contains(value))
    })
}

/// First review count, by pattern priority. Thousands separators are allowed.
pub fn find_review_count(text: &str) -> Option<u64> {
    REVIEW_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .find_map(|m| m.as_str().replace(',', "").parse::<u64>().ok())
    })
}

/// The scalar facts found on one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageFacts {
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
}

impl PageFacts {
    /// Run every fact recognizer over `text`.
    pub fn find(text: &str) -> Self {
        Self {
            price: find_price(text),
            rating: find_rating(text),
            review_count: find_review_count(text),
        }
    }

    /// Fill only the facts still missing from a secondary text source.
    pub fn fill_missing(&mut self, text: &str) {
        if self.price.is_none() {
            self.price = find_price(text);
        }
        if self.rating.is_none() {
            self.rating = find_rating(text);
        }
        if self.review_count.is_none() {
            self.review_count = find_review_count(text);
        }
    }

    pub fn is_complete(&self) -> bool {
        self.price.is_some() && self.rating.is_some() && self.review_count.is_some()
    }
}
