//! Core trait abstractions for the extraction pipeline.
//!
//! These traits define the seams where applications plug in extraction
//! tiers and the downstream content generator.

pub mod extractor;
pub mod generator;
