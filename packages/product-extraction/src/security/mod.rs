//! Credential handling and SSRF protection.
//!
//! Source URLs come from callers and point at arbitrary third-party sites,
//! so every tier that fetches them can be wrapped in a
//! [`crate::traits::extractor::ValidatedExtractor`].

pub mod credentials;
pub mod url_validator;

pub use credentials::SecretString;
pub use url_validator::UrlValidator;
