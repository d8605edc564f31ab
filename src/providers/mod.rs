//! ReviewGenerator trait and LLM integration.
//!
//! Provides an abstraction layer over rig-core to decouple the
//! codebase from the specific LLM library.

pub mod rig;

use async_trait::async_trait;
use thiserror::Error;

pub use rig::RigGenerator;

/// Errors from the review generator.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("generator not configured: {0}")]
    NotConfigured(String),
}

/// LLM-backed free-text review generation.
///
/// The response is free text; the extractor pulls line-anchored
/// comments out of it. Callers treat failure or empty output as "no
/// comments for this file", never as a fatal error.
#[async_trait]
pub trait ReviewGenerator: Send + Sync {
    async fn generate(
        &self,
        file_path: &str,
        diff: &str,
        guidelines: &str,
        history: &str,
    ) -> Result<String, GeneratorError>;
}
