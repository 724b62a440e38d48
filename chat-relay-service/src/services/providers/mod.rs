//! Text generation backends.
//!
//! The relay only needs "prompt in, text out", so the seam is a single async
//! trait with an HTTP implementation and a mock for tests.

pub mod inference;
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    InvalidJson(String),

    #[error("generated_text is missing or empty")]
    MissingText,
}

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub do_sample: bool,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 512,
            do_sample: true,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

/// Trait for prompt-completion providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// `request_id` identifies the invocation and is forwarded for correlation.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
        request_id: &str,
    ) -> Result<String, ProviderError>;
}
