//! Mock provider for exercising the handler without a network.

use super::{GenerationParams, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// Canned behaviour for [`MockTextProvider`].
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Echo the prompt back, prefixed with "echo: ".
    Echo,
    /// Fail with `ProviderError::MissingText`.
    Empty,
    /// Panic inside `generate`.
    Panic,
}

/// Mock text provider that records every prompt it receives.
pub struct MockTextProvider {
    reply: MockReply,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts seen so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
        _request_id: &str,
    ) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Echo => Ok(format!("echo: {}", prompt)),
            MockReply::Empty => Err(ProviderError::MissingText),
            MockReply::Panic => panic!("mock provider asked to panic"),
        }
    }
}
