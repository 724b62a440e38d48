//! HTTP generation endpoint client.
//!
//! Posts `{prompt, max_new_tokens, do_sample, temperature, top_p}` and expects
//! `{"generated_text": "..."}` back.

use super::{GenerationParams, ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use service_core::observability::TracedClientExt;
use std::time::Duration;

/// Endpoint client configuration.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

pub struct InferenceTextProvider {
    config: InferenceConfig,
    client: Client,
}

impl InferenceTextProvider {
    pub fn new(config: InferenceConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl TextProvider for InferenceTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
        request_id: &str,
    ) -> Result<String, ProviderError> {
        let request = GenerateRequest { prompt, params };

        tracing::debug!(
            endpoint = %self.config.endpoint,
            prompt_len = prompt.len(),
            max_new_tokens = params.max_new_tokens,
            "Calling generation endpoint"
        );

        let response = self
            .client
            .traced_post(&self.config.endpoint)
            .header(CONTENT_TYPE.as_str(), "application/json")
            .json(&request)
            .send_with_request_id(request_id)
            .await
            .map_err(|e| ProviderError::Network(error_chain(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(error_chain(&e)))?;

        extract_generated_text(&bytes)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    #[serde(flatten)]
    params: &'a GenerationParams,
}

/// Render an error with its sources, e.g. "error sending request: connection refused".
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Pull `generated_text` out of a raw response body.
fn extract_generated_text(body: &[u8]) -> Result<String, ProviderError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ProviderError::InvalidJson(e.to_string()))?;

    match value.get("generated_text").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ProviderError::MissingText),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_has_flat_sampling_fields() {
        let params = GenerationParams::default();
        let body = serde_json::to_value(GenerateRequest {
            prompt: "user: hi\n",
            params: &params,
        })
        .unwrap();

        assert_eq!(
            body,
            json!({
                "prompt": "user: hi\n",
                "max_new_tokens": 512,
                "do_sample": true,
                "temperature": 0.7f32,
                "top_p": 0.9f32,
            })
        );
    }

    #[test]
    fn extracts_text() {
        let text = extract_generated_text(br#"{"generated_text": "hi there"}"#).unwrap();
        assert_eq!(text, "hi there");
    }

    #[test]
    fn ignores_extra_fields() {
        let text =
            extract_generated_text(br#"{"generated_text": "ok", "response_time": 1.5}"#).unwrap();
        assert_eq!(text, "ok");
    }

    #[test]
    fn empty_text_is_missing() {
        let err = extract_generated_text(br#"{"generated_text": ""}"#).unwrap_err();
        assert!(matches!(err, ProviderError::MissingText));
    }

    #[test]
    fn absent_or_non_string_text_is_missing() {
        let bodies: [&[u8]; 4] = [
            br#"{}"#,
            br#"{"generated_text": null}"#,
            br#"{"generated_text": 7}"#,
            br#"[]"#,
        ];
        for body in bodies {
            assert!(matches!(
                extract_generated_text(body),
                Err(ProviderError::MissingText)
            ));
        }
    }

    #[test]
    fn non_json_body_is_invalid() {
        let err = extract_generated_text(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidJson(_)));
    }

    #[test]
    fn error_chain_includes_sources() {
        #[derive(Debug, thiserror::Error)]
        #[error("error sending request")]
        struct Wrapper(#[source] std::io::Error);

        let wrapped = Wrapper(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(
            error_chain(&wrapped),
            "error sending request: connection refused"
        );
    }

    #[test]
    fn builds_with_timeout() {
        let provider = InferenceTextProvider::new(InferenceConfig {
            endpoint: "http://localhost:1/generate".to_string(),
            timeout: Duration::from_secs(5),
        });

        assert!(provider.is_ok());
    }
}
