//! Cold-start wiring and the Lambda runtime loop.
//!
//! Everything built here lives for the lifetime of the execution environment
//! and is shared read-only by every invocation.

use crate::config::RelayConfig;
use crate::handlers::function_handler;
use crate::services::providers::inference::{InferenceConfig, InferenceTextProvider};
use crate::services::providers::TextProvider;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: RelayConfig,
    pub text_provider: Arc<dyn TextProvider>,
}

/// Application container for the function's lifecycle.
pub struct Application {
    state: Arc<AppState>,
}

impl Application {
    /// Build the application with the HTTP generation endpoint from `config`.
    pub fn build(config: RelayConfig) -> Result<Self, AppError> {
        let provider = InferenceTextProvider::new(InferenceConfig {
            endpoint: config.inference.endpoint.clone(),
            timeout: config.inference.timeout(),
        })
        .map_err(|e| {
            tracing::error!("Failed to initialize inference client: {}", e);
            AppError::ConfigError(anyhow::anyhow!(e))
        })?;

        tracing::info!(
            endpoint = %config.inference.endpoint,
            model = %config.inference.model_name,
            timeout_secs = config.inference.timeout_secs,
            "Initialized inference endpoint client"
        );

        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Build the application around an existing provider.
    pub fn with_provider(config: RelayConfig, text_provider: Arc<dyn TextProvider>) -> Self {
        Self {
            state: Arc::new(AppState {
                config,
                text_provider,
            }),
        }
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Serve invocations until the runtime shuts the environment down.
    pub async fn run_until_stopped(self) -> Result<(), lambda_runtime::Error> {
        let state = self.state;

        lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
            let state = Arc::clone(&state);
            async move { function_handler(&state, event).await }
        }))
        .await
    }
}
