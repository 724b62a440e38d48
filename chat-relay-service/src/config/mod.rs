use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Generation endpoint used when `INFERENCE_ENDPOINT` is not set outside production.
pub const DEFAULT_INFERENCE_ENDPOINT: &str = "https://b102-34-87-136-176.ngrok-free.app/generate";

/// Model served behind the endpoint. Only reported in logs.
pub const DEFAULT_MODEL_NAME: &str = "google/gemma-2-2b-jpn-it";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub inference: InferenceSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceSettings {
    /// Full URL receiving the generation POST.
    pub endpoint: String,
    pub model_name: String,
    /// Upper bound on one outbound call, connect through body.
    pub timeout_secs: u64,
}

impl InferenceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(RelayConfig {
            common: common_config,
            inference: InferenceSettings {
                endpoint: get_env("INFERENCE_ENDPOINT", Some(DEFAULT_INFERENCE_ENDPOINT), is_prod)?,
                model_name: get_env("INFERENCE_MODEL_NAME", Some(DEFAULT_MODEL_NAME), is_prod)?,
                timeout_secs: get_env(
                    "INFERENCE_TIMEOUT_SECS",
                    Some(&DEFAULT_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "INFERENCE_TIMEOUT_SECS must be a whole number of seconds: {}",
                        e
                    ))
                })?,
            },
        })
    }

    /// Configuration pointing at `endpoint` with every other value defaulted.
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        RelayConfig {
            common: core_config::Config::default(),
            inference: InferenceSettings {
                endpoint: endpoint.into(),
                model_name: DEFAULT_MODEL_NAME.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
