use chat_relay_service::config::RelayConfig;
use chat_relay_service::startup::Application;
use service_core::observability::init_tracing;

const SERVICE_NAME: &str = "chat-relay-service";

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    let config = RelayConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_tracing(
        SERVICE_NAME,
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Chat relay initializing"
    );

    let app = Application::build(config)?;
    app.run_until_stopped().await
}
