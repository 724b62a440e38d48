//! Shared harness for chat relay integration tests.
//!
//! Each `TestApp` owns a wiremock server standing in for the generation
//! endpoint and a fully built application pointed at it.

#![allow(dead_code)]

use chat_relay_service::config::RelayConfig;
use chat_relay_service::handlers::{handle_event, Invocation};
use chat_relay_service::models::GatewayResponse;
use chat_relay_service::startup::{AppState, Application};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GENERATE_PATH: &str = "/generate";
pub const TEST_REQUEST_ID: &str = "8f5ba1c4-test-request";
pub const TEST_FUNCTION_ARN: &str = "arn:aws:lambda:ap-northeast-1:123456789012:function:chat-relay";

pub struct TestApp {
    pub server: MockServer,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with a hook to adjust the configuration before the app is built.
    pub async fn spawn_with(adjust: impl FnOnce(&mut RelayConfig)) -> Self {
        let server = MockServer::start().await;
        let mut config = RelayConfig::for_endpoint(format!("{}{}", server.uri(), GENERATE_PATH));
        adjust(&mut config);

        let app = Application::build(config).expect("Failed to build application");

        Self {
            server,
            state: app.state(),
        }
    }

    /// Answer generation calls with `template`, expecting exactly one call.
    pub async fn mount_generation(&self, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(template)
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn reply_with_text(&self, text: &str) {
        self.mount_generation(
            ResponseTemplate::new(200).set_body_json(json!({ "generated_text": text })),
        )
        .await;
    }

    /// Invoke the handler with a raw gateway event.
    pub async fn invoke_event(&self, event: Value) -> GatewayResponse {
        let invocation = Invocation {
            request_id: TEST_REQUEST_ID.to_string(),
            function_arn: TEST_FUNCTION_ARN.to_string(),
        };
        handle_event(&self.state, event, &invocation).await
    }

    /// Invoke the handler with `body` serialized as the event body.
    pub async fn invoke(&self, body: Value) -> GatewayResponse {
        self.invoke_event(json!({ "body": body.to_string() })).await
    }

    /// Bodies of every request the generation endpoint received.
    pub async fn generation_requests(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| serde_json::from_slice(&request.body).expect("request body is JSON"))
            .collect()
    }
}

/// Parse a response body into JSON.
pub fn body_json(response: &GatewayResponse) -> Value {
    serde_json::from_str(&response.body).expect("response body is JSON")
}

/// Assert the failure contract: 500, `success: false`, non-empty `error`.
pub fn assert_failure(response: &GatewayResponse) -> String {
    assert_eq!(response.status_code, 500);
    let body = body_json(response);
    assert_eq!(body["success"], false);
    assert!(body.get("conversationHistory").is_none());

    let error = body["error"].as_str().expect("error is a string").to_string();
    assert!(!error.is_empty());
    error
}
