//! Outbound gateway response and the JSON envelopes carried in its body.

use crate::models::conversation::ConversationTurn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headers attached to every response, success or failure.
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
    ("Access-Control-Allow-Methods", "OPTIONS,POST"),
];

/// Body for 200 responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope<'a> {
    success: bool,
    pub response: &'a str,
    pub conversation_history: &'a [ConversationTurn],
}

impl<'a> SuccessEnvelope<'a> {
    pub fn new(response: &'a str, conversation_history: &'a [ConversationTurn]) -> Self {
        Self {
            success: true,
            response,
            conversation_history,
        }
    }
}

/// Body for 500 responses.
#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
    success: bool,
    pub error: String,
}

impl FailureEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Proxy integration response understood by API Gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl GatewayResponse {
    pub const OK: u16 = 200;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;

    pub fn success(envelope: &SuccessEnvelope<'_>) -> Self {
        match serde_json::to_string(envelope) {
            Ok(body) => Self::with_body(Self::OK, body),
            Err(e) => Self::failure(&FailureEnvelope::new(format!(
                "failed to encode response: {}",
                e
            ))),
        }
    }

    pub fn failure(envelope: &FailureEnvelope) -> Self {
        let body = serde_json::to_string(envelope).unwrap_or_else(|_| {
            r#"{"success":false,"error":"failed to encode error response"}"#.to_string()
        });
        Self::with_body(Self::INTERNAL_SERVER_ERROR, body)
    }

    fn with_body(status_code: u16, body: String) -> Self {
        let headers = CORS_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Self {
            status_code,
            headers,
            body,
        }
    }
}
