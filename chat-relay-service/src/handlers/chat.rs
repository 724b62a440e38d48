//! Chat relay invocation handler.
//!
//! One invocation is one gateway event: decode the body, extend the
//! conversation with the user's message, ask the text provider for exactly one
//! completion, and answer with a success or failure envelope. Failures of any
//! kind, panics included, become a 500 with a single `error` string.

use crate::error::RelayError;
use crate::models::{
    Conversation, ConversationTurn, FailureEnvelope, GatewayEvent, GatewayResponse, Role,
    SuccessEnvelope,
};
use crate::services::providers::GenerationParams;
use crate::startup::AppState;
use futures::FutureExt;
use lambda_runtime::LambdaEvent;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::Instrument;

const DEFAULT_REGION: &str = "us-east-1";

/// Per-invocation metadata taken from the Lambda context.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub request_id: String,
    pub function_arn: String,
}

/// Successful relay result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    pub conversation_history: Vec<ConversationTurn>,
}

/// Region segment of a Lambda function ARN, `us-east-1` when it cannot be found.
///
/// `arn:aws:lambda:<region>:<account>:function:<name>`
pub fn region_from_arn(arn: &str) -> &str {
    arn.strip_prefix("arn:aws:lambda:")
        .and_then(|rest| rest.split(':').next())
        .filter(|region| !region.is_empty())
        .unwrap_or(DEFAULT_REGION)
}

/// Entry point registered with the Lambda runtime.
pub async fn function_handler(
    state: &AppState,
    event: LambdaEvent<Value>,
) -> Result<GatewayResponse, lambda_runtime::Error> {
    let (payload, context) = event.into_parts();
    let invocation = Invocation {
        request_id: context.request_id,
        function_arn: context.invoked_function_arn,
    };

    Ok(handle_event(state, payload, &invocation).await)
}

/// Run one relay and convert its outcome into a gateway response.
pub async fn handle_event(
    state: &AppState,
    payload: Value,
    invocation: &Invocation,
) -> GatewayResponse {
    let span = tracing::info_span!(
        "chat_relay",
        request_id = %invocation.request_id,
        region = %region_from_arn(&invocation.function_arn),
    );

    async {
        let outcome = AssertUnwindSafe(relay_chat(state, payload, &invocation.request_id))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(RelayError::Unexpected(anyhow::anyhow!(
                    "handler panicked: {}",
                    panic_message(panic.as_ref())
                )))
            });

        match outcome {
            Ok(reply) => {
                tracing::info!(
                    history_len = reply.conversation_history.len(),
                    response_len = reply.response.len(),
                    "Chat relay succeeded"
                );
                GatewayResponse::success(&SuccessEnvelope::new(
                    &reply.response,
                    &reply.conversation_history,
                ))
            }
            Err(error) => {
                tracing::error!(kind = error.kind(), error = %error, "Chat relay failed");
                GatewayResponse::failure(&FailureEnvelope::new(error.to_string()))
            }
        }
    }
    .instrument(span)
    .await
}

/// Relay one chat message to the text provider.
///
/// On success the returned history is the caller's history plus the new user
/// turn and the assistant turn, in that order.
pub async fn relay_chat(
    state: &AppState,
    payload: Value,
    request_id: &str,
) -> Result<ChatReply, RelayError> {
    tracing::debug!(event = %payload, "Received event");

    let event: GatewayEvent = serde_json::from_value(payload)
        .map_err(|e| RelayError::MalformedRequest(format!("unrecognised event: {}", e)))?;

    if let Some(user) = event.identity().display_name() {
        tracing::info!(user = %user, "Authenticated user");
    }

    let request = event.chat_request()?;

    tracing::info!(
        user_message = %request.message,
        model = %state.config.inference.model_name,
        history_len = request.conversation_history.len(),
        "Processing message"
    );

    let mut conversation = Conversation::from(request.conversation_history);
    conversation.push(Role::User, request.message);

    let prompt = conversation.render_prompt();
    let params = GenerationParams::default();

    let response = state
        .text_provider
        .generate(&prompt, &params, request_id)
        .await?;

    conversation.push(Role::Assistant, response.clone());

    Ok(ChatReply {
        response,
        conversation_history: conversation.into_turns(),
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        *msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}
