//! Domain models for the chat relay.

pub mod conversation;
pub mod envelope;
pub mod gateway;

pub use conversation::{ChatRequest, Conversation, ConversationTurn, Role};
pub use envelope::{FailureEnvelope, GatewayResponse, SuccessEnvelope, CORS_HEADERS};
pub use gateway::{Claims, GatewayEvent, Identity};
