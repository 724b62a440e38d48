pub mod chat;

pub use chat::{function_handler, handle_event, relay_chat, region_from_arn, ChatReply, Invocation};
