//! Conversation turns and prompt rendering.

use serde::{Deserialize, Serialize};

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Decoded request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,

    /// Prior turns resubmitted by the client; absent and `null` both mean none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub conversation_history: Vec<ConversationTurn>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ConversationTurn>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ConversationTurn>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Append-only list of turns for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(ConversationTurn::new(role, content));
    }

    /// Flatten every turn into `"{role}: {content}\n"`, in order.
    pub fn render_prompt(&self) -> String {
        let capacity = self
            .turns
            .iter()
            .map(|t| t.role.as_str().len() + t.content.len() + 3)
            .sum();

        self.turns
            .iter()
            .fold(String::with_capacity(capacity), |mut prompt, turn| {
                prompt.push_str(turn.role.as_str());
                prompt.push_str(": ");
                prompt.push_str(&turn.content);
                prompt.push('\n');
                prompt
            })
    }

    pub fn into_turns(self) -> Vec<ConversationTurn> {
        self.turns
    }
}

impl From<Vec<ConversationTurn>> for Conversation {
    fn from(turns: Vec<ConversationTurn>) -> Self {
        Self { turns }
    }
}
