//! Chat message record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ChatMessageId;

/// Author identifier used for messages written by the simulated assistant.
pub const ASSISTANT_AUTHOR: &str = "assistant";

/// A single chat message.
///
/// Messages are append-only and ordered by timestamp ascending. The author
/// is an account identifier, the [`ASSISTANT_AUTHOR`] sentinel, or for
/// guest submissions the guest's email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message identifier.
    pub id: ChatMessageId,
    /// Author identifier (account id, assistant sentinel, or guest email).
    pub author: String,
    /// Message body.
    pub body: String,
    /// When the message was sent.
    pub sent_at: DateTime<Utc>,
    /// Whether the message came from the operator/assistant side rather
    /// than from the user.
    pub from_staff: bool,
}

impl ChatMessage {
    /// Whether this message was written by the simulated assistant.
    #[must_use]
    pub fn is_assistant(&self) -> bool {
        self.author == ASSISTANT_AUTHOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_messages_are_detected_by_sentinel() {
        let msg = ChatMessage {
            id: ChatMessageId::new("m1"),
            author: ASSISTANT_AUTHOR.to_owned(),
            body: "What style are you looking for today?".to_owned(),
            sent_at: Utc::now(),
            from_staff: true,
        };
        assert!(msg.is_assistant());

        let user_msg = ChatMessage {
            author: "uid-123".to_owned(),
            from_staff: false,
            ..msg
        };
        assert!(!user_msg.is_assistant());
    }
}
