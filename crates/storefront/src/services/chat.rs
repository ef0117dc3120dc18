//! Support chat service.
//!
//! Signed-in shoppers get a persistent thread with an automated
//! assistant. The assistant is a canned responder, not a model: a real
//! agent can take over the thread later through the staff flag on
//! stored messages. Guests can leave a single message with a contact
//! email instead.

use chrono::Utc;
use rand::seq::IndexedRandom;
use sqlx::PgPool;

use raritone_core::{ASSISTANT_AUTHOR, ChatMessage, ChatMessageId, Email, UserId};

use crate::db::ChatRepository;
use crate::error::Result;

/// Greeting appended when an account opens its thread for the first time.
const WELCOME_BODY: &str =
    "Hello! Welcome to RARITONE. How can I help you find your perfect fit today?";

/// Canned assistant responses, picked at random per incoming message.
const REPLIES: [&str; 4] = [
    "Thanks for reaching out! A member of our team will get back to you shortly.",
    "Great question! Let me connect you with someone who can help with that.",
    "Have you tried our AI body scan? It helps find your perfect size in seconds.",
    "You can browse our latest drops on the catalog page. Anything specific you're after?",
];

fn assistant_message(body: &str) -> ChatMessage {
    ChatMessage {
        id: ChatMessageId::new(uuid::Uuid::new_v4().to_string()),
        author: ASSISTANT_AUTHOR.to_owned(),
        body: body.to_owned(),
        sent_at: Utc::now(),
        from_staff: false,
    }
}

/// Chat operations for account threads and guest messages.
pub struct ChatService<'a> {
    pool: &'a PgPool,
}

impl<'a> ChatService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The account's full thread, oldest first.
    ///
    /// An empty thread is seeded with the welcome greeting so the
    /// widget never opens blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    pub async fn history(&self, user_id: &UserId) -> Result<Vec<ChatMessage>> {
        let repo = ChatRepository::new(self.pool);
        let messages = repo.list_for_account(user_id).await?;
        if !messages.is_empty() {
            return Ok(messages);
        }

        let welcome = assistant_message(WELCOME_BODY);
        repo.append(user_id, &welcome).await?;
        Ok(vec![welcome])
    }

    /// Append a shopper message and the assistant's reply.
    ///
    /// Returns the two messages that were appended, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    pub async fn send(&self, user_id: &UserId, body: &str) -> Result<Vec<ChatMessage>> {
        let repo = ChatRepository::new(self.pool);

        let message = ChatMessage {
            id: ChatMessageId::new(uuid::Uuid::new_v4().to_string()),
            author: user_id.as_str().to_owned(),
            body: body.to_owned(),
            sent_at: Utc::now(),
            from_staff: false,
        };
        repo.append(user_id, &message).await?;

        let reply = assistant_message(pick_reply(&mut rand::rng()));
        repo.append(user_id, &reply).await?;

        Ok(vec![message, reply])
    }

    /// Record a message from a guest with a contact email.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    pub async fn guest_message(&self, email: &Email, body: &str) -> Result<()> {
        ChatRepository::new(self.pool)
            .append_guest(&uuid::Uuid::new_v4().to_string(), email, body)
            .await?;
        Ok(())
    }
}

fn pick_reply<R: rand::Rng + ?Sized>(rng: &mut R) -> &'static str {
    // The pool is non-empty, so choose never yields None
    REPLIES.choose(rng).copied().unwrap_or(REPLIES[0])
}
