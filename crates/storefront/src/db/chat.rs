//! Chat message repository.
//!
//! Per-account messages are append-only and listed oldest-first (the
//! order a conversation reads in). Guest submissions go to a separate
//! table keyed by nothing but their email.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use raritone_core::{ChatMessage, ChatMessageId, Email, UserId};

use super::RepositoryError;

/// Repository for chat messages.
pub struct ChatRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: String,
    author: String,
    body: String,
    sent_at: DateTime<Utc>,
    from_staff: bool,
}

impl MessageRow {
    fn into_message(self) -> ChatMessage {
        ChatMessage {
            id: ChatMessageId::new(self.id),
            author: self.author,
            body: self.body,
            sent_at: self.sent_at,
            from_staff: self.from_staff,
        }
    }
}

impl<'a> ChatRepository<'a> {
    /// Create a new chat repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a message to an account's conversation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn append(
        &self,
        account_id: &UserId,
        message: &ChatMessage,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storefront.chat_message
                (id, account_id, author, body, sent_at, from_staff)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(message.id.as_str())
        .bind(account_id.as_str())
        .bind(&message.author)
        .bind(&message.body)
        .bind(message.sent_at)
        .bind(message.from_staff)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List an account's conversation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_account(
        &self,
        account_id: &UserId,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r"
            SELECT id, author, body, sent_at, from_staff
            FROM storefront.chat_message
            WHERE account_id = $1
            ORDER BY sent_at ASC
            ",
        )
        .bind(account_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(MessageRow::into_message).collect())
    }

    /// Store a chat submission from an unauthenticated visitor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn append_guest(
        &self,
        id: &str,
        email: &Email,
        body: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storefront.guest_message (id, email, body)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(id)
        .bind(email.as_str())
        .bind(body)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
