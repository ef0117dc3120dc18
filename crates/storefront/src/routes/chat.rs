//! Chat route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use raritone_core::Email;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::chat::ChatService;
use crate::state::AppState;

/// Message request body.
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    pub body: String,
}

/// Guest message request body.
#[derive(Debug, Deserialize)]
pub struct GuestForm {
    pub email: String,
    pub body: String,
}

fn validate_body(body: &str) -> Result<&str> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("message body is empty".into()));
    }
    Ok(trimmed)
}

/// The account's conversation, oldest first.
#[instrument(skip(state))]
pub async fn messages(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let messages = ChatService::new(state.pool()).history(&user.id).await?;
    Ok(Json(json!({ "messages": messages })))
}

/// Send a message; responds with the appended messages, the automated
/// reply included.
#[instrument(skip(state, form))]
pub async fn send(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<MessageForm>,
) -> Result<Json<Value>> {
    let body = validate_body(&form.body)?;
    let appended = ChatService::new(state.pool())
        .send(&user.id, body)
        .await?;
    Ok(Json(json!({ "messages": appended })))
}

/// Guest message with a contact email.
#[instrument(skip(state, form))]
pub async fn guest(
    State(state): State<AppState>,
    Json(form): Json<GuestForm>,
) -> Result<Json<Value>> {
    let body = validate_body(&form.body)?;
    let email = Email::parse(&form.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    ChatService::new(state.pool()).guest_message(&email, body).await?;
    Ok(Json(json!({ "ok": true })))
}
