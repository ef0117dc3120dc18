//! Account route handlers.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Account profile, including the latest scan snapshot if one exists.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let account = UserRepository::new(state.pool())
        .get(&user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("account".into()))?;

    Ok(Json(json!({ "user": account })))
}
