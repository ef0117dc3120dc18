//! Wishlist route handlers.
//!
//! Toggles respond with `HX-Trigger: wishlist-updated` so wishlist
//! badges refresh the same way cart badges do.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use raritone_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::services::wishlist;
use crate::state::AppState;

/// Toggle request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleForm {
    pub product_id: String,
}

/// Wishlist contents.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<serde_json::Value> {
    let wishlist = wishlist::load(&session).await;
    Json(json!({ "productIds": wishlist.ids() }))
}

/// Toggle a product on the wishlist.
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<ToggleForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);

    // Only catalog products can be wished for
    ProductRepository::new(state.pool())
        .get(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("product".into()))?;

    let (wishlist, added) = wishlist::toggle(&session, product_id).await?;

    Ok((
        StatusCode::OK,
        AppendHeaders([("HX-Trigger", "wishlist-updated")]),
        Json(json!({
            "productIds": wishlist.ids(),
            "added": added,
        })),
    )
        .into_response())
}

/// Wishlist count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<serde_json::Value> {
    let wishlist = wishlist::load(&session).await;
    Json(json!({ "count": wishlist.len() }))
}
