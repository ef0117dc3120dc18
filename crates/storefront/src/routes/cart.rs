//! Cart route handlers.
//!
//! Every mutation responds with the resulting cart, the persistence
//! outcome, and an `HX-Trigger: cart-updated` header so any cart badge
//! on the page refreshes itself.

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

use raritone_core::{Cart, CartItem, LineKey, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::StoreSession;
use crate::services::cart::{CartOp, CartService, PersistOutcome};
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddForm {
    pub product_id: String,
    pub quantity: Option<u32>,
    pub size: Option<String>,
}

/// Quantity-update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateForm {
    pub product_id: String,
    pub quantity: u32,
    pub size: Option<String>,
}

/// Line-removal request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveForm {
    pub product_id: String,
    pub size: Option<String>,
}

fn cart_body(cart: &Cart, outcome: &PersistOutcome) -> serde_json::Value {
    let mut body = json!({
        "items": cart.items(),
        "totalQuantity": cart.total_quantity(),
        "subtotal": cart.subtotal().to_string(),
    });

    // The outcome already serializes under a "persistence" tag, so its
    // fields merge into the response top level instead of nesting
    if let (serde_json::Value::Object(fields), Ok(serde_json::Value::Object(outcome_fields))) =
        (&mut body, serde_json::to_value(outcome))
    {
        fields.extend(outcome_fields);
    }

    body
}

fn updated(cart: &Cart, outcome: &PersistOutcome) -> Response {
    (
        StatusCode::OK,
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        Json(cart_body(cart, outcome)),
    )
        .into_response()
}

/// Current cart.
#[instrument(skip(state, session, who))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    who: StoreSession,
) -> Result<Json<serde_json::Value>> {
    let cart = CartService::new(state.pool()).load(&session, &who).await?;
    Ok(Json(json!({
        "items": cart.items(),
        "totalQuantity": cart.total_quantity(),
        "subtotal": cart.subtotal().to_string(),
    })))
}

/// Add a line to the cart.
///
/// The price and display fields are taken from the catalog at add time,
/// never from the client.
#[instrument(skip(state, session, who))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    who: StoreSession,
    Json(form): Json<AddForm>,
) -> Result<Response> {
    let quantity = form.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest("quantity must be positive".into()));
    }

    let product_id = ProductId::new(form.product_id);
    let product = ProductRepository::new(state.pool())
        .get(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("product".into()))?;

    let item = CartItem {
        product_id,
        name: product.name,
        unit_price: product.price,
        quantity,
        size: form.size.filter(|s| !s.is_empty()),
        image_url: product.image_url,
    };

    let (cart, outcome) = CartService::new(state.pool())
        .mutate(&session, &who, CartOp::Add(item))
        .await?;
    Ok(updated(&cart, &outcome))
}

/// Replace a line's quantity. Zero removes the line.
#[instrument(skip(state, session, who))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    who: StoreSession,
    Json(form): Json<UpdateForm>,
) -> Result<Response> {
    let key = LineKey {
        product_id: ProductId::new(form.product_id),
        size: form.size.filter(|s| !s.is_empty()),
    };

    let (cart, outcome) = CartService::new(state.pool())
        .mutate(&session, &who, CartOp::SetQuantity(key, form.quantity))
        .await?;
    Ok(updated(&cart, &outcome))
}

/// Remove a line from the cart.
#[instrument(skip(state, session, who))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    who: StoreSession,
    Json(form): Json<RemoveForm>,
) -> Result<Response> {
    let key = LineKey {
        product_id: ProductId::new(form.product_id),
        size: form.size.filter(|s| !s.is_empty()),
    };

    let (cart, outcome) = CartService::new(state.pool())
        .mutate(&session, &who, CartOp::Remove(key))
        .await?;
    Ok(updated(&cart, &outcome))
}

/// Cart quantity badge.
#[instrument(skip(state, session, who))]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
    who: StoreSession,
) -> Result<Json<serde_json::Value>> {
    let cart = CartService::new(state.pool()).load(&session, &who).await?;
    Ok(Json(json!({ "count": cart.total_quantity() })))
}

#[cfg(test)]
mod tests {
    use raritone_core::Price;

    use super::*;

    fn one_line_cart() -> Cart {
        Cart::from_items(vec![CartItem {
            product_id: ProductId::new("p1"),
            name: "Tee".into(),
            unit_price: Price::from_cents(1000),
            quantity: 2,
            size: None,
            image_url: String::new(),
        }])
    }

    #[test]
    fn mutation_body_carries_persistence_at_top_level() {
        let body = cart_body(&one_line_cart(), &PersistOutcome::Remote);

        assert_eq!(body["persistence"], "remote");
        assert_eq!(body["totalQuantity"], 2);
        assert!(body["persistence"].is_string());
    }

    #[test]
    fn fallback_body_is_flat() {
        let body = cart_body(
            &one_line_cart(),
            &PersistOutcome::LocalFallback {
                reason: "store down".into(),
            },
        );

        assert_eq!(body["persistence"], "localFallback");
        assert_eq!(body["reason"], "store down");
    }
}
