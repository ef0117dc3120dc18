//! Auth route handlers.
//!
//! Credentials go to the external identity provider; this service only
//! mirrors the verified identity into a local account row and the
//! session. Sign-in replaces the session's cart snapshot with the
//! account's stored cart. Sign-out drops the cart and identity but
//! keeps the wishlist and recent searches, which are browser-scoped.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use raritone_core::{Email, UserId};

use crate::db::UserRepository;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::set_current_user;
use crate::models::CurrentUser;
use crate::services::cart::{self, CartService};
use crate::services::identity::ProviderIdentity;
use crate::state::AppState;

/// Email/password sign-in request.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Federated sign-in request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderForm {
    pub id_token: String,
}

/// Mirror a verified identity into the local account row and the
/// session, and adopt the account's stored cart.
async fn complete_sign_in(
    state: &AppState,
    session: &Session,
    identity: ProviderIdentity,
    name_override: Option<String>,
) -> Result<Value> {
    let email = Email::parse(&identity.email)
        .map_err(|e| AppError::Internal(format!("identity provider returned bad email: {e}")))?;

    let name = name_override
        .or(identity.display_name)
        .unwrap_or_else(|| identity.email.clone());

    let id = UserId::new(identity.uid);
    let account = UserRepository::new(state.pool())
        .create_if_absent(&id, &name, &email, identity.photo_url.as_deref())
        .await?;

    let user = CurrentUser {
        id: account.id.clone(),
        email: account.email.clone(),
        name: account.name.clone(),
    };

    CartService::new(state.pool())
        .adopt_account_cart(session, &user)
        .await?;
    set_current_user(session, &user).await?;
    set_sentry_user(&user.id.as_str(), Some(user.email.as_str()));

    tracing::info!(user_id = %user.id, "Signed in");

    Ok(json!({
        "user": account,
    }))
}

/// Email/password sign-in.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<Value>> {
    let identity = state.identity().sign_in(&form.email, &form.password).await?;
    let body = complete_sign_in(&state, &session, identity, None).await?;
    Ok(Json(body))
}

/// Email/password registration.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegisterForm>,
) -> Result<Json<Value>> {
    let identity = state.identity().sign_up(&form.email, &form.password).await?;
    let body = complete_sign_in(&state, &session, identity, form.name).await?;
    Ok(Json(body))
}

/// Federated ID-token sign-in.
#[instrument(skip(state, session, form))]
pub async fn provider(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<ProviderForm>,
) -> Result<Json<Value>> {
    let identity = state.identity().token_sign_in(&form.id_token).await?;
    let body = complete_sign_in(&state, &session, identity, None).await?;
    Ok(Json(body))
}

/// Sign out.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    cart::clear_for_logout(&session).await?;
    clear_sentry_user();
    Ok(Json(json!({ "ok": true })))
}
