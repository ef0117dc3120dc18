//! Authentication extractors.
//!
//! Every handler that cares who is shopping extracts a [`StoreSession`]
//! and matches on its two modes. Handlers that only make sense for an
//! account (scan history, chat threads, the profile page) extract
//! [`RequireAuth`] instead and reject guests up front.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentUser, StoreSession, session_keys};

/// Extractor yielding whoever is shopping, signed in or not.
///
/// Never rejects: a missing or unreadable identity is a guest.
impl<S> FromRequestParts<S> for StoreSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(user.map_or(Self::Guest, Self::Account))
    }
}

/// Extractor that requires a signed-in account.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Unauthorized("sign in required".into()))?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Unauthorized("sign in required".into()))?;

        Ok(Self(user))
    }
}

/// Helper to set the current user in the session after sign-in.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}
