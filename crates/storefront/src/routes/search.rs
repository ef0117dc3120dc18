//! Recent-search route handlers.
//!
//! The last five distinct search terms, newest first. The session
//! snapshot is the working copy; signed-in accounts also mirror the
//! list to their account row so it follows them across browsers. The
//! mirror write is best-effort: a store failure keeps the session copy
//! and logs.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use raritone_core::RecentSearches;

use crate::db::UserRepository;
use crate::error::Result;
use crate::models::StoreSession;
use crate::models::session::{read_snapshot, session_keys, write_snapshot};
use crate::state::AppState;

/// Search-term request body.
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    pub term: String,
}

async fn load(state: &AppState, session: &Session, who: &StoreSession) -> RecentSearches {
    if let Some(searches) = read_snapshot(session, session_keys::RECENT_SEARCHES).await {
        return searches;
    }

    // No session copy yet; a signed-in account may have one on its row
    if let StoreSession::Account(user) = who {
        match UserRepository::new(state.pool()).get(&user.id).await {
            Ok(Some(account)) => return account.recent_searches,
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, "Recent-search load failed, starting empty");
            }
        }
    }

    RecentSearches::default()
}

/// Record a search term.
///
/// Blank terms are ignored and respond with the unchanged list.
#[instrument(skip(state, session, who))]
pub async fn record(
    State(state): State<AppState>,
    session: Session,
    who: StoreSession,
    Json(form): Json<RecordForm>,
) -> Result<Json<Value>> {
    let mut searches = load(&state, &session, &who).await;
    searches.push(&form.term);
    write_snapshot(&session, session_keys::RECENT_SEARCHES, &searches).await?;

    if let StoreSession::Account(user) = &who
        && let Err(error) = UserRepository::new(state.pool())
            .update_recent_searches(&user.id, &searches)
            .await
    {
        tracing::warn!(%error, "Recent-search mirror write failed");
    }

    Ok(Json(json!({ "searches": searches.terms() })))
}

/// Recent search terms, newest first.
#[instrument(skip(state, session, who))]
pub async fn recent(
    State(state): State<AppState>,
    session: Session,
    who: StoreSession,
) -> Json<Value> {
    let searches = load(&state, &session, &who).await;
    Json(json!({ "searches": searches.terms() }))
}
