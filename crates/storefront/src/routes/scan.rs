//! Scan route handlers.
//!
//! The browser owns the camera; these endpoints take the client's
//! stream events, expose the countdown status for polling, and list
//! past records. All of them require a signed-in account, since scan
//! records belong to one.

use axum::{
    Json,
    extract::State,
    http::header::USER_AGENT,
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use raritone_core::DeviceClass;

use crate::db::ScanRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::scan::{ScanEvent, ScanStatus};
use crate::state::AppState;

/// Capture event request body.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EventForm {
    /// Begin acquisition, or start the countdown from preview.
    Start,
    /// The browser granted the media stream.
    StreamGranted,
    /// The browser refused the media stream.
    #[serde(rename_all = "camelCase")]
    StreamDenied { reason: String },
    /// Back out of the capture.
    Cancel,
}

impl From<EventForm> for ScanEvent {
    fn from(form: EventForm) -> Self {
        match form {
            EventForm::Start => Self::Start,
            EventForm::StreamGranted => Self::StreamGranted,
            EventForm::StreamDenied { reason } => Self::StreamDenied { reason },
            EventForm::Cancel => Self::Cancel,
        }
    }
}

fn device_from(headers: &HeaderMap) -> DeviceClass {
    headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(DeviceClass::from_user_agent)
        .unwrap_or_default()
}

/// Report a capture event.
#[instrument(skip(state, headers))]
pub async fn events(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Json(form): Json<EventForm>,
) -> Result<Json<ScanStatus>> {
    let device = device_from(&headers);
    let status = state
        .scan()
        .handle_event(&user.id, form.into(), device)
        .await;
    Ok(Json(status))
}

/// Current capture status, for polling during the countdown.
#[instrument(skip(state))]
pub async fn status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Json<ScanStatus> {
    Json(state.scan().status(&user.id).await)
}

/// Past scan records, newest first.
#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let records = ScanRepository::new(state.pool())
        .list_for_account(&user.id)
        .await?;

    Ok(Json(json!({ "scans": records })))
}
