//! Guest-facing API handlers: session lifecycle, transcripts, room controls.

use crate::session::{
    BookingKind, PrivacySettings, RequestOutcome, RoomControls, SessionError, SessionSnapshot,
};
use crate::{AppState, FeedEvent};
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Local;
use conci_observe::{ObserveError, ServiceLogEntry};
use conci_types::{GuestProfile, RoomState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) => ApiError::NotFound(e.to_string()),
            SessionError::MicrophoneDisabled => ApiError::Conflict(e.to_string()),
            SessionError::TranscriptTooLong { .. } | SessionError::Thermostat(_) => {
                ApiError::BadRequest(e.to_string())
            }
            SessionError::Log(ObserveError::EntryNotFound(_)) => ApiError::NotFound(e.to_string()),
        }
    }
}

/// Request body for session creation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Guest profile; the configured default is used when absent.
    #[serde(default)]
    pub profile: Option<GuestProfile>,
}

/// Response body for session listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListResponse {
    pub session_ids: Vec<Uuid>,
    pub count: usize,
}

/// Request body for transcript submission.
#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    /// Text from the speech recogniser.
    pub text: String,
}

/// Request body for privacy toggles; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyUpdate {
    pub mic_enabled: Option<bool>,
    pub device_only: Option<bool>,
}

/// Request body for a booking.
#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub kind: BookingKind,
}

/// Runs a transcript through a session and announces the result.
///
/// Shared by the REST and WebSocket surfaces.
pub(crate) fn process_transcript(
    state: &AppState,
    session_id: Uuid,
    text: &str,
) -> Result<RequestOutcome, SessionError> {
    let max = state.concierge.max_transcript_len;
    if text.len() > max {
        return Err(SessionError::TranscriptTooLong {
            len: text.len(),
            max,
        });
    }
    let now = Local::now().naive_local();
    let outcome = state.sessions.with_session(session_id, |session| {
        session.handle_transcript(&state.classifier, text, now)
    })?;
    state.announce(&outcome);
    Ok(outcome)
}

/// Records a booking and announces it to staff.
pub(crate) fn process_booking(
    state: &AppState,
    session_id: Uuid,
    kind: BookingKind,
) -> Result<ServiceLogEntry, SessionError> {
    let now = Local::now().naive_local();
    let entry = state
        .sessions
        .with_session(session_id, |session| Ok(session.book(kind, now)))?;
    tracing::info!(
        session_id = %session_id,
        ticket_id = %entry.ticket_id,
        command = %entry.command,
        "booking logged"
    );
    state.publish(FeedEvent::RequestLogged {
        session_id,
        entry: entry.clone(),
    });
    Ok(entry)
}

/// Handler for `POST /api/sessions`.
///
/// The body is optional; a request without a JSON content type creates a
/// session with the configured default guest.
pub async fn create_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Option<Json<CreateSessionRequest>>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let profile = payload
        .and_then(|Json(request)| request.profile)
        .unwrap_or_else(|| state.concierge.default_profile());
    let snapshot = state.sessions.create(profile);
    (StatusCode::CREATED, Json(snapshot))
}

/// Handler for `GET /api/sessions`.
pub async fn list_sessions_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<SessionListResponse> {
    let session_ids = state.sessions.ids();
    let count = session_ids.len();
    Json(SessionListResponse { session_ids, count })
}

/// Handler for `GET /api/sessions/{sessionId}`.
pub async fn get_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let snapshot = state
        .sessions
        .with_session(session_id, |session| Ok(session.snapshot()))?;
    Ok(Json(snapshot))
}

/// Handler for `DELETE /api/sessions/{sessionId}`.
pub async fn delete_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(SessionError::NotFound(session_id).into())
    }
}

/// Handler for `POST /api/sessions/{sessionId}/transcripts`.
pub async fn submit_transcript_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<TranscriptRequest>,
) -> Result<Json<RequestOutcome>, ApiError> {
    let outcome = process_transcript(&state, session_id, &payload.text)?;
    Ok(Json(outcome))
}

/// Handler for `PUT /api/sessions/{sessionId}/room`.
pub async fn update_room_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(controls): Json<RoomControls>,
) -> Result<Json<RoomState>, ApiError> {
    let room_state = state
        .sessions
        .with_session(session_id, |session| session.apply_controls(&controls))?;
    tracing::debug!(session_id = %session_id, ?room_state, "room controls applied");
    Ok(Json(room_state))
}

/// Handler for `PUT /api/sessions/{sessionId}/profile`.
pub async fn update_profile_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(profile): Json<GuestProfile>,
) -> Result<Json<GuestProfile>, ApiError> {
    if profile.name.trim().is_empty() {
        return Err(ApiError::BadRequest("guest name must not be empty".to_string()));
    }
    let profile = state.sessions.with_session(session_id, |session| {
        session.profile = profile;
        Ok(session.profile.clone())
    })?;
    Ok(Json(profile))
}

/// Handler for `PUT /api/sessions/{sessionId}/privacy`.
pub async fn update_privacy_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(update): Json<PrivacyUpdate>,
) -> Result<Json<PrivacySettings>, ApiError> {
    let privacy = state.sessions.with_session(session_id, |session| {
        if let Some(mic) = update.mic_enabled {
            session.privacy.mic_enabled = mic;
        }
        if let Some(device_only) = update.device_only {
            session.privacy.device_only = device_only;
        }
        Ok(session.privacy)
    })?;
    tracing::info!(
        session_id = %session_id,
        mic_enabled = privacy.mic_enabled,
        device_only = privacy.device_only,
        "privacy settings changed"
    );
    Ok(Json(privacy))
}

/// Handler for `POST /api/sessions/{sessionId}/bookings`.
pub async fn create_booking_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<ServiceLogEntry>), ApiError> {
    let entry = process_booking(&state, session_id, payload.kind)?;
    Ok((StatusCode::CREATED, Json(entry)))
}
