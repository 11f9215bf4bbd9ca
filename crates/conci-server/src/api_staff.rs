//! Staff-facing API handlers.
//!
//! Provides:
//! - `GET /api/sessions/{sessionId}/log` — filtered service log
//! - `PATCH /api/sessions/{sessionId}/log/{seq}` — workflow status updates
//! - `GET /api/sessions/{sessionId}/heatmap` — sentiment by room
//! - `GET /api/promo` and `PUT /api/staff/promo` — the promo banner

use crate::api::ApiError;
use crate::{AppState, FeedEvent};
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
};
use conci_observe::{HeatmapRow, LogFilter, ServiceLogEntry};
use conci_types::{Department, RequestStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Longest promo message staff may push.
const MAX_PROMO_LEN: usize = 280;

/// Query parameters for `GET /api/sessions/{sessionId}/log`.
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    /// Filter by department label (e.g. `Housekeeping`, `F&B`).
    pub department: Option<String>,
    /// Filter by status label (`New`, `In Progress`, `Done`).
    pub status: Option<String>,
    /// Filter by room number.
    pub room: Option<String>,
    /// Only unresolved (or only resolved) requests.
    pub unresolved: Option<bool>,
}

impl LogQuery {
    fn into_filter(self) -> Result<LogFilter, ApiError> {
        let department = self
            .department
            .as_deref()
            .map(str::parse::<Department>)
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let status = self
            .status
            .as_deref()
            .map(str::parse::<RequestStatus>)
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        Ok(LogFilter {
            department,
            status,
            room: self.room,
            unresolved: self.unresolved,
        })
    }
}

/// Response wrapper for the staff log view.
#[derive(Debug, Serialize)]
pub struct LogResponse {
    /// Matching entries in log order.
    pub entries: Vec<ServiceLogEntry>,
    /// The number of entries returned.
    pub count: usize,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: RequestStatus,
}

/// Response wrapper for the sentiment heatmap.
#[derive(Debug, Serialize)]
pub struct HeatmapResponse {
    pub rows: Vec<HeatmapRow>,
}

/// Request body for pushing a promo. An empty message clears the banner.
#[derive(Debug, Deserialize)]
pub struct PromoRequest {
    pub message: String,
}

/// Current promo banner.
#[derive(Debug, Serialize)]
pub struct PromoResponse {
    pub promo: Option<String>,
}

/// Handler for `GET /api/sessions/{sessionId}/log`.
pub async fn list_log_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Query(params): Query<LogQuery>,
) -> Result<Json<LogResponse>, ApiError> {
    let filter = params.into_filter()?;
    let entries = state.sessions.with_session(session_id, |session| {
        Ok(session
            .log
            .filter(&filter)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>())
    })?;
    let count = entries.len();
    Ok(Json(LogResponse { entries, count }))
}

/// Handler for `PATCH /api/sessions/{sessionId}/log/{seq}`.
pub async fn update_status_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((session_id, seq)): Path<(Uuid, u64)>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<ServiceLogEntry>, ApiError> {
    let entry = state.sessions.with_session(session_id, |session| {
        Ok(session.log.set_status(seq, update.status)?.clone())
    })?;
    state.publish(FeedEvent::StatusChanged {
        session_id,
        seq,
        status: entry.status,
    });
    Ok(Json(entry))
}

/// Handler for `GET /api/sessions/{sessionId}/heatmap`.
pub async fn heatmap_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HeatmapResponse>, ApiError> {
    let rows = state
        .sessions
        .with_session(session_id, |session| Ok(session.log.sentiment_heatmap()))?;
    Ok(Json(HeatmapResponse { rows }))
}

/// Handler for `GET /api/promo`.
pub async fn get_promo_handler(Extension(state): Extension<Arc<AppState>>) -> Json<PromoResponse> {
    Json(PromoResponse {
        promo: state.current_promo(),
    })
}

/// Handler for `PUT /api/staff/promo`.
pub async fn push_promo_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<PromoRequest>,
) -> Result<(StatusCode, Json<PromoResponse>), ApiError> {
    let message = payload.message.trim();
    if message.chars().count() > MAX_PROMO_LEN {
        return Err(ApiError::BadRequest(format!(
            "promo exceeds {MAX_PROMO_LEN} characters"
        )));
    }
    let promo = (!message.is_empty()).then(|| message.to_string());

    *state.promo.write().unwrap_or_else(|e| e.into_inner()) = promo.clone();
    tracing::info!(promo = ?promo, "promo pushed to all devices");
    state.publish(FeedEvent::PromoPushed {
        message: promo.clone(),
    });

    Ok((StatusCode::OK, Json(PromoResponse { promo })))
}
