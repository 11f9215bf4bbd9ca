//! Conci server library logic.

pub mod api;
pub mod api_feed;
pub mod api_staff;
pub mod api_ws;
pub mod config;
pub mod session;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Extension, Json, Router,
};
use conci_intent::{Classifier, IntentError};
use conci_observe::ServiceLogEntry;
use conci_types::{Department, RequestStatus};
use serde::Serialize;
use serde_json::{json, Value};
use session::{RequestOutcome, SessionRegistry};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Maximum request body size (64 KiB). Transcripts and control updates are small.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Events pushed to the staff feed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FeedEvent {
    /// A request was appended to a session's service log.
    RequestLogged {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
        entry: ServiceLogEntry,
    },
    /// A negative guest was left on the fallback path.
    EscalationRaised {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
        entry: ServiceLogEntry,
    },
    /// Staff moved a request to a new status.
    StatusChanged {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
        seq: u64,
        status: RequestStatus,
    },
    /// Staff pushed (or cleared) the promo banner.
    PromoPushed { message: Option<String> },
}

impl FeedEvent {
    /// Department the event concerns, if it carries a log entry.
    pub fn department(&self) -> Option<Department> {
        match self {
            Self::RequestLogged { entry, .. } | Self::EscalationRaised { entry, .. } => {
                Some(entry.department)
            }
            Self::StatusChanged { .. } | Self::PromoPushed { .. } => None,
        }
    }
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The intent classifier (immutable, shared by all sessions).
    pub classifier: Arc<Classifier>,
    /// Live guest sessions.
    pub sessions: SessionRegistry,
    /// Promo banner shown on every guest device.
    pub promo: Arc<RwLock<Option<String>>>,
    /// Broadcast channel for the staff feed (SSE stream).
    pub feed_tx: broadcast::Sender<FeedEvent>,
    /// Session defaults and input limits.
    pub concierge: config::ConciergeConfig,
}

impl AppState {
    /// Builds state with the standard classifier.
    ///
    /// # Errors
    ///
    /// Returns `IntentError` if the classifier patterns fail to compile.
    pub fn new(concierge: config::ConciergeConfig) -> Result<Self, IntentError> {
        let (feed_tx, _) = broadcast::channel(concierge.feed_capacity.max(1));
        Ok(Self {
            classifier: Arc::new(Classifier::new()?),
            sessions: SessionRegistry::new(),
            promo: Arc::new(RwLock::new(None)),
            feed_tx,
            concierge,
        })
    }

    /// Sends an event to the staff feed. Having no subscribers is not an error.
    pub fn publish(&self, event: FeedEvent) {
        if let Err(e) = self.feed_tx.send(event) {
            tracing::debug!("staff feed has no subscribers: {}", e);
        }
    }

    /// Logs a processed transcript and fans it out to the staff feed.
    pub(crate) fn announce(&self, outcome: &RequestOutcome) {
        let Some(entry) = &outcome.entry else {
            return;
        };
        tracing::info!(
            session_id = %outcome.session_id,
            room = %entry.room,
            intent = outcome.intent.label(),
            department = %entry.department,
            ticket_id = %entry.ticket_id,
            sentiment = %entry.sentiment,
            "service request logged"
        );
        self.publish(FeedEvent::RequestLogged {
            session_id: outcome.session_id,
            entry: entry.clone(),
        });
        if entry.escalated {
            tracing::warn!(
                session_id = %outcome.session_id,
                room = %entry.room,
                ticket_id = %entry.ticket_id,
                "negative sentiment on unresolved request, alerting duty manager"
            );
            self.publish(FeedEvent::EscalationRaised {
                session_id: outcome.session_id,
                entry: entry.clone(),
            });
        }
    }

    pub fn current_promo(&self) -> Option<String> {
        self.promo.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/sessions",
            post(api::create_session_handler).get(api::list_sessions_handler),
        )
        .route(
            "/api/sessions/{sessionId}",
            get(api::get_session_handler).delete(api::delete_session_handler),
        )
        .route(
            "/api/sessions/{sessionId}/transcripts",
            post(api::submit_transcript_handler),
        )
        .route(
            "/api/sessions/{sessionId}/room",
            put(api::update_room_handler),
        )
        .route(
            "/api/sessions/{sessionId}/profile",
            put(api::update_profile_handler),
        )
        .route(
            "/api/sessions/{sessionId}/privacy",
            put(api::update_privacy_handler),
        )
        .route(
            "/api/sessions/{sessionId}/bookings",
            post(api::create_booking_handler),
        )
        .route(
            "/api/sessions/{sessionId}/log",
            get(api_staff::list_log_handler),
        )
        .route(
            "/api/sessions/{sessionId}/log/{seq}",
            patch(api_staff::update_status_handler),
        )
        .route(
            "/api/sessions/{sessionId}/heatmap",
            get(api_staff::heatmap_handler),
        )
        .route("/api/promo", get(api_staff::get_promo_handler))
        .route("/api/staff/promo", put(api_staff::push_promo_handler))
        .route("/events/stream", get(api_feed::get_feed_stream_handler))
        .route("/ws", get(api_ws::ws_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
