//! WebSocket handler for guest devices.
//!
//! Each connection owns exactly one session: it is created when the socket
//! is upgraded and destroyed when the socket closes.

use crate::api::{process_booking, process_transcript};
use crate::session::{BookingKind, RequestOutcome, SessionSnapshot};
use crate::{AppState, FeedEvent};
use axum::{
    extract::{
        ws::{Message as AxumMessage, WebSocket},
        Extension, Query, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use conci_observe::ServiceLogEntry;
use conci_types::{GuestProfile, RoomState};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

/// Outbound buffer per connection. A client this far behind is dropped from.
const WS_OUTBOUND_BUFFER: usize = 64;

/// Query parameters for the WebSocket connection.
#[derive(Debug, Default, Deserialize)]
pub struct WsConnectParams {
    /// Guest name for the new session; the configured default otherwise.
    pub guest: Option<String>,
}

/// Incoming WebSocket message types.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomingMessage {
    /// A finished speech-recognition result.
    Transcript { text: String },
    /// A restaurant or spa booking from the front end.
    Booking { kind: BookingKind },
    /// Request for the current room state.
    RoomState,
}

/// Outgoing WebSocket message types.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutgoingMessage {
    /// Sent once, right after the upgrade.
    Session { session: SessionSnapshot },
    Outcome { outcome: RequestOutcome },
    Booking { entry: ServiceLogEntry },
    RoomState {
        #[serde(rename = "roomState")]
        room_state: RoomState,
    },
    /// Promo banner pushed by staff; `None` clears it.
    Promo { message: Option<String> },
    Error { message: String },
}

/// Handler for `GET /ws`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<WsConnectParams>,
) -> impl IntoResponse {
    let mut profile = state.concierge.default_profile();
    if let Some(name) = params.guest.filter(|n| !n.trim().is_empty()) {
        profile.name = name;
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state, profile))
}

/// Serializes and queues a message for the client.
fn send_ws(tx: &mpsc::Sender<String>, message: &OutgoingMessage) {
    match serde_json::to_string(message) {
        Ok(json) => {
            if let Err(e) = tx.try_send(json) {
                tracing::warn!("failed to queue WebSocket message: {}", e);
            }
        }
        Err(e) => {
            tracing::error!("failed to serialize WebSocket message: {}", e);
        }
    }
}

fn send_ws_error(tx: &mpsc::Sender<String>, message: String) {
    send_ws(tx, &OutgoingMessage::Error { message });
}

/// Forwards promo pushes from the staff feed to one guest device.
async fn forward_promos(mut feed_rx: broadcast::Receiver<FeedEvent>, tx: mpsc::Sender<String>) {
    loop {
        match feed_rx.recv().await {
            Ok(FeedEvent::PromoPushed { message }) => {
                send_ws(&tx, &OutgoingMessage::Promo { message });
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "promo forwarder lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn handle_incoming(state: &AppState, session_id: Uuid, tx: &mpsc::Sender<String>, text: &str) {
    let incoming = match serde_json::from_str::<IncomingMessage>(text) {
        Ok(incoming) => incoming,
        Err(e) => {
            send_ws_error(tx, format!("unrecognised message: {}", e));
            return;
        }
    };

    match incoming {
        IncomingMessage::Transcript { text } => match process_transcript(state, session_id, &text) {
            Ok(outcome) => send_ws(tx, &OutgoingMessage::Outcome { outcome }),
            Err(e) => send_ws_error(tx, e.to_string()),
        },
        IncomingMessage::Booking { kind } => match process_booking(state, session_id, kind) {
            Ok(entry) => send_ws(tx, &OutgoingMessage::Booking { entry }),
            Err(e) => send_ws_error(tx, e.to_string()),
        },
        IncomingMessage::RoomState => {
            match state
                .sessions
                .with_session(session_id, |session| Ok(session.room_state))
            {
                Ok(room_state) => send_ws(tx, &OutgoingMessage::RoomState { room_state }),
                Err(e) => send_ws_error(tx, e.to_string()),
            }
        }
    }
}

/// Handles the WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, profile: GuestProfile) {
    let session = state.sessions.create(profile);
    let session_id = session.session_id;

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(WS_OUTBOUND_BUFFER);

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(AxumMessage::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    send_ws(&tx, &OutgoingMessage::Session { session });
    if let Some(message) = state.current_promo() {
        send_ws(&tx, &OutgoingMessage::Promo {
            message: Some(message),
        });
    }
    let promo_task = tokio::spawn(forward_promos(state.feed_tx.subscribe(), tx.clone()));

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            AxumMessage::Text(text) => handle_incoming(&state, session_id, &tx, text.as_str()),
            AxumMessage::Close(_) => break,
            _ => {}
        }
    }

    promo_task.abort();
    send_task.abort();
    state.sessions.remove(session_id);
}
