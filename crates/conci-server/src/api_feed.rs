//! Staff feed handlers.
//!
//! Provides:
//! - `GET /events/stream` — SSE real-time stream of service requests,
//!   escalations, status changes and promo pushes

use crate::AppState;
use axum::{
    extract::{Extension, Query},
    response::{
        sse::{Event, KeepAlive},
        Sse,
    },
};
use conci_types::Department;
use futures_util::Stream;
use serde::Deserialize;
use std::{convert::Infallible, sync::Arc};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Query parameters for `GET /events/stream`.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Only forward events for this department (e.g. `Emergency`).
    /// Events that concern no department are always forwarded.
    pub department: Option<String>,
}

/// Handler for `GET /events/stream`.
///
/// An unknown department label is ignored rather than rejected, so a desk
/// with a stale filter still sees the full feed.
pub async fn get_feed_stream_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<FeedQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let department_filter: Option<Department> =
        params.department.as_deref().and_then(|d| d.parse().ok());

    let rx = state.feed_tx.subscribe();
    let stream = BroadcastStream::new(rx);

    let mapped_stream = stream.filter_map(move |result| match result {
        Ok(event) => {
            if let (Some(wanted), Some(actual)) = (department_filter, event.department()) {
                if wanted != actual {
                    return None;
                }
            }

            match serde_json::to_string(&event) {
                Ok(data) => Some(Ok(Event::default().data(data))),
                Err(e) => {
                    tracing::error!("failed to serialize feed event: {}", e);
                    None
                }
            }
        }
        Err(lagged) => {
            tracing::warn!("staff feed subscriber fell behind: {}", lagged);
            None
        }
    });

    Sse::new(mapped_stream).keep_alive(KeepAlive::default())
}
