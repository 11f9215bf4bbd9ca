//! Integration tests for the staff view: log filters, status workflow,
//! the sentiment heatmap, promo pushes and the staff feed.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use conci_server::{app, config::ConciergeConfig, AppState, FeedEvent};
use conci_types::{Department, RequestStatus};
use serde_json::{json, Value};
use tokio::sync::broadcast::error::TryRecvError;
use tower::ServiceExt; // for oneshot

fn make_state() -> AppState {
    AppState::new(ConciergeConfig::default()).expect("standard rules compile")
}

async fn send(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Creates a session and feeds it a fixed set of requests.
async fn seeded_session(state: &AppState) -> String {
    let (_, body) = send(state, "POST", "/api/sessions", Some(json!({}))).await;
    let session = body["sessionId"].as_str().unwrap().to_string();
    for text in [
        "bring towels to room 101",
        "the air conditioning is not working in room 101",
        "thank you, lights off in room 202",
        "this is terrible, room 202",
        "there is smoke in room 9",
    ] {
        let (status, _) = send(
            state,
            "POST",
            &format!("/api/sessions/{session}/transcripts"),
            Some(json!({ "text": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    session
}

#[tokio::test]
async fn log_lists_everything_in_order() {
    let state = make_state();
    let session = seeded_session(&state).await;

    let (status, body) = send(&state, "GET", &format!("/api/sessions/{session}/log"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    let seqs: Vec<u64> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["seq"].as_u64().unwrap())
        .collect();
    assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn log_filters_by_department_room_and_resolution() {
    let state = make_state();
    let session = seeded_session(&state).await;
    let base = format!("/api/sessions/{session}/log");

    let (_, body) = send(&state, "GET", &format!("{base}?department=Engineering"), None).await;
    assert_eq!(body["count"], 1);
    assert!(body["entries"][0]["ticketId"]
        .as_str()
        .unwrap()
        .starts_with("ENG-"));

    let (_, body) = send(&state, "GET", &format!("{base}?department=emergency"), None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["entries"][0]["room"], "9");

    let (_, body) = send(&state, "GET", &format!("{base}?room=101"), None).await;
    assert_eq!(body["count"], 2);

    let (_, body) = send(&state, "GET", &format!("{base}?unresolved=true"), None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["entries"][0]["escalated"], true);

    let (status, body) = send(&state, "GET", &format!("{base}?department=Spa"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Spa"));
}

#[tokio::test]
async fn status_moves_through_workflow() {
    let state = make_state();
    let session = seeded_session(&state).await;
    let mut feed = state.feed_tx.subscribe();

    let (status, body) = send(
        &state,
        "PATCH",
        &format!("/api/sessions/{session}/log/2"),
        Some(json!({ "status": "In Progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seq"], 2);
    assert_eq!(body["status"], "In Progress");

    match feed.try_recv() {
        Ok(FeedEvent::StatusChanged { seq, status, .. }) => {
            assert_eq!(seq, 2);
            assert_eq!(status, RequestStatus::InProgress);
        }
        other => panic!("expected status change, got {other:?}"),
    }

    let (_, body) = send(
        &state,
        "GET",
        &format!("/api/sessions/{session}/log?status=In%20Progress"),
        None,
    )
    .await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["entries"][0]["seq"], 2);

    let (status, _) = send(
        &state,
        "PATCH",
        &format!("/api/sessions/{session}/log/99"),
        Some(json!({ "status": "Done" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn heatmap_counts_sentiment_per_room() {
    let state = make_state();
    let session = seeded_session(&state).await;

    let (status, body) = send(
        &state,
        "GET",
        &format!("/api/sessions/{session}/heatmap"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["rows"],
        json!([
            { "room": "9", "positive": 0, "neutral": 1, "negative": 0 },
            { "room": "101", "positive": 0, "neutral": 2, "negative": 0 },
            { "room": "202", "positive": 1, "neutral": 0, "negative": 1 },
        ])
    );
}

#[tokio::test]
async fn logged_requests_reach_the_feed() {
    let state = make_state();
    let mut feed = state.feed_tx.subscribe();
    let session = seeded_session(&state).await;

    let mut logged = 0;
    let mut escalations = Vec::new();
    loop {
        match feed.try_recv() {
            Ok(FeedEvent::RequestLogged { .. }) => logged += 1,
            Ok(FeedEvent::EscalationRaised { session_id, entry }) => {
                assert_eq!(session_id.to_string(), session);
                escalations.push(entry);
            }
            Ok(other) => panic!("unexpected event {other:?}"),
            Err(TryRecvError::Empty) => break,
            Err(e) => panic!("feed error: {e}"),
        }
    }
    assert_eq!(logged, 5);
    assert_eq!(escalations.len(), 1);
    assert_eq!(escalations[0].room, "202");
    assert_eq!(escalations[0].department, Department::General);
}

#[tokio::test]
async fn repeats_are_not_announced() {
    let state = make_state();
    let (_, body) = send(&state, "POST", "/api/sessions", Some(json!({}))).await;
    let session = body["sessionId"].as_str().unwrap().to_string();
    let mut feed = state.feed_tx.subscribe();

    for _ in 0..3 {
        send(
            &state,
            "POST",
            &format!("/api/sessions/{session}/transcripts"),
            Some(json!({ "text": "I need water" })),
        )
        .await;
    }

    assert!(matches!(feed.try_recv(), Ok(FeedEvent::RequestLogged { .. })));
    assert!(matches!(feed.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn promo_push_and_clear() {
    let state = make_state();
    let mut feed = state.feed_tx.subscribe();

    let (_, body) = send(&state, "GET", "/api/promo", None).await;
    assert_eq!(body["promo"], Value::Null);

    let (status, body) = send(
        &state,
        "PUT",
        "/api/staff/promo",
        Some(json!({ "message": "  Happy hour at the bar, 5-7pm " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["promo"], "Happy hour at the bar, 5-7pm");
    assert!(matches!(
        feed.try_recv(),
        Ok(FeedEvent::PromoPushed { message: Some(_) })
    ));

    let (_, body) = send(&state, "GET", "/api/promo", None).await;
    assert_eq!(body["promo"], "Happy hour at the bar, 5-7pm");

    let (_, body) = send(&state, "PUT", "/api/staff/promo", Some(json!({ "message": "" }))).await;
    assert_eq!(body["promo"], Value::Null);
    assert_eq!(state.current_promo(), None);

    let (status, _) = send(
        &state,
        "PUT",
        "/api/staff/promo",
        Some(json!({ "message": "x".repeat(281) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn staff_views_of_unknown_session_are_not_found() {
    let state = make_state();
    let missing = uuid::Uuid::new_v4();

    for uri in [
        format!("/api/sessions/{missing}/log"),
        format!("/api/sessions/{missing}/heatmap"),
    ] {
        let (status, _) = send(&state, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
