//! Unit tests for the service log.

use conci_types::{Department, RequestStatus, Sentiment};

use crate::entry::NewEntry;
use crate::error::ObserveError;
use crate::store::{HeatmapRow, LogFilter, ServiceLog};

fn entry(command: &str) -> NewEntry {
    NewEntry {
        time: "10:15:00 AM".to_string(),
        room: "204".to_string(),
        command: command.to_string(),
        response: "Requesting fresh towels to room 204".to_string(),
        guest: "Alex".to_string(),
        sentiment: Sentiment::Neutral,
        unresolved: false,
        escalated: false,
        department: Department::Housekeeping,
        ticket_id: "HSK-101500".to_string(),
    }
}

fn entry_in(room: &str, sentiment: Sentiment, department: Department) -> NewEntry {
    NewEntry {
        room: room.to_string(),
        sentiment,
        department,
        ..entry(&format!("request from {room} {sentiment:?} {department:?}"))
    }
}

// ── Repeat suppression ───────────────────────────────────────────────

#[test]
fn immediate_repeat_is_suppressed() {
    let mut log = ServiceLog::new();
    assert!(log.append(entry("towels for room 204")).is_some());
    assert!(log.append(entry("towels for room 204")).is_none());
    assert_eq!(log.len(), 1);
}

#[test]
fn repeat_after_other_command_is_logged() {
    let mut log = ServiceLog::new();
    log.append(entry("a"));
    log.append(entry("b"));
    log.append(entry("a"));
    assert_eq!(log.len(), 3);
    let commands: Vec<&str> = log.entries().iter().map(|e| e.command.as_str()).collect();
    assert_eq!(commands, vec!["a", "b", "a"]);
}

#[test]
fn untracked_appends_skip_suppression() {
    let mut log = ServiceLog::new();
    log.append(entry("towels"));
    log.append_untracked(entry("Book Table"));
    log.append_untracked(entry("Book Table"));
    assert_eq!(log.len(), 3);
    // The tracked transcript is unchanged, so repeating it is still suppressed.
    assert_eq!(log.last_command(), Some("towels"));
    assert!(log.append(entry("towels")).is_none());
}

#[test]
fn repeat_comparison_is_exact() {
    let mut log = ServiceLog::new();
    log.append(entry("Towels please"));
    assert!(log.append(entry("towels please")).is_some());
}

// ── Sequence numbers and status ──────────────────────────────────────

#[test]
fn sequence_numbers_start_at_one() {
    let mut log = ServiceLog::new();
    let first = log.append(entry("a")).map(|e| e.seq);
    let second = log.append_untracked(entry("b")).seq;
    assert_eq!(first, Some(1));
    assert_eq!(second, 2);
    assert_eq!(log.get(2).map(|e| e.command.as_str()), Some("b"));
    assert!(log.get(0).is_none());
    assert!(log.get(3).is_none());
}

#[test]
fn new_entries_start_as_new() {
    let mut log = ServiceLog::new();
    let stored = log.append(entry("a")).cloned().expect("should append");
    assert_eq!(stored.status, RequestStatus::New);
}

#[test]
fn set_status_updates_in_place() {
    let mut log = ServiceLog::new();
    log.append(entry("a"));
    log.append(entry("b"));

    let updated = log
        .set_status(2, RequestStatus::InProgress)
        .expect("status update should succeed");
    assert_eq!(updated.status, RequestStatus::InProgress);
    assert_eq!(log.entries()[0].status, RequestStatus::New);
    assert_eq!(log.entries()[1].status, RequestStatus::InProgress);

    log.set_status(2, RequestStatus::Done).unwrap();
    assert_eq!(log.get(2).unwrap().status, RequestStatus::Done);
}

#[test]
fn set_status_unknown_seq() {
    let mut log = ServiceLog::new();
    assert_eq!(
        log.set_status(7, RequestStatus::Done).unwrap_err(),
        ObserveError::EntryNotFound(7)
    );
    assert_eq!(
        log.set_status(0, RequestStatus::Done).unwrap_err(),
        ObserveError::EntryNotFound(0)
    );
}

// ── Staff views ──────────────────────────────────────────────────────

#[test]
fn filter_by_department_and_status() {
    let mut log = ServiceLog::new();
    log.append(entry_in("1", Sentiment::Neutral, Department::Housekeeping));
    log.append(entry_in("2", Sentiment::Neutral, Department::Engineering));
    log.append(entry_in("3", Sentiment::Neutral, Department::Engineering));
    log.set_status(3, RequestStatus::Done).unwrap();

    let engineering = log.filter(&LogFilter {
        department: Some(Department::Engineering),
        ..LogFilter::default()
    });
    assert_eq!(engineering.len(), 2);

    let open_engineering = log.filter(&LogFilter {
        department: Some(Department::Engineering),
        status: Some(RequestStatus::New),
        ..LogFilter::default()
    });
    assert_eq!(open_engineering.len(), 1);
    assert_eq!(open_engineering[0].room, "2");

    let room_one = log.filter(&LogFilter {
        room: Some("1".to_string()),
        ..LogFilter::default()
    });
    assert_eq!(room_one.len(), 1);

    assert_eq!(log.filter(&LogFilter::default()).len(), 3);
}

#[test]
fn filter_unresolved_and_escalations() {
    let mut log = ServiceLog::new();
    log.append(entry("recognised"));
    log.append(NewEntry {
        unresolved: true,
        escalated: true,
        sentiment: Sentiment::Negative,
        department: Department::General,
        ..entry("this is unacceptable")
    });

    let unresolved = log.filter(&LogFilter {
        unresolved: Some(true),
        ..LogFilter::default()
    });
    assert_eq!(unresolved.len(), 1);
    assert_eq!(log.escalations().count(), 1);
}

#[test]
fn heatmap_groups_by_room() {
    let mut log = ServiceLog::new();
    log.append(entry_in("12", Sentiment::Negative, Department::General));
    log.append(entry_in("5", Sentiment::Positive, Department::General));
    log.append(entry_in("12", Sentiment::Neutral, Department::General));
    log.append(entry_in("unknown", Sentiment::Neutral, Department::General));
    log.append(entry_in("12", Sentiment::Negative, Department::Engineering));

    assert_eq!(
        log.sentiment_heatmap(),
        vec![
            HeatmapRow {
                room: "5".to_string(),
                positive: 1,
                neutral: 0,
                negative: 0,
            },
            HeatmapRow {
                room: "12".to_string(),
                positive: 0,
                neutral: 1,
                negative: 2,
            },
            HeatmapRow {
                room: "unknown".to_string(),
                positive: 0,
                neutral: 1,
                negative: 0,
            },
        ]
    );
}

#[test]
fn entry_serializes_camel_case() {
    let mut log = ServiceLog::new();
    let stored = log.append(entry("towels")).cloned().unwrap();
    let json = serde_json::to_value(&stored).unwrap();
    assert_eq!(json["ticketId"], "HSK-101500");
    assert_eq!(json["department"], "Housekeeping");
    assert_eq!(json["status"], "New");
    assert_eq!(json["seq"], 1);
}
