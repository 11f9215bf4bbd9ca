//! Service log record types.

use conci_types::{Department, RequestStatus, Sentiment};
use serde::{Deserialize, Serialize};

/// A request ready to be logged, before the log assigns its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Wall-clock time, formatted for staff (e.g. `02:15:09 PM`).
    pub time: String,
    /// Room number, or `unknown`.
    pub room: String,
    /// Raw transcript (or booking label).
    pub command: String,
    /// Acknowledgment given to the guest.
    pub response: String,
    /// Guest name at the time of the request.
    pub guest: String,
    pub sentiment: Sentiment,
    /// Whether the request fell through to the fallback response.
    pub unresolved: bool,
    /// Whether the request raised a duty-manager alert.
    pub escalated: bool,
    pub department: Department,
    pub ticket_id: String,
}

/// A single row of the service log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLogEntry {
    /// 1-based position in the log; unique within a session.
    pub seq: u64,
    pub time: String,
    pub room: String,
    pub command: String,
    pub response: String,
    pub guest: String,
    pub sentiment: Sentiment,
    pub unresolved: bool,
    pub escalated: bool,
    pub department: Department,
    pub ticket_id: String,
    /// Staff workflow status; the only field that changes after append.
    pub status: RequestStatus,
}

impl ServiceLogEntry {
    pub(crate) fn from_new(seq: u64, entry: NewEntry) -> Self {
        Self {
            seq,
            time: entry.time,
            room: entry.room,
            command: entry.command,
            response: entry.response,
            guest: entry.guest,
            sentiment: entry.sentiment,
            unresolved: entry.unresolved,
            escalated: entry.escalated,
            department: entry.department,
            ticket_id: entry.ticket_id,
            status: RequestStatus::New,
        }
    }
}
