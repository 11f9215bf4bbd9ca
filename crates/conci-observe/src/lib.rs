//! Service log for the Conci concierge.
//!
//! Every guest request that reaches staff is recorded here as an enriched
//! [`ServiceLogEntry`]: the raw transcript, the acknowledgment, sentiment,
//! department, ticket, and a workflow status staff can advance.
//!
//! The log is append-only from the guest side. An entry whose command
//! repeats the immediately preceding transcript is suppressed; the same
//! command after an intervening different one is recorded again. Staff may
//! only change an entry's [`RequestStatus`](conci_types::RequestStatus).
//!
//! All enrichment happens at ingestion. Sentiment and department are never
//! re-derived or backfilled afterwards.
//!
//! # Usage
//!
//! ```rust
//! use conci_observe::{NewEntry, ServiceLog};
//! use conci_types::{Department, Sentiment};
//!
//! let request = NewEntry {
//!     time: "02:15:09 PM".to_string(),
//!     room: "204".to_string(),
//!     command: "bring towels to room 204".to_string(),
//!     response: "Requesting fresh towels to room 204".to_string(),
//!     guest: "Alex".to_string(),
//!     sentiment: Sentiment::Neutral,
//!     unresolved: false,
//!     escalated: false,
//!     department: Department::Housekeeping,
//!     ticket_id: "HSK-141509".to_string(),
//! };
//!
//! let mut log = ServiceLog::new();
//! let seq = log.append(request.clone()).map(|entry| entry.seq);
//! assert_eq!(seq, Some(1));
//! assert!(log.append(request).is_none());
//! assert_eq!(log.len(), 1);
//! ```

mod entry;
mod error;
mod store;

pub use entry::{NewEntry, ServiceLogEntry};
pub use error::ObserveError;
pub use store::{HeatmapRow, LogFilter, ServiceLog};

#[cfg(test)]
mod tests;
