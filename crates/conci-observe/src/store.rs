//! In-memory service log with immediate-repeat suppression.
//!
//! Writes go through [`ServiceLog::append`], which compares the command
//! against the last tracked transcript only. Bookings and other entries
//! that do not originate from a transcript use
//! [`ServiceLog::append_untracked`].

use std::collections::BTreeMap;

use conci_types::{Department, RequestStatus, Sentiment};
use serde::Serialize;

use crate::entry::{NewEntry, ServiceLogEntry};
use crate::error::ObserveError;

/// Ordered, append-only log of service requests for one session.
#[derive(Debug, Clone, Default)]
pub struct ServiceLog {
    entries: Vec<ServiceLogEntry>,
    last_command: Option<String>,
}

impl ServiceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `command` repeats the most recently tracked transcript.
    pub fn is_repeat(&self, command: &str) -> bool {
        self.last_command.as_deref() == Some(command)
    }

    /// Appends a transcript-driven entry unless it repeats the previous one.
    ///
    /// Returns the stored entry, or `None` when the append was suppressed.
    pub fn append(&mut self, entry: NewEntry) -> Option<&ServiceLogEntry> {
        if self.is_repeat(&entry.command) {
            tracing::debug!(command = %entry.command, "suppressed repeated command");
            return None;
        }
        self.last_command = Some(entry.command.clone());
        Some(self.push(entry))
    }

    /// Appends an entry without repeat suppression or tracking.
    pub fn append_untracked(&mut self, entry: NewEntry) -> &ServiceLogEntry {
        self.push(entry)
    }

    fn push(&mut self, entry: NewEntry) -> &ServiceLogEntry {
        let seq = self.entries.len() as u64 + 1;
        self.entries.push(ServiceLogEntry::from_new(seq, entry));
        &self.entries[self.entries.len() - 1]
    }

    /// The most recently tracked transcript.
    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    pub fn entries(&self) -> &[ServiceLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, seq: u64) -> Option<&ServiceLogEntry> {
        let idx = usize::try_from(seq).ok()?.checked_sub(1)?;
        self.entries.get(idx)
    }

    /// Moves an entry to a new workflow status.
    ///
    /// # Errors
    ///
    /// Returns `ObserveError::EntryNotFound` for an unknown sequence number.
    pub fn set_status(
        &mut self,
        seq: u64,
        status: RequestStatus,
    ) -> Result<&ServiceLogEntry, ObserveError> {
        let entry = usize::try_from(seq)
            .ok()
            .and_then(|s| s.checked_sub(1))
            .and_then(|idx| self.entries.get_mut(idx))
            .ok_or(ObserveError::EntryNotFound(seq))?;
        if entry.status != status {
            tracing::info!(
                seq,
                ticket_id = %entry.ticket_id,
                from = %entry.status,
                to = %status,
                "service request status changed"
            );
            entry.status = status;
        }
        Ok(&*entry)
    }

    /// Entries matching every set field of `filter`, in log order.
    pub fn filter(&self, filter: &LogFilter) -> Vec<&ServiceLogEntry> {
        self.entries.iter().filter(|e| filter.matches(e)).collect()
    }

    /// Entries that raised a duty-manager alert.
    pub fn escalations(&self) -> impl Iterator<Item = &ServiceLogEntry> {
        self.entries.iter().filter(|e| e.escalated)
    }

    /// Sentiment counts per room.
    ///
    /// Numeric rooms come first in numeric order, then any others
    /// (such as `unknown`) alphabetically.
    pub fn sentiment_heatmap(&self) -> Vec<HeatmapRow> {
        let mut rows: BTreeMap<(u64, String), HeatmapRow> = BTreeMap::new();
        for entry in &self.entries {
            let key = (entry.room.parse::<u64>().unwrap_or(u64::MAX), entry.room.clone());
            let row = rows.entry(key).or_insert_with(|| HeatmapRow {
                room: entry.room.clone(),
                positive: 0,
                neutral: 0,
                negative: 0,
            });
            match entry.sentiment {
                Sentiment::Positive => row.positive += 1,
                Sentiment::Neutral => row.neutral += 1,
                Sentiment::Negative => row.negative += 1,
            }
        }
        rows.into_values().collect()
    }
}

/// Filter criteria for the staff view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub department: Option<Department>,
    pub status: Option<RequestStatus>,
    pub room: Option<String>,
    pub unresolved: Option<bool>,
}

impl LogFilter {
    fn matches(&self, entry: &ServiceLogEntry) -> bool {
        self.department.map_or(true, |d| entry.department == d)
            && self.status.map_or(true, |s| entry.status == s)
            && self.room.as_deref().map_or(true, |r| entry.room == r)
            && self.unresolved.map_or(true, |u| entry.unresolved == u)
    }
}

/// One row of the per-room sentiment heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapRow {
    pub room: String,
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}
