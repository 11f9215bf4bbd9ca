//! Error types for the service log.

/// Errors that can occur during service log operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObserveError {
    /// No entry carries the requested sequence number.
    #[error("service log entry {0} not found")]
    EntryNotFound(u64),
}
