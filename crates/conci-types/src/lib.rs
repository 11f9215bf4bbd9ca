//! Shared types for the Conci concierge service.
//!
//! This crate holds the value types that cross crate boundaries: room device
//! state, the guest profile, sentiment labels, departments, and the staff
//! workflow status of a logged request.
//!
//! Every enum here has a canonical label (used on the wire and in the staff
//! views) with matching `Display` and `FromStr` implementations.

use serde::{Deserialize, Serialize};

mod guest;
mod room;

pub use guest::{GuestProfile, LoyaltyTier};
pub use room::{RoomState, ThermostatRangeError, TvInput, THERMOSTAT_MAX, THERMOSTAT_MIN};

/// Error returned when a label does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseLabelError {
    /// The type being parsed (e.g. `sentiment`, `department`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Sentiment label attached to a guest transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sentiment {
    /// Praise or thanks.
    Positive,
    /// Nothing either way.
    #[default]
    Neutral,
    /// Complaint or frustration.
    Negative,
}

impl Sentiment {
    /// Returns the canonical label for this sentiment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sentiment {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(Self::Positive),
            "Neutral" => Ok(Self::Neutral),
            "Negative" => Ok(Self::Negative),
            _ => Err(ParseLabelError::new("sentiment", s)),
        }
    }
}

/// Hotel department a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    /// Towels, amenities, luggage, water.
    Housekeeping,
    /// Food and beverage, including dining and spa bookings.
    #[serde(rename = "F&B")]
    FoodAndBeverage,
    /// Safety incidents.
    Emergency,
    /// Repairs and broken equipment.
    Engineering,
    /// Everything else, including in-room device control.
    General,
}

impl Department {
    /// All departments in routing priority order.
    pub const ALL: [Department; 5] = [
        Self::Housekeeping,
        Self::FoodAndBeverage,
        Self::Emergency,
        Self::Engineering,
        Self::General,
    ];

    /// Returns the canonical label for this department.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Housekeeping => "Housekeeping",
            Self::FoodAndBeverage => "F&B",
            Self::Emergency => "Emergency",
            Self::Engineering => "Engineering",
            Self::General => "General",
        }
    }

    /// Returns the three-letter ticket prefix for this department.
    pub fn ticket_prefix(self) -> &'static str {
        match self {
            Self::Housekeeping => "HSK",
            Self::FoodAndBeverage => "FNB",
            Self::Emergency => "EMG",
            Self::Engineering => "ENG",
            Self::General => "GEN",
        }
    }

    /// Resolves a ticket prefix back to its department.
    pub fn from_ticket_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.ticket_prefix() == prefix)
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Department {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseLabelError::new("department", s))
    }
}

/// Staff workflow status of a logged request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Not yet picked up.
    #[default]
    New,
    /// A staff member is working on it.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Completed.
    Done,
}

impl RequestStatus {
    /// Returns the canonical label for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(Self::New),
            "In Progress" => Ok(Self::InProgress),
            "Done" => Ok(Self::Done),
            _ => Err(ParseLabelError::new("status", s)),
        }
    }
}
