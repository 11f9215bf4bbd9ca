//! Department routing and ticket synthesis.
//!
//! Routing normally reads the department straight off the [`Intent`]. The
//! keyword table in [`department_for_response`] classifies rendered
//! response text instead; it is kept for text that did not come from the
//! classifier (bookings, imported entries) and to check that both paths
//! agree.

use chrono::NaiveTime;
use conci_types::Department;
use serde::{Deserialize, Serialize};

use crate::intent::Intent;

/// Response keywords per department, in routing priority order.
const DEPARTMENT_KEYWORDS: &[(Department, &[&str])] = &[
    (
        Department::Housekeeping,
        &["towel", "toothbrush", "luggage", "water"],
    ),
    (
        Department::FoodAndBeverage,
        &[
            "food",
            "spa",
            "dining",
            "restaurant",
            "cuisine",
            "dessert",
            "menu",
            "order",
        ],
    ),
    (
        Department::Emergency,
        &["emergency", "help", "fire", "glass break", "co2", "smoke"],
    ),
    (
        Department::Engineering,
        &["engineering", "not working", "fix"],
    ),
];

/// Classifies response text by keyword overlap, defaulting to General.
pub fn department_for_response(response: &str) -> Department {
    let text = response.to_lowercase();
    DEPARTMENT_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| text.contains(w)))
        .map(|(dept, _)| *dept)
        .unwrap_or(Department::General)
}

/// A synthesised ticket identifier: department prefix plus `HHMMSS`.
///
/// Identifiers have one-second granularity, so two requests to the same
/// department within a second share an ID. Log sequence numbers are the
/// unique key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(department: Department, at: NaiveTime) -> Self {
        Self(format!(
            "{}-{}",
            department.ticket_prefix(),
            at.format("%H%M%S")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Department encoded in the prefix.
    pub fn department(&self) -> Option<Department> {
        self.0
            .split_once('-')
            .and_then(|(prefix, _)| Department::from_ticket_prefix(prefix))
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a string is not a well-formed ticket ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed ticket id: {0}")]
pub struct ParseTicketIdError(pub String);

impl std::str::FromStr for TicketId {
    type Err = ParseTicketIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, stamp) = s
            .split_once('-')
            .ok_or_else(|| ParseTicketIdError(s.to_string()))?;
        if Department::from_ticket_prefix(prefix).is_none()
            || NaiveTime::parse_from_str(stamp, "%H%M%S").is_err()
        {
            return Err(ParseTicketIdError(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

/// A department assignment and its ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub department: Department,
    pub ticket_id: TicketId,
}

/// Routes a recognised intent to its department and issues a ticket.
pub fn route(intent: &Intent, at: NaiveTime) -> Ticket {
    let department = intent.department();
    Ticket {
        department,
        ticket_id: TicketId::new(department, at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conci_types::TvInput;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn ticket_format() {
        let ticket = route(&Intent::Towels, at(9, 5, 7));
        assert_eq!(ticket.department, Department::Housekeeping);
        assert_eq!(ticket.ticket_id.as_str(), "HSK-090507");
        assert_eq!(ticket.ticket_id.department(), Some(Department::Housekeeping));
    }

    #[test]
    fn same_second_collides() {
        let a = route(&Intent::Food, at(12, 0, 0));
        let b = route(&Intent::Menu, at(12, 0, 0));
        assert_eq!(a.ticket_id, b.ticket_id);
    }

    #[test]
    fn parse_ticket_ids() {
        assert!("EMG-235959".parse::<TicketId>().is_ok());
        assert!("EMG-246000".parse::<TicketId>().is_err());
        assert!("XYZ-120000".parse::<TicketId>().is_err());
        assert!("GEN120000".parse::<TicketId>().is_err());
    }

    #[test]
    fn response_keywords() {
        assert_eq!(
            department_for_response("Table booked at restaurant"),
            Department::FoodAndBeverage
        );
        assert_eq!(
            department_for_response("Spa appointment booked"),
            Department::FoodAndBeverage
        );
        assert_eq!(
            department_for_response("Lights turned on for room 2"),
            Department::General
        );
    }

    #[test]
    fn intent_and_text_routing_agree() {
        let intents = [
            Intent::Lights { on: true },
            Intent::Lights { on: false },
            Intent::Blinds { open: true },
            Intent::Blinds { open: false },
            Intent::Thermostat { celsius: 19 },
            Intent::ThermostatDeferred,
            Intent::TvInput {
                input: TvInput::Hdmi1,
            },
            Intent::TvInput {
                input: TvInput::YouTube,
            },
            Intent::Towels,
            Intent::Toothbrush,
            Intent::Menu,
            Intent::Water,
            Intent::Luggage,
            Intent::Maintenance,
            Intent::Food,
            Intent::Emergency,
            Intent::Fallback,
        ];
        for room in ["204", "unknown"] {
            for intent in intents {
                assert_eq!(
                    department_for_response(&intent.response(room)),
                    intent.department(),
                    "intent {intent:?}"
                );
            }
        }
    }
}
