//! Recognised guest intents and their canonical responses.

use conci_types::{Department, RoomState, TvInput};
use serde::{Deserialize, Serialize};

/// A recognised guest request.
///
/// Control intents (`Lights`, `Blinds`, `Thermostat`, `TvInput`) carry the
/// room-state change they imply. Service intents map to a fixed response
/// template. `Fallback` marks a transcript no rule recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Lights { on: bool },
    Blinds { open: bool },
    /// Thermostat set to the applied (already clamped) setpoint.
    Thermostat { celsius: u8 },
    /// A temperature request without a usable number; staff follow up.
    ThermostatDeferred,
    TvInput { input: TvInput },
    Towels,
    Toothbrush,
    Menu,
    Water,
    Luggage,
    Maintenance,
    Food,
    Emergency,
    Fallback,
}

impl Intent {
    /// Short machine label, used in logs and on the staff feed.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lights { .. } => "lights",
            Self::Blinds { .. } => "blinds",
            Self::Thermostat { .. } => "thermostat",
            Self::ThermostatDeferred => "thermostat_deferred",
            Self::TvInput { .. } => "tv_input",
            Self::Towels => "towels",
            Self::Toothbrush => "toothbrush",
            Self::Menu => "menu",
            Self::Water => "water",
            Self::Luggage => "luggage",
            Self::Maintenance => "maintenance",
            Self::Food => "food",
            Self::Emergency => "emergency",
            Self::Fallback => "fallback",
        }
    }

    /// Whether no rule recognised the request.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Fallback)
    }

    /// Department responsible for following up on this intent.
    pub fn department(&self) -> Department {
        match self {
            Self::Towels | Self::Toothbrush | Self::Water | Self::Luggage => {
                Department::Housekeeping
            }
            Self::Menu | Self::Food => Department::FoodAndBeverage,
            Self::Emergency => Department::Emergency,
            Self::Maintenance => Department::Engineering,
            Self::Lights { .. }
            | Self::Blinds { .. }
            | Self::Thermostat { .. }
            | Self::ThermostatDeferred
            | Self::TvInput { .. }
            | Self::Fallback => Department::General,
        }
    }

    /// Renders the acknowledgment spoken back to the guest.
    pub fn response(&self, room: &str) -> String {
        match self {
            Self::Lights { on: false } => format!("Lights turned off for room {room}"),
            Self::Lights { on: true } => format!("Lights turned on for room {room}"),
            Self::Blinds { open: true } => format!("Blinds opened for room {room}"),
            Self::Blinds { open: false } => format!("Blinds closed for room {room}"),
            Self::Thermostat { celsius } => {
                format!("Thermostat set to {celsius}°C for room {room}")
            }
            Self::ThermostatDeferred => {
                format!("Thermostat adjustment will be done shortly for room {room}")
            }
            Self::TvInput { input } => format!("TV input set to {input} for room {room}"),
            Self::Towels => format!("Requesting fresh towels to room {room}"),
            Self::Toothbrush => format!("Delivering toothbrush to room {room}"),
            Self::Menu => format!("Showing today's menu for room {room}"),
            Self::Water => format!("Delivering water bottles to room {room}"),
            Self::Luggage => format!("Luggage pickup requested from room {room}"),
            Self::Maintenance => format!("Engineering work requested from room {room}"),
            Self::Food => format!("Sending food to room {room}"),
            Self::Emergency => format!("Emergency alert triggered for room {room}"),
            Self::Fallback => format!("Your request is being addressed for room {room}"),
        }
    }

    /// Applies the room-state change carried by a control intent.
    ///
    /// Service intents leave the room untouched.
    pub fn apply(&self, state: &mut RoomState) {
        match *self {
            Self::Lights { on } => state.lights = on,
            Self::Blinds { open } => state.blinds = open,
            Self::Thermostat { celsius } => state.thermostat = celsius,
            Self::TvInput { input } => state.tv_input = input,
            _ => {}
        }
    }
}
