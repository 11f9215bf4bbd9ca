//! In-room device state.

use serde::{Deserialize, Serialize};

use crate::ParseLabelError;

/// Lowest thermostat setpoint the room controller accepts, in °C.
pub const THERMOSTAT_MIN: u8 = 16;
/// Highest thermostat setpoint the room controller accepts, in °C.
pub const THERMOSTAT_MAX: u8 = 30;

/// TV input sources selectable by voice or from the room controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TvInput {
    #[default]
    #[serde(rename = "HDMI1")]
    Hdmi1,
    #[serde(rename = "HDMI2")]
    Hdmi2,
    Netflix,
    YouTube,
}

impl TvInput {
    /// All inputs, in the order voice commands are matched.
    pub const ALL: [TvInput; 4] = [Self::Hdmi1, Self::Hdmi2, Self::Netflix, Self::YouTube];

    /// Returns the display label for this input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hdmi1 => "HDMI1",
            Self::Hdmi2 => "HDMI2",
            Self::Netflix => "Netflix",
            Self::YouTube => "YouTube",
        }
    }

    /// Returns the lowercase form that appears in a normalised transcript.
    pub fn spoken(self) -> &'static str {
        match self {
            Self::Hdmi1 => "hdmi1",
            Self::Hdmi2 => "hdmi2",
            Self::Netflix => "netflix",
            Self::YouTube => "youtube",
        }
    }
}

impl std::fmt::Display for TvInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TvInput {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|input| input.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseLabelError::new("tv input", s))
    }
}

/// Current state of the devices in a guest room.
///
/// One instance lives per session. Recognised control intents mutate it in
/// place; no history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomState {
    /// Whether the lights are on.
    pub lights: bool,
    /// Whether the blinds are open.
    pub blinds: bool,
    /// Thermostat setpoint in °C, within [`THERMOSTAT_MIN`]..=[`THERMOSTAT_MAX`].
    pub thermostat: u8,
    /// Selected TV input.
    pub tv_input: TvInput,
}

impl Default for RoomState {
    fn default() -> Self {
        Self {
            lights: true,
            blinds: false,
            thermostat: 22,
            tv_input: TvInput::Hdmi1,
        }
    }
}

/// Error returned when a thermostat setpoint is outside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("thermostat setpoint {0}°C is outside the 16-30°C range")]
pub struct ThermostatRangeError(pub i64);

impl RoomState {
    /// Sets the thermostat, clamping the request into the supported range.
    ///
    /// Returns the setpoint that was actually applied.
    pub fn set_thermostat_clamped(&mut self, requested: u32) -> u8 {
        let applied = requested.clamp(THERMOSTAT_MIN as u32, THERMOSTAT_MAX as u32) as u8;
        self.thermostat = applied;
        applied
    }

    /// Validates a setpoint coming from the manual room controls.
    pub fn check_thermostat(celsius: i64) -> Result<u8, ThermostatRangeError> {
        if (THERMOSTAT_MIN as i64..=THERMOSTAT_MAX as i64).contains(&celsius) {
            Ok(celsius as u8)
        } else {
            Err(ThermostatRangeError(celsius))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_room_state() {
        let state = RoomState::default();
        assert!(state.lights);
        assert!(!state.blinds);
        assert_eq!(state.thermostat, 22);
        assert_eq!(state.tv_input, TvInput::Hdmi1);
    }

    #[test]
    fn thermostat_is_clamped() {
        let mut state = RoomState::default();
        assert_eq!(state.set_thermostat_clamped(19), 19);
        assert_eq!(state.thermostat, 19);
        assert_eq!(state.set_thermostat_clamped(45), THERMOSTAT_MAX);
        assert_eq!(state.set_thermostat_clamped(2), THERMOSTAT_MIN);
        assert_eq!(state.thermostat, THERMOSTAT_MIN);
    }

    #[test]
    fn manual_thermostat_is_validated() {
        assert_eq!(RoomState::check_thermostat(16), Ok(16));
        assert_eq!(RoomState::check_thermostat(30), Ok(30));
        assert_eq!(RoomState::check_thermostat(31), Err(ThermostatRangeError(31)));
        assert_eq!(RoomState::check_thermostat(-4), Err(ThermostatRangeError(-4)));
    }

    #[test]
    fn tv_input_labels() {
        assert_eq!("netflix".parse::<TvInput>(), Ok(TvInput::Netflix));
        assert_eq!(TvInput::YouTube.spoken(), "youtube");
        let json = serde_json::to_string(&TvInput::Hdmi2).unwrap();
        assert_eq!(json, "\"HDMI2\"");
    }

    #[test]
    fn room_state_serializes_camel_case() {
        let json = serde_json::to_value(RoomState::default()).unwrap();
        assert_eq!(json["tvInput"], "HDMI1");
        assert_eq!(json["thermostat"], 22);
    }
}
