//! Transcript classification.

use conci_types::{Department, RoomState};
use regex::Regex;
use serde::Serialize;

use crate::error::IntentError;
use crate::intent::Intent;
use crate::rules::{RuleAction, RuleTable};

/// Room label used when the transcript names no room.
pub const UNKNOWN_ROOM: &str = "unknown";

/// Outcome of classifying one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Room number as spoken, or [`UNKNOWN_ROOM`].
    pub room: String,
    pub intent: Intent,
    /// Canonical acknowledgment text.
    pub response: String,
}

impl Classification {
    /// Whether the fallback path was taken.
    pub fn unresolved(&self) -> bool {
        self.intent.is_unresolved()
    }

    pub fn department(&self) -> Department {
        self.intent.department()
    }
}

/// Maps transcripts to intents using an ordered [`RuleTable`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleTable,
    room_pattern: Regex,
    setpoint_pattern: Regex,
}

impl Classifier {
    /// Builds a classifier over the standard rule table.
    pub fn new() -> Result<Self, IntentError> {
        Self::with_rules(RuleTable::standard())
    }

    /// Builds a classifier over a custom rule table.
    pub fn with_rules(rules: RuleTable) -> Result<Self, IntentError> {
        Ok(Self {
            rules,
            room_pattern: Regex::new(r"room\s*(\d+)")?,
            setpoint_pattern: Regex::new(r"set thermostat to (\d+)")?,
        })
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Extracts the room number from a lowercased transcript.
    pub fn extract_room(&self, transcript: &str) -> String {
        self.room_pattern
            .captures(transcript)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_ROOM.to_string())
    }

    /// Classifies a transcript, applying any control intent to `room_state`.
    ///
    /// Never fails: a transcript no rule recognises yields
    /// [`Intent::Fallback`].
    pub fn classify(&self, transcript: &str, room_state: &mut RoomState) -> Classification {
        let text = transcript.to_lowercase();
        let room = self.extract_room(&text);

        let intent = match self.rules.first_match(&text) {
            Some(rule) => {
                tracing::debug!(rule = %rule.name, room = %room, "transcript matched rule");
                match rule.action {
                    RuleAction::Emit(intent) => intent,
                    RuleAction::Thermostat => self.thermostat_intent(&text, room_state),
                }
            }
            None => {
                tracing::debug!(room = %room, "transcript matched no rule");
                Intent::Fallback
            }
        };

        intent.apply(room_state);
        let response = intent.response(&room);

        Classification {
            room,
            intent,
            response,
        }
    }

    fn thermostat_intent(&self, text: &str, room_state: &mut RoomState) -> Intent {
        let Some(digits) = self
            .setpoint_pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
        else {
            return Intent::ThermostatDeferred;
        };
        // Digits only, so the parse can only fail on overflow.
        let requested = digits.as_str().parse::<u32>().unwrap_or(u32::MAX);
        let celsius = room_state.set_thermostat_clamped(requested);
        if u32::from(celsius) != requested {
            tracing::debug!(requested, applied = celsius, "thermostat request clamped");
        }
        Intent::Thermostat { celsius }
    }
}
