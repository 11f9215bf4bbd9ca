//! Per-guest session state and the request pipeline.
//!
//! A [`Session`] owns everything one guest device touches: room state,
//! guest profile, privacy toggles, and the service log. Sessions are
//! isolated from each other; the [`SessionRegistry`] only maps IDs to
//! live sessions.

use chrono::{DateTime, NaiveDateTime, Utc};
use conci_intent::{route, should_escalate, tag_sentiment, Classifier, Intent, UNKNOWN_ROOM};
use conci_observe::{NewEntry, ObserveError, ServiceLog, ServiceLogEntry};
use conci_types::{
    Department, GuestProfile, RoomState, Sentiment, ThermostatRangeError, TvInput,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

/// Transcript phrases that prompt the front end to show the room-service menu.
const MENU_HINT_PHRASES: &[&str] = &["menu", "want to order", "food"];

/// Errors raised while handling a session request.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(Uuid),

    #[error("microphone is disabled for this session")]
    MicrophoneDisabled,

    #[error("transcript is {len} bytes, limit is {max}")]
    TranscriptTooLong { len: usize, max: usize },

    #[error(transparent)]
    Thermostat(#[from] ThermostatRangeError),

    #[error(transparent)]
    Log(#[from] ObserveError),
}

/// Guest privacy toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    /// When off, transcripts are refused.
    pub mic_enabled: bool,
    /// When on, requests are handled on the device only and never logged.
    pub device_only: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            mic_enabled: true,
            device_only: false,
        }
    }
}

/// Partial update to the room, as sent by the manual room controls.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomControls {
    pub lights: Option<bool>,
    pub blinds: Option<bool>,
    pub thermostat: Option<i64>,
    pub tv_input: Option<TvInput>,
}

/// Reservations the guest can make without speaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    Restaurant,
    Spa,
}

impl BookingKind {
    fn command(self) -> &'static str {
        match self {
            Self::Restaurant => "Book Table",
            Self::Spa => "Book Spa",
        }
    }

    fn response(self) -> &'static str {
        match self {
            Self::Restaurant => "Table booked at restaurant",
            Self::Spa => "Spa appointment booked",
        }
    }
}

/// Everything the pipeline produced for one transcript.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOutcome {
    pub session_id: Uuid,
    pub room: String,
    pub intent: Intent,
    pub response: String,
    pub sentiment: Sentiment,
    pub department: Department,
    pub unresolved: bool,
    /// Whether the request warrants a duty-manager alert.
    pub escalate: bool,
    /// Whether the front end should show the room-service menu.
    pub menu_hint: bool,
    pub guest: GuestProfile,
    pub room_state: RoomState,
    /// The stored log entry; `None` for repeats and device-only requests.
    pub entry: Option<ServiceLogEntry>,
}

/// Read-only view of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub room_state: RoomState,
    pub profile: GuestProfile,
    pub privacy: PrivacySettings,
    pub log_length: usize,
    pub created_at: DateTime<Utc>,
}

/// State for one connected guest device.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub room_state: RoomState,
    pub profile: GuestProfile,
    pub privacy: PrivacySettings,
    pub log: ServiceLog,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(profile: GuestProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_state: RoomState::default(),
            profile,
            privacy: PrivacySettings::default(),
            log: ServiceLog::new(),
            created_at: Utc::now(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            room_state: self.room_state,
            profile: self.profile.clone(),
            privacy: self.privacy,
            log_length: self.log.len(),
            created_at: self.created_at,
        }
    }

    /// Runs a transcript through classification, sentiment, routing,
    /// escalation, and the service log.
    ///
    /// A ticket is only issued when the request is actually logged, so
    /// repeats and device-only requests come back without an entry.
    pub fn handle_transcript(
        &mut self,
        classifier: &Classifier,
        transcript: &str,
        now: NaiveDateTime,
    ) -> Result<RequestOutcome, SessionError> {
        if !self.privacy.mic_enabled {
            return Err(SessionError::MicrophoneDisabled);
        }

        let classification = classifier.classify(transcript, &mut self.room_state);
        let sentiment = tag_sentiment(transcript);
        let unresolved = classification.unresolved();
        let escalate = should_escalate(sentiment, unresolved);
        let lowered = transcript.to_lowercase();
        let menu_hint = MENU_HINT_PHRASES.iter().any(|p| lowered.contains(p));

        let entry = if self.privacy.device_only {
            tracing::debug!(session_id = %self.id, "device-only mode, request not logged");
            None
        } else if self.log.is_repeat(transcript) {
            tracing::debug!(session_id = %self.id, "repeated transcript, request not logged");
            None
        } else {
            let ticket = route(&classification.intent, now.time());
            self.log
                .append(NewEntry {
                    time: now.format("%I:%M:%S %p").to_string(),
                    room: classification.room.clone(),
                    command: transcript.to_string(),
                    response: classification.response.clone(),
                    guest: self.profile.name.clone(),
                    sentiment,
                    unresolved,
                    escalated: escalate,
                    department: ticket.department,
                    ticket_id: ticket.ticket_id.to_string(),
                })
                .cloned()
        };

        Ok(RequestOutcome {
            session_id: self.id,
            department: classification.department(),
            room: classification.room,
            intent: classification.intent,
            response: classification.response,
            sentiment,
            unresolved,
            escalate,
            menu_hint,
            guest: self.profile.clone(),
            room_state: self.room_state,
            entry,
        })
    }

    /// Records a restaurant or spa booking straight into the log.
    pub fn book(&mut self, kind: BookingKind, now: NaiveDateTime) -> ServiceLogEntry {
        let department = Department::FoodAndBeverage;
        self.log
            .append_untracked(NewEntry {
                time: now.format("%I:%M:%S %p").to_string(),
                room: UNKNOWN_ROOM.to_string(),
                command: kind.command().to_string(),
                response: kind.response().to_string(),
                guest: self.profile.name.clone(),
                sentiment: Sentiment::Neutral,
                unresolved: false,
                escalated: false,
                department,
                ticket_id: conci_intent::TicketId::new(department, now.time()).to_string(),
            })
            .clone()
    }

    /// Applies manual room controls; nothing changes if any field is invalid.
    pub fn apply_controls(&mut self, controls: &RoomControls) -> Result<RoomState, SessionError> {
        let thermostat = controls
            .thermostat
            .map(RoomState::check_thermostat)
            .transpose()?;

        let state = &mut self.room_state;
        if let Some(lights) = controls.lights {
            state.lights = lights;
        }
        if let Some(blinds) = controls.blinds {
            state.blinds = blinds;
        }
        if let Some(celsius) = thermostat {
            state.thermostat = celsius;
        }
        if let Some(input) = controls.tv_input {
            state.tv_input = input;
        }
        Ok(*state)
    }
}

/// Live sessions keyed by ID.
///
/// Uses `std::sync` locks: every acquisition is a short map or session
/// operation that never spans an `.await`.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a session, returning its snapshot.
    pub fn create(&self, profile: GuestProfile) -> SessionSnapshot {
        let session = Session::new(profile);
        let snapshot = session.snapshot();
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(session.id, Arc::new(Mutex::new(session)));
        tracing::info!(session_id = %snapshot.session_id, "session created");
        snapshot
    }

    pub fn get(&self, id: Uuid) -> Result<Arc<Mutex<Session>>, SessionError> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Runs `f` with exclusive access to the session.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let session = self.get(id)?;
        let mut guard = session.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// Destroys a session. Returns `false` if it was already gone.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some();
        if removed {
            tracing::info!(session_id = %id, "session destroyed");
        }
        removed
    }

    pub fn ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self
            .sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .copied()
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
