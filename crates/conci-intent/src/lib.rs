//! Intent engine for the Conci concierge.
//!
//! Turns a guest transcript into a recognised [`Intent`], the canonical
//! acknowledgment text, a [`Sentiment`](conci_types::Sentiment) label, a
//! department ticket, and an escalation decision.
//!
//! # Pipeline
//!
//! | Stage | Entry point |
//! |-------|-------------|
//! | Classification (+ room-state mutation) | [`Classifier::classify`] |
//! | Sentiment | [`tag_sentiment`] |
//! | Routing | [`route`], [`TicketId`] |
//! | Escalation | [`should_escalate`] |
//!
//! Classification is a total function: every transcript produces a response.
//! A transcript no rule recognises yields [`Intent::Fallback`], which is the
//! only unresolved outcome and the only one that can escalate.
//!
//! ```rust
//! use conci_intent::{should_escalate, tag_sentiment, Classifier};
//! use conci_types::{RoomState, Sentiment};
//!
//! fn main() -> Result<(), conci_intent::IntentError> {
//!     let classifier = Classifier::new()?;
//!     let mut room = RoomState::default();
//!
//!     let transcript = "turn off the lights in room 204";
//!     let result = classifier.classify(transcript, &mut room);
//!     assert_eq!(result.response, "Lights turned off for room 204");
//!     assert!(!room.lights);
//!
//!     let sentiment = tag_sentiment(transcript);
//!     assert_eq!(sentiment, Sentiment::Neutral);
//!     assert!(!should_escalate(sentiment, result.unresolved()));
//!     Ok(())
//! }
//! ```

mod classifier;
mod error;
mod escalation;
mod intent;
mod router;
mod rules;
mod sentiment;

pub use classifier::{Classification, Classifier, UNKNOWN_ROOM};
pub use error::IntentError;
pub use escalation::should_escalate;
pub use intent::Intent;
pub use router::{department_for_response, route, ParseTicketIdError, Ticket, TicketId};
pub use rules::{Rule, RuleAction, RuleTable};
pub use sentiment::{tag_sentiment, NEGATIVE_WORDS, POSITIVE_WORDS};
