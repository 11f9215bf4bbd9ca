//! Staff escalation policy.

use conci_types::Sentiment;

/// Whether a request warrants an immediate alert to the duty manager.
///
/// Fires only when a negative guest is left on the fallback path. A
/// negative guest whose request was recognised (a repair, an emergency)
/// is already routed to a department and does not escalate.
pub fn should_escalate(sentiment: Sentiment, unresolved: bool) -> bool {
    sentiment == Sentiment::Negative && unresolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tag_sentiment, Classifier};
    use conci_types::RoomState;

    #[test]
    fn truth_table() {
        assert!(should_escalate(Sentiment::Negative, true));
        assert!(!should_escalate(Sentiment::Negative, false));
        assert!(!should_escalate(Sentiment::Neutral, true));
        assert!(!should_escalate(Sentiment::Positive, true));
    }

    #[test]
    fn recognised_complaint_does_not_escalate() {
        let classifier = Classifier::new().unwrap();
        let text = "my shower is not working and I am extremely disappointed";
        let result = classifier.classify(text, &mut RoomState::default());
        assert!(!should_escalate(tag_sentiment(text), result.unresolved()));
    }

    #[test]
    fn fire_does_not_escalate() {
        let classifier = Classifier::new().unwrap();
        let text = "there is a fire in room 12";
        let result = classifier.classify(text, &mut RoomState::default());
        assert!(!should_escalate(tag_sentiment(text), result.unresolved()));
    }

    #[test]
    fn unrecognised_complaint_escalates() {
        let classifier = Classifier::new().unwrap();
        let text = "this is unacceptable, room 410";
        let result = classifier.classify(text, &mut RoomState::default());
        assert!(result.unresolved());
        assert!(should_escalate(tag_sentiment(text), result.unresolved()));
    }
}
