//! Keyword sentiment tagging.

use conci_types::Sentiment;

/// Phrases that mark a transcript as negative. Checked first.
pub const NEGATIVE_WORDS: &[&str] = &[
    "angry",
    "upset",
    "bad",
    "terrible",
    "not happy",
    "disappointed",
    "unacceptable",
    "horrible",
    "worst",
    "complaint",
];

/// Phrases that mark a transcript as positive.
pub const POSITIVE_WORDS: &[&str] = &[
    "thank you",
    "great",
    "awesome",
    "good",
    "happy",
    "excellent",
    "love",
    "perfect",
    "amazing",
    "thankyou",
];

/// Labels a transcript by substring match against the keyword sets.
///
/// Negative wins when both sets match, so "not happy" is negative even
/// though it contains "happy".
pub fn tag_sentiment(transcript: &str) -> Sentiment {
    let text = transcript.to_lowercase();
    if NEGATIVE_WORDS.iter().any(|w| text.contains(w)) {
        Sentiment::Negative
    } else if POSITIVE_WORDS.iter().any(|w| text.contains(w)) {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}
