//! Error types for building the intent engine.

/// Errors raised while assembling a classifier.
///
/// Classifying a transcript never fails; these only surface when a custom
/// rule table or pattern is rejected.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    /// A pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A rule was declared without any phrase to match.
    #[error("rule '{0}' has no phrases")]
    EmptyRule(String),

    /// A rule contained an empty phrase, which would match every transcript.
    #[error("rule '{0}' contains an empty phrase")]
    EmptyPhrase(String),

    /// Two rules share a name.
    #[error("duplicate rule name: {0}")]
    DuplicateRule(String),

    /// An insertion referenced a rule that does not exist.
    #[error("no rule named '{0}'")]
    UnknownRule(String),
}
