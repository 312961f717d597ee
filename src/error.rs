use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurveyError {
    #[error("survey has no title")]
    MissingTitle,

    #[error("malformed decimal pattern {pattern:?}: {reason}")]
    MalformedPattern { pattern: String, reason: String },

    #[error("ballot {ballot:?} has no choice {choice:?}")]
    UnknownChoice { ballot: String, choice: String },

    #[error("user {user:?} already voted on ballot {ballot:?} and votes cannot be changed")]
    VoteLocked { ballot: String, user: String },

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: String, value: String },
}

impl SurveyError {
    pub(crate) fn malformed(pattern: &str, reason: impl Into<String>) -> Self {
        SurveyError::MalformedPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}
