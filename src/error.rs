use thiserror::Error;

use crate::session::settings::Mode;

/// Reasons a [`Settings`](crate::session::settings::Settings) value is refused.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("duration must be at least one second")]
    ZeroDuration,
    #[error("word count must be at least one")]
    ZeroWordCount,
    #[error("unknown mode {0:?} (expected normal, left-hand or right-hand)")]
    InvalidMode(String),
    #[error("unknown test type {0:?} (expected time or words)")]
    InvalidTestType(String),
}

/// Errors emitted by the session engine and the word source.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),
    #[error("settings cannot change while a session is running")]
    SessionActive,
    #[error("word list for {mode} mode is empty")]
    EmptyWordList { mode: Mode },
    /// Never returned to callers; the engine turns it into an ordinary end of session.
    #[error("word sequence exhausted")]
    SequenceExhausted,
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
