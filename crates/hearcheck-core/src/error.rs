//! Error types for catalogs, tone players, and sessions.
//!
//! `PlayerError` lives here rather than in `hearcheck-players` so the
//! scheduler can surface acquisition failures from `start()` without
//! depending on any concrete player.

use thiserror::Error;

/// Errors raised while building or validating a frequency catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog has no tones.
    #[error("catalog is empty")]
    Empty,

    /// A tone has a zero frequency.
    #[error("tone at index {index} has an invalid frequency of 0 Hz")]
    InvalidFrequency { index: usize },

    /// Two tones share the same frequency.
    #[error("duplicate frequency {0} Hz")]
    DuplicateFrequency(u32),

    /// Tones are not listed lowest-first.
    #[error("frequencies must be ascending: {previous} Hz is followed by {next} Hz")]
    Unordered { previous: u32, next: u32 },
}

/// Errors that can occur when a tone player acquires its output.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// No output device could be opened.
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The output stream could not be built or started.
    #[error("audio stream failed: {0}")]
    StreamFailed(String),
}

/// Errors returned by a running hearing test session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The tone player could not be prepared for a new round.
    #[error("failed to start round: {0}")]
    Player(#[from] PlayerError),

    /// The session task has shut down.
    #[error("session is closed")]
    Closed,
}
