//! Error types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Playback errors
///
/// Every error returned by a [`Player`](crate::Player) operation has already
/// been emitted as a notification by the time the caller sees it.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum PlayerError {
    /// Track could not be made playable
    #[error("Failed to load track {track_id}: {failure}")]
    LoadFailed {
        track_id: String,
        failure: LoadFailure,
    },

    /// Platform refused to start playback without a user gesture
    #[error("Playback of {track_id} requires user interaction")]
    UserInteractionRequired { track_id: String },

    /// Any other playback failure reported by the media element
    #[error("Playback error: {message}")]
    Playback { message: String },
}

/// Why a load did not reach the playable state
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum LoadFailure {
    /// No playable signal within the load timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Media element reported an error
    #[error("media error: {0}")]
    Media(String),

    /// Media element's signal channel closed
    #[error("media element detached")]
    Detached,
}

/// Rejection of the platform play call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayRejection {
    /// Autonomous playback blocked until the user interacts with the page
    #[error("play() not allowed without user interaction")]
    NotAllowed,

    /// Any other rejection reason
    #[error("play() failed: {0}")]
    Failed(String),
}

/// Unrecognized strategy name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown playback strategy: {0}")]
pub struct UnknownStrategy(pub String);

/// Persistence write errors
///
/// Reads never fail; see [`load_state`](crate::persistence::load_state).
#[derive(Debug, Error)]
pub enum PersistError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
