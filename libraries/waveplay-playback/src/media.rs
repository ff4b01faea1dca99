//! Platform-agnostic media element
//!
//! Abstracts the platform's media playback element (browser `<audio>`, a
//! native decoder, a test double). Commands go through [`MediaElement`];
//! lifecycle notifications come back as [`MediaSignal`]s on a channel the
//! [`Player`](crate::Player) owns.

use crate::error::PlayRejection;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Token identifying one load attempt
///
/// Load-related signals echo the token of the load they belong to, so the
/// player can discard signals from loads it has already given up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoadRequestId(u64);

impl LoadRequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// The token following this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Lifecycle signal reported by a media element
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSignal {
    /// Element started fetching the source for `request`
    LoadStart { request: LoadRequestId },

    /// Duration is known (seconds)
    LoadedMetadata {
        request: LoadRequestId,
        duration: f64,
    },

    /// Enough data is buffered to start playback
    CanPlay { request: LoadRequestId },

    /// Element failed
    ///
    /// `request` is `None` for errors not tied to a specific load, such as a
    /// decode failure in the middle of playback.
    Error {
        request: Option<LoadRequestId>,
        message: String,
    },

    /// Periodic position report while playing
    TimeUpdate { current_time: f64, duration: f64 },

    /// Element started playing
    Play,

    /// Element paused
    Pause,

    /// Playback reached the end of the source
    Ended,
}

impl MediaSignal {
    /// Load token carried by this signal, if any
    pub fn request(&self) -> Option<LoadRequestId> {
        match self {
            MediaSignal::LoadStart { request }
            | MediaSignal::LoadedMetadata { request, .. }
            | MediaSignal::CanPlay { request } => Some(*request),
            MediaSignal::Error { request, .. } => *request,
            MediaSignal::TimeUpdate { .. }
            | MediaSignal::Play
            | MediaSignal::Pause
            | MediaSignal::Ended => None,
        }
    }
}

/// Platform media element
///
/// Implementors report lifecycle changes by sending [`MediaSignal`]s on the
/// channel whose receiver was handed to the player. `load` must not block:
/// completion is reported with `CanPlay` or `Error` carrying the same
/// `request` token.
#[async_trait]
pub trait MediaElement: Send {
    /// URL of the currently loaded source
    fn src(&self) -> Option<&str>;

    /// Replace the source and start loading it
    fn load(&mut self, url: &str, request: LoadRequestId);

    /// Start playback
    ///
    /// Resolves once the platform accepted or rejected the request.
    async fn play(&mut self) -> Result<(), PlayRejection>;

    /// Request a pause
    fn pause(&mut self);

    /// Move the playback position, in seconds
    fn set_current_time(&mut self, seconds: f64);

    /// Source duration in seconds, `None` while unknown
    fn duration(&self) -> Option<f64>;

    fn set_volume(&mut self, level: f64);

    fn set_muted(&mut self, muted: bool);
}
