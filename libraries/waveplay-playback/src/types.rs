//! Core types for playback management

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Track information
///
/// Everything except the duration is fixed at construction. The duration
/// starts at the supplied value (usually 0) and is replaced once the media
/// element reports real metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    id: String,
    title: String,
    artist: String,
    url: String,
    /// Seconds, never negative
    #[serde(default, deserialize_with = "non_negative_seconds")]
    duration: f64,
}

fn non_negative_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_seconds)
}

fn clamp_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}

impl Track {
    /// Create a track with an unknown (zero) duration
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            url: url.into(),
            duration: 0.0,
        }
    }

    /// Set a known duration up front
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.set_duration(seconds);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Duration in seconds (0 until metadata is known)
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Update the duration once metadata is known
    ///
    /// Negative and non-finite values are stored as 0.
    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = clamp_seconds(seconds);
    }
}

/// Media lifecycle state
///
/// ```text
/// idle -> loading -> ready -> playing <-> paused
///            |                   |
///            +------> error <----+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// Nothing loaded yet
    #[default]
    Idle,

    /// Waiting for the media element to become playable
    Loading,

    /// Loaded and playable, not started
    Ready,

    /// Media element reports playback
    Playing,

    /// Media element reports pause
    Paused,

    /// Last load or playback attempt failed
    Error,
}

/// Configuration for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// How long a load may take before it fails (default: 10s)
    pub load_timeout: Duration,

    /// Maximum shuffle history depth (default: 50)
    pub shuffle_history_size: usize,

    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_secs(10),
            shuffle_history_size: 50,
            volume: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.load_timeout, Duration::from_secs(10));
        assert_eq!(config.shuffle_history_size, 50);
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn duration_is_never_negative() {
        let mut track = Track::new("1", "Song", "Artist", "/media/1.mp3");
        assert_eq!(track.duration(), 0.0);

        track.set_duration(212.5);
        assert_eq!(track.duration(), 212.5);

        track.set_duration(-3.0);
        assert_eq!(track.duration(), 0.0);

        track.set_duration(f64::NAN);
        assert_eq!(track.duration(), 0.0);
    }

    #[test]
    fn track_serializes_with_duration() {
        let track = Track::new("1", "Song", "Artist", "/media/1.mp3").with_duration(90.0);
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["duration"], 90.0);

        let back: Track = serde_json::from_str(
            r#"{"id":"2","title":"T","artist":"A","url":"/media/2.mp3"}"#,
        )
        .unwrap();
        assert_eq!(back.duration(), 0.0);
    }

    #[test]
    fn deserialized_duration_is_never_negative() {
        let track: Track = serde_json::from_str(
            r#"{"id":"3","title":"T","artist":"A","url":"/media/3.mp3","duration":-5}"#,
        )
        .unwrap();
        assert_eq!(track.duration(), 0.0);
    }

    #[test]
    fn state_names() {
        assert_eq!(
            serde_json::to_string(&PlayerState::Loading).unwrap(),
            "\"loading\""
        );
        assert_eq!(PlayerState::default(), PlayerState::Idle);
    }
}
