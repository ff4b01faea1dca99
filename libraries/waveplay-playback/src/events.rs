//! Player notifications
//!
//! The player is the only producer. Consumers (a renderer, the session
//! persistence hook) register callbacks per notification kind or for all of
//! them.

use crate::error::PlayerError;
use crate::strategy::StrategyKind;
use crate::types::Track;
use serde::Serialize;

/// Notifications emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// Current track changed
    TrackChanged {
        /// The new current track
        track: Track,
    },

    /// Media element started or stopped playing
    #[serde(rename_all = "camelCase")]
    PlayStateChanged { is_playing: bool },

    /// Periodic position update while playing
    #[serde(rename_all = "camelCase")]
    TimeUpdate { current_time: f64, duration: f64 },

    /// Real duration became known for a track
    #[serde(rename_all = "camelCase")]
    DurationChanged { track_id: String, duration: f64 },

    /// Volume level or mute flag changed
    #[serde(rename_all = "camelCase")]
    VolumeChanged { volume: f64, is_muted: bool },

    /// Active strategy replaced
    StrategyChanged { strategy: StrategyKind },

    /// Load of a track started
    #[serde(rename_all = "camelCase")]
    LoadStart { track_id: String },

    /// Track loaded and playable
    #[serde(rename_all = "camelCase")]
    ReadyToPlay { track_id: String },

    /// Load or playback failed
    Error { error: PlayerError },

    /// Platform blocked playback until the user interacts
    #[serde(rename_all = "camelCase")]
    UserInteractionRequired { track_id: String },
}

impl PlayerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PlayerEvent::TrackChanged { .. } => EventKind::TrackChange,
            PlayerEvent::PlayStateChanged { .. } => EventKind::PlayStateChange,
            PlayerEvent::TimeUpdate { .. } => EventKind::TimeUpdate,
            PlayerEvent::DurationChanged { .. } => EventKind::DurationChange,
            PlayerEvent::VolumeChanged { .. } => EventKind::VolumeChange,
            PlayerEvent::StrategyChanged { .. } => EventKind::StrategyChange,
            PlayerEvent::LoadStart { .. } => EventKind::LoadStart,
            PlayerEvent::ReadyToPlay { .. } => EventKind::ReadyToPlay,
            PlayerEvent::Error { .. } => EventKind::Error,
            PlayerEvent::UserInteractionRequired { .. } => EventKind::UserInteractionRequired,
        }
    }
}

/// Notification kinds, for filtered subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    TrackChange,
    PlayStateChange,
    TimeUpdate,
    DurationChange,
    VolumeChange,
    StrategyChange,
    LoadStart,
    ReadyToPlay,
    Error,
    UserInteractionRequired,
}

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&PlayerEvent) + Send>;

struct Subscriber {
    id: SubscriptionId,
    kind: Option<EventKind>,
    callback: Callback,
}

/// Registered notification callbacks
///
/// Callbacks run synchronously, in subscription order, on the task that
/// drives the player.
#[derive(Default)]
pub struct Subscribers {
    entries: Vec<Subscriber>,
    next_id: u64,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for one kind (`Some`) or for every kind (`None`)
    pub fn subscribe<F>(&mut self, kind: Option<EventKind>, callback: F) -> SubscriptionId
    where
        F: FnMut(&PlayerEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push(Subscriber {
            id,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Returns `false` if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: &PlayerEvent) {
        let kind = event.kind();
        for entry in &mut self.entries {
            if entry.kind.is_none() || entry.kind == Some(kind) {
                (entry.callback)(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn filtered_and_catch_all_subscribers() {
        let mut subscribers = Subscribers::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let volume_only = Arc::clone(&seen);
        subscribers.subscribe(Some(EventKind::VolumeChange), move |event| {
            volume_only.lock().unwrap().push(format!("volume:{:?}", event.kind()));
        });
        let everything = Arc::clone(&seen);
        subscribers.subscribe(None, move |event| {
            everything.lock().unwrap().push(format!("all:{:?}", event.kind()));
        });

        subscribers.emit(&PlayerEvent::VolumeChanged {
            volume: 0.5,
            is_muted: false,
        });
        subscribers.emit(&PlayerEvent::PlayStateChanged { is_playing: true });

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "volume:VolumeChange".to_string(),
                "all:VolumeChange".to_string(),
                "all:PlayStateChange".to_string(),
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut subscribers = Subscribers::new();
        let count = Arc::new(Mutex::new(0));

        let counter = Arc::clone(&count);
        let id = subscribers.subscribe(None, move |_| *counter.lock().unwrap() += 1);

        subscribers.emit(&PlayerEvent::PlayStateChanged { is_playing: true });
        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        subscribers.emit(&PlayerEvent::PlayStateChanged { is_playing: false });

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(subscribers.is_empty());
    }

    #[test]
    fn events_serialize_for_renderers() {
        let event = PlayerEvent::VolumeChanged {
            volume: 0.25,
            is_muted: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "volumeChanged");
        assert_eq!(json["isMuted"], true);

        let event = PlayerEvent::StrategyChanged {
            strategy: StrategyKind::RepeatOne,
        };
        assert_eq!(serde_json::to_value(&event).unwrap()["strategy"], "repeat-one");
    }
}
