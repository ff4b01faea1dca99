//! Waveplay - Playback Core
//!
//! Platform-agnostic audio player core for a browser-style UI.
//!
//! This crate provides:
//! - Playlist with a wrap-around cursor
//! - Track selection strategies (sequential, shuffle, repeat-one)
//! - A [`Player`] driving a platform media element through [`MediaElement`]
//! - Notifications for renderers ([`PlayerEvent`])
//! - Persisted session state (current track and strategy)
//!
//! # Architecture
//!
//! The player never touches a DOM or an audio device. The platform supplies a
//! [`MediaElement`] and reports lifecycle changes as [`MediaSignal`]s on a
//! tokio channel. All player operations take `&mut self` and run on one task;
//! the only suspension points are waiting for the media element and the load
//! timeout.
//!
//! # Example: Strategies
//!
//! ```rust
//! use waveplay_playback::{PlaybackStrategy, Playlist, SequentialStrategy, Track};
//!
//! let mut playlist = Playlist::new(vec![
//!     Track::new("1", "Intro", "Artist", "/media/1.mp3"),
//!     Track::new("2", "Theme", "Artist", "/media/2.mp3"),
//! ]);
//!
//! let mut strategy = SequentialStrategy;
//! assert_eq!(strategy.next_track(&mut playlist).map(Track::id), Some("2"));
//! assert_eq!(strategy.next_track(&mut playlist).map(Track::id), Some("1"));
//! ```
//!
//! # Example: Driving a Player
//!
//! ```rust,no_run
//! use waveplay_playback::{EventKind, MediaElement, Player, PlayerConfig, Playlist, StrategyKind};
//! use tokio::sync::mpsc::UnboundedReceiver;
//!
//! async fn run<M: MediaElement>(media: M, signals: UnboundedReceiver<waveplay_playback::MediaSignal>) {
//!     let config = PlayerConfig::default();
//!     let strategy = StrategyKind::Shuffle.create(config.shuffle_history_size);
//!     let mut player = Player::new(media, signals, Playlist::default(), strategy, config);
//!
//!     player.subscribe(EventKind::TrackChange, |event| println!("{event:?}"));
//!
//!     // Errors have already been delivered as notifications
//!     let _ = player.play().await;
//!     while player.process_signal().await {}
//! }
//! ```

mod error;
mod events;
mod history;
mod media;
mod player;
mod playlist;
pub mod persistence;
pub mod session;
mod strategy;
pub mod types;
mod volume;

// Public exports
pub use error::{LoadFailure, PersistError, PlayRejection, PlayerError, Result, UnknownStrategy};
pub use events::{EventKind, PlayerEvent, SubscriptionId, Subscribers};
pub use history::History;
pub use media::{LoadRequestId, MediaElement, MediaSignal};
pub use persistence::{
    load_state, save_state, FileStateStore, MemoryStateStore, PersistedState, StateStore,
    STATE_KEY,
};
pub use player::Player;
pub use playlist::Playlist;
pub use session::restore_player;
pub use strategy::{
    PlaybackStrategy, RepeatOneStrategy, SequentialStrategy, ShuffleStrategy, StrategyKind,
};
pub use types::{PlayerConfig, PlayerState, Track};
pub use volume::Volume;
