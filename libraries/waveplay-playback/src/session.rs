//! Session bootstrap
//!
//! Builds a [`Player`] from persisted state and keeps that state in sync
//! with track and strategy changes.

use crate::{
    events::{EventKind, PlayerEvent},
    media::{MediaElement, MediaSignal},
    persistence::{load_state, save_state, PersistedState, StateStore},
    player::Player,
    playlist::Playlist,
    types::PlayerConfig,
};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

/// Create a player restored from `store`
///
/// The persisted current track is selected without loading it, and the
/// persisted strategy is installed. Every later track or strategy change is
/// written back to `store`; write failures are logged and otherwise ignored.
pub fn restore_player<M: MediaElement>(
    media: M,
    signals: UnboundedReceiver<MediaSignal>,
    mut playlist: Playlist,
    store: Arc<dyn StateStore>,
    config: PlayerConfig,
) -> Player<M> {
    let restored = load_state(store.as_ref());
    if let Some(id) = restored.current_id.as_deref() {
        playlist.set_current_by_id(id);
    }
    info!(
        current = ?playlist.current().map(|track| track.id()),
        strategy = %restored.strategy,
        "restoring player session"
    );

    let strategy = restored.strategy.create(config.shuffle_history_size);
    let mut player = Player::new(media, signals, playlist, strategy, config);

    let shared = Arc::new(Mutex::new(PersistedState {
        current_id: player.current_track().map(|track| track.id().to_string()),
        strategy: restored.strategy,
    }));

    let on_track = Arc::clone(&shared);
    let track_store = Arc::clone(&store);
    player.subscribe(EventKind::TrackChange, move |event| {
        if let PlayerEvent::TrackChanged { track } = event {
            persist(&on_track, track_store.as_ref(), |state| {
                state.current_id = Some(track.id().to_string());
            });
        }
    });

    let on_strategy = Arc::clone(&shared);
    player.subscribe(EventKind::StrategyChange, move |event| {
        if let PlayerEvent::StrategyChanged { strategy } = event {
            persist(&on_strategy, store.as_ref(), |state| {
                state.strategy = *strategy;
            });
        }
    });

    player
}

fn persist(
    shared: &Mutex<PersistedState>,
    store: &dyn StateStore,
    update: impl FnOnce(&mut PersistedState),
) {
    let Ok(mut state) = shared.lock() else {
        warn!("persisted state lock poisoned, skipping save");
        return;
    };
    update(&mut state);
    if let Err(error) = save_state(store, &state) {
        warn!(%error, "failed to save player state");
    }
}
