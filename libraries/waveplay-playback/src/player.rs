//! Player - core orchestration
//!
//! Owns the playlist and the active strategy, drives the media element and
//! turns its signals into [`PlayerEvent`]s.
//!
//! All operations run on one task and take `&mut self`, so there is never
//! more than one load in flight. A load that times out or fails is
//! abandoned; signals still tagged with its [`LoadRequestId`] are dropped
//! when they eventually arrive.

use crate::{
    error::{LoadFailure, PlayRejection, PlayerError, Result},
    events::{EventKind, PlayerEvent, SubscriptionId, Subscribers},
    media::{LoadRequestId, MediaElement, MediaSignal},
    playlist::Playlist,
    strategy::{PlaybackStrategy, StrategyKind},
    types::{PlayerConfig, PlayerState, Track},
    volume::Volume,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, trace, warn};

/// The load the player currently trusts signals from
#[derive(Debug, Clone)]
struct LoadTicket {
    request: LoadRequestId,
    track_id: String,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// Audio player driving a [`MediaElement`]
pub struct Player<M: MediaElement> {
    media: M,
    signals: UnboundedReceiver<MediaSignal>,
    playlist: Playlist,
    strategy: Box<dyn PlaybackStrategy>,
    config: PlayerConfig,
    state: PlayerState,
    is_playing: bool,
    volume: Volume,
    load: Option<LoadTicket>,
    last_request: LoadRequestId,
    subscribers: Subscribers,
}

impl<M: MediaElement> Player<M> {
    /// Create a player
    ///
    /// `signals` must be the receiving end of the channel `media` reports on.
    /// The configured volume is applied to the media element immediately.
    pub fn new(
        mut media: M,
        signals: UnboundedReceiver<MediaSignal>,
        playlist: Playlist,
        strategy: Box<dyn PlaybackStrategy>,
        config: PlayerConfig,
    ) -> Self {
        let volume = Volume::new(config.volume);
        media.set_volume(volume.level());
        media.set_muted(volume.is_muted());

        Self {
            media,
            signals,
            playlist,
            strategy,
            config,
            state: PlayerState::Idle,
            is_playing: false,
            volume,
            load: None,
            last_request: LoadRequestId::new(0),
            subscribers: Subscribers::new(),
        }
    }

    // ===== Playback Control =====

    /// Play the current track, loading it first if needed
    ///
    /// An empty playlist is a no-op.
    pub async fn play(&mut self) -> Result<()> {
        let Some(track) = self.playlist.current() else {
            debug!("play requested with no current track");
            return Ok(());
        };
        let (track_id, url) = (track.id().to_string(), track.url().to_string());

        if self.needs_load(&url) {
            self.load_track(track_id.clone(), url).await?;
        }
        self.start_playback(&track_id).await
    }

    /// Request a pause
    ///
    /// State changes once the media element reports it.
    pub fn pause(&mut self) {
        self.media.pause();
    }

    /// Pause if playing, otherwise play
    pub async fn toggle_play(&mut self) -> Result<()> {
        if self.is_playing {
            self.pause();
            Ok(())
        } else {
            self.play().await
        }
    }

    /// Move to the strategy's next track
    pub async fn next(&mut self) -> Result<()> {
        let resume = self.is_playing;
        self.advance(Direction::Forward, resume).await
    }

    /// Move to the strategy's previous track
    pub async fn previous(&mut self) -> Result<()> {
        let resume = self.is_playing;
        self.advance(Direction::Backward, resume).await
    }

    /// Jump to the track with `id`, bypassing the strategy
    ///
    /// Unknown ids are ignored.
    pub async fn select_track(&mut self, id: &str) -> Result<()> {
        if self.playlist.position(id).is_none() {
            debug!(track_id = id, "select_track: unknown track");
            return Ok(());
        }

        let resume = self.is_playing;
        if resume {
            self.pause();
        }
        self.playlist.set_current_by_id(id);
        self.switch_to(resume).await
    }

    // ===== Seek =====

    /// Seek to `seconds`, clamped to the track duration
    ///
    /// Ignored while the duration is unknown or when `seconds` is not finite.
    pub fn seek(&mut self, seconds: f64) {
        let Some(duration) = self
            .media
            .duration()
            .filter(|duration| duration.is_finite() && *duration > 0.0)
        else {
            trace!("seek ignored: duration unknown");
            return;
        };
        if !seconds.is_finite() {
            return;
        }
        self.media.set_current_time(seconds.clamp(0.0, duration));
    }

    // ===== Volume =====

    /// Set volume, clamped to 0.0-1.0 (NaN is ignored)
    pub fn set_volume(&mut self, level: f64) {
        if level.is_nan() {
            return;
        }
        self.volume.set_level(level);
        self.media.set_volume(self.volume.level());
        self.emit_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.media.set_muted(self.volume.is_muted());
        self.emit_volume();
    }

    // ===== Strategy =====

    /// Install a new strategy, discarding the old one and its state
    pub fn set_strategy(&mut self, strategy: Box<dyn PlaybackStrategy>) {
        debug!(from = self.strategy.name(), to = strategy.name(), "strategy changed");
        self.strategy = strategy;
        self.emit(PlayerEvent::StrategyChanged {
            strategy: self.strategy.kind(),
        });
    }

    /// Install a fresh instance of a built-in strategy
    pub fn set_strategy_kind(&mut self, kind: StrategyKind) {
        self.set_strategy(kind.create(self.config.shuffle_history_size));
    }

    // ===== Playlist =====

    pub fn add_track(&mut self, track: Track) {
        self.playlist.add_track(track);
    }

    pub fn remove_track(&mut self, id: &str) {
        self.playlist.remove_track(id);
    }

    // ===== Subscriptions =====

    /// Subscribe to one kind of notification
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&PlayerEvent) + Send + 'static,
    {
        self.subscribers.subscribe(Some(kind), callback)
    }

    /// Subscribe to every notification
    pub fn subscribe_all<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&PlayerEvent) + Send + 'static,
    {
        self.subscribers.subscribe(None, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ===== Signal Pump =====

    /// Wait for the next media signal and apply it
    ///
    /// Returns `false` once the media element has gone away.
    pub async fn process_signal(&mut self) -> bool {
        match self.signals.recv().await {
            Some(signal) => {
                self.handle_signal(signal).await;
                true
            }
            None => false,
        }
    }

    /// Apply every signal already queued, without waiting
    ///
    /// Returns the number of signals applied.
    pub async fn process_pending_signals(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(signal) = self.signals.try_recv() {
            self.handle_signal(signal).await;
            applied += 1;
        }
        applied
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Whether the media element last reported playing
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn volume(&self) -> f64 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.current()
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    // ===== Internals =====

    /// A player in `Error` always reloads before playing again
    fn needs_load(&self, url: &str) -> bool {
        self.state == PlayerState::Error || self.load.is_none() || self.media.src() != Some(url)
    }

    async fn advance(&mut self, direction: Direction, resume: bool) -> Result<()> {
        let target = match direction {
            Direction::Forward => self.strategy.next_track(&mut self.playlist),
            Direction::Backward => self.strategy.previous_track(&mut self.playlist),
        };
        if target.is_none() {
            debug!(?direction, "no track to move to");
            return Ok(());
        }
        self.switch_to(resume).await
    }

    /// Load the playlist's current track and announce it
    ///
    /// The track change is announced even when the load fails, since the
    /// cursor has already moved. Playback resumes only after a good load.
    async fn switch_to(&mut self, resume: bool) -> Result<()> {
        let Some(track) = self.playlist.current() else {
            return Ok(());
        };
        let (track_id, url) = (track.id().to_string(), track.url().to_string());

        let loaded = self.load_track(track_id.clone(), url).await;

        if let Some(track) = self.playlist.current() {
            let track = track.clone();
            self.emit(PlayerEvent::TrackChanged { track });
        }
        loaded?;

        if resume {
            self.start_playback(&track_id).await?;
        }
        Ok(())
    }

    async fn load_track(&mut self, track_id: String, url: String) -> Result<()> {
        let request = self.last_request.next();
        self.last_request = request;
        self.load = Some(LoadTicket {
            request,
            track_id: track_id.clone(),
        });

        debug!(track_id = %track_id, request = request.value(), url = %url, "loading track");
        self.set_state(PlayerState::Loading);
        self.emit(PlayerEvent::LoadStart {
            track_id: track_id.clone(),
        });
        self.media.load(&url, request);

        let limit = self.config.load_timeout;
        let outcome = match tokio::time::timeout(limit, self.wait_until_playable(request)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(LoadFailure::Timeout(limit)),
        };

        match outcome {
            Ok(()) => {
                debug!(track_id = %track_id, "track ready");
                self.set_state(PlayerState::Ready);
                self.emit(PlayerEvent::ReadyToPlay { track_id });
                Ok(())
            }
            Err(failure) => {
                self.load = None;
                self.set_state(PlayerState::Error);
                let error = PlayerError::LoadFailed { track_id, failure };
                self.report(error.clone());
                Err(error)
            }
        }
    }

    /// Apply signals until `request` becomes playable or fails
    async fn wait_until_playable(
        &mut self,
        request: LoadRequestId,
    ) -> std::result::Result<(), LoadFailure> {
        loop {
            let Some(signal) = self.signals.recv().await else {
                return Err(LoadFailure::Detached);
            };
            match signal {
                MediaSignal::CanPlay { request: ready } if ready == request => return Ok(()),
                MediaSignal::Error {
                    request: failed,
                    message,
                } if failed.is_none() || failed == Some(request) => {
                    return Err(LoadFailure::Media(message));
                }
                MediaSignal::Ended => {
                    trace!("ended from previous source ignored during load");
                }
                other => self.apply_signal(other),
            }
        }
    }

    async fn start_playback(&mut self, track_id: &str) -> Result<()> {
        match self.media.play().await {
            Ok(()) => Ok(()),
            Err(PlayRejection::NotAllowed) => {
                debug!(track_id, "playback needs user interaction");
                self.emit(PlayerEvent::UserInteractionRequired {
                    track_id: track_id.to_string(),
                });
                Err(PlayerError::UserInteractionRequired {
                    track_id: track_id.to_string(),
                })
            }
            Err(PlayRejection::Failed(message)) => {
                self.set_state(PlayerState::Error);
                let error = PlayerError::Playback { message };
                self.report(error.clone());
                Err(error)
            }
        }
    }

    async fn handle_signal(&mut self, signal: MediaSignal) {
        match signal {
            MediaSignal::Ended => self.handle_track_end().await,
            other => self.apply_signal(other),
        }
    }

    async fn handle_track_end(&mut self) {
        debug!("track ended, advancing");
        if let Err(error) = self.advance(Direction::Forward, true).await {
            debug!(%error, "auto-advance failed");
        }
    }

    /// Whether `request` belongs to the load the player still trusts
    fn is_current(&self, request: LoadRequestId) -> bool {
        self.load
            .as_ref()
            .is_some_and(|ticket| ticket.request == request)
    }

    fn apply_signal(&mut self, signal: MediaSignal) {
        if let Some(request) = signal.request() {
            if !self.is_current(request) {
                debug!(request = request.value(), ?signal, "discarding stale media signal");
                return;
            }
        }

        match signal {
            MediaSignal::LoadStart { request } => {
                trace!(request = request.value(), "media load started");
            }
            MediaSignal::LoadedMetadata { duration, .. } => self.apply_duration(duration),
            MediaSignal::CanPlay { request } => {
                trace!(request = request.value(), "canplay outside of a load");
            }
            MediaSignal::Error { message, .. } => {
                self.set_state(PlayerState::Error);
                self.report(PlayerError::Playback { message });
            }
            MediaSignal::TimeUpdate {
                current_time,
                duration,
            } => {
                self.emit(PlayerEvent::TimeUpdate {
                    current_time,
                    duration,
                });
            }
            MediaSignal::Play => {
                self.is_playing = true;
                if matches!(
                    self.state,
                    PlayerState::Ready | PlayerState::Paused | PlayerState::Playing
                ) {
                    self.set_state(PlayerState::Playing);
                }
                self.emit(PlayerEvent::PlayStateChanged { is_playing: true });
            }
            MediaSignal::Pause => {
                self.is_playing = false;
                if self.state == PlayerState::Playing {
                    self.set_state(PlayerState::Paused);
                }
                self.emit(PlayerEvent::PlayStateChanged { is_playing: false });
            }
            MediaSignal::Ended => {}
        }
    }

    fn apply_duration(&mut self, duration: f64) {
        let Some(ticket) = self.load.as_ref() else {
            return;
        };
        let track_id = ticket.track_id.clone();
        let Some(track) = self.playlist.track_mut(&track_id) else {
            return;
        };
        track.set_duration(duration);
        let duration = track.duration();
        self.emit(PlayerEvent::DurationChanged { track_id, duration });
    }

    fn set_state(&mut self, state: PlayerState) {
        if self.state != state {
            trace!(from = ?self.state, to = ?state, "player state");
            self.state = state;
        }
    }

    fn report(&mut self, error: PlayerError) {
        warn!(%error, "player error");
        self.emit(PlayerEvent::Error { error });
    }

    fn emit_volume(&mut self) {
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.subscribers.emit(&event);
    }
}

impl<M: MediaElement> std::fmt::Debug for Player<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("state", &self.state)
            .field("is_playing", &self.is_playing)
            .field("current", &self.playlist.current().map(Track::id))
            .field("strategy", &self.strategy.name())
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}
