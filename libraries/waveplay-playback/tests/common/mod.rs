/// Common test utilities: a scripted media element and player fixtures
#[allow(dead_code)]
pub mod media {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
    use waveplay_playback::{LoadRequestId, MediaElement, MediaSignal, PlayRejection};

    /// What a load of a given URL does
    #[derive(Debug, Clone)]
    pub enum LoadBehavior {
        /// Metadata then canplay, immediately
        Ready { duration: f64 },
        /// Error signal for the load
        Fail(String),
        /// Never reports anything
        Hang,
    }

    #[derive(Debug, Clone, Default)]
    pub enum PlayBehavior {
        #[default]
        Resolve,
        Reject(PlayRejection),
    }

    /// Shared, inspectable state of a [`ScriptedMedia`]
    #[derive(Debug, Default)]
    pub struct Script {
        pub loads: HashMap<String, LoadBehavior>,
        pub play: PlayBehavior,
        pub load_log: Vec<(String, LoadRequestId)>,
        pub play_calls: usize,
        pub pause_calls: usize,
        pub current_time: f64,
        pub volume: f64,
        pub muted: bool,
    }

    impl Script {
        pub fn last_request(&self) -> Option<LoadRequestId> {
            self.load_log.last().map(|(_, request)| *request)
        }

        pub fn loaded_urls(&self) -> Vec<String> {
            self.load_log.iter().map(|(url, _)| url.clone()).collect()
        }
    }

    /// Media element double that behaves like a browser `<audio>` element
    /// driven by a script
    pub struct ScriptedMedia {
        script: Arc<Mutex<Script>>,
        signals: UnboundedSender<MediaSignal>,
        src: Option<String>,
        duration: Option<f64>,
        playing: bool,
    }

    pub const DEFAULT_DURATION: f64 = 180.0;

    impl ScriptedMedia {
        pub fn new() -> (
            Self,
            UnboundedReceiver<MediaSignal>,
            Arc<Mutex<Script>>,
            UnboundedSender<MediaSignal>,
        ) {
            let (tx, rx) = unbounded_channel();
            let script = Arc::new(Mutex::new(Script::default()));
            let media = Self {
                script: Arc::clone(&script),
                signals: tx.clone(),
                src: None,
                duration: None,
                playing: false,
            };
            (media, rx, script, tx)
        }

        fn send(&self, signal: MediaSignal) {
            let _ = self.signals.send(signal);
        }
    }

    #[async_trait]
    impl MediaElement for ScriptedMedia {
        fn src(&self) -> Option<&str> {
            self.src.as_deref()
        }

        fn load(&mut self, url: &str, request: LoadRequestId) {
            // Browsers pause a playing element when its source is replaced
            if self.playing {
                self.playing = false;
                self.send(MediaSignal::Pause);
            }

            let behavior = {
                let mut script = self.script.lock().unwrap();
                script.load_log.push((url.to_string(), request));
                script.current_time = 0.0;
                script
                    .loads
                    .get(url)
                    .cloned()
                    .unwrap_or(LoadBehavior::Ready {
                        duration: DEFAULT_DURATION,
                    })
            };

            self.src = Some(url.to_string());
            self.duration = None;
            self.send(MediaSignal::LoadStart { request });

            match behavior {
                LoadBehavior::Ready { duration } => {
                    self.duration = Some(duration);
                    self.send(MediaSignal::LoadedMetadata { request, duration });
                    self.send(MediaSignal::CanPlay { request });
                }
                LoadBehavior::Fail(message) => self.send(MediaSignal::Error {
                    request: Some(request),
                    message,
                }),
                LoadBehavior::Hang => {}
            }
        }

        async fn play(&mut self) -> Result<(), PlayRejection> {
            let behavior = {
                let mut script = self.script.lock().unwrap();
                script.play_calls += 1;
                script.play.clone()
            };
            match behavior {
                PlayBehavior::Resolve => {
                    if !self.playing {
                        self.playing = true;
                        self.send(MediaSignal::Play);
                    }
                    Ok(())
                }
                PlayBehavior::Reject(rejection) => Err(rejection),
            }
        }

        fn pause(&mut self) {
            self.script.lock().unwrap().pause_calls += 1;
            if self.playing {
                self.playing = false;
                self.send(MediaSignal::Pause);
            }
        }

        fn set_current_time(&mut self, seconds: f64) {
            self.script.lock().unwrap().current_time = seconds;
        }

        fn duration(&self) -> Option<f64> {
            self.duration
        }

        fn set_volume(&mut self, level: f64) {
            self.script.lock().unwrap().volume = level;
        }

        fn set_muted(&mut self, muted: bool) {
            self.script.lock().unwrap().muted = muted;
        }
    }
}

/// Player fixtures
#[allow(dead_code)]
pub mod fixtures {
    use super::media::{Script, ScriptedMedia};
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc::UnboundedSender;
    use waveplay_playback::{
        EventKind, MediaSignal, Player, PlayerConfig, PlayerEvent, Playlist, StrategyKind, Track,
    };

    pub fn url_for(index: usize) -> String {
        format!("/media/{}.mp3", index)
    }

    pub fn create_tracks(count: usize) -> Vec<Track> {
        (0..count)
            .map(|i| Track::new(i.to_string(), format!("Track {}", i), "Test Artist", url_for(i)))
            .collect()
    }

    pub struct Harness {
        pub player: Player<ScriptedMedia>,
        pub script: Arc<Mutex<Script>>,
        pub signals: UnboundedSender<MediaSignal>,
        pub events: Arc<Mutex<Vec<PlayerEvent>>>,
    }

    impl Harness {
        pub fn new(track_count: usize, strategy: StrategyKind) -> Self {
            let (media, rx, script, signals) = ScriptedMedia::new();
            let config = PlayerConfig::default();
            let strategy = strategy.create(config.shuffle_history_size);
            let mut player = Player::new(
                media,
                rx,
                Playlist::new(create_tracks(track_count)),
                strategy,
                config,
            );
            let events = record_events(&mut player);
            Self {
                player,
                script,
                signals,
                events,
            }
        }

        pub fn kinds(&self) -> Vec<EventKind> {
            self.events.lock().unwrap().iter().map(PlayerEvent::kind).collect()
        }

        pub fn count(&self, kind: EventKind) -> usize {
            self.kinds().into_iter().filter(|k| *k == kind).count()
        }

        pub fn clear_events(&self) {
            self.events.lock().unwrap().clear();
        }

        pub fn cursor(&self) -> usize {
            self.player.playlist().current_index()
        }

        /// Play from idle and apply the resulting signals
        pub async fn start_playing(&mut self) {
            self.player.play().await.unwrap();
            self.player.process_pending_signals().await;
            assert!(self.player.is_playing());
        }
    }

    pub fn record_events(player: &mut Player<ScriptedMedia>) -> Arc<Mutex<Vec<PlayerEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        player.subscribe_all(move |event| sink.lock().unwrap().push(event.clone()));
        events
    }
}
