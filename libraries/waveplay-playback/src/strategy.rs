//! Track selection strategies
//!
//! Each strategy decides which track comes next or previous and moves the
//! playlist cursor accordingly:
//! - Sequential: cyclic forward/backward
//! - Shuffle: random forward with history/future replay
//! - RepeatOne: cursor never moves

use crate::error::UnknownStrategy;
use crate::history::History;
use crate::playlist::Playlist;
use crate::types::Track;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pluggable policy for choosing the next/previous track
///
/// Implementations may keep internal state; the player drops the old
/// strategy (and its state) whenever a new one is installed.
pub trait PlaybackStrategy: Send + fmt::Debug {
    /// Which of the built-in strategies this is
    fn kind(&self) -> StrategyKind;

    /// Stable name used in notifications and persisted state
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Move the cursor forward and return the new current track
    fn next_track<'a>(&mut self, playlist: &'a mut Playlist) -> Option<&'a Track>;

    /// Move the cursor backward and return the new current track
    fn previous_track<'a>(&mut self, playlist: &'a mut Playlist) -> Option<&'a Track>;
}

/// The built-in strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Play tracks in order, wrapping at both ends
    #[default]
    Sequential,

    /// Random order with back/forward replay
    Shuffle,

    /// Stay on the current track
    RepeatOne,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Sequential,
        StrategyKind::Shuffle,
        StrategyKind::RepeatOne,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::Shuffle => "shuffle",
            StrategyKind::RepeatOne => "repeat-one",
        }
    }

    /// Build a fresh strategy instance
    ///
    /// `shuffle_history` bounds how far back shuffle can retrace.
    pub fn create(self, shuffle_history: usize) -> Box<dyn PlaybackStrategy> {
        match self {
            StrategyKind::Sequential => Box::new(SequentialStrategy),
            StrategyKind::Shuffle => Box::new(ShuffleStrategy::with_history_size(shuffle_history)),
            StrategyKind::RepeatOne => Box::new(RepeatOneStrategy),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Cyclic in-order playback
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialStrategy;

impl PlaybackStrategy for SequentialStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sequential
    }

    fn next_track<'a>(&mut self, playlist: &'a mut Playlist) -> Option<&'a Track> {
        playlist.next()
    }

    fn previous_track<'a>(&mut self, playlist: &'a mut Playlist) -> Option<&'a Track> {
        playlist.previous()
    }
}

/// Repeat the current track forever
#[derive(Debug, Clone, Copy, Default)]
pub struct RepeatOneStrategy;

impl PlaybackStrategy for RepeatOneStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RepeatOne
    }

    fn next_track<'a>(&mut self, playlist: &'a mut Playlist) -> Option<&'a Track> {
        playlist.current()
    }

    fn previous_track<'a>(&mut self, playlist: &'a mut Playlist) -> Option<&'a Track> {
        playlist.current()
    }
}

/// Random playback with one-level back/forward replay
///
/// `history` holds indices visited before the current one (bounded). Going
/// back pushes the current index onto `future`, so going forward again
/// replays the same tracks before picking new random ones.
#[derive(Debug, Clone)]
pub struct ShuffleStrategy {
    history: History,
    future: Vec<usize>,
    rng: StdRng,
}

impl ShuffleStrategy {
    pub fn new() -> Self {
        Self::with_history_size(History::default().max_size())
    }

    pub fn with_history_size(max_size: usize) -> Self {
        Self {
            history: History::new(max_size),
            future: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic shuffle for tests and reproducible sessions
    pub fn with_seed(seed: u64) -> Self {
        Self {
            history: History::default(),
            future: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Number of tracks "previous" can still retrace
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of tracks "next" will replay before picking at random
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Uniform pick among all indices except `current`
    fn pick_other_than(&mut self, current: usize, len: usize) -> usize {
        if len <= 1 {
            return current;
        }
        let pick = self.rng.gen_range(0..len - 1);
        if pick >= current {
            pick + 1
        } else {
            pick
        }
    }
}

impl Default for ShuffleStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackStrategy for ShuffleStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Shuffle
    }

    fn next_track<'a>(&mut self, playlist: &'a mut Playlist) -> Option<&'a Track> {
        if playlist.is_empty() {
            return None;
        }

        let current = playlist.current_index();
        self.history.push(current);

        let next = match self.future.pop() {
            Some(index) => index,
            None => self.pick_other_than(current, playlist.len()),
        };

        // Indices left over from before a removal are silently ignored
        playlist.set_current_index(next);
        playlist.current()
    }

    fn previous_track<'a>(&mut self, playlist: &'a mut Playlist) -> Option<&'a Track> {
        let Some(previous) = self.history.pop() else {
            return playlist.current();
        };

        self.future.push(playlist.current_index());
        playlist.set_current_index(previous);
        playlist.current()
    }
}
