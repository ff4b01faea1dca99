//! Playlist with a current-track cursor
//!
//! Invariant: `cursor < len()` whenever the playlist is non-empty.

use crate::types::Track;

/// Ordered tracks plus the index of the current one
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    cursor: usize,
}

impl Playlist {
    /// Create a playlist positioned on its first track
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks, cursor: 0 }
    }

    /// Currently selected track (`None` when empty)
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    pub fn current_index(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Index of the first track with `id`
    pub fn position(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|track| track.id() == id)
    }

    /// Append a track
    ///
    /// Ids are expected to be unique; that is up to the caller.
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove every track with `id`, clamping the cursor back into range
    pub fn remove_track(&mut self, id: &str) {
        self.tracks.retain(|track| track.id() != id);
        if self.cursor >= self.tracks.len() {
            self.cursor = self.tracks.len().saturating_sub(1);
        }
    }

    /// Move the cursor to `index`; out-of-range indices are ignored
    pub fn set_current_index(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.cursor = index;
        }
    }

    /// Move the cursor to the first track with `id`; unknown ids are ignored
    pub fn set_current_by_id(&mut self, id: &str) {
        if let Some(index) = self.position(id) {
            self.cursor = index;
        }
    }

    /// Advance the cursor, wrapping to the first track
    pub fn next(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.tracks.len();
        self.current()
    }

    /// Retreat the cursor, wrapping to the last track
    pub fn previous(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let len = self.tracks.len();
        self.cursor = (self.cursor + len - 1) % len;
        self.current()
    }

    /// Mutable access for duration updates from media metadata
    pub(crate) fn track_mut(&mut self, id: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|track| track.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_playlist(count: usize) -> Playlist {
        Playlist::new(
            (0..count)
                .map(|i| {
                    Track::new(
                        i.to_string(),
                        format!("Track {}", i),
                        "Test Artist",
                        format!("/media/{}.mp3", i),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn empty_playlist_has_no_current() {
        let mut playlist = Playlist::default();
        assert!(playlist.current().is_none());
        assert!(playlist.next().is_none());
        assert!(playlist.previous().is_none());
        assert_eq!(playlist.current_index(), 0);
    }

    #[test]
    fn next_wraps_around() {
        let mut playlist = create_playlist(3);
        let visited: Vec<usize> = (0..3)
            .map(|_| {
                playlist.next();
                playlist.current_index()
            })
            .collect();
        assert_eq!(visited, vec![1, 2, 0]);
    }

    #[test]
    fn previous_wraps_around() {
        let mut playlist = create_playlist(3);
        assert_eq!(playlist.previous().unwrap().id(), "2");
        assert_eq!(playlist.previous().unwrap().id(), "1");
    }

    #[test]
    fn set_current_index_ignores_out_of_range() {
        let mut playlist = create_playlist(3);
        playlist.set_current_index(2);
        assert_eq!(playlist.current_index(), 2);

        playlist.set_current_index(3);
        assert_eq!(playlist.current_index(), 2);
    }

    #[test]
    fn set_current_by_id() {
        let mut playlist = create_playlist(3);
        playlist.set_current_by_id("1");
        assert_eq!(playlist.current().unwrap().id(), "1");

        playlist.set_current_by_id("missing");
        assert_eq!(playlist.current().unwrap().id(), "1");
    }

    #[test]
    fn remove_current_last_track_clamps_cursor() {
        let mut playlist = create_playlist(3);
        playlist.set_current_index(2);
        playlist.remove_track("2");
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.current_index(), 1);
    }

    #[test]
    fn remove_duplicates_removes_every_match() {
        let mut playlist = create_playlist(2);
        playlist.add_track(Track::new("0", "Again", "Test Artist", "/media/0b.mp3"));
        playlist.remove_track("0");
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.position("0"), None);
    }

    #[test]
    fn remove_everything_resets_cursor() {
        let mut playlist = create_playlist(1);
        playlist.remove_track("0");
        assert!(playlist.is_empty());
        assert_eq!(playlist.current_index(), 0);
        assert!(playlist.current().is_none());
    }
}
