//! Volume control
//!
//! Linear 0.0-1.0 level plus an independent mute flag, matching what a media
//! element accepts.

/// Volume controller
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f64,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// The level is clamped into range; NaN becomes full volume.
    pub fn new(level: f64) -> Self {
        let mut volume = Self {
            level: 1.0,
            muted: false,
        };
        volume.set_level(level);
        volume
    }

    /// Set volume level, clamped to 0.0-1.0
    ///
    /// NaN leaves the level unchanged.
    pub fn set_level(&mut self, level: f64) {
        if level.is_nan() {
            return;
        }
        self.level = level.clamp(0.0, 1.0);
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}
