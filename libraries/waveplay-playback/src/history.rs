//! Shuffle history tracking
//!
//! Bounded stack of playlist indices for "previous" under shuffle

use std::collections::VecDeque;

/// Playback history with bounded size
///
/// Most recent index at the back. When full, the oldest entry is discarded,
/// which limits how far back "previous" can retrace.
#[derive(Debug, Clone)]
pub struct History {
    /// Visited indices (most recent = back)
    indices: VecDeque<usize>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            indices: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a visited index
    ///
    /// If history is full, oldest index is discarded
    pub fn push(&mut self, index: usize) {
        if self.max_size == 0 {
            return;
        }
        if self.indices.len() >= self.max_size {
            self.indices.pop_front();
        }
        self.indices.push_back(index);
    }

    /// Pop most recent index
    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop_back()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}
