//! Fixed-capacity, most-recent-first sequence

use std::collections::VecDeque;

/// Keeps at most `capacity` items, newest at the front
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild from items already ordered newest first, dropping the excess
    pub fn from_newest_first(capacity: usize, items: impl IntoIterator<Item = T>) -> Self {
        Self {
            entries: items.into_iter().take(capacity).collect(),
            capacity,
        }
    }

    /// Insert at the front, evicting from the tail
    pub fn push(&mut self, item: T) {
        self.entries.push_front(item);
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Items, newest first
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
