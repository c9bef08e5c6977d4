use std::collections::VecDeque;

use crate::common::errors::{EngineError, Result};

/// Fixed-capacity window indexed from the most recent value
///
/// Index 0 is the latest push. Pushing into a full window evicts the oldest
/// value, so `count()` never exceeds `capacity()`.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    inner: VecDeque<T>,
    capacity: usize,
}

impl<T: Copy> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value, evicting the oldest if at capacity. Returns the evicted value if any.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.inner.len() >= self.capacity {
            self.inner.pop_back()
        } else {
            None
        };
        self.inner.push_front(value);
        evicted
    }

    /// Value at `index`, counting back from the most recent
    pub fn get(&self, index: usize) -> Result<T> {
        self.inner
            .get(index)
            .copied()
            .ok_or(EngineError::IndexOutOfRange {
                index,
                count: self.inner.len(),
            })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.inner.len() >= self.capacity
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Most recent value
    pub fn latest(&self) -> Option<T> {
        self.inner.front().copied()
    }

    /// Values from most recent to oldest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.inner.iter()
    }
}
