//! Insertion-order (FIFO) cache for measured text widths.
//!
//! Auto-fit re-measures every cell of an `adjust` column whenever the
//! working set changes; most strings repeat between passes, so widths are
//! cached per text. Lookups do not promote entries.

use std::collections::{HashMap, VecDeque};

/// Default number of cached strings
pub const DEFAULT_TEXT_CACHE_CAPACITY: usize = 4096;

pub struct TextWidthCache {
    entries: HashMap<String, f32>,
    order: VecDeque<String>,
    capacity: usize,
}

impl Default for TextWidthCache {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_CACHE_CAPACITY)
    }
}

impl TextWidthCache {
    /// A capacity of 0 disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn get(&self, text: &str) -> Option<f32> {
        if self.capacity == 0 {
            return None;
        }
        self.entries.get(text).copied()
    }

    /// Insert a width; an existing entry is left untouched.
    pub fn insert(&mut self, text: &str, width: f32) -> bool {
        if self.capacity == 0 || self.entries.contains_key(text) {
            return false;
        }
        self.entries.insert(text.to_string(), width);
        self.order.push_back(text.to_string());
        self.enforce_cap();
        true
    }

    /// Cached width for `text`, measuring through `measure` on a miss.
    pub fn get_or_measure(&mut self, text: &str, measure: impl FnOnce(&str) -> f32) -> f32 {
        if let Some(width) = self.get(text) {
            return width;
        }
        let width = measure(text);
        self.insert(text, width);
        width
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn enforce_cap(&mut self) {
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_eviction_is_insertion_ordered() {
        let mut cache = TextWidthCache::new(2);
        cache.insert("a", 1.0);
        cache.insert("b", 2.0);
        let _ = cache.get("a");
        cache.insert("c", 3.0);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2.0));
        assert_eq!(cache.get("c"), Some(3.0));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_or_measure_only_measures_once() {
        let mut cache = TextWidthCache::new(8);
        let mut calls = 0;
        for _ in 0..3 {
            let w = cache.get_or_measure("hello", |t| {
                calls += 1;
                t.len() as f32
            });
            assert_eq!(w, 5.0);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_zero_capacity_never_stores() {
        let mut cache = TextWidthCache::new(0);
        assert!(!cache.insert("a", 1.0));
        assert!(cache.is_empty());
        assert_eq!(cache.get_or_measure("a", |_| 4.0), 4.0);
        assert!(cache.is_empty());
    }
}
