//! Single-slot memo keyed on input revisions.

/// Caches one value together with the key it was computed from.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
    computes: usize,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            slot: None,
            computes: 0,
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    /// Cached value when `key` matches, otherwise recompute and store.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        let entry = match self.slot.take() {
            Some((k, v)) if k == key => (k, v),
            _ => {
                self.computes += 1;
                let value = compute();
                (key, value)
            }
        };
        &self.slot.insert(entry).1
    }

    /// Fallible variant; an error leaves the memo empty.
    pub fn try_get_or_compute<E>(
        &mut self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<&V, E> {
        let entry = match self.slot.take() {
            Some((k, v)) if k == key => (k, v),
            _ => {
                self.computes += 1;
                let value = compute()?;
                (key, value)
            }
        };
        Ok(&self.slot.insert(entry).1)
    }

    pub fn get(&self) -> Option<&V> {
        self.slot.as_ref().map(|(_, v)| v)
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Number of times the value has been computed.
    pub fn computes(&self) -> usize {
        self.computes
    }
}
