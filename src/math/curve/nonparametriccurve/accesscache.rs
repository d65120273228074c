// ── Single-slot locality cache ──────────────────────────────────────────────
//
// Remembers the last (index, handle) pair a container touched. The handle is
// whatever the container needs to reach the element again without searching:
// a point snapshot for the array backend, an arena key for the linked one.
//
// Invariant: the slot is empty, or `handle` names the element currently
// stored at `index`. Containers keep it by calling `refresh` after touching an
// index, `invalidate` when index meanings change wholesale, and
// `shift_for_insert`/`shift_for_remove` after linking or unlinking one
// element.
//
// The slot lives in a `Cell` so read accessors can refresh it through `&self`.
// That also makes the cache `!Sync`, which matches single-owner use.

use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheEntry<H> {
    index: usize,
    handle: H,
}

#[derive(Debug, Clone)]
pub struct AccessCache<H: Copy> {
    slot: Cell<Option<CacheEntry<H>>>,
}

impl<H: Copy> AccessCache<H> {
    pub fn new() -> Self {
        Self { slot: Cell::new(None) }
    }

    /// The cached `(index, handle)` pair, if any.
    pub fn entry(&self) -> Option<(usize, H)> {
        self.slot.get().map(|entry| (entry.index, entry.handle))
    }

    /// The cached handle when it was recorded for exactly `index`.
    pub fn lookup(&self, index: usize) -> Option<H> {
        self.slot.get()
            .filter(|entry| entry.index == index)
            .map(|entry| entry.handle)
    }

    pub fn refresh(&self, index: usize, handle: H) {
        self.slot.set(Some(CacheEntry { index, handle }));
    }

    pub fn invalidate(&self) {
        self.slot.set(None);
    }

    pub fn is_empty(&self) -> bool {
        self.slot.get().is_none()
    }

    /// Adjusts the slot after a new element took position `inserted`.
    pub fn shift_for_insert(&self, inserted: usize) {
        if let Some(entry) = self.slot.get().filter(|entry| entry.index >= inserted) {
            self.refresh(entry.index + 1, entry.handle);
        }
    }

    /// Adjusts the slot after the element at `removed` left the sequence.
    pub fn shift_for_remove(&self, removed: usize) {
        match self.slot.get() {
            Some(entry) if entry.index == removed => self.invalidate(),
            Some(entry) if entry.index > removed => self.refresh(entry.index - 1, entry.handle),
            _ => {}
        }
    }

    /// Checks the slot against the container: the index must be in range and
    /// the handle must still be live.
    pub fn is_consistent(&self, count: usize, is_live: impl Fn(usize, H) -> bool) -> bool {
        self.slot.get()
            .map_or(true, |entry| entry.index < count && is_live(entry.index, entry.handle))
    }
}

impl<H: Copy> Default for AccessCache<H> {
    fn default() -> Self {
        Self::new()
    }
}
