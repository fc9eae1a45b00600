//! Dirty bitmask - which slots changed since the last patch.
//!
//! Bits are packed 31 per `i32` word so every word stays a non-negative
//! number while in use. A first word of `-1` is the sentinel for "clean and
//! not queued"; handed to a patch function, the same sentinel reads as
//! "everything changed", which is what a first render needs.

use smallvec::{smallvec, SmallVec};

/// Slots per word.
pub const SLOTS_PER_WORD: usize = 31;

const SENTINEL: i32 = -1;

#[derive(Clone, PartialEq, Eq)]
pub struct DirtyMask {
    words: SmallVec<[i32; 1]>,
}

impl DirtyMask {
    /// A clean mask wide enough for `slots` slots.
    pub fn clean(slots: usize) -> Self {
        let words = slots.div_ceil(SLOTS_PER_WORD).max(1);
        Self {
            words: smallvec![SENTINEL; words],
        }
    }

    /// A mask that reports every slot as changed.
    pub fn all() -> Self {
        Self::clean(0)
    }

    pub fn is_clean(&self) -> bool {
        self.words[0] == SENTINEL
    }

    /// Zero every word (queued, nothing marked yet).
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    /// Back to the clean sentinel, returning the accumulated bits.
    pub fn take(&mut self) -> DirtyMask {
        let taken = self.clone();
        self.words.iter_mut().for_each(|word| *word = SENTINEL);
        taken
    }

    pub fn mark(&mut self, slot: usize) {
        let word = slot / SLOTS_PER_WORD;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (slot % SLOTS_PER_WORD);
    }

    pub fn is_dirty(&self, slot: usize) -> bool {
        if self.is_clean() {
            return true;
        }
        self.words
            .get(slot / SLOTS_PER_WORD)
            .is_some_and(|word| word & (1 << (slot % SLOTS_PER_WORD)) != 0)
    }

    /// Whether any of `slots` is dirty.
    pub fn any(&self, slots: &[usize]) -> bool {
        slots.iter().any(|&slot| self.is_dirty(slot))
    }

    pub fn words(&self) -> &[i32] {
        &self.words
    }

    /// Indices of marked slots. Empty for the sentinel.
    pub fn slots(&self) -> Vec<usize> {
        if self.is_clean() {
            return Vec::new();
        }
        (0..self.words.len() * SLOTS_PER_WORD)
            .filter(|&slot| self.is_dirty(slot))
            .collect()
    }
}

impl Default for DirtyMask {
    fn default() -> Self {
        Self::clean(0)
    }
}

impl std::fmt::Debug for DirtyMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            f.write_str("DirtyMask(clean)")
        } else {
            write!(f, "DirtyMask({:?})", self.slots())
        }
    }
}
