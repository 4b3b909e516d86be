//! # Overview
//!
//! [`FrequencyHeap`] assigns every symbol of a contiguous alphabet a *rank*:
//! its slot in a binary max-heap ordered by how often the symbol has been seen.
//! The encoder transmits ranks instead of raw symbols, so frequent symbols
//! drift toward small ranks and short variable-length codes.
//!
//! # Invariants
//!
//! - For every slot `s > 0`, `frequency(slot s) <= frequency(slot (s - 1) / 2)`.
//! - `slots` and `index` are inverse permutations of `0..len()`.
//! - Frequencies only grow, so [`FrequencyHeap::bump`] restores the heap with
//!   an upward sift alone. A symbol moves past its parent only when its count
//!   becomes strictly greater, which keeps ties in their existing order.
//!
//! Encoder and decoder each own a heap per symbol category and call
//! [`FrequencyHeap::bump`] for exactly the same symbols in exactly the same
//! order. Nothing else mutates a heap, so both sides always agree on every
//! rank.
//!
//! # Examples
//!
//! ```
//! use lzrank::FrequencyHeap;
//!
//! let mut heap = FrequencyHeap::new(4);
//! assert_eq!(heap.rank_of(3), 3);
//! heap.bump(3);
//! assert_eq!(heap.rank_of(3), 0);
//! assert_eq!(heap.symbol_at(0), Some(3));
//! ```

/// Binary max-heap of symbols keyed by occurrence count.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FrequencyHeap {
    /// Slot -> symbol.
    slots: Vec<u32>,
    /// Symbol -> slot.
    index: Vec<u32>,
    /// Symbol -> occurrence count.
    counts: Vec<u64>,
}

impl FrequencyHeap {
    /// Creates a heap over symbols `0..symbol_count`, all with frequency zero.
    #[must_use]
    pub fn new(symbol_count: usize) -> Self {
        let mut heap = Self::default();
        heap.reset(symbol_count);
        heap
    }

    /// Reinitializes the heap for a new stream, reusing its allocations.
    ///
    /// Symbols are laid out in ascending order. With every count at zero an
    /// upward sift never moves anything, so slot `s` simply holds symbol `s`.
    pub fn reset(&mut self, symbol_count: usize) {
        debug_assert!(u32::try_from(symbol_count).is_ok());
        self.slots.clear();
        self.slots.extend((0..symbol_count).map(|symbol| symbol as u32));
        self.index.clone_from(&self.slots);
        self.counts.clear();
        self.counts.resize(symbol_count, 0);
    }

    /// Number of symbols tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when the alphabet is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current rank (heap slot) of `symbol`.
    ///
    /// # Panics
    ///
    /// Panics if `symbol` lies outside the alphabet.
    #[inline]
    #[must_use]
    pub fn rank_of(&self, symbol: usize) -> usize {
        self.index[symbol] as usize
    }

    /// Symbol currently occupying `rank`, or `None` past the end of the alphabet.
    #[inline]
    #[must_use]
    pub fn symbol_at(&self, rank: usize) -> Option<usize> {
        self.slots.get(rank).map(|&symbol| symbol as usize)
    }

    /// Number of times `symbol` has been bumped since the last reset.
    #[must_use]
    pub fn frequency(&self, symbol: usize) -> u64 {
        self.counts[symbol]
    }

    /// Records one occurrence of `symbol` and sifts it toward the root.
    ///
    /// Returns the symbol's new rank.
    ///
    /// # Panics
    ///
    /// Panics if `symbol` lies outside the alphabet.
    pub fn bump(&mut self, symbol: usize) -> usize {
        self.counts[symbol] += 1;
        let count = self.counts[symbol];
        let mut slot = self.index[symbol] as usize;
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.counts[self.slots[parent] as usize] >= count {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        debug_assert_eq!(self.index[symbol] as usize, slot);
        slot
    }

    /// Checks the max-heap property and the slot/index inverse mapping.
    #[must_use]
    pub fn satisfies_heap_property(&self) -> bool {
        let ordered = (1..self.slots.len()).all(|slot| {
            let parent = (slot - 1) / 2;
            self.counts[self.slots[slot] as usize] <= self.counts[self.slots[parent] as usize]
        });
        let inverse = self
            .slots
            .iter()
            .enumerate()
            .all(|(slot, &symbol)| self.index[symbol as usize] as usize == slot);
        ordered && inverse
    }

    fn swap(&mut self, a: usize, b: usize) {
        let symbol_a = self.slots[a];
        let symbol_b = self.slots[b];
        self.slots.swap(a, b);
        self.index.swap(symbol_a as usize, symbol_b as usize);
    }
}

/// Number of literal symbols; only the low seven bits of a byte are ranked.
pub const LITERAL_SYMBOLS: usize = 0x80;

/// The three rank tables of one stream.
#[derive(Clone, Debug, Default)]
pub struct RankTables {
    /// Low seven bits of literal bytes.
    pub literals: FrequencyHeap,
    /// Back-reference distances, `0..window_size`.
    pub distances: FrequencyHeap,
    /// Back-reference lengths shorter than the window, `0..window_size`.
    pub lengths: FrequencyHeap,
}

impl RankTables {
    /// Creates tables sized for `window_size`.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        let mut tables = Self::default();
        tables.reset(window_size);
        tables
    }

    /// Returns every table to its initial arrangement for a new stream.
    pub fn reset(&mut self, window_size: usize) {
        self.literals.reset(LITERAL_SYMBOLS);
        self.distances.reset(window_size);
        self.lengths.reset(window_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tables_are_sized_per_category() {
        let mut tables = RankTables::new(1024);
        assert_eq!(tables.literals.len(), LITERAL_SYMBOLS);
        assert_eq!(tables.distances.len(), 1024);
        assert_eq!(tables.lengths.len(), 1024);

        tables.distances.bump(700);
        tables.reset(4096);
        assert_eq!(tables.distances.len(), 4096);
        assert_eq!(tables.distances.frequency(700), 0);
        assert_eq!(tables.distances.rank_of(700), 700);
    }

    #[test]
    fn fresh_heap_is_identity() {
        let heap = FrequencyHeap::new(128);
        assert_eq!(heap.len(), 128);
        for symbol in 0..128 {
            assert_eq!(heap.rank_of(symbol), symbol);
            assert_eq!(heap.symbol_at(symbol), Some(symbol));
            assert_eq!(heap.frequency(symbol), 0);
        }
        assert_eq!(heap.symbol_at(128), None);
        assert!(heap.satisfies_heap_property());
    }

    #[test]
    fn bump_promotes_strictly_more_frequent_symbols() {
        let mut heap = FrequencyHeap::new(8);
        // symbol 6 sits in slot 6, parent 2, grandparent 0
        assert_eq!(heap.bump(6), 0);
        assert_eq!(heap.symbol_at(0), Some(6));
        assert_eq!(heap.symbol_at(2), Some(0));
        assert_eq!(heap.symbol_at(6), Some(2));

        // equal counts do not displace the incumbent
        assert_eq!(heap.bump(1), 1);
        assert_eq!(heap.symbol_at(0), Some(6));

        assert_eq!(heap.bump(1), 0);
        assert_eq!(heap.symbol_at(0), Some(1));
        assert_eq!(heap.symbol_at(1), Some(6));
        assert!(heap.satisfies_heap_property());
    }

    #[test]
    fn reset_discards_previous_stream() {
        let mut heap = FrequencyHeap::new(16);
        for symbol in [5, 5, 9, 15, 15, 15] {
            heap.bump(symbol);
        }
        heap.reset(16);
        assert_eq!(heap, FrequencyHeap::new(16));

        heap.reset(4);
        assert_eq!(heap.len(), 4);
        assert_eq!(heap.symbol_at(3), Some(3));
    }

    #[test]
    fn empty_heap() {
        let heap = FrequencyHeap::new(0);
        assert!(heap.is_empty());
        assert_eq!(heap.symbol_at(0), None);
        assert!(heap.satisfies_heap_property());
    }

    proptest! {
        #[test]
        fn heap_property_holds_after_every_bump(
            bumps in prop::collection::vec(0usize..64, 0..512),
        ) {
            let mut heap = FrequencyHeap::new(64);
            for symbol in bumps {
                let rank = heap.bump(symbol);
                prop_assert_eq!(heap.rank_of(symbol), rank);
                prop_assert!(heap.satisfies_heap_property());
            }
        }

        #[test]
        fn independent_heaps_stay_synchronized(
            bumps in prop::collection::vec(0usize..200, 0..400),
        ) {
            let mut encoder = FrequencyHeap::new(200);
            let mut decoder = FrequencyHeap::new(200);
            for symbol in bumps {
                let rank = encoder.rank_of(symbol);
                prop_assert_eq!(decoder.symbol_at(rank), Some(symbol));
                encoder.bump(symbol);
                decoder.bump(symbol);
                for probe in 0..200 {
                    prop_assert_eq!(encoder.rank_of(probe), decoder.rank_of(probe));
                }
            }
        }

        #[test]
        fn root_holds_a_most_frequent_symbol(
            bumps in prop::collection::vec(0usize..32, 1..256),
        ) {
            let mut heap = FrequencyHeap::new(32);
            for &symbol in &bumps {
                heap.bump(symbol);
            }
            let root = heap.symbol_at(0).unwrap();
            let max = (0..32).map(|symbol| heap.frequency(symbol)).max().unwrap();
            prop_assert_eq!(heap.frequency(root), max);
        }
    }
}
