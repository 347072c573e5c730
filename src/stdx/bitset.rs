//! Heap-backed bitset whose length is fixed at construction.
//!
//! Bits live in a `Vec<u64>` sized to `words_for_bits(bit_length)`. The bits of the
//! last word at positions `>= bit_length` are padding: they are zero after every
//! operation, so word-at-a-time scans (`any`, `count`, subset checks, equality) never
//! need to mask on read. Only the bulk writers that can produce ones in the padding
//! (`set_all`, `flip_all`) re-mask the last word.

use core::fmt;

const WORD_BITS: usize = u64::BITS as usize;

/// Computes the number of `u64` words needed to store `n` bits.
pub const fn words_for_bits(n: usize) -> usize {
    n.div_ceil(WORD_BITS)
}

/// Mask of the addressable bits in the last word of a `bit_length`-bit set.
#[inline(always)]
const fn last_word_mask(bit_length: usize) -> u64 {
    let remaining_bits = bit_length % WORD_BITS;
    if remaining_bits == 0 {
        u64::MAX
    } else {
        (1u64 << remaining_bits) - 1
    }
}

/// Error returned by the checked accessors when an index is `>= size()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub bit_length: usize,
}

impl fmt::Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bit index {} out of bounds for bit set of length {}",
            self.index, self.bit_length
        )
    }
}

impl std::error::Error for IndexOutOfBounds {}

/// Fixed-length bit vector backed by owned `u64` words.
///
/// All indexing operations panic when `idx >= size()`; the `try_*` variants return
/// [`IndexOutOfBounds`] instead. Comparisons (`is_subset_of`, `is_proper_subset_of`)
/// require both sets to have the same length and panic otherwise.
///
/// `Clone` is a deep copy: the clone owns its own words.
///
/// # Examples
/// ```
/// use fca::stdx::BitSet;
///
/// let mut bits = BitSet::empty(100);
/// bits.set(1);
/// bits.set(64);
/// assert_eq!(bits.iter().collect::<Vec<_>>(), vec![1, 64]);
///
/// bits.flip_all();
/// assert_eq!(bits.count(), 98);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    words: Vec<u64>,
    bit_length: usize,
}

impl BitSet {
    /// Creates a bitset of `bit_length` bits, all unset. A length of zero is allowed.
    pub fn empty(bit_length: usize) -> Self {
        let bits = Self {
            words: vec![0u64; words_for_bits(bit_length)],
            bit_length,
        };

        debug_assert!(bits.none());
        bits
    }

    /// Same as [`BitSet::empty`].
    #[inline]
    pub fn new(bit_length: usize) -> Self {
        Self::empty(bit_length)
    }

    /// Creates a bitset of `bit_length` bits, all set.
    pub fn full(bit_length: usize) -> Self {
        let mut bits = Self::empty(bit_length);
        bits.set_all();
        bits
    }

    /// Number of addressable bits.
    #[inline]
    pub fn size(&self) -> usize {
        self.bit_length
    }

    /// Same as [`BitSet::size`].
    #[inline]
    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    #[inline]
    pub fn word_len(&self) -> usize {
        self.words.len()
    }

    /// Backing words, least significant bit first. Padding bits are always zero.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    #[inline(always)]
    fn locate(idx: usize) -> (usize, u64) {
        (idx / WORD_BITS, 1u64 << (idx % WORD_BITS))
    }

    #[inline]
    fn check_index(&self, idx: usize) -> Result<(), IndexOutOfBounds> {
        if idx < self.bit_length {
            Ok(())
        } else {
            Err(IndexOutOfBounds {
                index: idx,
                bit_length: self.bit_length,
            })
        }
    }

    /// Clears the padding bits of the last word.
    #[inline]
    fn mask_padding(&mut self) {
        let mask = last_word_mask(self.bit_length);
        if let Some(last) = self.words.last_mut() {
            *last &= mask;
        }
    }

    fn padding_is_clear(&self) -> bool {
        let mask = last_word_mask(self.bit_length);
        self.words.last().is_none_or(|&last| last & !mask == 0)
    }

    /// Returns whether `idx` is set.
    ///
    /// Panics if `idx >= size()`.
    #[inline]
    pub fn test(&self, idx: usize) -> bool {
        assert!(idx < self.bit_length, "bit index out of bounds");
        let (word_idx, bit) = Self::locate(idx);
        self.words[word_idx] & bit != 0
    }

    /// Same as [`BitSet::test`].
    #[inline]
    pub fn is_set(&self, idx: usize) -> bool {
        self.test(idx)
    }

    /// Sets the bit at `idx`.
    ///
    /// Panics if `idx >= size()`.
    #[inline]
    pub fn set(&mut self, idx: usize) {
        assert!(idx < self.bit_length, "bit index out of bounds");
        let (word_idx, bit) = Self::locate(idx);
        self.words[word_idx] |= bit;
        debug_assert!(self.test(idx));
    }

    /// Clears the bit at `idx`.
    ///
    /// Panics if `idx >= size()`.
    #[inline]
    pub fn reset(&mut self, idx: usize) {
        assert!(idx < self.bit_length, "bit index out of bounds");
        let (word_idx, bit) = Self::locate(idx);
        self.words[word_idx] &= !bit;
        debug_assert!(!self.test(idx));
    }

    /// Inverts the bit at `idx`.
    ///
    /// Panics if `idx >= size()`.
    #[inline]
    pub fn flip(&mut self, idx: usize) {
        assert!(idx < self.bit_length, "bit index out of bounds");
        let (word_idx, bit) = Self::locate(idx);
        self.words[word_idx] ^= bit;
    }

    /// Sets or clears the bit at `idx` based on `value`.
    ///
    /// Panics if `idx >= size()`.
    #[inline]
    pub fn set_value(&mut self, idx: usize, value: bool) {
        assert!(idx < self.bit_length, "bit index out of bounds");
        let word_idx = idx / WORD_BITS;
        let bit_idx = idx % WORD_BITS;
        let bit_mask = 1u64 << bit_idx;

        // Branchless: clear the bit, then OR in the new value.
        let val_mask = (value as u64) << bit_idx;
        self.words[word_idx] = (self.words[word_idx] & !bit_mask) | val_mask;

        debug_assert!(self.test(idx) == value);
    }

    pub fn try_test(&self, idx: usize) -> Result<bool, IndexOutOfBounds> {
        self.check_index(idx)?;
        Ok(self.test(idx))
    }

    pub fn try_set(&mut self, idx: usize) -> Result<(), IndexOutOfBounds> {
        self.check_index(idx)?;
        self.set(idx);
        Ok(())
    }

    pub fn try_reset(&mut self, idx: usize) -> Result<(), IndexOutOfBounds> {
        self.check_index(idx)?;
        self.reset(idx);
        Ok(())
    }

    pub fn try_flip(&mut self, idx: usize) -> Result<(), IndexOutOfBounds> {
        self.check_index(idx)?;
        self.flip(idx);
        Ok(())
    }

    /// Sets every bit in `[0, size())`.
    pub fn set_all(&mut self) {
        self.words.fill(u64::MAX);
        self.mask_padding();

        debug_assert!(self.is_full());
        debug_assert!(self.padding_is_clear());
    }

    /// Clears all bits.
    pub fn reset_all(&mut self) {
        self.words.fill(0);

        debug_assert!(self.none());
    }

    /// Inverts every bit in `[0, size())`.
    pub fn flip_all(&mut self) {
        for word in &mut self.words {
            *word = !*word;
        }
        // Inverting the last word turned its padding on.
        self.mask_padding();

        debug_assert!(self.padding_is_clear());
    }

    /// Returns `true` when at least one bit is set. Always `false` for a zero-length set.
    #[inline]
    pub fn any(&self) -> bool {
        self.words.iter().any(|&word| word != 0)
    }

    /// Returns `true` when no bit is set.
    #[inline]
    pub fn none(&self) -> bool {
        !self.any()
    }

    /// Returns `true` when every bit in `[0, size())` is set.
    pub fn is_full(&self) -> bool {
        let Some((&last, complete)) = self.words.split_last() else {
            return true;
        };
        complete.iter().all(|&word| word == u64::MAX)
            && last == last_word_mask(self.bit_length)
    }

    /// Counts set bits; never exceeds `size()`.
    pub fn count(&self) -> usize {
        let total: usize = self.words.iter().map(|word| word.count_ones() as usize).sum();
        debug_assert!(total <= self.bit_length);
        total
    }

    /// Lowest set bit, if any.
    pub fn first_set(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|&(_, &word)| word != 0)
            .map(|(word_idx, &word)| {
                let idx = word_idx * WORD_BITS + word.trailing_zeros() as usize;
                debug_assert!(idx < self.bit_length);
                idx
            })
    }

    /// Lowest unset bit; `None` when full.
    pub fn first_unset(&self) -> Option<usize> {
        for (word_idx, &word) in self.words.iter().enumerate() {
            let inverted = !word;
            if inverted != 0 {
                let idx = word_idx * WORD_BITS + inverted.trailing_zeros() as usize;
                // Only the last word can hit this, and only on its padding.
                return (idx < self.bit_length).then_some(idx);
            }
        }
        None
    }

    /// Returns `true` if every set bit in `self` is also set in `other`.
    ///
    /// Panics if the lengths differ.
    pub fn is_subset_of(&self, other: &BitSet) -> bool {
        assert!(self.bit_length == other.bit_length, "bit set lengths differ");
        self.words
            .iter()
            .zip(&other.words)
            .all(|(&a, &b)| a & !b == 0)
    }

    /// Returns `true` if `self` is a subset of `other` and the two differ.
    ///
    /// Panics if the lengths differ.
    pub fn is_proper_subset_of(&self, other: &BitSet) -> bool {
        assert!(self.bit_length == other.bit_length, "bit set lengths differ");
        let mut differs = false;
        for (&a, &b) in self.words.iter().zip(&other.words) {
            if a & !b != 0 {
                return false;
            }
            differs |= a != b;
        }
        differs
    }

    /// Iterates over set bits in ascending order.
    #[inline]
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            words: &self.words,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = BitSetIter<'a>;

    fn into_iter(self) -> BitSetIter<'a> {
        self.iter()
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct SetBits<'a>(&'a BitSet);

        impl fmt::Debug for SetBits<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_set().entries(self.0.iter()).finish()
            }
        }

        f.debug_struct("BitSet")
            .field("bit_length", &self.bit_length)
            .field("set", &SetBits(self))
            .finish()
    }
}

/// Iterator over set bit indices in ascending order, produced by [`BitSet::iter`].
#[derive(Clone)]
pub struct BitSetIter<'a> {
    words: &'a [u64],
    word_idx: usize,
    current_word: u64,
}

impl Iterator for BitSetIter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;

                // Clear the lowest set bit.
                self.current_word &= self.current_word.wrapping_sub(1);
                return Some(self.word_idx * WORD_BITS + bit_idx);
            }

            self.word_idx += 1;
            if self.word_idx >= self.words.len() {
                return None;
            }
            self.current_word = self.words[self.word_idx];
        }
    }
}

impl core::iter::FusedIterator for BitSetIter<'_> {}
