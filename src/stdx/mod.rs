pub mod bitset;

pub use bitset::{BitSet, BitSetIter, IndexOutOfBounds};
