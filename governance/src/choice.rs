//! Multi-select ballot encoding.
//!
//! A selection is a bitset over choice indices: bit `i` set means choice `i`
//! is selected. Validation against a proposal's bounds is a mask test plus a
//! population count.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoiceMask(u32);

impl ChoiceMask {
    pub const EMPTY: Self = Self(0);

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// A mask with exactly one choice selected. Indices `>= 32` yield an empty mask.
    pub fn single(index: u8) -> Self {
        Self(1u32.checked_shl(index as u32).unwrap_or(0))
    }

    /// A mask selecting every listed index. Indices `>= 32` are ignored.
    pub fn from_indices(indices: &[u8]) -> Self {
        Self(indices.iter().fold(0, |acc, i| acc | Self::single(*i).0))
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn contains(&self, index: u8) -> bool {
        index < 32 && self.0 & (1 << index) != 0
    }

    /// Whether this selection is legal for a ballot of `choice_count` choices
    /// requiring between `min` and `max` selections.
    pub fn is_valid_for(&self, choice_count: usize, min: u8, max: u8) -> bool {
        let allowed = match choice_count {
            0 => 0,
            n if n >= 32 => u32::MAX,
            n => (1u32 << n) - 1,
        };
        let selected = self.count();
        self.0 & !allowed == 0 && selected >= min as u32 && selected <= max as u32
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..32).filter(move |i| self.contains(*i))
    }
}

impl fmt::Debug for ChoiceMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChoiceMask({:#b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_and_from_indices_agree() {
        assert_eq!(ChoiceMask::single(2), ChoiceMask::from_bits(0b100));
        assert_eq!(ChoiceMask::from_indices(&[0, 2]), ChoiceMask::from_bits(0b101));
        assert_eq!(ChoiceMask::single(32), ChoiceMask::EMPTY);
    }

    #[test]
    fn indices_are_ascending() {
        let mask = ChoiceMask::from_indices(&[5, 1, 3]);
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn validation_checks_range_and_popcount() {
        let one_of_three = ChoiceMask::single(2);
        assert!(one_of_three.is_valid_for(3, 1, 1));
        assert!(!ChoiceMask::single(3).is_valid_for(3, 1, 1));
        assert!(!ChoiceMask::EMPTY.is_valid_for(3, 1, 1));
        assert!(!ChoiceMask::from_indices(&[0, 1]).is_valid_for(3, 1, 1));
        assert!(ChoiceMask::from_indices(&[0, 1]).is_valid_for(3, 1, 2));
        assert!(!ChoiceMask::from_indices(&[0]).is_valid_for(3, 2, 3));
    }

    #[test]
    fn full_width_ballot_allows_top_bit() {
        let mask = ChoiceMask::single(31);
        assert!(mask.is_valid_for(32, 1, 1));
        assert!(!mask.is_valid_for(31, 1, 1));
    }
}
