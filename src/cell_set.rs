//! A fixed-size set of board cells packed into a `u128`.
//!
//! The board has `BOARD_SIZE²` = 100 cells, so one bit per cell fits in a
//! single integer. Used for attack bookkeeping and the computer's no-go zone.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

use crate::config::BOARD_SIZE;
use crate::coord::Coordinate;

const SIZE: usize = BOARD_SIZE as usize;
const CELLS: usize = SIZE * SIZE;

/// Set of coordinates, one bit per cell in row-major order.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct CellSet {
    bits: u128,
}

impl CellSet {
    /// Empty set.
    #[inline]
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Every cell on the board.
    #[inline]
    pub const fn full() -> Self {
        Self {
            bits: (1u128 << CELLS) - 1,
        }
    }

    /// Add `c`; returns `true` when it was not already present.
    #[inline]
    pub fn insert(&mut self, c: Coordinate) -> bool {
        let bit = 1u128 << c.index();
        let fresh = self.bits & bit == 0;
        self.bits |= bit;
        fresh
    }

    /// Remove `c`; returns `true` when it was present.
    #[inline]
    pub fn remove(&mut self, c: Coordinate) -> bool {
        let bit = 1u128 << c.index();
        let present = self.bits & bit != 0;
        self.bits &= !bit;
        present
    }

    #[inline]
    pub fn contains(&self, c: Coordinate) -> bool {
        (self.bits >> c.index()) & 1 == 1
    }

    /// Number of cells in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// `true` if the two sets share at least one cell.
    #[inline]
    pub fn intersects(&self, other: &CellSet) -> bool {
        self.bits & other.bits != 0
    }

    /// Cells of the board not in this set.
    #[inline]
    pub fn complement(&self) -> CellSet {
        CellSet {
            bits: !self.bits & Self::full().bits,
        }
    }

    /// Iterate members in row-major order.
    pub fn iter(&self) -> Iter {
        Iter {
            bits: self.bits,
            idx: 0,
        }
    }
}

impl FromIterator<Coordinate> for CellSet {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        let mut set = CellSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Coordinate> for CellSet {
    fn extend<I: IntoIterator<Item = Coordinate>>(&mut self, iter: I) {
        for c in iter {
            self.insert(c);
        }
    }
}

impl BitOr for CellSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        CellSet {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for CellSet {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CellSet({}):", self.len())?;
        for y in 0..SIZE {
            for x in 0..SIZE {
                let bit = if (self.bits >> (y * SIZE + x)) & 1 == 1 {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over the members of a [`CellSet`].
#[derive(Clone, Copy)]
pub struct Iter {
    bits: u128,
    idx: usize,
}

impl Iterator for Iter {
    type Item = Coordinate;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < CELLS {
            let idx = self.idx;
            self.idx += 1;
            if (self.bits >> idx) & 1 == 1 {
                return Coordinate::from_index(idx);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_contains() {
        let mut set = CellSet::new();
        let c = Coordinate::new(3, 7).unwrap();
        assert!(set.insert(c));
        assert!(!set.insert(c));
        assert!(set.contains(c));
        assert_eq!(set.len(), 1);
        assert!(set.remove(c));
        assert!(set.is_empty());
    }

    #[test]
    fn complement_covers_rest_of_board() {
        let set: CellSet = [Coordinate::new(0, 0).unwrap(), Coordinate::new(9, 9).unwrap()]
            .into_iter()
            .collect();
        let rest = set.complement();
        assert_eq!(rest.len(), 98);
        assert!(!rest.intersects(&set));
        assert_eq!((rest | set), CellSet::full());
    }

    #[test]
    fn iterates_in_row_major_order() {
        let a = Coordinate::new(5, 0).unwrap();
        let b = Coordinate::new(1, 2).unwrap();
        let set: CellSet = [b, a].into_iter().collect();
        let cells: Vec<_> = set.iter().collect();
        assert_eq!(cells, vec![a, b]);
    }
}
