//! Board coordinates and the letter/number codec.
//!
//! Internally every position is a zero-based `(x, y)` pair where `x` is the
//! column and `y` the row. Human notation (`A1`..`J10`) is converted only at
//! the edges: column letters map to `x`, one-based row numbers to `y`.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use rand::Rng;

use crate::common::GameError;
use crate::config::BOARD_SIZE;

const SIZE: usize = BOARD_SIZE as usize;

/// Convert human notation into zero-based `(x, y)` indices.
///
/// Lower-case letters are accepted.
pub fn to_indices(letter: char, number: u8) -> Result<(usize, usize), GameError> {
    let upper = letter.to_ascii_uppercase();
    if !upper.is_ascii_uppercase() || number == 0 {
        return Err(GameError::InvalidCoordinate(format!("{}{}", letter, number)));
    }
    let x = (upper as u8 - b'A') as usize;
    let y = number as usize - 1;
    if x >= SIZE || y >= SIZE {
        return Err(GameError::InvalidCoordinate(format!("{}{}", letter, number)));
    }
    Ok((x, y))
}

/// Inverse of [`to_indices`].
pub fn from_indices(x: usize, y: usize) -> Result<(char, u8), GameError> {
    if x >= SIZE || y >= SIZE {
        return Err(GameError::InvalidCoordinate(format!("({}, {})", x, y)));
    }
    Ok(((b'A' + x as u8) as char, y as u8 + 1))
}

/// A cell on the board, always in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    x: u8,
    y: u8,
}

impl Coordinate {
    /// Build from zero-based column and row.
    pub fn new(x: usize, y: usize) -> Result<Self, GameError> {
        if x >= SIZE || y >= SIZE {
            return Err(GameError::InvalidCoordinate(format!("({}, {})", x, y)));
        }
        Ok(Self {
            x: x as u8,
            y: y as u8,
        })
    }

    /// Build from human notation, e.g. `('C', 7)`.
    pub fn from_notation(letter: char, number: u8) -> Result<Self, GameError> {
        let (x, y) = to_indices(letter, number)?;
        Ok(Self {
            x: x as u8,
            y: y as u8,
        })
    }

    /// Column letter and one-based row number.
    pub fn notation(&self) -> (char, u8) {
        ((b'A' + self.x) as char, self.y + 1)
    }

    /// Zero-based column.
    pub fn x(&self) -> usize {
        self.x as usize
    }

    /// Zero-based row.
    pub fn y(&self) -> usize {
        self.y as usize
    }

    /// Row-major index in `0..BOARD_SIZE²`.
    pub fn index(&self) -> usize {
        self.y as usize * SIZE + self.x as usize
    }

    /// Inverse of [`Coordinate::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= SIZE * SIZE {
            return None;
        }
        Some(Self {
            x: (index % SIZE) as u8,
            y: (index / SIZE) as u8,
        })
    }

    /// Shift by a signed offset, `None` when it falls off the board.
    pub fn offset(&self, dx: i32, dy: i32) -> Option<Self> {
        let x = self.x as i32 + dx;
        let y = self.y as i32 + dy;
        if x < 0 || y < 0 || x >= SIZE as i32 || y >= SIZE as i32 {
            return None;
        }
        Some(Self {
            x: x as u8,
            y: y as u8,
        })
    }

    /// Orthogonal neighbours clipped to the board, always in the order
    /// left, right, up, down.
    pub fn orthogonal_neighbors(&self) -> Vec<Coordinate> {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .iter()
            .filter_map(|&(dx, dy)| self.offset(dx, dy))
            .collect()
    }

    /// The up-to-eight cells touching this one, diagonals included.
    pub fn surrounding(&self) -> Vec<Coordinate> {
        let mut ring = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(c) = self.offset(dx, dy) {
                    ring.push(c);
                }
            }
        }
        ring
    }

    /// Every coordinate on the board in row-major order.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..SIZE * SIZE).filter_map(Coordinate::from_index)
    }

    /// Uniformly random coordinate.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.random_range(0..BOARD_SIZE),
            y: rng.random_range(0..BOARD_SIZE),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (letter, number) = self.notation();
        write!(f, "{}{}", letter, number)
    }
}

impl FromStr for Coordinate {
    type Err = GameError;

    /// Parse `"A5"`, `"j10"` and the like; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let mut chars = input.chars();
        let letter = chars
            .next()
            .ok_or_else(|| GameError::InvalidCoordinate(String::from(input)))?;
        let digits = chars.as_str();
        let well_formed = !digits.is_empty()
            && !digits.starts_with('0')
            && digits.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(GameError::InvalidCoordinate(String::from(input)));
        }
        let number: u8 = digits
            .parse()
            .map_err(|_| GameError::InvalidCoordinate(String::from(input)))?;
        Coordinate::from_notation(letter, number)
    }
}

impl TryFrom<(char, u8)> for Coordinate {
    type Error = GameError;

    fn try_from((letter, number): (char, u8)) -> Result<Self, Self::Error> {
        Coordinate::from_notation(letter, number)
    }
}
