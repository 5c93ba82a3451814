use alloc::string::{String, ToString};

use crate::ship::ShipKind;

pub const BOARD_SIZE: u8 = 10;
pub const NUM_SHIPS: usize = 5;
pub const FLEET: [ShipKind; NUM_SHIPS] = [
    ShipKind::Carrier,
    ShipKind::Battleship,
    ShipKind::Destroyer,
    ShipKind::Submarine,
    ShipKind::PatrolBoat,
];

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = fleet_cells(&FLEET);

/// Sum of the lengths of `kinds`.
pub const fn fleet_cells(kinds: &[ShipKind]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < kinds.len() {
        total += kinds[i].length();
        i += 1;
    }
    total
}

/// How many random (orientation, start) samples a single ship gets before
/// random placement gives up.
pub const PLACEMENT_ATTEMPTS: usize = 100;

/// Rejection-sampling budget for a random target before falling back to an
/// exhaustive scan of the remaining cells.
pub const RANDOM_TARGET_ATTEMPTS: usize = 1_000;

/// Rules applied when a ship is placed on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementPolicy {
    /// Whether ships may touch each other, diagonals included.
    pub allow_adjacent: bool,
}

impl PlacementPolicy {
    /// Ships must keep one empty cell between each other in all eight directions.
    pub const SPACED: Self = Self {
        allow_adjacent: false,
    };

    /// Ships may touch as long as they do not overlap.
    pub const TOUCHING: Self = Self {
        allow_adjacent: true,
    };
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self::SPACED
    }
}

/// Settings for a single match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Fixed RNG seed for reproducible matches. `None` seeds from the thread RNG
    /// (or from zero without `std`).
    pub seed: Option<u64>,
    /// Policy used for both boards.
    pub placement: PlacementPolicy,
    pub human_name: String,
    pub computer_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            placement: PlacementPolicy::default(),
            human_name: "Human".to_string(),
            computer_name: "Computer".to_string(),
        }
    }
}

impl GameConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fleet_cell_total_follows_ship_lengths() {
        assert_eq!(TOTAL_SHIP_CELLS, 17);
        assert_eq!(fleet_cells(&[ShipKind::PatrolBoat, ShipKind::Carrier]), 7);
        assert_eq!(fleet_cells(&[]), 0);
    }
}
