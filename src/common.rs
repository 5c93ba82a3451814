//! Common types for Broadside: attack outcomes and the error taxonomy.

use alloc::string::String;
use thiserror::Error;

use crate::ship::ShipId;

/// Result of a single shot against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// Shot landed in open water.
    Miss,
    /// Shot struck a ship that is still afloat.
    Hit(ShipId),
    /// Shot struck the last intact segment of a ship.
    Sunk(ShipId),
    /// The cell had already been shot at; nothing changed.
    AlreadyAttacked,
}

impl AttackOutcome {
    /// `true` for both plain hits and the sinking hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, AttackOutcome::Hit(_) | AttackOutcome::Sunk(_))
    }

    /// Ship struck by this shot, if any.
    pub fn ship(&self) -> Option<ShipId> {
        match *self {
            AttackOutcome::Hit(id) | AttackOutcome::Sunk(id) => Some(id),
            AttackOutcome::Miss | AttackOutcome::AlreadyAttacked => None,
        }
    }
}

/// Why a ship could not be put at the requested position.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("ship would extend past the edge of the board")]
    OutOfBounds,
    #[error("ship would overlap another ship")]
    Overlaps,
    #[error("ship would touch another ship")]
    Adjacent,
    #[error("ship is already on the board")]
    AlreadyPlaced,
}

/// Errors returned by board, player and game operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Letter/number or index pair lies outside the board.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("invalid placement: {0}")]
    InvalidPlacement(#[from] PlacementError),
    /// Random placement ran out of attempts for the named ship.
    #[error("no legal position found for {ship}")]
    PlacementExhausted { ship: &'static str },
    #[error("unknown ship type: {0}")]
    UnknownShipType(String),
    /// Ship id is not registered on this board.
    #[error("no ship with id {0}")]
    UnknownShip(ShipId),
    #[error("ship {0} is already sunk")]
    AlreadySunk(ShipId),
    #[error("game is over")]
    GameOver,
    /// Start requested before both fleets are on the board.
    #[error("not every ship has been placed")]
    NotReady,
    #[error("game has not started")]
    NotStarted,
    /// Fleet changes are only allowed before the first shot.
    #[error("game is already in progress")]
    AlreadyStarted,
    #[error("the side to move is not computer-controlled")]
    NotComputerTurn,
    /// The operation needs players, but `initialize` has not run.
    #[error("game has not been initialized")]
    NotInitialized,
}
