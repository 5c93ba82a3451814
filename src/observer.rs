//! Hooks for presentation code that wants to follow a match.

use log::info;

use crate::board::Board;
use crate::coord::Coordinate;
use crate::game::Side;
use crate::player::Player;

/// Receives match events. Every method defaults to doing nothing.
pub trait GameObserver {
    /// A ship was placed or a shot landed on `side`'s board.
    fn board_changed(&mut self, _side: Side, _board: &Board) {}

    /// `attacker` fired at `coordinate`.
    fn attack_resolved(&mut self, _attacker: &Player, _coordinate: Coordinate, _hit: bool) {}

    /// The match ended with a winner.
    fn game_over(&mut self, _winner: &str) {}
}

/// Observer that writes every event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl GameObserver for LogObserver {
    fn board_changed(&mut self, side: Side, board: &Board) {
        info!(
            "{:?} board: {} ship(s) afloat, {} hit(s), {} miss(es)",
            side,
            board.fleet().active_count(),
            board.successful_attacks().len(),
            board.missed_attacks().len()
        );
    }

    fn attack_resolved(&mut self, attacker: &Player, coordinate: Coordinate, hit: bool) {
        info!(
            "{} -> {} {} (score {}/{})",
            attacker.name(),
            coordinate,
            if hit { "hit" } else { "miss" },
            attacker.hits(),
            attacker.misses()
        );
    }

    fn game_over(&mut self, winner: &str) {
        info!("{} wins", winner);
    }
}
