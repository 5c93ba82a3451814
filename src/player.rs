//! Players: a board, an attack log, and for the computer the targeting state.

use alloc::string::String;
use alloc::vec::Vec;

use log::{debug, info};
use rand::Rng;

use crate::board::Board;
use crate::cell_set::CellSet;
use crate::common::{AttackOutcome, GameError};
use crate::config::{PlacementPolicy, BOARD_SIZE};
use crate::coord::Coordinate;
use crate::targeting::{self, Targeting};

/// One shot in a player's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRecord {
    pub coordinate: Coordinate,
    pub outcome: AttackOutcome,
}

impl AttackRecord {
    pub fn is_hit(&self) -> bool {
        self.outcome.is_hit()
    }
}

/// A participant in a match, human or computer controlled.
#[derive(Debug, Clone)]
pub struct Player {
    id: u8,
    name: String,
    board: Board,
    history: Vec<AttackRecord>,
    attacked: CellSet,
    hits: usize,
    misses: usize,
    targeting: Option<Targeting>,
}

impl Player {
    /// Human-controlled player with an empty board.
    pub fn human(id: u8, name: impl Into<String>, policy: PlacementPolicy) -> Self {
        Self::build(id, name.into(), policy, None)
    }

    /// Computer-controlled player with an empty board and idle targeting.
    pub fn computer(id: u8, name: impl Into<String>, policy: PlacementPolicy) -> Self {
        Self::build(id, name.into(), policy, Some(Targeting::new()))
    }

    fn build(id: u8, name: String, policy: PlacementPolicy, targeting: Option<Targeting>) -> Self {
        Self {
            id,
            name,
            board: Board::with_policy(policy),
            history: Vec::new(),
            attacked: CellSet::new(),
            hits: 0,
            misses: 0,
            targeting,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_computer(&self) -> bool {
        self.targeting.is_some()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Every accepted shot, oldest first.
    pub fn history(&self) -> &[AttackRecord] {
        &self.history
    }

    pub fn last_attack(&self) -> Option<&AttackRecord> {
        self.history.last()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Whether this player has already fired at `c`.
    pub fn has_attacked(&self, c: Coordinate) -> bool {
        self.attacked.contains(c)
    }

    /// Targeting state, only present for the computer.
    pub fn targeting(&self) -> Option<&Targeting> {
        self.targeting.as_ref()
    }

    /// Fire at `c` on the opponent's board.
    ///
    /// Returns `Ok(false)` without changing anything when `c` was already
    /// attacked. Hit or miss is read from [`Player::last_attack`].
    pub fn attack(&mut self, opponent: &mut Player, c: Coordinate) -> Result<bool, GameError> {
        Ok(self.attack_board(&mut opponent.board, c)?.is_some())
    }

    /// Same as [`Player::attack`] against a bare board, returning the record.
    pub fn attack_board(
        &mut self,
        target: &mut Board,
        c: Coordinate,
    ) -> Result<Option<AttackRecord>, GameError> {
        if self.attacked.contains(c) {
            debug!("{} already attacked {}", self.name, c);
            return Ok(None);
        }
        let outcome = target.receive_attack(c)?;
        if outcome == AttackOutcome::AlreadyAttacked {
            return Ok(None);
        }
        self.attacked.insert(c);
        if outcome.is_hit() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        let record = AttackRecord {
            coordinate: c,
            outcome,
        };
        self.history.push(record);
        info!("{} fires at {}: {:?}", self.name, c, outcome);

        if let Some(targeting) = self.targeting.as_mut() {
            let sunk_cells = match outcome {
                AttackOutcome::Sunk(id) => target.ship_cells(id),
                _ => None,
            };
            let spaced = !target.policy().allow_adjacent;
            targeting.record(c, outcome, &self.attacked, sunk_cells, spaced);
        }
        Ok(Some(record))
    }

    /// Let the targeting logic pick a cell and fire at it.
    ///
    /// Players without targeting state shoot at random unattacked cells.
    /// Returns the coordinate fired at, or `None` once every cell is used up.
    pub fn computer_attack<R: Rng + ?Sized>(
        &mut self,
        opponent: &mut Player,
        rng: &mut R,
    ) -> Result<Option<Coordinate>, GameError> {
        Ok(self
            .computer_attack_board(&mut opponent.board, rng)?
            .map(|r| r.coordinate))
    }

    /// Same as [`Player::computer_attack`] against a bare board.
    pub fn computer_attack_board<R: Rng + ?Sized>(
        &mut self,
        target: &mut Board,
        rng: &mut R,
    ) -> Result<Option<AttackRecord>, GameError> {
        let mut refused = CellSet::new();
        for _ in 0..(BOARD_SIZE as usize * BOARD_SIZE as usize) {
            let attacked = self.attacked | refused;
            let next = match self.targeting.as_mut() {
                Some(targeting) => targeting.next_target(&attacked, rng),
                None => targeting::random_target(&attacked, &attacked, rng),
            };
            let Some(c) = next else {
                return Ok(None);
            };
            if let Some(record) = self.attack_board(target, c)? {
                return Ok(Some(record));
            }
            // Cell was shot by someone else; remember and pick again.
            refused.insert(c);
        }
        Ok(None)
    }

    /// Zero the score and forget all shots and targeting memory.
    pub fn reset_score(&mut self) {
        self.hits = 0;
        self.misses = 0;
        self.history.clear();
        self.attacked.clear();
        if let Some(targeting) = self.targeting.as_mut() {
            targeting.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::{Orientation, ShipKind};
    use rand::{rngs::SmallRng, SeedableRng};

    fn at(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    fn pair() -> (Player, Player) {
        let human = Player::human(1, "Human", PlacementPolicy::SPACED);
        let mut cpu = Player::computer(2, "Computer", PlacementPolicy::SPACED);
        let boat = cpu.board_mut().add_ship(ShipKind::PatrolBoat);
        cpu.board_mut()
            .place_ship(boat, at("A1"), Orientation::Vertical)
            .unwrap();
        (human, cpu)
    }

    #[test]
    fn duplicate_attack_is_rejected() {
        let (mut human, mut cpu) = pair();
        assert!(human.attack(&mut cpu, at("A1")).unwrap());
        assert!(!human.attack(&mut cpu, at("A1")).unwrap());
        assert_eq!(human.hits(), 1);
        assert_eq!(human.misses(), 0);
        assert_eq!(human.history().len(), 1);
        assert_eq!(cpu.board().fleet().list()[0].hits(), 1);
    }

    #[test]
    fn score_matches_history() {
        let (mut human, mut cpu) = pair();
        for c in ["A1", "B1", "C1", "A2"] {
            human.attack(&mut cpu, at(c)).unwrap();
        }
        assert_eq!(human.hits(), 2);
        assert_eq!(human.misses(), 2);
        assert_eq!(human.hits() + human.misses(), human.history().len());
        assert!(cpu.board().all_ships_sunk());
        assert!(matches!(
            human.last_attack().unwrap().outcome,
            AttackOutcome::Sunk(_)
        ));

        human.reset_score();
        assert_eq!(human.history().len(), 0);
        assert!(!human.has_attacked(at("A1")));
    }

    #[test]
    fn computer_follows_up_a_hit() {
        let (_, mut cpu) = pair();
        let mut hunter = Player::computer(3, "Hunter", PlacementPolicy::SPACED);
        hunter.attack(&mut cpu, at("A1")).unwrap();
        assert!(hunter.targeting().unwrap().is_tracking());

        let mut rng = SmallRng::seed_from_u64(5);
        let next = hunter.computer_attack(&mut cpu, &mut rng).unwrap().unwrap();
        assert!(at("A1").orthogonal_neighbors().contains(&next));
    }

    #[test]
    fn computer_eventually_clears_board() {
        let (_, mut cpu) = pair();
        let mut hunter = Player::computer(3, "Hunter", PlacementPolicy::SPACED);
        let mut rng = SmallRng::seed_from_u64(17);
        let mut shots = 0;
        while hunter.computer_attack(&mut cpu, &mut rng).unwrap().is_some() {
            shots += 1;
        }
        assert_eq!(shots, 100);
        assert!(cpu.board().all_ships_sunk());
    }
}
