//! Match controller: fleets, turn order, and the end of the game.

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::common::{GameError, PlacementError};
use crate::config::{GameConfig, FLEET};
use crate::coord::Coordinate;
use crate::observer::GameObserver;
use crate::player::{AttackRecord, Player};
use crate::ship::{Orientation, ShipId, ShipKind};

/// Seat at the table. The first side is the human, the second the computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// Where a match stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GamePhase {
    /// Fleets are still being placed.
    Setup,
    /// Every ship is placed; waiting for `start`.
    Ready,
    InProgress,
    Over,
}

/// What happened during one call to [`Game::take_turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    /// The requested shot, `None` when it was refused as a repeat.
    pub shot: Option<AttackRecord>,
    /// The computer's answer, fired in the same step.
    pub reply: Option<AttackRecord>,
    pub phase: GamePhase,
    pub winner: Option<Side>,
}

/// A human against the computer.
pub struct Game {
    config: GameConfig,
    players: Option<[Player; 2]>,
    current: Side,
    phase: GamePhase,
    winner: Option<Side>,
    rng: SmallRng,
    observers: Vec<Box<dyn GameObserver>>,
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        #[cfg(feature = "std")]
        None => SmallRng::from_rng(&mut rand::rng()),
        #[cfg(not(feature = "std"))]
        None => SmallRng::seed_from_u64(0),
    }
}

/// Borrow attacker and defender at the same time.
fn split(players: &mut [Player; 2], attacker: Side) -> (&mut Player, &mut Player) {
    let [first, second] = players;
    match attacker {
        Side::First => (first, second),
        Side::Second => (second, first),
    }
}

fn notify_attack(
    observers: &mut [Box<dyn GameObserver>],
    attacker: &Player,
    defender_side: Side,
    defender: &Player,
    record: &AttackRecord,
) {
    for o in observers.iter_mut() {
        o.attack_resolved(attacker, record.coordinate, record.is_hit());
        o.board_changed(defender_side, defender.board());
    }
}

impl Game {
    /// A game with no players yet; call [`Game::initialize`] next.
    pub fn new(config: GameConfig) -> Self {
        let rng = seeded_rng(config.seed);
        Self {
            config,
            players: None,
            current: Side::First,
            phase: GamePhase::Setup,
            winner: None,
            rng,
            observers: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    /// Create both players with the standard fleet, human to move first.
    pub fn initialize(&mut self) {
        self.initialize_with_fleet(&FLEET);
    }

    /// Like [`Game::initialize`] with a custom roster for both sides.
    pub fn initialize_with_fleet(&mut self, kinds: &[ShipKind]) {
        let policy = self.config.placement;
        let mut human = Player::human(1, self.config.human_name.as_str(), policy);
        let mut computer = Player::computer(2, self.config.computer_name.as_str(), policy);
        human.board_mut().add_ships(kinds);
        computer.board_mut().add_ships(kinds);
        self.players = Some([human, computer]);
        self.current = Side::First;
        self.phase = GamePhase::Setup;
        self.winner = None;
        info!("new game: {} ship(s) per side", kinds.len());
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Side whose move it is.
    pub fn current_turn(&self) -> Side {
        self.current
    }

    pub fn has_started(&self) -> bool {
        self.phase == GamePhase::InProgress
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    pub fn player(&self, side: Side) -> Option<&Player> {
        self.players.as_ref().map(|p| &p[side.index()])
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.player(self.current)
    }

    pub fn winner_side(&self) -> Option<Side> {
        self.winner
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.and_then(|side| self.player(side))
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner().map(|p| p.name())
    }

    fn ensure_setup(&self) -> Result<(), GameError> {
        if self.players.is_none() {
            return Err(GameError::NotInitialized);
        }
        match self.phase {
            GamePhase::Setup | GamePhase::Ready => Ok(()),
            GamePhase::InProgress => Err(GameError::AlreadyStarted),
            GamePhase::Over => Err(GameError::GameOver),
        }
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        if self.players.is_none() {
            return Err(GameError::NotInitialized);
        }
        match self.phase {
            GamePhase::InProgress => Ok(()),
            GamePhase::Over => Err(GameError::GameOver),
            GamePhase::Setup | GamePhase::Ready => Err(GameError::NotStarted),
        }
    }

    fn refresh_phase(&mut self) {
        let placed = self
            .players
            .as_ref()
            .is_some_and(|p| p.iter().all(|pl| pl.board().is_fully_placed()));
        let next = if placed { GamePhase::Ready } else { GamePhase::Setup };
        if next != self.phase {
            debug!("phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    fn notify_board(&mut self, side: Side) {
        if let Some(players) = self.players.as_ref() {
            let board = players[side.index()].board();
            for o in self.observers.iter_mut() {
                o.board_changed(side, board);
            }
        }
    }

    /// Put `side`'s unplaced ship of `kind` on its board.
    pub fn place_ships_for(
        &mut self,
        side: Side,
        kind: ShipKind,
        start: Coordinate,
        orientation: Orientation,
    ) -> Result<ShipId, GameError> {
        self.ensure_setup()?;
        let players = self.players.as_mut().ok_or(GameError::NotInitialized)?;
        let board = players[side.index()].board_mut();
        let mut of_kind = board.fleet().list().iter().filter(|s| s.kind() == kind);
        let first = of_kind
            .next()
            .ok_or_else(|| GameError::UnknownShipType(kind.title().to_string()))?
            .id();
        let id = core::iter::once(first)
            .chain(of_kind.map(|s| s.id()))
            .find(|&id| !board.is_placed(id))
            .ok_or(GameError::InvalidPlacement(PlacementError::AlreadyPlaced))?;
        board.place_ship(id, start, orientation)?;
        self.refresh_phase();
        self.notify_board(side);
        Ok(id)
    }

    /// Throw away `side`'s layout and place its whole fleet at random.
    pub fn randomize_ships(&mut self, side: Side) -> Result<(), GameError> {
        self.ensure_setup()?;
        let players = self.players.as_mut().ok_or(GameError::NotInitialized)?;
        let board = players[side.index()].board_mut();
        board.unplace_all();
        let result = board.place_fleet_randomly(&mut self.rng);
        self.refresh_phase();
        self.notify_board(side);
        result
    }

    /// Random layouts for both sides.
    pub fn place_all_randomly(&mut self) -> Result<(), GameError> {
        self.randomize_ships(Side::First)?;
        self.randomize_ships(Side::Second)
    }

    /// Begin play once both fleets are placed.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.ensure_setup()?;
        if self.phase != GamePhase::Ready {
            return Err(GameError::NotReady);
        }
        self.phase = GamePhase::InProgress;
        info!("game started");
        Ok(())
    }

    /// Fire for the side to move.
    ///
    /// A repeat shot is refused without passing the turn. When the human's
    /// shot does not end the game the computer answers before this returns.
    /// If the computer is to move, `c` is ignored and it plays its own shot.
    pub fn take_turn(&mut self, c: Coordinate) -> Result<TurnReport, GameError> {
        self.ensure_playing()?;
        let attacker = self.current;
        let players = self.players.as_mut().ok_or(GameError::NotInitialized)?;
        if players[attacker.index()].is_computer() {
            let reply = self.take_computer_turn()?;
            return Ok(self.report(None, reply));
        }

        let (me, them) = split(players, attacker);
        let Some(shot) = me.attack_board(them.board_mut(), c)? else {
            return Ok(self.report(None, None));
        };
        notify_attack(&mut self.observers, me, attacker.other(), them, &shot);
        let defeated = shot.is_hit() && them.board().all_ships_sunk();

        if defeated {
            self.finish(attacker);
            return Ok(self.report(Some(shot), None));
        }
        self.current = attacker.other();

        let reply = if self.current_player().is_some_and(|p| p.is_computer()) {
            self.take_computer_turn()?
        } else {
            None
        };
        Ok(self.report(Some(shot), reply))
    }

    /// Let the targeting logic fire for the side to move. Fails with
    /// `NotComputerTurn` while the human is to move.
    pub fn take_computer_turn(&mut self) -> Result<Option<AttackRecord>, GameError> {
        self.ensure_playing()?;
        let attacker = self.current;
        let players = self.players.as_mut().ok_or(GameError::NotInitialized)?;
        if !players[attacker.index()].is_computer() {
            return Err(GameError::NotComputerTurn);
        }
        let (me, them) = split(players, attacker);
        let Some(shot) = me.computer_attack_board(them.board_mut(), &mut self.rng)? else {
            return Ok(None);
        };
        notify_attack(&mut self.observers, me, attacker.other(), them, &shot);
        let defeated = shot.is_hit() && them.board().all_ships_sunk();

        if defeated {
            self.finish(attacker);
        } else {
            self.current = attacker.other();
        }
        Ok(Some(shot))
    }

    fn report(&self, shot: Option<AttackRecord>, reply: Option<AttackRecord>) -> TurnReport {
        TurnReport {
            shot,
            reply,
            phase: self.phase,
            winner: self.winner,
        }
    }

    fn finish(&mut self, winner: Side) {
        self.phase = GamePhase::Over;
        self.winner = Some(winner);
        if let Some(name) = self.winner_name() {
            info!("{} wins", name);
        }
        if let Some(players) = self.players.as_ref() {
            let name = players[winner.index()].name();
            for o in self.observers.iter_mut() {
                o.game_over(name);
            }
        }
    }

    /// Abandon a running match without a winner.
    pub fn end_game(&mut self) {
        if self.phase == GamePhase::InProgress {
            info!("game abandoned");
            self.phase = GamePhase::Over;
        }
    }

    /// Drop both players and return to setup. Call [`Game::initialize`] to
    /// play again.
    pub fn reset_game(&mut self) {
        if let Some(players) = self.players.as_mut() {
            for p in players.iter_mut() {
                p.reset_score();
                p.board_mut().clear_ships();
            }
        }
        self.players = None;
        self.current = Side::First;
        self.phase = GamePhase::Setup;
        self.winner = None;
        debug!("game reset");
    }
}
