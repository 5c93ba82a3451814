//! Game board: ship placement, incoming attacks, and the cell view handed to
//! presentation code.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use log::{debug, trace};
use rand::Rng;

use crate::common::{AttackOutcome, GameError, PlacementError};
use crate::config::{PlacementPolicy, BOARD_SIZE, PLACEMENT_ATTEMPTS};
use crate::coord::Coordinate;
use crate::ship::{Orientation, Ship, ShipId, ShipKind, ShipManager};

const SIZE: usize = BOARD_SIZE as usize;

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Ship(ShipId),
    /// Ship segment that has been shot; still points at its ship.
    Struck(ShipId),
    Miss,
}

/// What presentation code gets to see of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellView {
    Empty,
    Ship,
    Hit,
    Miss,
}

impl CellView {
    fn symbol(&self) -> char {
        match self {
            CellView::Empty => '.',
            CellView::Ship => 'S',
            CellView::Hit => 'X',
            CellView::Miss => 'o',
        }
    }
}

/// Snapshot of a board for rendering, indexed `cells[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardView {
    pub cells: Vec<Vec<CellView>>,
    pub missed_attacks: Vec<Coordinate>,
    pub successful_attacks: Vec<Coordinate>,
    pub ships_remaining: usize,
}

/// Where a ship sits on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub ship: ShipId,
    pub start: Coordinate,
    pub orientation: Orientation,
    pub cells: Vec<Coordinate>,
}

/// One player's grid, ship registry and attack log.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Cell; SIZE]; SIZE],
    fleet: ShipManager,
    placements: Vec<Placement>,
    missed_attacks: Vec<Coordinate>,
    successful_attacks: Vec<Coordinate>,
    policy: PlacementPolicy,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Cells covered by a ship of `length` starting at `start`, or `OutOfBounds`.
pub fn footprint(
    start: Coordinate,
    orientation: Orientation,
    length: usize,
) -> Result<Vec<Coordinate>, PlacementError> {
    (0..length as i32)
        .map(|i| {
            let (dx, dy) = match orientation {
                Orientation::Horizontal => (i, 0),
                Orientation::Vertical => (0, i),
            };
            start.offset(dx, dy).ok_or(PlacementError::OutOfBounds)
        })
        .collect()
}

impl Board {
    /// Empty board using the default (spaced) placement policy.
    pub fn new() -> Self {
        Self::with_policy(PlacementPolicy::default())
    }

    pub fn with_policy(policy: PlacementPolicy) -> Self {
        Board {
            grid: [[Cell::Empty; SIZE]; SIZE],
            fleet: ShipManager::new(),
            placements: Vec::new(),
            missed_attacks: Vec::new(),
            successful_attacks: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> PlacementPolicy {
        self.policy
    }

    /// Ships registered on this board, placed or not.
    pub fn fleet(&self) -> &ShipManager {
        &self.fleet
    }

    /// Register a new ship of `kind`; it still has to be placed.
    pub fn add_ship(&mut self, kind: ShipKind) -> ShipId {
        Ship::create(kind, &mut self.fleet)
    }

    /// Register one ship of every kind in `kinds`, in order.
    pub fn add_ships(&mut self, kinds: &[ShipKind]) -> Vec<ShipId> {
        kinds.iter().map(|&k| self.add_ship(k)).collect()
    }

    #[inline]
    fn cell(&self, c: Coordinate) -> Cell {
        self.grid[c.y()][c.x()]
    }

    #[inline]
    fn set_cell(&mut self, c: Coordinate, cell: Cell) {
        self.grid[c.y()][c.x()] = cell;
    }

    /// Whether `id` is on the grid.
    pub fn is_placed(&self, id: ShipId) -> bool {
        self.placements.iter().any(|p| p.ship == id)
    }

    /// All ships on the grid, in placement order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// `true` once every registered ship is on the grid (and there is at least one).
    pub fn is_fully_placed(&self) -> bool {
        !self.fleet.is_empty() && self.fleet.list().iter().all(|s| self.is_placed(s.id()))
    }

    /// Validate a placement without touching the board.
    pub fn check_placement(
        &self,
        kind: ShipKind,
        start: Coordinate,
        orientation: Orientation,
    ) -> Result<Vec<Coordinate>, PlacementError> {
        self.check_with(kind, start, orientation, self.policy)
    }

    fn check_with(
        &self,
        kind: ShipKind,
        start: Coordinate,
        orientation: Orientation,
        policy: PlacementPolicy,
    ) -> Result<Vec<Coordinate>, PlacementError> {
        let cells = footprint(start, orientation, kind.length())?;
        if cells.iter().any(|&c| self.cell(c) != Cell::Empty) {
            return Err(PlacementError::Overlaps);
        }
        if !policy.allow_adjacent {
            let touching = cells.iter().flat_map(|c| c.surrounding()).any(|n| {
                matches!(self.cell(n), Cell::Ship(_) | Cell::Struck(_))
            });
            if touching {
                return Err(PlacementError::Adjacent);
            }
        }
        Ok(cells)
    }

    /// Place a registered ship. Nothing changes on failure.
    pub fn place_ship(
        &mut self,
        id: ShipId,
        start: Coordinate,
        orientation: Orientation,
    ) -> Result<(), GameError> {
        self.place_with(id, start, orientation, self.policy)
    }

    fn place_with(
        &mut self,
        id: ShipId,
        start: Coordinate,
        orientation: Orientation,
        policy: PlacementPolicy,
    ) -> Result<(), GameError> {
        let kind = self.fleet.find(id).ok_or(GameError::UnknownShip(id))?.kind();
        if self.is_placed(id) {
            return Err(PlacementError::AlreadyPlaced.into());
        }
        let cells = self.check_with(kind, start, orientation, policy)?;
        for &c in &cells {
            self.set_cell(c, Cell::Ship(id));
        }
        trace!("placed {} {} at {} {:?}", kind.title(), id, start, orientation);
        self.placements.push(Placement {
            ship: id,
            start,
            orientation,
            cells,
        });
        Ok(())
    }

    /// Place each of `ships` at a random legal spot, always keeping ships
    /// apart. Either every ship gets placed or none are.
    pub fn place_ships_randomly<R: Rng + ?Sized>(
        &mut self,
        ships: &[ShipId],
        rng: &mut R,
    ) -> Result<(), GameError> {
        let mut placed = Vec::with_capacity(ships.len());
        for &id in ships {
            match self.place_one_randomly(id, rng) {
                Ok(()) => placed.push(id),
                Err(e) => {
                    for done in placed {
                        self.lift(done);
                    }
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Randomly place every registered ship that is not on the grid yet.
    pub fn place_fleet_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        let pending: Vec<ShipId> = self
            .fleet
            .list()
            .iter()
            .map(|s| s.id())
            .filter(|&id| !self.is_placed(id))
            .collect();
        self.place_ships_randomly(&pending, rng)
    }

    fn place_one_randomly<R: Rng + ?Sized>(&mut self, id: ShipId, rng: &mut R) -> Result<(), GameError> {
        let kind = self.fleet.find(id).ok_or(GameError::UnknownShip(id))?.kind();
        if self.is_placed(id) {
            return Err(PlacementError::AlreadyPlaced.into());
        }
        for attempt in 1..=PLACEMENT_ATTEMPTS {
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_x, max_y) = match orientation {
                Orientation::Horizontal => (SIZE - kind.length(), SIZE - 1),
                Orientation::Vertical => (SIZE - 1, SIZE - kind.length()),
            };
            let start = Coordinate::new(rng.random_range(0..=max_x), rng.random_range(0..=max_y))?;
            if self
                .check_with(kind, start, orientation, PlacementPolicy::SPACED)
                .is_ok()
            {
                debug!("{} placed at {} after {} attempt(s)", kind.title(), start, attempt);
                return self.place_with(id, start, orientation, PlacementPolicy::SPACED);
            }
        }
        debug!("gave up placing {} after {} attempts", kind.title(), PLACEMENT_ATTEMPTS);
        Err(GameError::PlacementExhausted { ship: kind.title() })
    }

    /// Take a ship off the grid, leaving it registered.
    fn lift(&mut self, id: ShipId) -> Option<Placement> {
        let index = self.placements.iter().position(|p| p.ship == id)?;
        let placement = self.placements.remove(index);
        for &c in &placement.cells {
            self.set_cell(c, Cell::Empty);
        }
        Some(placement)
    }

    /// Take a ship off the grid and out of the registry.
    pub fn remove_ship(&mut self, id: ShipId) -> Result<Ship, GameError> {
        if self.fleet.find(id).is_none() {
            return Err(GameError::UnknownShip(id));
        }
        self.lift(id);
        self.successful_attacks
            .retain(|c| !matches!(self.grid[c.y()][c.x()], Cell::Empty));
        self.fleet.remove(id).ok_or(GameError::UnknownShip(id))
    }

    /// Lift every ship off the grid and reset its damage, keeping the
    /// registry. Used to re-roll a fleet before play starts.
    pub fn unplace_all(&mut self) {
        self.grid = [[Cell::Empty; SIZE]; SIZE];
        self.placements.clear();
        self.missed_attacks.clear();
        self.successful_attacks.clear();
        for id in self.fleet.ids() {
            if let Some(ship) = self.fleet.find_mut(id) {
                ship.reset_hits();
            }
        }
    }

    /// Back to an empty grid with no ships and no attacks.
    pub fn clear_ships(&mut self) {
        self.unplace_all();
        self.fleet.clear();
    }

    /// Resolve an incoming shot.
    ///
    /// Repeated shots at the same cell report [`AttackOutcome::AlreadyAttacked`]
    /// and leave the board untouched.
    pub fn receive_attack(&mut self, c: Coordinate) -> Result<AttackOutcome, GameError> {
        match self.cell(c) {
            Cell::Empty => {
                self.set_cell(c, Cell::Miss);
                self.missed_attacks.push(c);
                Ok(AttackOutcome::Miss)
            }
            Cell::Ship(id) => {
                let ship = self.fleet.find_mut(id).ok_or(GameError::UnknownShip(id))?;
                ship.hit()?;
                let sunk = ship.is_sunk();
                self.set_cell(c, Cell::Struck(id));
                self.successful_attacks.push(c);
                if sunk {
                    debug!("{} {} sunk at {}", ship_title(&self.fleet, id), id, c);
                    Ok(AttackOutcome::Sunk(id))
                } else {
                    Ok(AttackOutcome::Hit(id))
                }
            }
            Cell::Struck(_) | Cell::Miss => Ok(AttackOutcome::AlreadyAttacked),
        }
    }

    /// `true` when every placed ship is sunk. Vacuously `true` with no ships.
    pub fn all_ships_sunk(&self) -> bool {
        self.placements.iter().all(|p| {
            self.fleet
                .find(p.ship)
                .map(|s| s.is_sunk())
                .unwrap_or(true)
        })
    }

    /// Ship covering `c`, struck or not. Constant time: the grid holds the
    /// id and the registry is indexed by it.
    pub fn ship_at(&self, c: Coordinate) -> Option<&Ship> {
        match self.cell(c) {
            Cell::Ship(id) | Cell::Struck(id) => self.fleet.find(id),
            Cell::Empty | Cell::Miss => None,
        }
    }

    /// Cells covered by a placed ship.
    pub fn ship_cells(&self, id: ShipId) -> Option<&[Coordinate]> {
        self.placements
            .iter()
            .find(|p| p.ship == id)
            .map(|p| p.cells.as_slice())
    }

    /// Whether `c` has been shot at.
    pub fn is_attacked(&self, c: Coordinate) -> bool {
        matches!(self.cell(c), Cell::Struck(_) | Cell::Miss)
    }

    /// Misses in the order they happened.
    pub fn missed_attacks(&self) -> &[Coordinate] {
        &self.missed_attacks
    }

    /// Hits in the order they happened.
    pub fn successful_attacks(&self) -> &[Coordinate] {
        &self.successful_attacks
    }

    /// Presentation view of one cell. Unstruck ships show as empty unless
    /// `reveal_ships` is set.
    pub fn cell_view(&self, c: Coordinate, reveal_ships: bool) -> CellView {
        match self.cell(c) {
            Cell::Empty => CellView::Empty,
            Cell::Ship(_) if reveal_ships => CellView::Ship,
            Cell::Ship(_) => CellView::Empty,
            Cell::Struck(_) => CellView::Hit,
            Cell::Miss => CellView::Miss,
        }
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self, reveal_ships: bool) -> BoardView {
        let cells = (0..SIZE)
            .map(|y| {
                (0..SIZE)
                    .filter_map(|x| Coordinate::new(x, y).ok())
                    .map(|c| self.cell_view(c, reveal_ships))
                    .collect()
            })
            .collect();
        BoardView {
            cells,
            missed_attacks: self.missed_attacks.clone(),
            successful_attacks: self.successful_attacks.clone(),
            ships_remaining: self
                .placements
                .iter()
                .filter(|p| self.fleet.find(p.ship).is_some_and(|s| !s.is_sunk()))
                .count(),
        }
    }

    /// Text grid with column letters and row numbers.
    pub fn render(&self, reveal_ships: bool) -> String {
        let mut out = String::from("   ");
        for x in 0..SIZE {
            out.push(' ');
            out.push((b'A' + x as u8) as char);
        }
        out.push('\n');
        for y in 0..SIZE {
            out.push_str(&alloc::format!("{:2} ", y + 1));
            for x in 0..SIZE {
                out.push(' ');
                if let Ok(c) = Coordinate::new(x, y) {
                    out.push(self.cell_view(c, reveal_ships).symbol());
                }
            }
            out.push('\n');
        }
        out
    }
}

fn ship_title(fleet: &ShipManager, id: ShipId) -> &'static str {
    fleet.find(id).map(|s| s.title()).unwrap_or("ship")
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  policy: {:?},\n  ships: {:?},\n  placements: {:?},\n  missed: {:?},\n  hits: {:?}\n}}",
            self.policy, self.fleet, self.placements, self.missed_attacks, self.successful_attacks
        )?;
        f.write_str(&self.render(true))
    }
}
