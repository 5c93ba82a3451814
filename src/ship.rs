//! Ship types, hit tracking, and the per-board ship registry.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::common::GameError;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extends to the right of the start cell.
    Horizontal,
    /// Extends downwards from the start cell.
    Vertical,
}

/// The five classes in the standard fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShipKind {
    Carrier,
    Battleship,
    Destroyer,
    Submarine,
    PatrolBoat,
}

impl ShipKind {
    /// Catalogue number of the class.
    pub const fn class_id(&self) -> u8 {
        match self {
            ShipKind::Carrier => 1,
            ShipKind::Battleship => 2,
            ShipKind::Destroyer => 3,
            ShipKind::Submarine => 4,
            ShipKind::PatrolBoat => 5,
        }
    }

    /// Display title.
    pub const fn title(&self) -> &'static str {
        match self {
            ShipKind::Carrier => "Carrier",
            ShipKind::Battleship => "Battleship",
            ShipKind::Destroyer => "Destroyer",
            ShipKind::Submarine => "Submarine",
            ShipKind::PatrolBoat => "Patrol Boat",
        }
    }

    /// Number of cells the ship covers.
    pub const fn length(&self) -> usize {
        match self {
            ShipKind::Carrier => 5,
            ShipKind::Battleship => 4,
            ShipKind::Destroyer | ShipKind::Submarine => 3,
            ShipKind::PatrolBoat => 2,
        }
    }

    /// Look a class up by its type key (`"CARRIER"`, `"PATROL_BOAT"`, ...).
    /// Case and `-`/space separators are ignored.
    pub fn from_name(name: &str) -> Result<Self, GameError> {
        let key: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        match key.as_str() {
            "CARRIER" => Ok(ShipKind::Carrier),
            "BATTLESHIP" => Ok(ShipKind::Battleship),
            "DESTROYER" => Ok(ShipKind::Destroyer),
            "SUBMARINE" => Ok(ShipKind::Submarine),
            "PATROL_BOAT" => Ok(ShipKind::PatrolBoat),
            _ => Err(GameError::UnknownShipType(String::from(name))),
        }
    }
}

/// Handle for a ship inside a [`ShipManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipId(u32);

impl ShipId {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One vessel and the number of times it has been struck.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    id: ShipId,
    kind: ShipKind,
    hits: usize,
}

impl Ship {
    /// Build a ship of `kind` and register it with `registry`.
    pub fn create(kind: ShipKind, registry: &mut ShipManager) -> ShipId {
        registry.add(kind)
    }

    /// Build a ship from its type key, e.g. `"SUBMARINE"`.
    pub fn create_named(name: &str, registry: &mut ShipManager) -> Result<ShipId, GameError> {
        let kind = ShipKind::from_name(name)?;
        Ok(Self::create(kind, registry))
    }

    pub fn id(&self) -> ShipId {
        self.id
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn length(&self) -> usize {
        self.kind.length()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Record one strike. A sunk ship cannot be hit again.
    pub fn hit(&mut self) -> Result<(), GameError> {
        if self.is_sunk() {
            return Err(GameError::AlreadySunk(self.id));
        }
        self.hits += 1;
        Ok(())
    }

    /// Check if every segment has been struck.
    pub fn is_sunk(&self) -> bool {
        self.hits == self.kind.length()
    }

    pub(crate) fn reset_hits(&mut self) {
        self.hits = 0;
    }
}

/// Registry of the ships belonging to one board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipManager {
    ships: Vec<Ship>,
    /// Position in `ships` for every id ever issued, `None` once removed.
    slots: Vec<Option<usize>>,
}

impl ShipManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh, unhit ship of `kind`.
    pub fn add(&mut self, kind: ShipKind) -> ShipId {
        let id = ShipId(self.slots.len() as u32 + 1);
        self.slots.push(Some(self.ships.len()));
        self.ships.push(Ship { id, kind, hits: 0 });
        id
    }

    fn position(&self, id: ShipId) -> Option<usize> {
        let slot = (id.0 as usize).checked_sub(1)?;
        *self.slots.get(slot)?
    }

    /// Drop a ship; returns it if it was registered.
    pub fn remove(&mut self, id: ShipId) -> Option<Ship> {
        let index = self.position(id)?;
        let ship = self.ships.remove(index);
        self.slots[id.0 as usize - 1] = None;
        for pos in self.slots.iter_mut().flatten() {
            if *pos > index {
                *pos -= 1;
            }
        }
        Some(ship)
    }

    /// Constant-time lookup by id.
    pub fn find(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(self.position(id)?)
    }

    pub fn find_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        let index = self.position(id)?;
        self.ships.get_mut(index)
    }

    /// First registered ship of the given class.
    pub fn find_kind(&self, kind: ShipKind) -> Option<&Ship> {
        self.ships.iter().find(|s| s.kind == kind)
    }

    /// All ships in registration order.
    pub fn list(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ids(&self) -> Vec<ShipId> {
        self.ships.iter().map(|s| s.id).collect()
    }

    pub fn active(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(|s| !s.is_sunk())
    }

    pub fn sunk(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(|s| s.is_sunk())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn sunk_count(&self) -> usize {
        self.sunk().count()
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Forget every ship. Ids are not reused.
    pub fn clear(&mut self) {
        self.ships.clear();
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }
}
