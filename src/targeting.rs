//! Hunt/target logic for the computer opponent.
//!
//! The opponent is either hunting at random ([`TargetMode::Idle`]) or chasing
//! a ship it has already struck ([`TargetMode::Tracking`]). While tracking it
//! works through a FIFO queue of orthogonal neighbours of its hits, pushed in
//! the order left, right, up, down. Once two hits line up the queue is cut
//! down to that row or column. When the ship sinks, every cell around it goes
//! into the no-go zone: under the spacing rule no other ship can be there.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use log::{debug, trace};
use rand::Rng;

use crate::cell_set::CellSet;
use crate::common::AttackOutcome;
use crate::config::RANDOM_TARGET_ATTEMPTS;
use crate::coord::Coordinate;
use crate::ship::Orientation;

/// State kept while chasing a struck ship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pursuit {
    last_hit: Coordinate,
    direction: Option<Orientation>,
    candidates: VecDeque<Coordinate>,
    hits: Vec<Coordinate>,
}

impl Pursuit {
    fn new(first_hit: Coordinate) -> Self {
        Self {
            last_hit: first_hit,
            direction: None,
            candidates: VecDeque::new(),
            hits: vec![first_hit],
        }
    }

    pub fn last_hit(&self) -> Coordinate {
        self.last_hit
    }

    /// Axis of the ship once two hits line up.
    pub fn direction(&self) -> Option<Orientation> {
        self.direction
    }

    /// Cells queued to be tried next, front first.
    pub fn candidates(&self) -> &VecDeque<Coordinate> {
        &self.candidates
    }

    /// Hits attributed to the ship being chased.
    pub fn hits(&self) -> &[Coordinate] {
        &self.hits
    }

    fn on_axis(&self, c: Coordinate) -> bool {
        match self.direction {
            Some(Orientation::Horizontal) => c.y() == self.last_hit.y(),
            Some(Orientation::Vertical) => c.x() == self.last_hit.x(),
            None => true,
        }
    }

    fn prune_to_axis(&mut self) {
        if self.direction.is_none() {
            return;
        }
        let before = self.candidates.len();
        let mut kept = core::mem::take(&mut self.candidates);
        kept.retain(|&c| self.on_axis(c));
        self.candidates = kept;
        trace!(
            "pruned {} off-axis candidate(s) for {:?}",
            before - self.candidates.len(),
            self.direction
        );
    }

    /// Queue the neighbours of `around`, skipping anything already queued,
    /// already shot at, or ruled out.
    fn enqueue_neighbors(&mut self, around: Coordinate, excluded: &CellSet) {
        for n in around.orthogonal_neighbors() {
            if self.on_axis(n) && !excluded.contains(n) && !self.candidates.contains(&n) {
                self.candidates.push_back(n);
            }
        }
    }
}

/// Either hunting at random or chasing a struck ship.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TargetMode {
    #[default]
    Idle,
    Tracking(Pursuit),
}

/// The computer's targeting memory across a match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Targeting {
    mode: TargetMode,
    no_go: CellSet,
}

impl Targeting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &TargetMode {
        &self.mode
    }

    /// Active pursuit, if any.
    pub fn pursuit(&self) -> Option<&Pursuit> {
        match &self.mode {
            TargetMode::Tracking(p) => Some(p),
            TargetMode::Idle => None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.mode, TargetMode::Tracking(_))
    }

    /// Cells the computer will not shoot at.
    pub fn no_go(&self) -> &CellSet {
        &self.no_go
    }

    /// Forget everything, e.g. for a new match.
    pub fn reset(&mut self) {
        self.mode = TargetMode::Idle;
        self.no_go.clear();
    }

    /// Pick the next cell to shoot, given the cells already shot at.
    /// `None` only when the whole board has been attacked.
    pub fn next_target<R: Rng + ?Sized>(
        &mut self,
        attacked: &CellSet,
        rng: &mut R,
    ) -> Option<Coordinate> {
        let excluded = *attacked | self.no_go;
        if let TargetMode::Tracking(p) = &mut self.mode {
            if let Some(c) = pop_candidate(&mut p.candidates, &excluded) {
                return Some(c);
            }
            debug!(
                "candidate queue exhausted after {} hit(s), back to random search",
                p.hits.len()
            );
            self.mode = TargetMode::Idle;
        }
        random_target(&excluded, attacked, rng)
    }

    /// Fold the outcome of a shot at `c` into the targeting state.
    ///
    /// `attacked` must already include `c`. `sunk_cells` are the cells of the
    /// ship reported sunk, when the defender reveals them; otherwise the hits
    /// of the current pursuit stand in for them. `spaced` says whether the
    /// defender's ships are kept apart, which is what makes the no-go zone
    /// sound.
    pub fn record(
        &mut self,
        c: Coordinate,
        outcome: AttackOutcome,
        attacked: &CellSet,
        sunk_cells: Option<&[Coordinate]>,
        spaced: bool,
    ) {
        match outcome {
            AttackOutcome::Miss => {
                if let TargetMode::Tracking(p) = &mut self.mode {
                    p.prune_to_axis();
                }
            }
            AttackOutcome::Hit(_) => self.on_hit(c, attacked),
            AttackOutcome::Sunk(_) => {
                self.on_hit(c, attacked);
                self.on_sunk(sunk_cells, attacked, spaced);
            }
            AttackOutcome::AlreadyAttacked => {}
        }
    }

    fn on_hit(&mut self, c: Coordinate, attacked: &CellSet) {
        let excluded = *attacked | self.no_go;
        match &mut self.mode {
            TargetMode::Idle => {
                debug!("hit at {}, tracking", c);
                let mut p = Pursuit::new(c);
                p.enqueue_neighbors(c, &excluded);
                self.mode = TargetMode::Tracking(p);
            }
            TargetMode::Tracking(p) => {
                if !p.hits.contains(&c) {
                    p.hits.push(c);
                }
                if p.direction.is_none() && p.hits.len() >= 2 {
                    let anchor = p.hits[0];
                    p.direction = if anchor.y() == c.y() {
                        Some(Orientation::Horizontal)
                    } else if anchor.x() == c.x() {
                        Some(Orientation::Vertical)
                    } else {
                        None
                    };
                    if let Some(dir) = p.direction {
                        debug!("hits {} and {} line up {:?}", anchor, c, dir);
                    }
                }
                p.last_hit = c;
                p.prune_to_axis();
                p.enqueue_neighbors(c, &excluded);
            }
        }
    }

    fn on_sunk(&mut self, sunk_cells: Option<&[Coordinate]>, attacked: &CellSet, spaced: bool) {
        let TargetMode::Tracking(p) = &mut self.mode else {
            return;
        };
        let ship: Vec<Coordinate> = match sunk_cells {
            Some(cells) => cells.to_vec(),
            None => p.hits.clone(),
        };
        if spaced {
            for cell in &ship {
                self.no_go.extend(cell.surrounding());
            }
            for cell in &ship {
                self.no_go.remove(*cell);
            }
        }
        let leftover: Vec<Coordinate> = p.hits.iter().copied().filter(|h| !ship.contains(h)).collect();
        debug!(
            "ship sunk, {} cell(s) in no-go zone, {} unresolved hit(s)",
            self.no_go.len(),
            leftover.len()
        );
        self.mode = match leftover.split_first() {
            None => TargetMode::Idle,
            Some((&first, rest)) => {
                // Hits on a different ship came in while chasing this one.
                let excluded = *attacked | self.no_go;
                let mut next = Pursuit::new(first);
                next.hits.extend_from_slice(rest);
                for &h in &leftover {
                    next.enqueue_neighbors(h, &excluded);
                }
                next.last_hit = *leftover.last().unwrap_or(&first);
                TargetMode::Tracking(next)
            }
        };
    }
}

fn pop_candidate(queue: &mut VecDeque<Coordinate>, excluded: &CellSet) -> Option<Coordinate> {
    while let Some(c) = queue.pop_front() {
        if !excluded.contains(c) {
            return Some(c);
        }
        trace!("discarding stale candidate {}", c);
    }
    None
}

/// Uniform random cell outside `excluded`. Rejection-samples first, then
/// scans what is left. If only no-go cells remain they are used rather than
/// stalling the game.
pub fn random_target<R: Rng + ?Sized>(
    excluded: &CellSet,
    attacked: &CellSet,
    rng: &mut R,
) -> Option<Coordinate> {
    for _ in 0..RANDOM_TARGET_ATTEMPTS {
        let c = Coordinate::random(rng);
        if !excluded.contains(c) {
            return Some(c);
        }
    }
    let mut open: Vec<Coordinate> = excluded.complement().iter().collect();
    if open.is_empty() {
        open = attacked.complement().iter().collect();
    }
    if open.is_empty() {
        return None;
    }
    Some(open[rng.random_range(0..open.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::ShipId;
    use rand::{rngs::SmallRng, SeedableRng};

    fn at(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    fn hit() -> AttackOutcome {
        AttackOutcome::Hit(dummy_id())
    }

    fn dummy_id() -> ShipId {
        let mut fleet = crate::ship::ShipManager::new();
        fleet.add(crate::ship::ShipKind::Destroyer)
    }

    #[test]
    fn first_hit_queues_neighbors_in_fixed_order() {
        let mut t = Targeting::new();
        let mut attacked = CellSet::new();
        attacked.insert(at("E5"));
        t.record(at("E5"), hit(), &attacked, None, true);
        let queued: Vec<_> = t.pursuit().unwrap().candidates().iter().copied().collect();
        assert_eq!(queued, vec![at("D5"), at("F5"), at("E4"), at("E6")]);
    }

    #[test]
    fn second_hit_locks_axis() {
        let mut t = Targeting::new();
        let mut attacked = CellSet::new();
        let mut rng = SmallRng::seed_from_u64(3);
        attacked.insert(at("E5"));
        t.record(at("E5"), hit(), &attacked, None, true);

        let next = t.next_target(&attacked, &mut rng).unwrap();
        assert_eq!(next, at("D5"));
        attacked.insert(next);
        t.record(next, hit(), &attacked, None, true);

        let p = t.pursuit().unwrap();
        assert_eq!(p.direction(), Some(Orientation::Horizontal));
        assert!(p.candidates().iter().all(|c| c.y() == 4));
        assert_eq!(t.next_target(&attacked, &mut rng), Some(at("F5")));
    }

    #[test]
    fn sink_marks_perimeter_and_goes_idle() {
        let mut t = Targeting::new();
        let mut attacked = CellSet::new();
        attacked.insert(at("A1"));
        t.record(at("A1"), hit(), &attacked, None, true);
        attacked.insert(at("B1"));
        let ship = [at("A1"), at("B1")];
        t.record(at("B1"), AttackOutcome::Sunk(dummy_id()), &attacked, Some(&ship), true);

        assert_eq!(t.mode(), &TargetMode::Idle);
        let expected: CellSet = [at("C1"), at("A2"), at("B2"), at("C2")].into_iter().collect();
        assert_eq!(*t.no_go(), expected);
    }

    #[test]
    fn touching_fleets_get_no_no_go_zone() {
        let mut t = Targeting::new();
        let mut attacked = CellSet::new();
        attacked.insert(at("A1"));
        t.record(at("A1"), hit(), &attacked, None, false);
        attacked.insert(at("A2"));
        t.record(at("A2"), AttackOutcome::Sunk(dummy_id()), &attacked, None, false);
        assert!(t.no_go().is_empty());
        assert!(!t.is_tracking());
    }

    #[test]
    fn unresolved_hits_keep_tracking_after_sink() {
        let mut t = Targeting::new();
        let mut attacked = CellSet::new();
        for c in ["C3", "D3"] {
            attacked.insert(at(c));
            t.record(at(c), hit(), &attacked, None, false);
        }
        attacked.insert(at("E3"));
        let sunk = [at("D3"), at("E3")];
        t.record(at("E3"), AttackOutcome::Sunk(dummy_id()), &attacked, Some(&sunk), false);

        let p = t.pursuit().unwrap();
        assert_eq!(p.hits(), &[at("C3")]);
        assert_eq!(p.direction(), None);
        assert!(p.candidates().contains(&at("B3")));
    }

    #[test]
    fn exhausted_line_falls_back_to_random() {
        let mut t = Targeting::new();
        let mut attacked = CellSet::new();
        let mut rng = SmallRng::seed_from_u64(9);
        attacked.insert(at("A1"));
        t.record(at("A1"), hit(), &attacked, None, false);

        let second = t.next_target(&attacked, &mut rng).unwrap();
        assert_eq!(second, at("B1"));
        attacked.insert(second);
        t.record(second, hit(), &attacked, None, false);

        let third = t.next_target(&attacked, &mut rng).unwrap();
        assert_eq!(third, at("C1"));
        attacked.insert(third);
        t.record(third, AttackOutcome::Miss, &attacked, None, false);
        assert!(t.pursuit().unwrap().candidates().is_empty());

        let next = t.next_target(&attacked, &mut rng).unwrap();
        assert_eq!(t.mode(), &TargetMode::Idle);
        assert!(!attacked.contains(next));
        assert!(t.no_go().is_empty());
    }

    #[test]
    fn random_target_skips_excluded() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut excluded = CellSet::full();
        excluded.remove(at("G7"));
        assert_eq!(random_target(&excluded, &excluded, &mut rng), Some(at("G7")));
        assert_eq!(random_target(&CellSet::full(), &CellSet::full(), &mut rng), None);

        let no_go_only: CellSet = CellSet::full();
        let mut attacked = CellSet::full();
        attacked.remove(at("B2"));
        assert_eq!(random_target(&no_go_only, &attacked, &mut rng), Some(at("B2")));
    }
}
