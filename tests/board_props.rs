use broadside::{
    from_indices, to_indices, Board, Coordinate, Orientation, PlacementPolicy, ShipKind, FLEET,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

fn random_board(seed: u64) -> Board {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = Board::new();
    board.add_ships(&FLEET);
    board.place_fleet_randomly(&mut rng).unwrap();
    board
}

fn kind_strategy() -> impl Strategy<Value = ShipKind> {
    prop::sample::select(FLEET.to_vec())
}

fn orientation_strategy() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Horizontal), Just(Orientation::Vertical)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn codec_roundtrip(letter in prop::char::range('A', 'J'), number in 1u8..=10) {
        let (x, y) = to_indices(letter, number).unwrap();
        prop_assert_eq!(from_indices(x, y).unwrap(), (letter, number));
        let c = Coordinate::from_notation(letter, number).unwrap();
        prop_assert_eq!(c.to_string().parse::<Coordinate>().unwrap(), c);
    }

    #[test]
    fn random_fleet_never_overlaps_or_touches(seed in any::<u64>()) {
        let board = random_board(seed);
        let mut owner = [[None; 10]; 10];
        for p in board.placements() {
            prop_assert_eq!(p.cells.len(), board.fleet().find(p.ship).unwrap().length());
            for c in &p.cells {
                prop_assert!(owner[c.y()][c.x()].is_none());
                owner[c.y()][c.x()] = Some(p.ship);
            }
        }
        for p in board.placements() {
            for c in &p.cells {
                for n in c.surrounding() {
                    if let Some(other) = owner[n.y()][n.x()] {
                        prop_assert_eq!(other, p.ship);
                    }
                }
            }
        }
    }

    #[test]
    fn placed_ships_are_contiguous(seed in any::<u64>()) {
        let board = random_board(seed);
        for p in board.placements() {
            for pair in p.cells.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                match p.orientation {
                    Orientation::Horizontal => {
                        prop_assert_eq!(a.y(), b.y());
                        prop_assert_eq!(a.x() + 1, b.x());
                    }
                    Orientation::Vertical => {
                        prop_assert_eq!(a.x(), b.x());
                        prop_assert_eq!(a.y() + 1, b.y());
                    }
                }
            }
        }
    }

    #[test]
    fn failed_placement_is_atomic(
        seed in any::<u64>(),
        kind in kind_strategy(),
        x in 0usize..10,
        y in 0usize..10,
        orientation in orientation_strategy(),
        touching in any::<bool>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let policy = if touching { PlacementPolicy::TOUCHING } else { PlacementPolicy::SPACED };
        let mut board = Board::with_policy(policy);
        board.add_ships(&FLEET);
        board.place_fleet_randomly(&mut rng).unwrap();
        let extra = board.add_ship(kind);
        let before = board.clone();

        let start = Coordinate::new(x, y).unwrap();
        match board.place_ship(extra, start, orientation) {
            Ok(()) => {
                prop_assert!(board.is_placed(extra));
                prop_assert_eq!(board.placements().len(), before.placements().len() + 1);
            }
            Err(_) => prop_assert_eq!(&board, &before),
        }
    }
}
