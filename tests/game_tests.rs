use std::cell::RefCell;
use std::rc::Rc;

use broadside::{
    Board, Coordinate, Game, GameConfig, GameError, GameObserver, GamePhase, Orientation, Player,
    ShipKind, Side,
};

fn at(s: &str) -> Coordinate {
    s.parse().unwrap()
}

fn patrol_boat_game() -> anyhow::Result<Game> {
    let mut game = Game::new(GameConfig::seeded(11));
    game.initialize_with_fleet(&[ShipKind::PatrolBoat]);
    game.place_ships_for(Side::Second, ShipKind::PatrolBoat, at("A1"), Orientation::Vertical)?;
    assert_eq!(game.phase(), GamePhase::Setup);
    game.place_ships_for(Side::First, ShipKind::PatrolBoat, at("J9"), Orientation::Vertical)?;
    assert_eq!(game.phase(), GamePhase::Ready);
    game.start()?;
    Ok(game)
}

#[test]
fn test_sinking_last_ship_ends_game() -> anyhow::Result<()> {
    let mut game = patrol_boat_game()?;

    let first = game.take_turn(at("A1"))?;
    assert!(first.shot.unwrap().is_hit());
    assert!(first.reply.is_some(), "computer answers a non-final shot");
    assert_eq!(first.phase, GamePhase::InProgress);
    assert_eq!(game.current_turn(), Side::First);

    let second = game.take_turn(at("A2"))?;
    assert!(second.shot.unwrap().is_hit());
    assert_eq!(second.reply, None);
    assert_eq!(second.phase, GamePhase::Over);
    assert_eq!(second.winner, Some(Side::First));
    assert_eq!(game.winner_name(), Some("Human"));
    assert!(game.player(Side::Second).unwrap().board().all_ships_sunk());

    assert_eq!(game.take_turn(at("B1")), Err(GameError::GameOver));
    Ok(())
}

#[test]
fn test_full_game_terminates() -> anyhow::Result<()> {
    let mut game = Game::new(GameConfig::seeded(2024));
    game.initialize();
    game.place_all_randomly()?;
    game.start()?;

    let cells: Vec<Coordinate> = Coordinate::all().collect();
    let mut next = cells.iter();
    while !game.is_over() {
        let c = *next.next().expect("human ran out of cells");
        game.take_turn(c)?;
    }
    let winner = game.winner().unwrap();
    let loser = game.player(game.winner_side().unwrap().other()).unwrap();
    assert!(loser.board().all_ships_sunk());
    assert!(!winner.board().all_ships_sunk());
    Ok(())
}

#[derive(Default)]
struct Recorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl GameObserver for Recorder {
    fn board_changed(&mut self, side: Side, _board: &Board) {
        self.events.borrow_mut().push(format!("board {:?}", side));
    }

    fn attack_resolved(&mut self, attacker: &Player, coordinate: Coordinate, hit: bool) {
        self.events
            .borrow_mut()
            .push(format!("{} {} {}", attacker.name(), coordinate, hit));
    }

    fn game_over(&mut self, winner: &str) {
        self.events.borrow_mut().push(format!("over {}", winner));
    }
}

#[test]
fn test_observer_sees_placements_shots_and_result() -> anyhow::Result<()> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut game = Game::new(GameConfig::seeded(11));
    game.add_observer(Box::new(Recorder {
        events: events.clone(),
    }));
    game.initialize_with_fleet(&[ShipKind::PatrolBoat]);
    game.place_ships_for(Side::Second, ShipKind::PatrolBoat, at("A1"), Orientation::Vertical)?;
    game.place_ships_for(Side::First, ShipKind::PatrolBoat, at("J9"), Orientation::Vertical)?;
    game.start()?;
    game.take_turn(at("A1"))?;
    game.take_turn(at("A2"))?;

    let events = events.borrow();
    assert_eq!(events[0], "board Second");
    assert_eq!(events[1], "board First");
    assert_eq!(events[2], "Human A1 true");
    assert_eq!(events[3], "board Second");
    assert!(events[4].starts_with("Computer "));
    assert_eq!(events[5], "board First");
    assert_eq!(&events[6..], ["Human A2 true", "board Second", "over Human"]);
    Ok(())
}

#[test]
fn test_board_view_serializes() -> anyhow::Result<()> {
    let game = patrol_boat_game()?;
    let board = game.player(Side::Second).unwrap().board();

    let hidden = serde_json::to_value(board.view(false))?;
    assert_eq!(hidden["ships_remaining"], 1);
    assert_eq!(hidden["cells"][0][0], "Empty");

    let revealed = serde_json::to_value(board.view(true))?;
    assert_eq!(revealed["cells"][0][0], "Ship");
    assert_eq!(revealed["cells"][1][0], "Ship");
    assert_eq!(revealed["cells"][0][1], "Empty");
    Ok(())
}

#[test]
fn test_coordinate_serializes() -> anyhow::Result<()> {
    let c = at("C7");
    let json = serde_json::to_string(&c)?;
    let back: Coordinate = serde_json::from_str(&json)?;
    assert_eq!(back, c);
    Ok(())
}
