//! Game drivers feeding the engine through a session.

use gamebot::{
    Action, GameKind, QConfig, Session, SessionConfig,
    adapters::InMemoryRepository,
    analysis::{suggestions, transition_patterns},
    export::q_table_records,
    games::{
        dice::{self, Face},
        gridworld::{self, Direction, GridWorld, Position, Run},
        rps::Move,
        tictactoe::{self, Match, Player},
    },
};

fn session(game: GameKind, defaults: QConfig) -> Session<InMemoryRepository> {
    let config = SessionConfig::new("models").with_defaults(defaults);
    Session::open_with(InMemoryRepository::new(), game, &config).unwrap()
}

fn walk(world: &GridWorld, directions: &[Direction]) -> Run {
    let mut run = Run::new(world);
    for &direction in directions {
        run.play(world, direction).unwrap();
    }
    run
}

#[test]
fn test_gridworld_learns_detour_around_wall() {
    use Direction::*;

    let world = GridWorld::default().with_walls(vec![Position::new(1, 1), Position::new(2, 1)]);
    let mut session = session(GameKind::GridWorld, QConfig::default().with_learning_rate(0.5));
    let path = [Right, Right, Right, Down, Down, Down];

    for _ in 0..40 {
        let run = walk(&world, &path);
        assert!(run.is_done());
        gridworld::train(session.agent_mut(), &run).unwrap();
    }

    let rollout = gridworld::rollout(session.agent_mut(), &world, world.start).unwrap();
    assert!(rollout.reached_goal);
    let taken: Vec<Direction> = rollout.path.iter().map(|&(_, direction)| direction).collect();
    assert_eq!(taken, path);

    // The human's detour through a wall is flagged against the learned path.
    let clumsy = walk(&world, &[Down, Right]);
    let found = suggestions(session.agent_mut(), &clumsy.decisions()).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].suggested, Right.action());
}

#[test]
fn test_gridworld_rollout_gives_up_without_knowledge() {
    let world = GridWorld::default();
    let mut session = session(GameKind::GridWorld, QConfig::default());
    // Teach the agent to walk into the top wall forever.
    session
        .agent_mut()
        .update(&Position::new(0, 0), &Direction::Up.action(), 1.0, None, true)
        .unwrap();

    let rollout = gridworld::rollout(session.agent_mut(), &world, world.start).unwrap();
    assert!(!rollout.reached_goal);
    assert_eq!(rollout.path.len(), gridworld::MAX_ROLLOUT_STEPS);
    assert_eq!(rollout.end, world.start);
}

#[test]
fn test_tictactoe_games_train_restricted_bootstrap() {
    let mut session = session(GameKind::TicTacToe, QConfig::default().with_seed(3));

    for _ in 0..5 {
        let mut game = Match::new();
        let mut cells = 0..9;
        while !game.is_over() {
            let idx = cells.find(|&idx| game.board().is_empty_cell(idx)).unwrap();
            game.human_move(idx).unwrap();
            if !game.is_over() {
                assert_eq!(game.to_move(), Player::BOT);
                game.bot_move(session.agent_mut(), true).unwrap();
            }
        }
        let applied = game.train(session.agent_mut()).unwrap();
        assert_eq!(applied, game.transitions().unwrap().len());
    }

    // Every bot move was a training selection.
    assert!(session.agent().step() >= 5);
    for (state, action, _) in session.agent().q_table().iter() {
        // Only cells that were empty in that position were ever credited.
        let board = tictactoe::Board::from_str_cells(state.as_str().trim_matches('"')).unwrap();
        assert!(board.legal_actions().contains(action), "{state} / {action}");
    }
    session.save().unwrap();
}

#[test]
fn test_tictactoe_hint_uses_learned_values() {
    let mut session = session(GameKind::TicTacToe, QConfig::default().with_learning_rate(1.0));
    let mut game = Match::new();
    game.human_move(0).unwrap();
    game.bot_move(session.agent_mut(), false).unwrap();

    let board = *game.board();
    let favourite = board.legal_actions()[2].clone();
    session
        .agent_mut()
        .update(&board, &favourite, 1.0, None, true)
        .unwrap();

    let hint = game.hint(session.agent_mut()).unwrap();
    assert_eq!(hint.map(Action::from), Some(favourite));
}

#[test]
fn test_dice_predictor_and_patterns_agree() {
    let mut session = session(GameKind::Dice, QConfig::default().with_learning_rate(0.5));
    let rolls: Vec<Face> = [2, 4, 2, 4, 2, 6, 2, 4]
        .into_iter()
        .map(|value| Face::new(value).unwrap())
        .collect();
    dice::train(session.agent_mut(), &rolls).unwrap();

    let history: Vec<Action> = rolls.iter().map(Face::action).collect();
    let patterns = transition_patterns(&history, 1);
    let after_two = patterns
        .iter()
        .find(|pattern| pattern.context == vec![Action::from("2")])
        .unwrap();
    assert_eq!(after_two.likely, Action::from("4"));
    assert_eq!((after_two.count, after_two.total), (3, 4));

    let guess = dice::guess(session.agent_mut(), Some(Face::new(2).unwrap())).unwrap();
    assert_eq!(guess.action(), after_two.likely);
}

#[test]
fn test_rps_patterns_name_counter_moves() {
    let history: Vec<Action> = [Move::Rock, Move::Paper, Move::Rock, Move::Paper, Move::Rock]
        .iter()
        .map(Move::action)
        .collect();
    let patterns = transition_patterns(&history, 2);
    let after_rock_paper = patterns
        .iter()
        .find(|pattern| pattern.context == vec![Move::Rock.action(), Move::Paper.action()])
        .unwrap();
    let likely = Move::from_action(&after_rock_paper.likely).unwrap();
    assert_eq!(likely, Move::Rock);
    assert_eq!(likely.beaten_by(), Move::Paper);
    assert_eq!(after_rock_paper.frequency(), 1.0);
}

#[test]
fn test_export_records_follow_table() {
    let mut session = session(GameKind::RockPaperScissors, QConfig::default());
    gamebot::games::rps::train(session.agent_mut(), &[Move::Rock, Move::Paper]).unwrap();

    let records = q_table_records(session.agent());
    assert_eq!(records.len(), session.agent().q_table().len());
    assert_eq!(records[0].state, "\"paper\"");
    assert_eq!(records[0].action, "scissors");
    assert_eq!(records[1].state, "\"rock\"");
    assert_eq!(records[1].action, "paper");
}
