//! Exhaustive search integration tests: MiniMax, AlphaBeta, MaxN.

use ludorum::core::{ActiveRoles, Game, GameError, GameRng, Haps, JointAction, Role, RoleMap};
use ludorum::games::{OddsEvens, Pig, PigAction, PigState, TicTacToe};
use ludorum::players::{best_actions, Player, RandomPlayer};
use ludorum::search::{AlphaBetaPlayer, Expectiminimax, MaxNPlayer, MiniMaxPlayer, SearchConfig};

const XS: Role = Role::new(0);
const OS: Role = Role::new(1);

/// One move by the first role: `A` wins it the game, `B` loses it.
struct Duel;

impl Game for Duel {
    type State = Option<char>;
    type Action = char;

    fn name(&self) -> &str {
        "Duel"
    }

    fn role_count(&self) -> usize {
        2
    }

    fn initial_state(&self) -> Option<char> {
        None
    }

    fn active_roles(&self, state: &Option<char>) -> ActiveRoles {
        match state {
            None => std::iter::once(Role::new(0)).collect(),
            Some(_) => ActiveRoles::new(),
        }
    }

    fn actions(&self, state: &Option<char>, _role: Role) -> Vec<char> {
        match state {
            None => vec!['A', 'B'],
            Some(_) => Vec::new(),
        }
    }

    fn result(&self, state: &Option<char>) -> Option<RoleMap<f64>> {
        match state {
            Some('A') => Some(RoleMap::from_vec(vec![1.0, -1.0])),
            Some(_) => Some(RoleMap::from_vec(vec![-1.0, 1.0])),
            None => None,
        }
    }

    fn next(&self, _state: &Option<char>, actions: &JointAction<char>, _haps: &Haps) -> Result<Option<char>, GameError> {
        let role = Role::new(0);
        actions
            .get(role)
            .copied()
            .map(Some)
            .ok_or(GameError::MissingAction { role })
    }
}

fn tictactoe_positions(count: usize, min_marks: usize, seed: u64) -> Vec<ludorum::games::Board> {
    let game = TicTacToe::new();
    let mut rng = GameRng::new(seed);
    let mut positions = Vec::new();

    while positions.len() < count {
        let mut board = game.initial_state();
        let mut marks = 0;
        while marks < min_marks && game.result(&board).is_none() {
            let role = board.to_move();
            let actions = game.actions(&board, role);
            let square = *rng.choose(&actions).unwrap();
            board = game.next(&board, &JointAction::single(role, square), &Haps::new()).unwrap();
            marks += 1;
        }
        if game.result(&board).is_none() {
            positions.push(board);
        }
    }
    positions
}

// =============================================================================
// MiniMax
// =============================================================================

#[test]
fn test_depth_one_duel_picks_winning_action() {
    let game = Duel;
    let state = game.initial_state();

    for seed in 0..10 {
        let mut player = MiniMaxPlayer::<Duel>::new(SearchConfig::default().with_seed(seed));
        assert_eq!(player.choose(&game, &state, Role::new(0)).unwrap(), 'A');
    }
}

#[test]
fn test_empty_board_openings_are_all_draws() {
    let game = TicTacToe::new();
    let state = game.initial_state();
    let mut player = AlphaBetaPlayer::<TicTacToe>::new(SearchConfig::default().with_horizon(9));

    let evaluations = player.evaluate_actions(&game, &state, XS).unwrap();
    assert_eq!(evaluations.len(), 9);
    assert!(evaluations.iter().all(|(_, value)| *value == 0.0));
}

#[test]
fn test_empty_board_prefers_center_with_line_heuristic() {
    let game = TicTacToe::new();
    let state = game.initial_state();
    let mut player = MiniMaxPlayer::<TicTacToe>::new(SearchConfig::default().with_horizon(1))
        .with_heuristic(TicTacToe::line_heuristic);

    let square = player.choose(&game, &state, XS).unwrap();
    assert!([0, 2, 4, 6, 8].contains(&square));
}

#[test]
fn test_minimax_takes_win_and_blocks() {
    let game = TicTacToe::new();
    let mut player = MiniMaxPlayer::<TicTacToe>::new(SearchConfig::default().with_horizon(9));

    let win = TicTacToe::board_from("XX_OO____");
    assert_eq!(player.choose(&game, &win, XS).unwrap(), 2);

    let block = TicTacToe::board_from("X___OO_X_");
    assert_eq!(player.choose(&game, &block, XS).unwrap(), 3);
}

#[test]
fn test_minimax_as_second_role() {
    let game = TicTacToe::new();
    let board = TicTacToe::board_from("XX__O____");
    let mut player = MiniMaxPlayer::<TicTacToe>::new(SearchConfig::default().with_horizon(9));

    assert_eq!(player.choose(&game, &board, OS).unwrap(), 2);
}

#[test]
fn test_hook_overrides_values() {
    let game = Duel;
    let state = game.initial_state();

    // Pretend B is a sure win; NaN answers are ignored.
    let mut player = MiniMaxPlayer::<Duel>::new(SearchConfig::default()).with_hook(|state: &Option<char>, _| match state {
        Some('B') => Some(5.0),
        Some('A') => Some(f64::NAN),
        _ => None,
    });

    let evaluations = player.evaluate_actions(&game, &state, Role::new(0)).unwrap();
    assert_eq!(evaluations, vec![('A', 1.0), ('B', 5.0)]);
    assert_eq!(player.choose(&game, &state, Role::new(0)).unwrap(), 'B');
}

// =============================================================================
// AlphaBeta
// =============================================================================

#[test]
fn test_alphabeta_agrees_with_minimax() {
    let game = TicTacToe::new();
    let config = SearchConfig::default().with_horizon(9);

    for board in tictactoe_positions(12, 3, 7) {
        let role = board.to_move();
        let mut minimax = MiniMaxPlayer::<TicTacToe>::new(config.clone());
        let mut alphabeta = AlphaBetaPlayer::<TicTacToe>::new(config.clone());

        let expected = minimax.evaluate_actions(&game, &board, role).unwrap();
        let actual = alphabeta.evaluate_actions(&game, &board, role).unwrap();

        assert_eq!(expected, actual, "values differ on {}", board);
        assert_eq!(best_actions(&expected), best_actions(&actual));
        assert!(alphabeta.stats().nodes <= minimax.stats().nodes);
    }
}

#[test]
fn test_alphabeta_visits_fewer_nodes() {
    let game = TicTacToe::new();
    let board = TicTacToe::board_from("X___O____");
    let config = SearchConfig::default().with_horizon(9);

    let mut minimax = MiniMaxPlayer::<TicTacToe>::new(config.clone());
    let mut alphabeta = AlphaBetaPlayer::<TicTacToe>::new(config);
    minimax.evaluate_actions(&game, &board, XS).unwrap();
    alphabeta.evaluate_actions(&game, &board, XS).unwrap();

    assert!(alphabeta.stats().nodes < minimax.stats().nodes);
}

// =============================================================================
// Expectiminimax
// =============================================================================

#[test]
fn test_expectiminimax_holds_winning_total() {
    let game = Pig::new(10);
    let state = PigState::new(Role::new(0), [0, 0], vec![6, 6]);
    let mut player = Expectiminimax::<Pig>::new(SearchConfig::default().with_horizon(3))
        .with_heuristic(Pig::score_heuristic);

    let evaluations = player.evaluate_actions(&game, &state, Role::new(0)).unwrap();
    let hold = evaluations.iter().find(|(a, _)| *a == PigAction::Hold).unwrap().1;
    let roll = evaluations.iter().find(|(a, _)| *a == PigAction::Roll).unwrap().1;

    assert_eq!(hold, 1.0);
    assert!(roll < hold);
    assert_eq!(player.choose(&game, &state, Role::new(0)).unwrap(), PigAction::Hold);
}

#[test]
fn test_expectiminimax_weights_die_outcomes() {
    // Only a roll is legal and its chance node sits at horizon 1, so the
    // value is the probability-weighted heuristic of the six outcomes.
    let game = Pig::new(100);
    let state = game.initial_state();
    let mut player = Expectiminimax::<Pig>::new(SearchConfig::default().with_horizon(1))
        .with_heuristic(Pig::score_heuristic);

    let evaluations = player.evaluate_actions(&game, &state, Role::new(0)).unwrap();
    let expected: f64 = (2..=6).map(|die| die as f64 / 2.0 / 100.0).sum::<f64>() / 6.0;

    assert_eq!(evaluations.len(), 1);
    assert!((evaluations[0].1 - expected).abs() < 1e-12);
}

#[test]
fn test_roll_reaches_horizon_one_level_early() {
    let game = Pig::new(100);
    let state = PigState::new(Role::new(0), [0, 0], vec![3]);

    let mut shallow = Expectiminimax::<Pig>::new(SearchConfig::default().with_horizon(1))
        .with_heuristic(Pig::score_heuristic);
    shallow.evaluate_actions(&game, &state, Role::new(0)).unwrap();
    // Hold's successor and the roll's chance node; no die outcome is searched.
    assert_eq!(shallow.stats().nodes, 2);
    assert_eq!(shallow.stats().max_depth, 1);

    let mut deeper = Expectiminimax::<Pig>::new(SearchConfig::default().with_horizon(2))
        .with_heuristic(Pig::score_heuristic);
    deeper.evaluate_actions(&game, &state, Role::new(0)).unwrap();
    // Roll: chance node plus six outcomes at depth 2. Hold: Two's turn at
    // depth 1 and its roll's chance node at depth 2.
    assert_eq!(deeper.stats().nodes, 9);
    assert_eq!(deeper.stats().max_depth, 2);
}

#[test]
fn test_alphabeta_agrees_with_expectiminimax_on_pig() {
    let game = Pig::new(12);
    let state = PigState::new(Role::new(1), [8, 5], vec![4, 2]);
    let config = SearchConfig::default().with_horizon(4);

    let mut expecti = Expectiminimax::<Pig>::new(config.clone()).with_heuristic(Pig::score_heuristic);
    let mut alphabeta = AlphaBetaPlayer::<Pig>::new(config).with_heuristic(Pig::score_heuristic);

    let expected = expecti.evaluate_actions(&game, &state, Role::new(1)).unwrap();
    let actual = alphabeta.evaluate_actions(&game, &state, Role::new(1)).unwrap();

    assert_eq!(expected.len(), actual.len());
    for ((a, x), (b, y)) in expected.iter().zip(&actual) {
        assert_eq!(a, b);
        assert!((x - y).abs() < 1e-12, "{:?}: {} vs {}", a, x, y);
    }
    assert!(alphabeta.stats().nodes <= expecti.stats().nodes);
}

// =============================================================================
// MaxN
// =============================================================================

#[test]
fn test_maxn_matches_minimax_on_two_roles() {
    let game = TicTacToe::new();
    let board = TicTacToe::board_from("X___OO_X_");
    let mut player = MaxNPlayer::<TicTacToe>::new(SearchConfig::default().with_horizon(9));

    assert_eq!(player.choose(&game, &board, XS).unwrap(), 3);

    let values = player.maxn(&game, &board, 0).unwrap();
    assert_eq!(values.values().sum::<f64>(), 0.0);
}

// =============================================================================
// Compatibility
// =============================================================================

#[test]
fn test_can_play() {
    let minimax = MiniMaxPlayer::<OddsEvens>::new(SearchConfig::default());
    let alphabeta = AlphaBetaPlayer::<OddsEvens>::new(SearchConfig::default());
    let maxn = MaxNPlayer::<OddsEvens>::new(SearchConfig::default());
    let game = OddsEvens::new(3);

    assert!(!minimax.can_play(&game));
    assert!(!alphabeta.can_play(&game));
    assert!(!maxn.can_play(&game));

    assert!(Player::<Pig>::can_play(&Expectiminimax::<Pig>::new(SearchConfig::default()), &Pig::default()));
    assert!(!Player::<Pig>::can_play(&MaxNPlayer::<Pig>::new(SearchConfig::default()), &Pig::default()));
    assert!(Player::<OddsEvens>::can_play(&RandomPlayer::new(0), &game));
}
