//! Game contract properties checked on the reference games.

use proptest::prelude::*;

use ludorum::core::{Distribution, Game, GameRng, Haps, JointAction, Role, Status, Transition};
use ludorum::games::{OddsEvens, Pig, PigAction, PigState, TicTacToe};

/// Play uniformly random joint actions from the initial state, checking the
/// contract at every state. Returns the number of plies played.
fn random_walk<G: Game>(game: &G, seed: u64, max_plies: usize) -> usize {
    let mut rng = GameRng::new(seed);
    let mut state = game.initial_state();

    for ply in 0..max_plies {
        let active = game.active_roles(&state);
        let result = game.result(&state);
        assert!(active.is_empty() == result.is_some(), "actions and result both or neither defined");

        let moves = match game.status(&state).unwrap() {
            Status::Terminal(result) => {
                assert_eq!(result.role_count(), game.role_count());
                assert!(result.values().sum::<f64>().abs() < 1e-12, "not zero-sum");
                return ply;
            }
            Status::Playing(moves) => moves,
        };

        let joint: JointAction<G::Action> = moves
            .iter()
            .map(|(role, actions)| (*role, rng.choose(actions).unwrap().clone()))
            .collect();

        let transition = game.transition(&state, &joint, &Haps::new()).unwrap();
        if let Transition::Contingent(contingent) = &transition {
            let total: f64 = contingent.possible_haps().iter().map(|(_, p)| p).sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
        state = transition.settle(game, &mut rng).unwrap().0;
    }
    max_plies
}

proptest! {
    #[test]
    fn prop_tictactoe_contract(seed in any::<u64>()) {
        let plies = random_walk(&TicTacToe::new(), seed, 20);
        prop_assert!(plies >= 5 && plies <= 9);
    }

    #[test]
    fn prop_pig_contract(seed in any::<u64>()) {
        random_walk(&Pig::new(15), seed, 5_000);
    }

    #[test]
    fn prop_odds_evens_contract(seed in any::<u64>(), target in 1u32..6) {
        let plies = random_walk(&OddsEvens::new(target), seed, 100);
        prop_assert!(plies >= target as usize);
        prop_assert!(plies <= 2 * target as usize - 1);
    }

    #[test]
    fn prop_transition_is_deterministic(square in 0u8..9, die in 1i64..=6) {
        let game = TicTacToe::new();
        let board = game.initial_state();
        let joint = JointAction::single(Role::new(0), square);
        prop_assert_eq!(game.next(&board, &joint, &Haps::new()), game.next(&board, &joint, &Haps::new()));

        let pig = Pig::new(100);
        let state = PigState::new(Role::new(0), [0, 0], vec![3]);
        let roll = JointAction::single(Role::new(0), PigAction::Roll);
        let haps = Haps::single(ludorum::games::pig::DIE, die);
        prop_assert_eq!(pig.next(&state, &roll, &haps), pig.next(&state, &roll, &haps));
    }

    #[test]
    fn prop_distribution_sums_to_one(weights in prop::collection::vec(0.01f64..10.0, 1..12)) {
        let total: f64 = weights.iter().sum();
        let outcomes: Vec<(usize, f64)> = weights.iter().enumerate().map(|(i, w)| (i, w / total)).collect();

        let distribution = Distribution::new(outcomes.clone()).unwrap();
        let sum: f64 = distribution.iter().map(|(_, p)| p).sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);

        let doubled: Vec<(usize, f64)> = outcomes.into_iter().map(|(i, p)| (i, p * 2.0)).collect();
        prop_assert!(Distribution::new(doubled).is_err());
    }

    #[test]
    fn prop_rng_checkpoint_resumes(seed in any::<u64>(), skip in 0usize..50) {
        let mut rng = GameRng::new(seed);
        for _ in 0..skip {
            rng.random();
        }

        let mut restored = GameRng::from_state(&rng.state());
        for _ in 0..10 {
            prop_assert_eq!(rng.random().to_bits(), restored.random().to_bits());
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_pig_opening_scenario() {
    let game = Pig::new(100);
    let state = game.initial_state();
    let one = game.role_by_name("One").unwrap();
    let two = game.role_by_name("Two").unwrap();

    assert_eq!(game.active_roles(&state).as_slice(), &[one]);
    assert_eq!(game.actions(&state, one), vec![PigAction::Roll]);

    let roll = JointAction::single(one, PigAction::Roll);
    let next = game.next(&state, &roll, &Haps::single(ludorum::games::pig::DIE, 1)).unwrap();
    assert!(next.rolls().is_empty());
    assert_eq!(next.active(), two);
    assert_eq!(next.score(one), 0);
}

#[test]
fn test_pig_roll_outcomes_enumerate_die() {
    let game = Pig::new(100);
    let state = PigState::new(Role::new(0), [0, 0], vec![2]);
    let roll = JointAction::single(Role::new(0), PigAction::Roll);

    let outcomes = game.advance(&state, &roll, &Haps::new()).unwrap().outcomes(&game).unwrap();
    assert_eq!(outcomes.len(), 6);
    let total: f64 = outcomes.iter().map(|(_, p)| p).sum();
    assert!((total - 1.0).abs() < 1e-12);
    assert_eq!(outcomes.iter().filter(|(s, _)| s.active() == Role::new(1)).count(), 1);
}
