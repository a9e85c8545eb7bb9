//! Pig: a two-role dice race.
//!
//! The active role rolls a die as often as it likes, accumulating rolls. A 1
//! wipes the accumulated rolls and passes the turn; holding banks their sum
//! and passes the turn. The first role to bank `goal` points wins.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use crate::core::{ActiveRoles, Aleatory, Distribution, Game, GameError, Haps, JointAction, Role, RoleMap};

/// Name of the chance variable resolved on every roll.
pub const DIE: &str = "die";

/// Pig actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PigAction {
    /// Roll the die.
    Roll,
    /// Bank the turn total and pass.
    Hold,
}

impl std::fmt::Display for PigAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PigAction::Roll => write!(f, "roll"),
            PigAction::Hold => write!(f, "hold"),
        }
    }
}

/// Banked scores, the active role and its unbanked rolls.
///
/// Rolls are a persistent vector so search can clone states cheaply.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PigState {
    active: Role,
    scores: [i64; 2],
    rolls: Vector<i64>,
}

impl PigState {
    /// Create a state.
    pub fn new(active: Role, scores: [i64; 2], rolls: Vec<i64>) -> Self {
        Self {
            active,
            scores,
            rolls: Vector::from(rolls),
        }
    }

    /// Role whose turn it is.
    #[must_use]
    pub fn active(&self) -> Role {
        self.active
    }

    /// Banked score of a role.
    #[must_use]
    pub fn score(&self, role: Role) -> i64 {
        self.scores[role.index()]
    }

    /// Rolls accumulated this turn.
    #[must_use]
    pub fn rolls(&self) -> &Vector<i64> {
        &self.rolls
    }

    /// Points at stake this turn.
    #[must_use]
    pub fn turn_total(&self) -> i64 {
        self.rolls.iter().sum()
    }
}

/// Pig rules. Roles are "One" and "Two".
#[derive(Clone, Debug)]
pub struct Pig {
    goal: i64,
}

impl Pig {
    /// Create a game played to `goal` points.
    #[must_use]
    pub fn new(goal: i64) -> Self {
        Self { goal }
    }

    /// Points needed to win.
    #[must_use]
    pub fn goal(&self) -> i64 {
        self.goal
    }

    fn winner(&self, state: &PigState) -> Option<Role> {
        Role::all(2).find(|&r| state.score(r) >= self.goal)
    }

    /// Heuristic: banked score difference relative to the goal, with the
    /// active role's turn total counted as half-banked.
    pub fn score_heuristic(game: &Pig, state: &PigState, role: Role) -> f64 {
        let mut mine = state.score(role) as f64;
        let mut theirs = state.score(role.next(2)) as f64;
        if state.active == role {
            mine += state.turn_total() as f64 / 2.0;
        } else {
            theirs += state.turn_total() as f64 / 2.0;
        }
        ((mine - theirs) / game.goal as f64).clamp(-1.0, 1.0)
    }
}

impl Default for Pig {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Game for Pig {
    type State = PigState;
    type Action = PigAction;

    fn name(&self) -> &str {
        "Pig"
    }

    fn role_count(&self) -> usize {
        2
    }

    fn role_name(&self, role: Role) -> String {
        let name = if role.index() == 0 { "One" } else { "Two" };
        name.to_string()
    }

    fn initial_state(&self) -> PigState {
        PigState::new(Role::new(0), [0, 0], Vec::new())
    }

    fn active_roles(&self, state: &PigState) -> ActiveRoles {
        if self.winner(state).is_some() {
            ActiveRoles::new()
        } else {
            smallvec![state.active]
        }
    }

    fn actions(&self, state: &PigState, role: Role) -> Vec<PigAction> {
        if role != state.active || self.winner(state).is_some() {
            Vec::new()
        } else if state.rolls.is_empty() {
            vec![PigAction::Roll]
        } else {
            vec![PigAction::Roll, PigAction::Hold]
        }
    }

    fn result(&self, state: &PigState) -> Option<RoleMap<f64>> {
        self.winner(state)
            .map(|winner| RoleMap::new(2, |r| if r == winner { 1.0 } else { -1.0 }))
    }

    fn aleatories(&self, state: &PigState, actions: &JointAction<PigAction>, _resolved: &Haps) -> Vec<Aleatory> {
        match actions.get(state.active) {
            Some(PigAction::Roll) => match Distribution::die(6) {
                Ok(die) => vec![Aleatory::new(DIE, die)],
                Err(_) => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn next(&self, state: &PigState, actions: &JointAction<PigAction>, haps: &Haps) -> Result<PigState, GameError> {
        let role = state.active;
        let action = actions.get(role).ok_or(GameError::MissingAction { role })?;
        let mut next = state.clone();

        match action {
            PigAction::Roll => {
                let value = haps.require(DIE)?;
                if value == 1 {
                    next.rolls.clear();
                    next.active = role.next(2);
                } else {
                    next.rolls.push_back(value);
                }
            }
            PigAction::Hold => {
                if state.rolls.is_empty() {
                    return Err(GameError::IllegalAction { role });
                }
                next.scores[role.index()] += state.turn_total();
                next.rolls.clear();
                next.active = role.next(2);
            }
        }
        Ok(next)
    }

    fn is_stochastic(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, Transition};

    const ONE: Role = Role::new(0);
    const TWO: Role = Role::new(1);

    #[test]
    fn test_first_turn_only_rolls() {
        let game = Pig::new(100);
        let state = game.initial_state();

        assert_eq!(game.actions(&state, ONE), vec![PigAction::Roll]);
        assert!(game.actions(&state, TWO).is_empty());
        assert_eq!(game.role_name(ONE), "One");
    }

    #[test]
    fn test_roll_is_contingent_on_die() {
        let game = Pig::new(100);
        let state = game.initial_state();
        let roll = JointAction::single(ONE, PigAction::Roll);

        let Transition::Contingent(contingent) = game.transition(&state, &roll, &Haps::new()).unwrap() else {
            panic!("roll needs the die");
        };
        let haps = contingent.possible_haps();
        assert_eq!(haps.len(), 6);
        for (_, p) in &haps {
            assert!((p - 1.0 / 6.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rolling_one_passes_turn() {
        let game = Pig::new(100);
        let state = PigState::new(ONE, [0, 0], vec![4, 5]);
        let roll = JointAction::single(ONE, PigAction::Roll);

        let next = game.next(&state, &roll, &Haps::single(DIE, 1)).unwrap();
        assert_eq!(next.active(), TWO);
        assert!(next.rolls().is_empty());
        assert_eq!(next.score(ONE), 0);

        let next = game.next(&state, &roll, &Haps::single(DIE, 3)).unwrap();
        assert_eq!(next.active(), ONE);
        assert_eq!(next.rolls(), &Vector::from(vec![4, 5, 3]));
    }

    #[test]
    fn test_hold_banks_and_wins() {
        let game = Pig::new(20);
        let state = PigState::new(TWO, [3, 12], vec![6, 2]);
        let hold = JointAction::single(TWO, PigAction::Hold);

        let next = game.next(&state, &hold, &Haps::new()).unwrap();
        assert_eq!(next.score(TWO), 20);
        assert_eq!(game.result(&next), Some(RoleMap::from_vec(vec![-1.0, 1.0])));
        assert!(game.active_roles(&next).is_empty());
    }

    #[test]
    fn test_settle_samples_die() {
        let game = Pig::new(100);
        let state = game.initial_state();
        let roll = JointAction::single(ONE, PigAction::Roll);
        let mut rng = GameRng::new(5);

        for _ in 0..20 {
            let (next, haps) = game
                .transition(&state, &roll, &Haps::new())
                .unwrap()
                .settle(&game, &mut rng)
                .unwrap();
            let die = haps.get(DIE).unwrap();
            assert!((1..=6).contains(&die));
            if die == 1 {
                assert_eq!(next.active(), TWO);
            } else {
                assert_eq!(next.rolls(), &Vector::unit(die));
            }
        }
    }
}
