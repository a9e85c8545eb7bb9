//! Odds and Evens: both roles show one or two fingers at the same time.
//!
//! An odd total scores for "Odds", an even total for "Evens". The first role
//! to reach the target wins.

use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use crate::core::{ActiveRoles, Game, GameError, Haps, JointAction, Role, RoleMap};

const ODDS: Role = Role::new(0);
const EVENS: Role = Role::new(1);

/// Points of each role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OddsEvensState {
    points: [u32; 2],
}

impl OddsEvensState {
    /// Points of a role.
    #[must_use]
    pub fn points(&self, role: Role) -> u32 {
        self.points[role.index()]
    }
}

/// Simultaneous-move game. Actions are the number of fingers shown (1 or 2).
#[derive(Clone, Debug)]
pub struct OddsEvens {
    target: u32,
}

impl OddsEvens {
    /// Create a game played to `target` points.
    #[must_use]
    pub fn new(target: u32) -> Self {
        Self { target }
    }

    fn winner(&self, state: &OddsEvensState) -> Option<Role> {
        Role::all(2).find(|&r| state.points(r) >= self.target)
    }
}

impl Game for OddsEvens {
    type State = OddsEvensState;
    type Action = u8;

    fn name(&self) -> &str {
        "OddsEvens"
    }

    fn role_count(&self) -> usize {
        2
    }

    fn role_name(&self, role: Role) -> String {
        let name = if role == ODDS { "Odds" } else { "Evens" };
        name.to_string()
    }

    fn initial_state(&self) -> OddsEvensState {
        OddsEvensState::default()
    }

    fn active_roles(&self, state: &OddsEvensState) -> ActiveRoles {
        if self.winner(state).is_some() {
            ActiveRoles::new()
        } else {
            smallvec![ODDS, EVENS]
        }
    }

    fn actions(&self, state: &OddsEvensState, _role: Role) -> Vec<u8> {
        if self.winner(state).is_some() {
            Vec::new()
        } else {
            vec![1, 2]
        }
    }

    fn result(&self, state: &OddsEvensState) -> Option<RoleMap<f64>> {
        self.winner(state)
            .map(|winner| RoleMap::new(2, |r| if r == winner { 1.0 } else { -1.0 }))
    }

    fn next(&self, state: &OddsEvensState, actions: &JointAction<u8>, _haps: &Haps) -> Result<OddsEvensState, GameError> {
        let odds = *actions.get(ODDS).ok_or(GameError::MissingAction { role: ODDS })?;
        let evens = *actions.get(EVENS).ok_or(GameError::MissingAction { role: EVENS })?;

        let scorer = if (odds + evens) % 2 == 1 { ODDS } else { EVENS };
        let mut next = state.clone();
        next.points[scorer.index()] += 1;
        Ok(next)
    }

    fn is_simultaneous(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_roles_active() {
        let game = OddsEvens::new(3);
        let state = game.initial_state();

        assert_eq!(game.active_roles(&state).as_slice(), &[ODDS, EVENS]);
        assert!(game.is_simultaneous());
    }

    #[test]
    fn test_parity_scores() {
        let game = OddsEvens::new(3);
        let state = game.initial_state();

        let odd = JointAction::from_iter([(ODDS, 1), (EVENS, 2)]);
        let next = game.next(&state, &odd, &Haps::new()).unwrap();
        assert_eq!(next.points(ODDS), 1);

        let even = JointAction::from_iter([(ODDS, 2), (EVENS, 2)]);
        let next = game.next(&next, &even, &Haps::new()).unwrap();
        assert_eq!(next.points(EVENS), 1);
    }

    #[test]
    fn test_missing_simultaneous_action() {
        let game = OddsEvens::new(3);
        let state = game.initial_state();

        assert_eq!(
            game.transition(&state, &JointAction::single(ODDS, 1), &Haps::new()),
            Err(GameError::MissingAction { role: EVENS })
        );
    }

    #[test]
    fn test_target_reached() {
        let game = OddsEvens::new(1);
        let state = game.initial_state();
        let even = JointAction::from_iter([(ODDS, 1), (EVENS, 1)]);

        let next = game.next(&state, &even, &Haps::new()).unwrap();
        assert_eq!(game.result(&next), Some(RoleMap::from_vec(vec![-1.0, 1.0])));
    }
}
