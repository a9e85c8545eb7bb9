//! The game contract.
//!
//! Games implement [`Game`] to describe:
//! - Which roles must act in a state, and their legal actions
//! - Terminal results
//! - Deterministic transitions, plus the chance variables they depend on
//!
//! Search players, simulation players and the match engine call into
//! `Game` but never interpret game-specific concepts directly.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;

use super::contingent::{ContingentState, Transition};
use super::distribution::{Aleatory, Haps};
use super::error::GameError;
use super::role::{Role, RoleMap};

/// Roles required to act in one ply. Usually one; several in simultaneous games.
pub type ActiveRoles = SmallVec<[Role; 2]>;

/// The actions of every active role in one ply, ordered by role.
///
/// ```
/// use ludorum::core::{JointAction, Role};
///
/// let mut joint = JointAction::single(Role::new(1), "paper");
/// joint.insert(Role::new(0), "rock");
///
/// assert_eq!(joint.get(Role::new(0)), Some(&"rock"));
/// assert_eq!(joint.roles().collect::<Vec<_>>(), vec![Role::new(0), Role::new(1)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointAction<A> {
    entries: SmallVec<[(Role, A); 2]>,
}

impl<A> Default for JointAction<A> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<A> JointAction<A> {
    /// No actions yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The joint action of a single active role.
    pub fn single(role: Role, action: A) -> Self {
        let mut joint = Self::new();
        joint.insert(role, action);
        joint
    }

    /// Set a role's action, replacing any previous one.
    pub fn insert(&mut self, role: Role, action: A) {
        match self.entries.binary_search_by_key(&role, |(r, _)| *r) {
            Ok(pos) => self.entries[pos].1 = action,
            Err(pos) => self.entries.insert(pos, (role, action)),
        }
    }

    /// Get a role's action.
    #[must_use]
    pub fn get(&self, role: Role) -> Option<&A> {
        self.entries
            .binary_search_by_key(&role, |(r, _)| *r)
            .ok()
            .map(|pos| &self.entries[pos].1)
    }

    /// Iterate over (role, action) pairs in role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &A)> {
        self.entries.iter().map(|(r, a)| (*r, a))
    }

    /// Roles with an action.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.entries.iter().map(|(r, _)| *r)
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no action has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A> FromIterator<(Role, A)> for JointAction<A> {
    fn from_iter<I: IntoIterator<Item = (Role, A)>>(iter: I) -> Self {
        let mut joint = Self::new();
        for (role, action) in iter {
            joint.insert(role, action);
        }
        joint
    }
}

/// Checked view of a state: either terminal with a result, or playing with
/// a non-empty action list for every active role.
#[derive(Clone, Debug, PartialEq)]
pub enum Status<A> {
    /// Game over; one signed outcome per role.
    Terminal(RoleMap<f64>),
    /// Legal actions of each active role, in role order.
    Playing(Vec<(Role, Vec<A>)>),
}

impl<A> Status<A> {
    /// Check if the state is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Terminal(_))
    }

    /// The result, if terminal.
    #[must_use]
    pub fn result(&self) -> Option<&RoleMap<f64>> {
        match self {
            Status::Terminal(result) => Some(result),
            Status::Playing(_) => None,
        }
    }

    /// Legal actions of an active role.
    #[must_use]
    pub fn actions(&self, role: Role) -> Option<&[A]> {
        match self {
            Status::Terminal(_) => None,
            Status::Playing(moves) => moves
                .iter()
                .find(|(r, _)| *r == role)
                .map(|(_, actions)| actions.as_slice()),
        }
    }

    /// Active roles (empty if terminal).
    pub fn active_roles(&self) -> impl Iterator<Item = Role> + '_ {
        let moves: &[(Role, Vec<A>)] = match self {
            Status::Terminal(_) => &[],
            Status::Playing(moves) => moves,
        };
        moves.iter().map(|(r, _)| *r)
    }
}

/// Game contract.
///
/// States are immutable values: `next` builds a new state and never
/// mutates its input.
///
/// ## Implementation Notes
///
/// - `active_roles`: empty if and only if `result` is `Some`
/// - `actions`: non-empty for every active role
/// - `aleatories`: chance variables still needed before `next` can run;
///   `resolved` holds the haps already known, which allows chained chance
///   (a second die rolled only on some outcome of the first)
/// - `next`: must be deterministic given the same state, actions and haps
pub trait Game: Send + Sync {
    /// Immutable state value.
    type State: Clone + Debug + PartialEq + Send + Sync;

    /// Action of a single role.
    type Action: Clone + Debug + PartialEq + Eq + Hash + Send + Sync;

    /// Game name (for logging and display).
    fn name(&self) -> &str;

    /// Number of roles. Fixed for the game type.
    fn role_count(&self) -> usize;

    /// Display name of a role.
    fn role_name(&self, role: Role) -> String {
        role.to_string()
    }

    /// The initial state.
    fn initial_state(&self) -> Self::State;

    /// Roles required to act in this state. Empty if terminal.
    fn active_roles(&self, state: &Self::State) -> ActiveRoles;

    /// Legal actions of an active role.
    fn actions(&self, state: &Self::State, role: Role) -> Vec<Self::Action>;

    /// Per-role outcome if the state is terminal, `None` otherwise.
    fn result(&self, state: &Self::State) -> Option<RoleMap<f64>>;

    /// Minimum and maximum possible outcome.
    fn result_bounds(&self) -> (f64, f64) {
        (-1.0, 1.0)
    }

    /// Chance variables the transition still depends on.
    fn aleatories(
        &self,
        _state: &Self::State,
        _actions: &JointAction<Self::Action>,
        _resolved: &Haps,
    ) -> Vec<Aleatory> {
        Vec::new()
    }

    /// Deterministic transition with every chance variable resolved.
    fn next(
        &self,
        state: &Self::State,
        actions: &JointAction<Self::Action>,
        haps: &Haps,
    ) -> Result<Self::State, GameError>;

    /// The part of a state visible to a role. Identity for games of perfect
    /// information.
    fn view(&self, state: &Self::State, _role: Role) -> Self::State {
        state.clone()
    }

    /// Whether more than one role may be active in the same ply.
    fn is_simultaneous(&self) -> bool {
        false
    }

    /// Whether transitions may depend on chance.
    fn is_stochastic(&self) -> bool {
        false
    }

    // === Provided Methods ===

    /// Look up a role by display name.
    fn role_by_name(&self, name: &str) -> Option<Role> {
        Role::all(self.role_count()).find(|&r| self.role_name(r) == name)
    }

    /// Checked view of a state.
    ///
    /// Fails if the state defines both or neither of actions and result,
    /// or if an active role has no legal action.
    fn status(&self, state: &Self::State) -> Result<Status<Self::Action>, GameError> {
        let active = self.active_roles(state);

        match self.result(state) {
            Some(result) => {
                if !active.is_empty() {
                    return Err(GameError::BothActionsAndResult);
                }
                if result.role_count() != self.role_count() {
                    return Err(GameError::RoleCount {
                        expected: self.role_count(),
                        found: result.role_count(),
                    });
                }
                Ok(Status::Terminal(result))
            }
            None => {
                if active.is_empty() {
                    return Err(GameError::NeitherActionsNorResult);
                }
                let mut moves = Vec::with_capacity(active.len());
                for role in active {
                    let actions = self.actions(state, role);
                    if actions.is_empty() {
                        return Err(GameError::NoActions { role });
                    }
                    moves.push((role, actions));
                }
                Ok(Status::Playing(moves))
            }
        }
    }

    /// Check that a joint action has exactly one legal action per active role.
    fn check_actions(
        &self,
        state: &Self::State,
        actions: &JointAction<Self::Action>,
    ) -> Result<(), GameError> {
        let active = self.active_roles(state);

        if let Some(role) = actions.roles().find(|r| !active.contains(r)) {
            return Err(GameError::UnexpectedAction { role });
        }
        for &role in &active {
            let action = actions.get(role).ok_or(GameError::MissingAction { role })?;
            if !self.actions(state, role).contains(action) {
                return Err(GameError::IllegalAction { role });
            }
        }
        Ok(())
    }

    /// Validated transition.
    ///
    /// Returns `Transition::Contingent` while chance variables remain
    /// unresolved by `haps`.
    fn transition(
        &self,
        state: &Self::State,
        actions: &JointAction<Self::Action>,
        haps: &Haps,
    ) -> Result<Transition<Self::State, Self::Action>, GameError> {
        self.check_actions(state, actions)?;
        self.advance(state, actions, haps)
    }

    /// Transition without validating the joint action.
    ///
    /// For callers that built the joint action from `status`, such as
    /// search players.
    fn advance(
        &self,
        state: &Self::State,
        actions: &JointAction<Self::Action>,
        haps: &Haps,
    ) -> Result<Transition<Self::State, Self::Action>, GameError> {
        let pending: Vec<Aleatory> = self
            .aleatories(state, actions, haps)
            .into_iter()
            .filter(|a| !haps.contains(&a.name))
            .collect();

        if pending.is_empty() {
            Ok(Transition::Resolved(self.next(state, actions, haps)?))
        } else {
            Ok(Transition::Contingent(ContingentState::new(
                state.clone(),
                actions.clone(),
                haps.clone(),
                pending,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Distribution;

    /// Counter game: one role adds 1 or 2 until reaching 3; "dice" adds a coin flip.
    struct Counter {
        coin: bool,
    }

    impl Game for Counter {
        type State = u32;
        type Action = u32;

        fn name(&self) -> &str {
            "Counter"
        }

        fn role_count(&self) -> usize {
            1
        }

        fn initial_state(&self) -> u32 {
            0
        }

        fn active_roles(&self, state: &u32) -> ActiveRoles {
            if *state >= 3 {
                ActiveRoles::new()
            } else {
                smallvec::smallvec![Role::new(0)]
            }
        }

        fn actions(&self, _state: &u32, _role: Role) -> Vec<u32> {
            vec![1, 2]
        }

        fn result(&self, state: &u32) -> Option<RoleMap<f64>> {
            (*state >= 3).then(|| RoleMap::with_value(1, 1.0))
        }

        fn aleatories(&self, _state: &u32, _actions: &JointAction<u32>, _resolved: &Haps) -> Vec<Aleatory> {
            if self.coin {
                vec![Aleatory::new("coin", Distribution::uniform(vec![0, 1]).unwrap())]
            } else {
                Vec::new()
            }
        }

        fn next(&self, state: &u32, actions: &JointAction<u32>, haps: &Haps) -> Result<u32, GameError> {
            let step = actions
                .get(Role::new(0))
                .ok_or(GameError::MissingAction { role: Role::new(0) })?;
            let bonus = if self.coin { haps.require("coin")? as u32 } else { 0 };
            Ok(state + step + bonus)
        }
    }

    #[test]
    fn test_status_playing_and_terminal() {
        let game = Counter { coin: false };

        let status = game.status(&0).unwrap();
        assert!(!status.is_terminal());
        assert_eq!(status.actions(Role::new(0)), Some(&[1, 2][..]));

        let status = game.status(&3).unwrap();
        assert!(status.is_terminal());
        assert_eq!(status.active_roles().count(), 0);
    }

    #[test]
    fn test_transition_deterministic() {
        let game = Counter { coin: false };
        let joint = JointAction::single(Role::new(0), 2);

        let a = game.transition(&0, &joint, &Haps::new()).unwrap();
        let b = game.transition(&0, &joint, &Haps::new()).unwrap();

        assert_eq!(a, b);
        assert_eq!(a, Transition::Resolved(2));
    }

    #[test]
    fn test_transition_rejects_bad_joint_actions() {
        let game = Counter { coin: false };

        let illegal = JointAction::single(Role::new(0), 7);
        assert_eq!(
            game.transition(&0, &illegal, &Haps::new()),
            Err(GameError::IllegalAction { role: Role::new(0) })
        );

        let missing = JointAction::new();
        assert_eq!(
            game.transition(&0, &missing, &Haps::new()),
            Err(GameError::MissingAction { role: Role::new(0) })
        );

        let stranger = JointAction::from_iter([(Role::new(0), 1), (Role::new(1), 1)]);
        assert_eq!(
            game.transition(&0, &stranger, &Haps::new()),
            Err(GameError::UnexpectedAction { role: Role::new(1) })
        );
    }

    #[test]
    fn test_transition_with_chance_is_contingent() {
        let game = Counter { coin: true };
        let joint = JointAction::single(Role::new(0), 1);

        let transition = game.transition(&0, &joint, &Haps::new()).unwrap();
        assert!(transition.is_contingent());

        let resolved = game.transition(&0, &joint, &Haps::single("coin", 1)).unwrap();
        assert_eq!(resolved, Transition::Resolved(2));
    }

    #[test]
    fn test_joint_action_insert_replaces() {
        let mut joint = JointAction::single(Role::new(0), 'a');
        joint.insert(Role::new(0), 'b');

        assert_eq!(joint.len(), 1);
        assert_eq!(joint.get(Role::new(0)), Some(&'b'));
        assert_eq!(joint.get(Role::new(1)), None);
    }
}
