//! Scripted player that replays a fixed list of decisions.
//!
//! Useful for reproducing recorded games and for driving the match engine
//! through exact scenarios in tests (including quitting mid-match).

use async_trait::async_trait;
use std::collections::VecDeque;

use crate::core::{Game, Role};

use super::{Decision, Player, PlayerError};

/// Replays scripted decisions in order.
///
/// Decisions are returned as-is; the match engine rejects illegal ones.
#[derive(Clone, Debug)]
pub struct TracePlayer<A> {
    name: String,
    script: VecDeque<Decision<A>>,
}

impl<A> TracePlayer<A> {
    /// Create a player that plays the given actions, in order.
    pub fn new(actions: impl IntoIterator<Item = A>) -> Self {
        Self::from_decisions(actions.into_iter().map(Decision::Act))
    }

    /// Create a player from arbitrary decisions, quits included.
    pub fn from_decisions(decisions: impl IntoIterator<Item = Decision<A>>) -> Self {
        Self {
            name: "TracePlayer".to_string(),
            script: decisions.into_iter().collect(),
        }
    }

    /// Append a quit after the scripted actions.
    #[must_use]
    pub fn then_quit(mut self) -> Self {
        self.script.push_back(Decision::Quit);
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Decisions left in the script.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

#[async_trait]
impl<G: Game> Player<G> for TracePlayer<G::Action> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn decision(
        &mut self,
        _game: &G,
        _state: &G::State,
        role: Role,
    ) -> Result<Decision<G::Action>, PlayerError> {
        self.script
            .pop_front()
            .ok_or(PlayerError::ScriptExhausted { role })
    }
}
