//! Uniformly random player.

use async_trait::async_trait;

use crate::core::{Game, GameRng, Role};

use super::heuristic::moves_for;
use super::{Decision, Player, PlayerError};

/// Plays a uniformly random legal action.
#[derive(Clone, Debug)]
pub struct RandomPlayer {
    name: String,
    rng: GameRng,
}

impl RandomPlayer {
    /// Create a random player with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            name: "RandomPlayer".to_string(),
            rng: GameRng::new(seed),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Choose a random legal action.
    pub fn choose<G: Game>(&mut self, game: &G, state: &G::State, role: Role) -> Result<G::Action, PlayerError> {
        let actions = moves_for(game, state, role)?;
        self.rng
            .choose(&actions)
            .cloned()
            .ok_or(PlayerError::NotActive { role })
    }
}

#[async_trait]
impl<G: Game> Player<G> for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn decision(
        &mut self,
        game: &G,
        state: &G::State,
        role: Role,
    ) -> Result<Decision<G::Action>, PlayerError> {
        self.choose(game, state, role).map(Decision::Act)
    }
}
