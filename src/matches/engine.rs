//! The match loop.

use futures::future::join_all;
use tracing::{debug, trace, warn};

use crate::core::{Game, GameRng, Haps, JointAction, Role, RoleMap, Status};
use crate::players::{Decision, Player, PlayerError};

use super::event::{GameEvent, MatchEvent, MatchObserver};
use super::history::{HistoryEntry, MatchStatus};
use super::MatchError;

/// One game instance played to completion by one player per role.
///
/// The match owns its history: one entry per ply, starting with the
/// initial state, so `ply() == history().len() - 1` always holds.
pub struct Match<G: Game> {
    game: G,
    players: Vec<Box<dyn Player<G>>>,
    history: Vec<HistoryEntry<G::State, G::Action>>,
    status: MatchStatus,
    observers: Vec<Box<dyn MatchObserver<G>>>,
    rng: GameRng,
    started: bool,
}

impl<G: Game> Match<G> {
    /// Seat `players[i]` as role `i`.
    pub fn new(game: G, players: Vec<Box<dyn Player<G>>>) -> Result<Self, MatchError> {
        if players.len() != game.role_count() {
            return Err(MatchError::PlayerCount {
                expected: game.role_count(),
                found: players.len(),
            });
        }

        let initial = game.initial_state();
        Ok(Self {
            game,
            players,
            history: vec![HistoryEntry::initial(initial)],
            status: MatchStatus::Active { ply: 0 },
            observers: Vec::new(),
            rng: GameRng::new(0),
            started: false,
        })
    }

    /// Seed for chance sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = GameRng::new(seed);
        self
    }

    /// Register an observer.
    pub fn with_observer<O: MatchObserver<G> + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Recorded plies, oldest first.
    pub fn history(&self) -> &[HistoryEntry<G::State, G::Action>] {
        &self.history
    }

    /// Number of plies played.
    pub fn ply(&self) -> usize {
        self.history.len() - 1
    }

    /// Current state.
    pub fn state(&self) -> &G::State {
        &self.history[self.history.len() - 1].state
    }

    pub fn status(&self) -> &MatchStatus {
        &self.status
    }

    /// Final result, if the match finished normally.
    pub fn result(&self) -> Option<&RoleMap<f64>> {
        self.status.result()
    }

    /// Play until the match ends or `max_plies` plies have been recorded.
    ///
    /// May be called again to continue a match stopped by `max_plies`. An
    /// error ends the match: the status becomes [`MatchStatus::Failed`] and
    /// later calls return it without asking any player again.
    pub async fn run(&mut self, max_plies: Option<usize>) -> Result<MatchStatus, MatchError> {
        if !self.started {
            self.started = true;
            if let Err(err) = self.start() {
                return Err(self.fail(err));
            }
        }

        while self.status.is_active() {
            if max_plies.is_some_and(|max| self.ply() >= max) {
                break;
            }
            if let Err(err) = self.step().await {
                return Err(self.fail(err));
            }
        }

        Ok(self.status.clone())
    }

    fn fail(&mut self, err: MatchError) -> MatchError {
        let role = match &err {
            MatchError::Decision { role, .. } | MatchError::IncompatiblePlayer { role, .. } => Some(*role),
            _ => None,
        };
        let ply = self.ply();
        warn!(ply, error = %err, "match failed");
        self.status = MatchStatus::Failed { role, ply };
        err
    }

    /// Seat every player and check the initial state.
    fn start(&mut self) -> Result<(), MatchError> {
        for (i, player) in self.players.iter_mut().enumerate() {
            let role = Role::new(i as u8);
            player.participate(&self.game, role).map_err(|source| match source {
                PlayerError::IncompatibleGame { player, .. } => MatchError::IncompatiblePlayer { role, player },
                source => MatchError::Decision { role, source },
            })?;
        }

        let status = self.game.status(self.state())?;

        debug!(
            game = self.game.name(),
            players = self.players.len(),
            "match started"
        );
        let state = self.state().clone();
        self.notify(MatchEvent::Begin { state: state.clone() });

        if let Status::Terminal(result) = status {
            self.finish(state, result);
        }
        Ok(())
    }

    /// Play one ply.
    async fn step(&mut self) -> Result<(), MatchError> {
        let ply = self.ply();
        let state = self.state().clone();

        let moves = match self.game.status(&state)? {
            Status::Terminal(result) => {
                self.finish(state, result);
                return Ok(());
            }
            Status::Playing(moves) => moves,
        };
        let active: Vec<Role> = moves.iter().map(|(role, _)| *role).collect();
        debug!(ply, active = ?active, "match ply");

        let views: Vec<(Role, G::State)> = active
            .iter()
            .map(|&role| (role, self.game.view(&state, role)))
            .collect();

        // Every active role decides on its own view; all requests are
        // joined before anything is applied.
        let game = &self.game;
        let requests = self
            .players
            .iter_mut()
            .enumerate()
            .filter_map(|(i, player)| {
                let role = Role::new(i as u8);
                let (_, view) = views.iter().find(|(r, _)| *r == role)?;
                Some(async move { (role, player.decision(game, view, role).await) })
            });
        let decisions = join_all(requests).await;

        let mut joint = JointAction::new();
        for (role, decision) in decisions {
            match decision.map_err(|source| MatchError::Decision { role, source })? {
                Decision::Act(action) => {
                    trace!(ply, %role, action = ?action, "decision");
                    joint.insert(role, action);
                }
                Decision::Quit => {
                    warn!(ply, %role, "player quit");
                    self.status = MatchStatus::Aborted { role, ply };
                    self.notify(MatchEvent::Quit { state, role });
                    return Ok(());
                }
            }
        }

        let (next, haps) = self
            .game
            .transition(&state, &joint, &Haps::new())?
            .settle(&self.game, &mut self.rng)?;
        if !haps.is_empty() {
            debug!(ply, haps = ?haps, "chance resolved");
        }
        let status = self.game.status(&next)?;

        self.history.push(HistoryEntry::new(next.clone(), joint.clone(), haps.clone()));
        self.notify(MatchEvent::Next {
            prior: state,
            actions: joint,
            haps,
            next: next.clone(),
        });

        match status {
            Status::Terminal(result) => self.finish(next, result),
            Status::Playing(_) => self.status = MatchStatus::Active { ply: ply + 1 },
        }
        Ok(())
    }

    fn finish(&mut self, state: G::State, result: RoleMap<f64>) {
        debug!(ply = self.ply(), result = ?result, "match finished");
        self.status = MatchStatus::Finished { result: result.clone() };
        self.notify(MatchEvent::End { state, result });
    }

    fn notify(&mut self, event: GameEvent<G>) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}
