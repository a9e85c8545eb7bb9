//! Match events and observers.
//!
//! The engine reports its progress as [`MatchEvent`]s. Observers are
//! notified synchronously, in registration order, after each event has
//! been recorded in the history.

use std::sync::{Arc, Mutex};

use crate::core::{Game, Haps, JointAction, Role, RoleMap};

/// Something that happened in a match.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchEvent<S, A> {
    /// The match started in `state`.
    Begin { state: S },

    /// One ply was played.
    Next {
        prior: S,
        actions: JointAction<A>,
        haps: Haps,
        next: S,
    },

    /// The match reached a terminal state.
    End { state: S, result: RoleMap<f64> },

    /// `role` quit in `state`.
    Quit { state: S, role: Role },
}

impl<S, A> MatchEvent<S, A> {
    /// Short event name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            MatchEvent::Begin { .. } => "begin",
            MatchEvent::Next { .. } => "next",
            MatchEvent::End { .. } => "end",
            MatchEvent::Quit { .. } => "quit",
        }
    }
}

/// Event type of a game.
pub type GameEvent<G> = MatchEvent<<G as Game>::State, <G as Game>::Action>;

/// Receives match events.
pub trait MatchObserver<G: Game>: Send {
    fn on_event(&mut self, event: &GameEvent<G>);
}

impl<G, F> MatchObserver<G> for F
where
    G: Game,
    F: FnMut(&GameEvent<G>) + Send,
{
    fn on_event(&mut self, event: &GameEvent<G>) {
        self(event)
    }
}

/// Observer that records every event.
///
/// Clones share the same log, so a handle kept outside the match sees the
/// events recorded by the one registered with it.
pub struct EventLog<G: Game> {
    events: Arc<Mutex<Vec<GameEvent<G>>>>,
}

impl<G: Game> EventLog<G> {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Copy of the events recorded so far.
    pub fn events(&self) -> Vec<GameEvent<G>> {
        self.lock().clone()
    }

    /// Names of the events recorded so far.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.lock().iter().map(MatchEvent::kind).collect()
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<GameEvent<G>>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<G: Game> Clone for EventLog<G> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<G: Game> Default for EventLog<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> MatchObserver<G> for EventLog<G> {
    fn on_event(&mut self, event: &GameEvent<G>) {
        self.lock().push(event.clone());
    }
}
