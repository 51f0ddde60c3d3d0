use crate::PlayerId;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Per-player freeze expiries, owned and mutated by the dealer alone.
/// Each player observes its own entry through a [`Frost`] receiver;
/// the dealer pushes every change, players never write.
#[derive(Debug)]
pub struct Freezes {
    until: Vec<watch::Sender<Option<Instant>>>,
}

impl Freezes {
    pub fn new(players: usize) -> Self {
        Self {
            until: (0..players).map(|_| watch::channel(None).0).collect(),
        }
    }
    /// Read-only view for one player.
    pub fn watch(&self, player: PlayerId) -> Option<Frost> {
        self.until.get(player).map(|tx| Frost(tx.subscribe()))
    }
    /// Freeze a player until the given instant.
    pub fn freeze(&self, player: PlayerId, until: Instant) {
        if let Some(tx) = self.until.get(player) {
            tx.send_replace(Some(until));
        }
    }
    /// Single pass that checks and clears every elapsed freeze.
    /// Returns the players thawed by this call.
    pub fn expire(&self, now: Instant) -> Vec<PlayerId> {
        self.until
            .iter()
            .enumerate()
            .filter(|(_, tx)| {
                tx.send_if_modified(|until| {
                    let elapsed = until.is_some_and(|t| t <= now);
                    if elapsed {
                        *until = None;
                    }
                    elapsed
                })
            })
            .map(|(player, _)| player)
            .collect()
    }
    pub fn is_frozen(&self, player: PlayerId) -> bool {
        self.until
            .get(player)
            .is_some_and(|tx| tx.borrow().is_some())
    }
    pub fn remaining(&self, player: PlayerId, now: Instant) -> Duration {
        self.until
            .get(player)
            .and_then(|tx| *tx.borrow())
            .map_or(Duration::ZERO, |t| t.saturating_duration_since(now))
    }
    pub fn players(&self) -> usize {
        self.until.len()
    }
}

/// A player's read-only view of its own freeze.
#[derive(Debug, Clone)]
pub struct Frost(watch::Receiver<Option<Instant>>);

impl Frost {
    /// Frozen until the dealer observes the expiry and thaws the player.
    pub fn is_frozen(&self) -> bool {
        self.0.borrow().is_some()
    }
    pub fn remaining(&self) -> Duration {
        self.0
            .borrow()
            .map_or(Duration::ZERO, |t| t.saturating_duration_since(Instant::now()))
    }
}
