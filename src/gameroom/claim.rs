use crate::MATCH_SIZE;
use crate::PlayerId;
use crate::Slot;
use tokio::sync::oneshot;

/// Dealer's ruling on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Valid match: cards removed, point awarded, player frozen.
    Scored,
    /// Invalid match: table untouched, player frozen.
    Penalized,
    /// Table changed before arbitration: no score, no penalty.
    Stale,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Verdict::Scored => write!(f, "scored"),
            Verdict::Penalized => write!(f, "penalized"),
            Verdict::Stale => write!(f, "stale"),
        }
    }
}

/// A player's assertion that three slots form a match.
/// Carries the reply half of a oneshot, so it can be resolved at most
/// once, and only ever reaches the player that submitted it.
#[derive(Debug)]
pub struct Claim {
    player: PlayerId,
    slots: [Slot; MATCH_SIZE],
    reply: oneshot::Sender<Verdict>,
}

impl Claim {
    /// Creates a claim and the receiver its verdict will arrive on.
    pub fn new(player: PlayerId, slots: [Slot; MATCH_SIZE]) -> (Self, oneshot::Receiver<Verdict>) {
        let (reply, verdict) = oneshot::channel();
        (
            Self {
                player,
                slots,
                reply,
            },
            verdict,
        )
    }
    pub fn player(&self) -> PlayerId {
        self.player
    }
    pub fn slots(&self) -> [Slot; MATCH_SIZE] {
        self.slots
    }
    /// Deliver the verdict, consuming the claim.
    pub fn resolve(self, verdict: Verdict) {
        if self.reply.send(verdict).is_err() {
            log::trace!("[claim P{}] player left before {} verdict", self.player, verdict);
        }
    }
}
