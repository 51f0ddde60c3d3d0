use crate::Card;
use crate::PlayerId;
use crate::Score;
use crate::Slot;
use std::time::Duration;

/// Presentation updates pushed by the actors.
/// Write-only: nothing in the game ever reads them back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Round countdown refreshed.
    Countdown { remaining: Duration, warning: bool },
    /// Remaining freeze of a player (zero when not frozen).
    Freeze { player: PlayerId, remaining: Duration },
    /// Dealer put a card on the table.
    Placed { card: Card, slot: Slot },
    /// Dealer took the card off a slot.
    Removed { slot: Slot },
    /// Player placed a marker.
    Marked { player: PlayerId, slot: Slot },
    /// Player lifted a marker.
    Unmarked { player: PlayerId, slot: Slot },
    /// Player's score changed.
    Score { player: PlayerId, score: Score },
    /// Game ended; every player tied at the top score.
    GameOver { winners: Vec<PlayerId> },
}

impl Event {
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Event::Freeze { player, .. }
            | Event::Marked { player, .. }
            | Event::Unmarked { player, .. }
            | Event::Score { player, .. } => Some(*player),
            _ => None,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::Countdown { remaining, warning } => write!(
                f,
                "{}{:.1}s",
                if *warning { "!" } else { "" },
                remaining.as_secs_f32()
            ),
            Event::Freeze { player, remaining } => {
                write!(f, "P{} frozen {:.1}s", player, remaining.as_secs_f32())
            }
            Event::Placed { card, slot } => write!(f, "card {} -> slot {}", card, slot),
            Event::Removed { slot } => write!(f, "slot {} cleared", slot),
            Event::Marked { player, slot } => write!(f, "P{} marks slot {}", player, slot),
            Event::Unmarked { player, slot } => write!(f, "P{} unmarks slot {}", player, slot),
            Event::Score { player, score } => write!(f, "P{} scores {}", player, score),
            Event::GameOver { winners } => {
                let s = winners
                    .iter()
                    .map(|p| format!("P{}", p))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Winners: {}", s)
            }
        }
    }
}
