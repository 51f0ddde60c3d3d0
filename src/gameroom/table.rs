use crate::Card;
use crate::MATCH_SIZE;
use crate::PlayerId;
use crate::Slot;
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

/// Result of a marker toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Marker added; the player now holds this many markers.
    Placed(usize),
    /// Marker added and it was the player's third.
    /// Carries the claimed slots as they stood at that instant.
    Completed([Slot; MATCH_SIZE]),
    /// Marker removed; the player now holds this many markers.
    Removed(usize),
    /// No card on the slot, table closed, or a fourth marker.
    Rejected,
}

#[derive(Debug)]
struct Grid {
    open: bool,
    cards: Vec<Option<Card>>,
    markers: Vec<BTreeSet<PlayerId>>,
}

impl Grid {
    fn count(&self, player: PlayerId) -> usize {
        self.markers.iter().filter(|m| m.contains(&player)).count()
    }
    fn slots(&self, player: PlayerId) -> BTreeSet<Slot> {
        self.markers
            .iter()
            .enumerate()
            .filter(|(_, m)| m.contains(&player))
            .map(|(slot, _)| slot)
            .collect()
    }
}

/// Cards on the table and the markers players have placed on them.
///
/// One table-wide lock serialises every operation. Player counts are small
/// and critical sections are a handful of set operations, so contention is
/// negligible, and card removal is atomic with respect to every toggle:
/// a marker can never land on a slot whose card is gone.
///
/// Only the dealer places, removes, clears, opens and closes.
/// Players only toggle their own markers.
#[derive(Debug)]
pub struct Table {
    grid: Mutex<Grid>,
}

impl Table {
    /// An empty, closed table with `size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            grid: Mutex::new(Grid {
                open: false,
                cards: vec![None; size],
                markers: vec![BTreeSet::new(); size],
            }),
        }
    }
    fn grid(&self) -> MutexGuard<'_, Grid> {
        self.grid.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accept toggles again.
    pub fn open(&self) {
        self.grid().open = true;
    }
    /// Reject every toggle until reopened.
    pub fn close(&self) {
        self.grid().open = false;
    }
    pub fn is_open(&self) -> bool {
        self.grid().open
    }

    /// Puts a card into an empty slot.
    /// Panics if the slot is occupied or out of range.
    pub fn place(&self, card: Card, slot: Slot) {
        let mut grid = self.grid();
        assert!(grid.cards[slot].is_none(), "slot {} already holds a card", slot);
        grid.cards[slot] = Some(card);
    }

    /// Takes the card off a slot and clears every marker on it
    /// in the same critical section.
    pub fn remove(&self, slot: Slot) -> Option<Card> {
        let mut grid = self.grid();
        grid.markers.get_mut(slot)?.clear();
        grid.cards[slot].take()
    }

    /// Empties every slot and marker set, returning the cards that were on the table.
    pub fn clear(&self) -> Vec<(Slot, Card)> {
        let mut grid = self.grid();
        grid.markers.iter_mut().for_each(BTreeSet::clear);
        grid.cards
            .iter_mut()
            .enumerate()
            .filter_map(|(slot, card)| card.take().map(|card| (slot, card)))
            .collect()
    }

    /// Adds the player's marker to the slot if absent, removes it if present.
    pub fn toggle(&self, player: PlayerId, slot: Slot) -> Toggle {
        let mut grid = self.grid();
        if !grid.open || grid.cards.get(slot).copied().flatten().is_none() {
            return Toggle::Rejected;
        }
        if grid.markers[slot].remove(&player) {
            return Toggle::Removed(grid.count(player));
        }
        match grid.count(player) {
            n if n >= MATCH_SIZE => Toggle::Rejected,
            n if n + 1 < MATCH_SIZE => {
                grid.markers[slot].insert(player);
                Toggle::Placed(n + 1)
            }
            n => {
                grid.markers[slot].insert(player);
                let slots = grid.slots(player).into_iter().collect::<Vec<Slot>>();
                <[Slot; MATCH_SIZE]>::try_from(slots)
                    .map(Toggle::Completed)
                    .unwrap_or(Toggle::Placed(n + 1))
            }
        }
    }

    /// Cards under the claimed slots, provided every slot still holds a card
    /// carrying the player's marker. `None` means the claim went stale.
    pub fn claimed(&self, player: PlayerId, slots: [Slot; MATCH_SIZE]) -> Option<[Card; MATCH_SIZE]> {
        let grid = self.grid();
        let mut cards = [0; MATCH_SIZE];
        for (card, slot) in cards.iter_mut().zip(slots) {
            if !grid.markers.get(slot)?.contains(&player) {
                return None;
            }
            *card = grid.cards[slot]?;
        }
        Some(cards)
    }

    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.grid().cards.get(slot).copied().flatten()
    }
    pub fn markers_of(&self, player: PlayerId) -> BTreeSet<Slot> {
        self.grid().slots(player)
    }
    pub fn markers_at(&self, slot: Slot) -> BTreeSet<PlayerId> {
        self.grid().markers.get(slot).cloned().unwrap_or_default()
    }
    pub fn empty_slots(&self) -> Vec<Slot> {
        self.grid()
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_none())
            .map(|(slot, _)| slot)
            .collect()
    }
    pub fn cards(&self) -> Vec<Card> {
        self.grid().cards.iter().flatten().copied().collect()
    }
    /// Number of markers sitting on empty slots. Always zero.
    pub fn orphans(&self) -> usize {
        let grid = self.grid();
        grid.cards
            .iter()
            .zip(grid.markers.iter())
            .filter(|(card, _)| card.is_none())
            .map(|(_, markers)| markers.len())
            .sum()
    }
}
