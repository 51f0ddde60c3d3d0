use crate::Card;
use rand::Rng;
use rand::seq::SliceRandom;

/// Ordered pile of cards not currently on the table.
/// Owned by the dealer: dealing draws from the front, clearing the
/// table appends the returned cards and reshuffles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck(Vec<Card>);

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self(cards)
    }
}
impl From<Deck> for Vec<Card> {
    fn from(deck: Deck) -> Self {
        deck.0
    }
}

impl Iterator for Deck {
    type Item = Card;
    fn next(&mut self) -> Option<Self::Item> {
        self.draw()
    }
}

impl Deck {
    /// every card id in `0..size`, in order.
    /// ids stop at `Card::MAX`; configs past that are rejected before dealing
    pub fn new(size: usize) -> Self {
        Self((0..size).map_while(|id| Card::try_from(id).ok()).collect())
    }

    /// remove the card at the front of the deck
    pub fn draw(&mut self) -> Option<Card> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }

    /// return cards to the back of the deck
    pub fn restore<I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = Card>,
    {
        self.0.extend(cards);
    }

    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.0.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
