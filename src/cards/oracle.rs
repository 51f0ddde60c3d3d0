use crate::Card;
use crate::MATCH_SIZE;

/// Decides whether cards form a match.
/// Pure and stateless; the dealer consults it during arbitration
/// and once per round to decide whether the game is over.
pub trait MatchOracle: Send + Sync {
    /// True iff exactly three cards are given and they form a match.
    fn is_match(&self, cards: &[Card]) -> bool;
    /// True iff some three of the given cards form a match.
    fn any_match(&self, cards: &[Card]) -> bool {
        let n = cards.len();
        (0..n).any(|i| {
            (i + 1..n).any(|j| (j + 1..n).any(|k| self.is_match(&[cards[i], cards[j], cards[k]])))
        })
    }
}

/// Classic Set rules. Each card id encodes `count` features as base-`size`
/// digits; three cards match iff every feature is either the same on all
/// three cards or different on all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOracle {
    size: usize,
    count: usize,
}

impl Default for SetOracle {
    fn default() -> Self {
        Self::new(crate::FEATURE_SIZE, crate::FEATURE_COUNT)
    }
}

impl SetOracle {
    pub fn new(size: usize, count: usize) -> Self {
        Self { size, count }
    }
    /// Number of distinct cards this encoding can express.
    /// `None` when that number does not fit in a `usize`.
    pub fn capacity(&self) -> Option<usize> {
        u32::try_from(self.count)
            .ok()
            .and_then(|count| self.size.checked_pow(count))
    }
    /// Feature values of a card, least significant feature first.
    pub fn features(&self, card: Card) -> Vec<usize> {
        (0..self.count)
            .scan(card as usize, |rest, _| {
                let digit = *rest % self.size;
                *rest /= self.size;
                Some(digit)
            })
            .collect()
    }
}

impl MatchOracle for SetOracle {
    fn is_match(&self, cards: &[Card]) -> bool {
        if cards.len() != MATCH_SIZE {
            return false;
        }
        let [a, b, c] = [cards[0], cards[1], cards[2]].map(|card| self.features(card));
        (0..self.count).all(|f| {
            let same = a[f] == b[f] && b[f] == c[f];
            let diff = a[f] != b[f] && b[f] != c[f] && a[f] != c[f];
            same || diff
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn features_are_base_digits() {
        let oracle = SetOracle::default();
        assert_eq!(oracle.features(0), vec![0, 0, 0, 0]);
        assert_eq!(oracle.features(5), vec![2, 1, 0, 0]);
        assert_eq!(oracle.features(80), vec![2, 2, 2, 2]);
    }
    #[test]
    fn all_same_but_one_all_different() {
        // 0 = (0,0,0,0), 1 = (1,0,0,0), 2 = (2,0,0,0)
        assert!(SetOracle::default().is_match(&[0, 1, 2]));
    }
    #[test]
    fn all_different_everywhere() {
        // 0 = (0,0,0,0), 40 = (1,1,1,1), 80 = (2,2,2,2)
        assert!(SetOracle::default().is_match(&[0, 40, 80]));
    }
    #[test]
    fn two_same_one_different_fails() {
        // 0 = (0,0,0,0), 1 = (1,0,0,0), 3 = (0,1,0,0)
        assert!(!SetOracle::default().is_match(&[0, 1, 3]));
    }
    #[test]
    fn wrong_arity_fails() {
        let oracle = SetOracle::default();
        assert!(!oracle.is_match(&[0, 1]));
        assert!(!oracle.is_match(&[0, 1, 2, 3]));
    }
    #[test]
    fn any_match_in_full_deck() {
        let deck = (0..81).collect::<Vec<Card>>();
        assert!(SetOracle::default().any_match(&deck));
    }
    #[test]
    fn no_match_without_third_card() {
        // every pair among {0, 1, 3, 4} would need a card outside the set
        assert!(!SetOracle::default().any_match(&[0, 1, 3, 4]));
        assert!(!SetOracle::default().any_match(&[0, 1]));
    }
    #[test]
    fn capacity_covers_classic_deck() {
        assert_eq!(SetOracle::default().capacity(), Some(81));
    }
    #[test]
    fn capacity_overflow_is_none() {
        assert_eq!(SetOracle::new(10, 30).capacity(), None);
        assert_eq!(SetOracle::new(3, 11).capacity(), Some(177_147));
    }
}
