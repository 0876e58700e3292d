use crate::cards::Card;
use rand::seq::SliceRandom;
use rand::Rng;

/// The face-down draw pile. The top of the pile is the end of the vector.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// All 52 cards, shuffled with `rng`.
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use stonks_rs::deck::Deck;
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(1);
    /// let deck = Deck::shuffled(&mut rng);
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = Card::all().collect();
        cards.shuffle(rng);
        Self { cards }
    }

    /// A pile made of exactly these cards, top of the pile last.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Replace the pile with `discard`, shuffled. The discard vector is left empty.
    pub fn refill_from<R: Rng + ?Sized>(&mut self, discard: &mut Vec<Card>, rng: &mut R) {
        self.cards.append(discard);
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Up to `n` cards off the top; fewer when the pile runs out.
    pub fn deal(&mut self, n: usize) -> Vec<Card> {
        let split = self.cards.len().saturating_sub(n);
        let mut dealt = self.cards.split_off(split);
        dealt.reverse();
        dealt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn deck(seed: u64) -> Deck {
        Deck::shuffled(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn same_seed_same_order() {
        assert_eq!(deck(42).cards, deck(42).cards);
        assert_ne!(deck(42).cards, deck(43).cards);
    }

    #[test]
    fn deal_takes_from_the_top() {
        let mut d = deck(7);
        let top = d.cards[d.len() - 1];
        let hand = d.deal(6);
        assert_eq!(hand.len(), 6);
        assert_eq!(hand[0], top);
        assert_eq!(d.len(), 46);
        assert!(hand.iter().all(|c| !d.cards.contains(c)));
        assert_eq!(d.deal(100).len(), 46);
        assert!(d.is_empty());
        assert_eq!(d.draw(), None);
    }

    #[test]
    fn refill_moves_every_discard_card() {
        let mut d = Deck::default();
        let mut discard: Vec<Card> = Card::all().take(10).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        d.refill_from(&mut discard, &mut rng);
        assert!(discard.is_empty());
        assert_eq!(d.len(), 10);
    }
}
