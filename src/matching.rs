//! Order book and matching: peer takes during the action phase, house
//! fallback for whatever is left when the round's market closes.

use crate::cards::{Card, Side};
use crate::position::{Participant, PlayerId, Position, PositionId};

/// A card a player posted to the book this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offer {
    pub player: PlayerId,
    pub card: Card,
}

/// Offers in posting order. Emptied every round.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    offers: Vec<Offer>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, player: PlayerId, card: Card) {
        self.offers.push(Offer { player, card });
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn offers_by(&self, player: PlayerId) -> impl Iterator<Item = &Offer> + '_ {
        self.offers.iter().filter(move |o| o.player == player)
    }

    pub fn find(&self, card: Card) -> Option<Offer> {
        self.offers.iter().copied().find(|o| o.card == card)
    }

    /// Remove and return the offer of `card`, if still on the book.
    pub fn take(&mut self, card: Card) -> Option<Offer> {
        let idx = self.offers.iter().position(|o| o.card == card)?;
        Some(self.offers.remove(idx))
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.offers.iter().map(|o| o.card)
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    fn drain(&mut self) -> std::vec::Drain<'_, Offer> {
        self.offers.drain(..)
    }
}

/// Sequential position handles for one game.
#[derive(Debug, Clone, Default)]
pub struct PositionIds {
    next: u64,
}

impl PositionIds {
    pub fn next_id(&mut self) -> PositionId {
        let id = PositionId(self.next);
        self.next += 1;
        id
    }
}

/// Pair a taker's card with a resting offer. Whoever brings the long-colored
/// card is long. The caller has checked the colors differ.
pub fn pair_take(id: PositionId, taker: PlayerId, card: Card, offer: Offer) -> Position {
    let taker = Participant::Player(taker);
    let maker = Participant::Player(offer.player);
    let (long, short) = match card.side() {
        Side::Long => (taker, maker),
        Side::Short => (maker, taker),
    };
    Position::new(id, long, short, vec![card, offer.card])
}

/// A single offer against the house, on the side of its card's color.
pub fn house_position(id: PositionId, offer: Offer) -> Position {
    let player = Participant::Player(offer.player);
    let (long, short) = match offer.card.side() {
        Side::Long => (player, Participant::House),
        Side::Short => (Participant::House, player),
    };
    Position::new(id, long, short, vec![offer.card])
}

/// Turn every unmatched offer into a house position and clear the book.
pub fn match_with_house(book: &mut OrderBook, ids: &mut PositionIds) -> Vec<Position> {
    let offers: Vec<Offer> = book.drain().collect();
    offers.into_iter().map(|offer| house_position(ids.next_id(), offer)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn take_removes_offer_and_pairs_by_color() {
        let mut book = OrderBook::new();
        book.post(1, card("5h"));
        book.post(2, card("9c"));
        let offer = book.take(card("5h")).unwrap();
        assert_eq!(book.len(), 1);
        let p = pair_take(PositionId(0), 0, card("Ks"), offer);
        assert_eq!(p.long(), Participant::Player(0));
        assert_eq!(p.short(), Participant::Player(1));
        assert_eq!(p.value(), 5);
        assert!(book.take(card("5h")).is_none());
    }

    #[test]
    fn short_taker_sits_on_short_side() {
        let offer = Offer { player: 3, card: card("Tc") };
        let p = pair_take(PositionId(4), 0, card("2d"), offer);
        assert_eq!(p.long(), Participant::Player(3));
        assert_eq!(p.short(), Participant::Player(0));
    }

    #[test]
    fn leftovers_go_to_the_house_and_book_clears() {
        let mut book = OrderBook::new();
        let mut ids = PositionIds::default();
        book.post(0, card("7s"));
        book.post(1, card("Qd"));
        let made = match_with_house(&mut book, &mut ids);
        assert!(book.is_empty());
        assert_eq!(made.len(), 2);
        assert_eq!(made[0].long(), Participant::Player(0));
        assert_eq!(made[0].short(), Participant::House);
        assert_eq!(made[1].long(), Participant::House);
        assert_eq!(made[1].short(), Participant::Player(1));
        assert_ne!(made[0].id(), made[1].id());
        assert_eq!(made[1].value(), 10);
    }
}
