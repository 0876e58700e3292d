use crate::cards::{Card, Side};
use crate::position::{is_big_value, Participant, Position, MAX_POSITION_VALUE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{Action, AgentKind, Close, Open, Payment, PlayerAgent, TableView};

const DECK_SIZE: u32 = 52;

/// Running color count over every card a seat has seen since the last reshuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Belief {
    count: i32,
    remaining_unknown: u32,
}

impl Default for Belief {
    fn default() -> Self {
        Self { count: 0, remaining_unknown: DECK_SIZE }
    }
}

impl Belief {
    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn remaining_unknown(&self) -> u32 {
        self.remaining_unknown
    }

    /// +1 per long card, -1 per short card. On `reset` the count and the
    /// unknown-card estimate start over before `cards` are applied.
    pub fn observe(&mut self, cards: &[Card], reset: bool) {
        if reset {
            *self = Self::default();
        }
        let seen = u32::try_from(cards.len()).unwrap_or(u32::MAX);
        self.remaining_unknown = self.remaining_unknown.saturating_sub(seen);
        self.count += cards.iter().map(|c| c.side().sign()).sum::<i32>();
    }

    /// `(|count| / remaining_unknown)²`, divisor clamped to at least 1, capped at 1.
    pub fn confidence(&self) -> f64 {
        let ratio = f64::from(self.count.unsigned_abs()) / f64::from(self.remaining_unknown.max(1));
        (ratio * ratio).min(1.0)
    }

    /// Colors revert to the mean: a surplus of long cards seen means short
    /// cards are due.
    pub fn expected_side(&self) -> Side {
        if self.count < 0 {
            Side::Long
        } else {
            Side::Short
        }
    }
}

/// How confidence is compared against a profile level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdMode {
    /// Act when `confidence > level`.
    Fixed,
    /// Act when `confidence > level * u` for a fresh uniform `u` in `[0, 1)`.
    Sampled,
}

/// Activation levels for the three risk-taking choices.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct CountingProfile {
    /// Closing a losing position with chips instead of a card.
    pub chip_close: f64,
    /// Opening anything at all.
    pub open: f64,
    /// Posting to the book when nothing can be taken.
    pub make: f64,
    pub mode: ThresholdMode,
}

impl Default for CountingProfile {
    fn default() -> Self {
        Self { chip_close: 0.8, open: 0.2, make: 0.1, mode: ThresholdMode::Sampled }
    }
}

impl CountingProfile {
    /// Every level compared directly against `level`.
    pub fn deterministic(level: f64) -> Self {
        Self { chip_close: level, open: level, make: level, mode: ThresholdMode::Fixed }
    }

    /// Never opens and never pays chips to close; still closes with cards.
    pub fn passive() -> Self {
        Self::deterministic(1.0)
    }

    pub fn with_mode(mut self, mode: ThresholdMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Card-counting bot: closes positions on the wrong side of its count and
/// opens one position per turn when confident enough.
#[derive(Debug)]
pub struct CountingAgent {
    profile: CountingProfile,
    belief: Belief,
    rng: ChaCha8Rng,
}

impl CountingAgent {
    pub fn new(profile: CountingProfile, seed: u64) -> Self {
        Self { profile, belief: Belief::default(), rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn belief(&self) -> &Belief {
        &self.belief
    }

    pub fn profile(&self) -> &CountingProfile {
        &self.profile
    }

    fn clears(&mut self, level: f64, confidence: f64) -> bool {
        match self.profile.mode {
            ThresholdMode::Fixed => confidence > level,
            ThresholdMode::Sampled => confidence > level * self.rng.random::<f64>(),
        }
    }

    fn plan_closes(&mut self, view: &TableView<'_>, hand: &mut Vec<Card>) -> Vec<Close> {
        let me = Participant::Player(view.player);
        let expected = self.belief.expected_side();
        let confidence = self.belief.confidence();
        let mut budget = view.chips.get(me);
        let mut closes = Vec::new();
        for position in view.positions {
            match position.side_of(me) {
                Some(side) if side != expected => {}
                _ => continue,
            }
            if let Some(card) = closing_card(hand, expected, position.value()) {
                hand.retain(|c| *c != card);
                closes.push(Close { position: position.id(), payment: Payment::Card(card) });
                continue;
            }
            let cost = position.close_cost();
            if self.clears(self.profile.chip_close, confidence) && budget > cost {
                budget -= cost;
                closes.push(Close { position: position.id(), payment: Payment::Chips });
            }
        }
        closes
    }

    fn plan_open(&mut self, view: &TableView<'_>, hand: &[Card]) -> Option<Open> {
        let expected = self.belief.expected_side();
        let confidence = self.belief.confidence();
        if !self.clears(self.profile.open, confidence) {
            return None;
        }
        let card = hand.iter().copied().find(|c| c.side() == expected)?;
        let resting = view
            .order_book
            .offers()
            .iter()
            .find(|o| o.player != view.player && o.card.side() != expected);
        if let Some(offer) = resting {
            return Some(Open::Take { card, offer: offer.card });
        }
        if let Some(position) = double_down_target(view, card) {
            return Some(Open::DoubleDown { position: position.id(), card });
        }
        if self.clears(self.profile.make, confidence) {
            return Some(Open::Make { card });
        }
        None
    }
}

/// Lowest non-Ace card of the expected color worth at least `value`, else any Ace.
fn closing_card(hand: &[Card], expected: Side, value: u32) -> Option<Card> {
    hand.iter()
        .copied()
        .filter(|c| !c.is_ace() && c.side() == expected && c.value() >= value)
        .min_by_key(|c| c.value())
        .or_else(|| hand.iter().copied().find(|c| c.is_ace()))
}

/// A single-card house position of ours on `card`'s side that `card` would
/// lift into the big tier or onto the jackpot value.
fn double_down_target<'a>(view: &TableView<'a>, card: Card) -> Option<&'a Position> {
    let me = Participant::Player(view.player);
    view.positions.iter().find(|p| {
        if !p.involves_house() || p.cards().len() != 1 || p.side_of(me) != Some(card.side()) {
            return false;
        }
        let before = p.value();
        let after = before + card.value();
        (!is_big_value(before) && is_big_value(after)) || after == MAX_POSITION_VALUE
    })
}

impl PlayerAgent for CountingAgent {
    fn decide(&mut self, view: &TableView<'_>) -> Action {
        let mut hand = view.hand.to_vec();
        let closes = self.plan_closes(view, &mut hand);
        let open = self.plan_open(view, &hand);
        Action { closes, open }
    }

    fn observe(&mut self, cards: &[Card], reset: bool) {
        self.belief.observe(cards, reset);
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }

    fn confidence(&self) -> Option<f64> {
        Some(self.belief.confidence())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::matching::OrderBook;
    use crate::position::PositionId;
    use crate::settlement::Chips;

    fn cards(s: &str) -> Vec<Card> {
        parse_cards(s).unwrap()
    }

    fn agent_with_count(profile: CountingProfile, seen: &str) -> CountingAgent {
        let mut agent = CountingAgent::new(profile, 11);
        agent.observe(&cards(seen), true);
        agent
    }

    #[test]
    fn observe_counts_colors_and_unknowns() {
        let mut b = Belief::default();
        b.observe(&cards("As Kc 2h"), false);
        assert_eq!(b.count(), 1);
        assert_eq!(b.remaining_unknown(), 49);
        b.observe(&cards("3d"), true);
        assert_eq!(b.count(), -1);
        assert_eq!(b.remaining_unknown(), 51);
    }

    #[test]
    fn confidence_clamps_divisor() {
        let mut b = Belief::default();
        assert_eq!(b.confidence(), 0.0);
        let many: Vec<Card> = Card::all().collect();
        b.observe(&many, false);
        b.observe(&cards("As"), false);
        assert_eq!(b.remaining_unknown(), 0);
        assert_eq!(b.count(), 1);
        assert_eq!(b.confidence(), 1.0);
    }

    #[test]
    fn expectation_reverts_to_mean() {
        let mut b = Belief::default();
        b.observe(&cards("As Ks"), false);
        assert_eq!(b.expected_side(), Side::Short);
        b.observe(&cards("Ah Kh Qh"), true);
        assert_eq!(b.expected_side(), Side::Long);
    }

    #[test]
    fn closes_wrong_side_with_qualifying_card() {
        // Count -6: expects long, holds a short house position worth 5.
        let mut agent = agent_with_count(CountingProfile::passive(), "2h 3h 4h 5h 6h 7h");
        let hand = cards("4c 8s Ah 9c");
        let positions = vec![Position::new(
            PositionId(7),
            Participant::House,
            Participant::Player(0),
            cards("5d"),
        )];
        let chips = Chips::new(2, 100, 1000);
        let book = OrderBook::new();
        let view = TableView {
            player: 0,
            hand: &hand,
            positions: &positions,
            chips: &chips,
            order_book: &book,
            blind_pool: 0,
        };
        let action = agent.decide(&view);
        assert_eq!(
            action.closes,
            vec![Close { position: PositionId(7), payment: Payment::Card(cards("8s")[0]) }]
        );
        assert!(action.open.is_none(), "passive profile never opens");
    }

    #[test]
    fn falls_back_to_ace_then_chips() {
        let mut agent = agent_with_count(CountingProfile::deterministic(0.0), "2h 3h 4h 5h 6h 7h");
        let hand = cards("Ad 2c");
        let positions = vec![
            Position::new(PositionId(1), Participant::House, Participant::Player(0), cards("Td")),
            Position::new(PositionId(2), Participant::Player(1), Participant::Player(0), cards("9s 9h")),
        ];
        let chips = Chips::new(2, 100, 1000);
        let book = OrderBook::new();
        let view = TableView {
            player: 0,
            hand: &hand,
            positions: &positions,
            chips: &chips,
            order_book: &book,
            blind_pool: 0,
        };
        let action = agent.decide(&view);
        assert_eq!(action.closes.len(), 2);
        assert_eq!(action.closes[0].payment, Payment::Card(cards("Ad")[0]));
        assert_eq!(action.closes[1].payment, Payment::Chips);
        assert_eq!(action.open, Some(Open::Make { card: cards("2c")[0] }));
    }

    #[test]
    fn prefers_taking_over_making() {
        let mut agent = agent_with_count(CountingProfile::deterministic(0.0), "2s 3s 4s");
        let hand = cards("5c 6h");
        let chips = Chips::new(3, 100, 1000);
        let mut book = OrderBook::new();
        book.post(0, cards("9s")[0]);
        book.post(2, cards("Td")[0]);
        book.post(1, cards("Jc")[0]);
        let view = TableView {
            player: 0,
            hand: &hand,
            positions: &[],
            chips: &chips,
            order_book: &book,
            blind_pool: 0,
        };
        let action = agent.decide(&view);
        assert_eq!(action.open, Some(Open::Take { card: cards("6h")[0], offer: cards("Jc")[0] }));
    }

    #[test]
    fn doubles_down_into_big_tier() {
        let mut agent = agent_with_count(CountingProfile::deterministic(0.0), "2s 3s 4s");
        let hand = cards("5h");
        let positions =
            vec![Position::new(PositionId(4), Participant::House, Participant::Player(0), cards("3d"))];
        let chips = Chips::new(2, 100, 1000);
        let book = OrderBook::new();
        let view = TableView {
            player: 0,
            hand: &hand,
            positions: &positions,
            chips: &chips,
            order_book: &book,
            blind_pool: 0,
        };
        let action = agent.decide(&view);
        assert!(action.closes.is_empty());
        assert_eq!(
            action.open,
            Some(Open::DoubleDown { position: PositionId(4), card: cards("5h")[0] })
        );
    }

    #[test]
    fn zero_count_never_opens() {
        let mut agent = CountingAgent::new(CountingProfile::default(), 5);
        let hand = cards("5h 9c");
        let chips = Chips::new(2, 100, 1000);
        let book = OrderBook::new();
        let view = TableView {
            player: 1,
            hand: &hand,
            positions: &[],
            chips: &chips,
            order_book: &book,
            blind_pool: 0,
        };
        for _ in 0..20 {
            assert!(agent.decide(&view).is_pass());
        }
    }
}
