use proptest::prelude::*;
use stonks_rs::agents::{
    Belief, CountingAgent, CountingProfile, Open, Payment, PlayerAgent, TableView, ThresholdMode,
};
use stonks_rs::cards::Card;
use stonks_rs::matching::OrderBook;
use stonks_rs::position::{Participant, Position, PositionId};
use stonks_rs::settlement::Chips;

fn shuffled_deck() -> impl Strategy<Value = Vec<Card>> {
    Just(Card::all().collect::<Vec<_>>()).prop_shuffle()
}

fn profile() -> impl Strategy<Value = CountingProfile> {
    prop_oneof![
        Just(CountingProfile::default()),
        Just(CountingProfile::passive()),
        (0.0f64..1.0).prop_map(CountingProfile::deterministic),
        (0.0f64..1.0).prop_map(|l| CountingProfile::deterministic(l).with_mode(ThresholdMode::Sampled)),
    ]
}

proptest! {
    #[test]
    fn decisions_respect_the_hand_and_the_table(
        deck in shuffled_deck(),
        hand_len in 0usize..=6,
        n_positions in 0usize..=5,
        n_offers in 0usize..=3,
        seen in 0usize..=30,
        balance in -20i64..200,
        profile in profile(),
        seed in any::<u64>(),
    ) {
        let me = Participant::Player(0);
        let hand = deck[..hand_len].to_vec();
        let mut rest = deck[hand_len..].iter().copied();
        let positions: Vec<Position> = (0..n_positions)
            .map(|i| {
                let (long, short, n) = match i % 3 {
                    0 => (me, Participant::House, 1),
                    1 => (Participant::House, me, 1),
                    _ => (Participant::Player(1), me, 2),
                };
                let cards: Vec<Card> = rest.by_ref().take(n).collect();
                Position::new(PositionId(i as u64), long, short, cards)
            })
            .collect();
        let mut book = OrderBook::new();
        for card in rest.by_ref().take(n_offers) {
            book.post(1, card);
        }
        let observed: Vec<Card> = rest.take(seen).collect();

        let mut chips = Chips::new(2, 100, 1_000);
        chips.adjust(me, balance - 100);
        let mut agent = CountingAgent::new(profile, seed);
        agent.observe(&observed, true);
        let view = TableView {
            player: 0,
            hand: &hand,
            positions: &positions,
            chips: &chips,
            order_book: &book,
            blind_pool: 0,
        };
        let action = agent.decide(&view);

        let played = action.cards();
        prop_assert!(played.len() <= hand.len());
        for (i, card) in played.iter().enumerate() {
            prop_assert!(hand.contains(card));
            prop_assert!(!played[..i].contains(card));
        }

        let mut committed = 0;
        for (i, close) in action.closes.iter().enumerate() {
            prop_assert!(action.closes[..i].iter().all(|c| c.position != close.position));
            let position = positions.iter().find(|p| p.id() == close.position);
            prop_assert!(position.is_some());
            let position = position.unwrap();
            let side = position.side_of(me);
            prop_assert!(side.is_some());
            match close.payment {
                Payment::Card(card) => prop_assert!(position.accepts_close_card(side.unwrap(), card)),
                Payment::Chips => {
                    committed += position.close_cost();
                    prop_assert!(balance > committed);
                }
            }
        }

        match action.open {
            Some(Open::Take { card, offer }) => {
                let resting = book.find(offer);
                prop_assert!(resting.is_some());
                prop_assert_ne!(resting.unwrap().player, 0);
                prop_assert_ne!(card.side(), offer.side());
            }
            Some(Open::DoubleDown { position, card }) => {
                prop_assert!(action.closes.iter().all(|c| c.position != position));
                let target = positions.iter().find(|p| p.id() == position);
                prop_assert!(target.is_some());
                let target = target.unwrap();
                prop_assert!(target.involves_house());
                prop_assert_eq!(target.cards().len(), 1);
                prop_assert_eq!(target.side_of(me), Some(card.side()));
            }
            Some(Open::Make { .. }) | None => {}
        }
    }

    #[test]
    fn passive_agents_never_open(
        deck in shuffled_deck(),
        seen in 0usize..=40,
        seed in any::<u64>(),
    ) {
        let hand = deck[..6].to_vec();
        let mut agent = CountingAgent::new(CountingProfile::passive(), seed);
        agent.observe(&deck[6..6 + seen], true);
        let chips = Chips::new(2, 100, 1_000);
        let book = OrderBook::new();
        let view = TableView {
            player: 0,
            hand: &hand,
            positions: &[],
            chips: &chips,
            order_book: &book,
            blind_pool: 0,
        };
        prop_assert!(agent.decide(&view).is_pass());
    }

    #[test]
    fn confidence_grows_with_the_count(
        seen in 0usize..=52,
        a in 0usize..=26,
        b in 0usize..=26,
    ) {
        let longs: Vec<Card> = Card::all().filter(|c| c.is_long()).collect();
        let shorts: Vec<Card> = Card::all().filter(|c| !c.is_long()).collect();
        // Same number of cards seen, so the same unknown estimate.
        let belief_for = |n_long: usize| -> Option<Belief> {
            let n_short = seen.checked_sub(n_long)?;
            if n_long > 26 || n_short > 26 {
                return None;
            }
            let mut belief = Belief::default();
            belief.observe(&longs[..n_long], false);
            belief.observe(&shorts[..n_short], false);
            Some(belief)
        };
        if let (Some(x), Some(y)) = (belief_for(a), belief_for(b)) {
            prop_assert_eq!(x.remaining_unknown(), y.remaining_unknown());
            prop_assert!((0.0..=1.0).contains(&x.confidence()));
            if x.count().abs() <= y.count().abs() {
                prop_assert!(x.confidence() <= y.confidence());
            }
            if x.count() == 0 {
                prop_assert_eq!(x.confidence(), 0.0);
            }
        }
    }
}
