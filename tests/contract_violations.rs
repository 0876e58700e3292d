use stonks_rs::agents::{Action, AgentTable, Close, Open, Payment, PlayerAgent, QueuedAgent};
use stonks_rs::config::GameConfig;
use stonks_rs::game::{ContractViolation, EngineError, Game, ViolationKind};
use stonks_rs::position::PositionId;

fn queued_game(seed: u64) -> Game {
    let seats = (0..2).map(|_| Box::new(QueuedAgent::new()) as Box<dyn PlayerAgent>).collect();
    Game::with_agents(GameConfig::new(2, 500).with_seed(seed), AgentTable::new(seats)).unwrap()
}

fn violation(player: usize, kind: ViolationKind) -> EngineError {
    EngineError::Contract(ContractViolation { player, kind })
}

fn make(card: stonks_rs::cards::Card) -> Action {
    Action { closes: Vec::new(), open: Some(Open::Make { card }) }
}

#[test]
fn playing_someone_elses_card() {
    let mut game = queued_game(1);
    let theirs = game.hand(0)[0];
    game.agents_mut().receive(1, make(theirs));
    assert_eq!(game.run_round().unwrap_err(), violation(1, ViolationKind::CardNotInHand(theirs)));
}

#[test]
fn reusing_a_card() {
    let mut game = queued_game(2);
    let card = game.hand(1)[0];
    let action = Action {
        closes: vec![Close { position: PositionId(99), payment: Payment::Card(card) }],
        open: Some(Open::Make { card }),
    };
    game.agents_mut().receive(1, action);
    assert_eq!(game.run_round().unwrap_err(), violation(1, ViolationKind::RepeatedCard(card)));
}

#[test]
fn closing_a_missing_position() {
    let mut game = queued_game(3);
    let action = Action { closes: vec![Close { position: PositionId(99), payment: Payment::Chips }], open: None };
    game.agents_mut().receive(1, action);
    assert_eq!(
        game.run_round().unwrap_err(),
        violation(1, ViolationKind::UnknownPosition(PositionId(99)))
    );
}

#[test]
fn taking_an_offer_that_is_not_there() {
    let mut game = queued_game(4);
    let card = game.hand(1)[0];
    let offer = game.hand(0)[0];
    game.agents_mut().receive(1, Action { closes: Vec::new(), open: Some(Open::Take { card, offer }) });
    assert_eq!(game.run_round().unwrap_err(), violation(1, ViolationKind::OfferUnavailable(offer)));
}

#[test]
fn taking_the_same_color() {
    // Find a deal where P0 holds a card of the same color as P1's first card.
    let (mut game, offer, card) = (0..64)
        .find_map(|seed| {
            let game = queued_game(seed);
            let offer = game.hand(1)[0];
            let card = game.hand(0).iter().copied().find(|c| c.side() == offer.side())?;
            Some((game, offer, card))
        })
        .unwrap();
    game.agents_mut().receive(1, make(offer));
    game.agents_mut().receive(0, Action { closes: Vec::new(), open: Some(Open::Take { card, offer }) });
    assert_eq!(
        game.run_round().unwrap_err(),
        violation(0, ViolationKind::SameColorTake { card, offer })
    );
}

#[test]
fn valid_offers_fall_to_the_house() {
    // Deals depend only on the seed, so a scripted rebuild sees the same hands.
    let card = queued_game(5).hand(1)[0];
    let seats: Vec<Box<dyn PlayerAgent>> =
        vec![Box::new(QueuedAgent::new()), Box::new(QueuedAgent::with_actions([make(card)]))];
    let mut game = Game::with_agents(GameConfig::new(2, 500).with_seed(5), AgentTable::new(seats)).unwrap();
    assert_eq!(game.hand(1)[0], card);

    let r = game.run_round().unwrap();
    assert_eq!(r.actions, vec![(1, make(card))]);
    assert_eq!(r.house_matched.len(), 1);
    assert_eq!(r.house_matched[0].card, card);
    assert_eq!(game.positions().len(), 1);
    assert!(game.positions()[0].involves_house());
    assert_eq!(game.hand(1).len(), 5);

    // The script is spent; the seat passes from now on.
    let r = game.run_round().unwrap();
    assert!(r.actions.is_empty());
}
