use crate::agents::{Action, AgentTable, Open, Payment, TableView};
use crate::cards::Card;
use crate::config::{
    ConfigError, GameConfig, BLIND, CARDS_PER_PLAYER, DECK_SIZE, HOUSE_INIT_CHIPS,
};
use crate::deck::Deck;
use crate::matching::{match_with_house, pair_take, Offer, OrderBook, PositionIds};
use crate::position::{Participant, PlayerId, Position, PositionId};
use crate::settlement::{distribute_blinds, settle_positions, Chips, Settlement};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use tracing::{debug, error, info, trace, warn};

/// Stages of one round, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Phase {
    BlindCollection,
    ActionPhase,
    Matching,
    Reveal,
    Settlement,
    BankruptcyCleanup,
    Terminal,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::BlindCollection => "Blinds",
            Phase::ActionPhase => "Actions",
            Phase::Matching => "Matching",
            Phase::Reveal => "Reveal",
            Phase::Settlement => "Settlement",
            Phase::BankruptcyCleanup => "Cleanup",
            Phase::Terminal => "Game over",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ViolationKind {
    #[error("card {0} is not in hand")]
    CardNotInHand(Card),
    #[error("card {0} is used more than once")]
    RepeatedCard(Card),
    #[error("plays {played} cards while holding {held}")]
    TooManyCards { held: usize, played: usize },
    #[error("position {0} does not exist")]
    UnknownPosition(PositionId),
    #[error("no stake in position {0}")]
    NotAStakeholder(PositionId),
    #[error("position {0} is closed twice")]
    DuplicateClose(PositionId),
    #[error("{card} cannot close position {position}")]
    UnqualifiedCloseCard { position: PositionId, card: Card },
    #[error("closing needs more than {needed} chips, balance is {available}")]
    InsufficientChips { needed: i64, available: i64 },
    #[error("offer {0} is not on the book")]
    OfferUnavailable(Card),
    #[error("cannot take own offer {0}")]
    SelfTrade(Card),
    #[error("{card} and {offer} are the same color")]
    SameColorTake { card: Card, offer: Card },
    #[error("cannot double down on position {0} with {1}")]
    InvalidDoubleDown(PositionId, Card),
    #[error("bankrupt players cannot act")]
    ActingWhileBankrupt,
}

/// An agent returned an action the rules do not allow.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("player {player} broke the action contract: {kind}")]
pub struct ContractViolation {
    pub player: PlayerId,
    pub kind: ViolationKind,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[error("expected {expected} cards in play, found {found}")]
    CardCount { expected: usize, found: usize },
    #[error("player {player} accounts for {found} cards, expected {expected}")]
    Quota { player: PlayerId, expected: usize, found: usize },
    #[error("position {0} has the same participant on both sides")]
    SelfPosition(PositionId),
    #[error("chip total drifted: expected {expected}, found {found}")]
    ChipLeak { expected: i64, found: i64 },
    #[error("no cards left to draw")]
    DeckExhausted,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error("the game is already over")]
    GameOver,
}

/// Everything that happened in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RoundResult {
    pub round: u64,
    /// Player who paid the blind; `None` when the payer was bankrupt.
    pub blind: Option<PlayerId>,
    /// Non-pass actions in turn order.
    pub actions: Vec<(PlayerId, Action)>,
    /// Offers left on the book and matched against the house.
    pub house_matched: Vec<Offer>,
    pub market: Card,
    pub reshuffled: bool,
    pub settlement: Settlement,
    /// Players swept this round.
    pub bankruptcies: Vec<PlayerId>,
    pub terminal: bool,
}

/// Final balances once the game stops.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GameOutcome {
    pub chips: Vec<i64>,
    pub rounds: u64,
    /// The round cap stopped the game before a single survivor remained.
    pub capped: bool,
}

impl GameOutcome {
    pub fn survivors(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.chips.iter().enumerate().filter(|(_, c)| **c > 0).map(|(id, _)| id)
    }

    /// The only player left with chips, if exactly one is.
    pub fn winner(&self) -> Option<PlayerId> {
        let mut survivors = self.survivors();
        match (survivors.next(), survivors.next()) {
            (Some(id), None) => Some(id),
            _ => None,
        }
    }
}

/// Table state handed to a [`RoundObserver`] after each round.
///
/// The order book is always empty by then: matching clears it every round.
/// Whatever rested on it at the end of the action phase is in
/// `result.house_matched`, and each of those offers is now a house position.
#[derive(Debug, Clone, Copy)]
pub struct RoundSnapshot<'a> {
    pub result: &'a RoundResult,
    pub chips: &'a Chips,
    pub positions: &'a [Position],
    pub blind_pool: i64,
    pub fees: i64,
}

pub trait RoundObserver: Send {
    fn on_round(&mut self, snapshot: &RoundSnapshot<'_>);
}

impl<F> RoundObserver for F
where
    F: FnMut(&RoundSnapshot<'_>) + Send,
{
    fn on_round(&mut self, snapshot: &RoundSnapshot<'_>) {
        self(snapshot)
    }
}

/// Who is closing a position.
#[derive(Debug, Clone, Copy)]
enum Closing {
    Player(PlayerId, Payment),
    /// Liquidation of a bankrupt party; bankrupt parties get no replacements.
    Forced,
}

#[non_exhaustive]
pub struct Game {
    pub(crate) config: GameConfig,
    pub(crate) seed: u64,
    pub(crate) rng: ChaCha8Rng,

    pub(crate) deck: Deck,
    pub(crate) discard: Vec<Card>,
    pub(crate) hands: Vec<Vec<Card>>,
    pub(crate) positions: Vec<Position>,
    pub(crate) ids: PositionIds,
    pub(crate) book: OrderBook,

    pub(crate) chips: Chips,
    pub(crate) blind_pool: i64,
    /// House fees collected so far; they leave the chip economy.
    pub(crate) fees: i64,
    initial_total: i64,

    pub(crate) round: u64,
    pub(crate) phase: Phase,
    pub(crate) last_market: Option<Card>,
    reshuffled: bool,
    /// First error out of `run_round`; the table is left mid-round and never resumes.
    failed: Option<EngineError>,

    agents: AgentTable,
    observer: Option<Box<dyn RoundObserver>>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("seed", &self.seed)
            .field("round", &self.round)
            .field("phase", &self.phase)
            .field("chips", &self.chips)
            .field("blind_pool", &self.blind_pool)
            .field("fees", &self.fees)
            .field("positions", &self.positions.len())
            .field("deck", &self.deck.len())
            .field("discard", &self.discard.len())
            .field("failed", &self.failed)
            .field("agents", &self.agents)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// A game of counting bots with the default profile.
    ///
    /// ```
    /// use stonks_rs::game::Game;
    ///
    /// let mut game = Game::new_game(3, 200, 42).unwrap();
    /// let first = game.run_round().unwrap();
    /// assert_eq!(first.round, 1);
    /// ```
    pub fn new_game(players: usize, starting_chips: i64, seed: u64) -> Result<Self, EngineError> {
        Self::from_config(GameConfig::new(players, starting_chips).with_seed(seed))
    }

    pub fn from_config(config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let agents = AgentTable::counting(config.players, &config.profile, seed);
        Self::build(config, seed, agents)
    }

    /// Seat the given agents instead of counting bots.
    pub fn with_agents(config: GameConfig, agents: AgentTable) -> Result<Self, EngineError> {
        config.validate()?;
        if agents.len() != config.players {
            return Err(EngineError::from(ConfigError::AgentCount {
                expected: config.players,
                got: agents.len(),
            }));
        }
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Self::build(config, seed, agents)
    }

    fn build(config: GameConfig, seed: u64, agents: AgentTable) -> Result<Self, EngineError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut deck = Deck::shuffled(&mut rng);
        let hands: Vec<Vec<Card>> =
            (0..config.players).map(|_| deck.deal(CARDS_PER_PLAYER)).collect();
        let chips = Chips::new(config.players, config.starting_chips, HOUSE_INIT_CHIPS);
        let initial_total = chips.total();
        let mut game = Self {
            config,
            seed,
            rng,
            deck,
            discard: Vec::new(),
            hands,
            positions: Vec::new(),
            ids: PositionIds::default(),
            book: OrderBook::new(),
            chips,
            blind_pool: 0,
            fees: 0,
            initial_total,
            round: 0,
            phase: Phase::BlindCollection,
            last_market: None,
            reshuffled: false,
            failed: None,
            agents,
            observer: None,
        };
        for (seat, hand) in game.hands.iter().enumerate() {
            game.agents.observe(seat, hand, true);
        }
        game.check_invariants()?;
        if game.should_stop() {
            game.phase = Phase::Terminal;
        }
        Ok(game)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed actually used, including one drawn for an unseeded config.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rounds played so far.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn num_players(&self) -> usize {
        self.hands.len()
    }

    pub fn chips(&self) -> &Chips {
        &self.chips
    }

    pub fn hand(&self, player: PlayerId) -> &[Card] {
        self.hands.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn order_book(&self) -> &OrderBook {
        &self.book
    }

    pub fn blind_pool(&self) -> i64 {
        self.blind_pool
    }

    pub fn fees(&self) -> i64 {
        self.fees
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    pub fn last_market(&self) -> Option<Card> {
        self.last_market
    }

    pub fn agents(&self) -> &AgentTable {
        &self.agents
    }

    /// Front ends queue actions for their seats through this.
    pub fn agents_mut(&mut self) -> &mut AgentTable {
        &mut self.agents
    }

    pub fn set_observer(&mut self, observer: impl RoundObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// No more rounds will be played: the game reached a terminal state or
    /// a round failed.
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Terminal || self.failed.is_some()
    }

    pub fn outcome(&self) -> GameOutcome {
        GameOutcome {
            chips: self.chips.players().to_vec(),
            rounds: self.round,
            capped: self.chips.solvent().count() >= 2,
        }
    }

    fn should_stop(&self) -> bool {
        self.chips.solvent().count() < 2
            || self.config.max_rounds.is_some_and(|cap| self.round >= cap)
    }

    /// Play rounds until fewer than two players hold chips or the round cap is hit.
    pub fn run_to_completion(&mut self) -> Result<GameOutcome, EngineError> {
        while !self.is_over() {
            self.run_round()?;
        }
        match &self.failed {
            Some(err) => Err(err.clone()),
            None => Ok(self.outcome()),
        }
    }

    /// Play one full round: blinds, actions, matching, reveal, settlement and
    /// bankruptcy cleanup. Card and chip invariants are checked at the end.
    ///
    /// Errors are fatal: every later call returns the same error.
    pub fn run_round(&mut self) -> Result<RoundResult, EngineError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        if self.is_over() {
            return Err(EngineError::GameOver);
        }
        let result = self.play_round();
        if let Err(err) = &result {
            error!(round = self.round, phase = self.phase.label(), %err, "round aborted");
            self.failed = Some(err.clone());
        }
        result
    }

    /// The error that stopped this game mid-round, if any.
    pub fn failure(&self) -> Option<&EngineError> {
        self.failed.as_ref()
    }

    fn play_round(&mut self) -> Result<RoundResult, EngineError> {
        self.round += 1;
        self.reshuffled = false;

        self.phase = Phase::BlindCollection;
        let blind = self.collect_blind();

        self.phase = Phase::ActionPhase;
        let actions = self.action_phase()?;

        self.phase = Phase::Matching;
        let house_matched = self.book.offers().to_vec();
        let matched = match_with_house(&mut self.book, &mut self.ids);
        self.positions.extend(matched);

        self.phase = Phase::Reveal;
        let market = self.reveal()?;

        self.phase = Phase::Settlement;
        let settlement = self.settle(market);

        self.phase = Phase::BankruptcyCleanup;
        let bankruptcies = self.sweep_bankrupt()?;

        self.check_invariants()?;
        let terminal = self.should_stop();
        self.phase = if terminal { Phase::Terminal } else { Phase::BlindCollection };
        if terminal {
            self.log_end();
        }

        let result = RoundResult {
            round: self.round,
            blind,
            actions,
            house_matched,
            market,
            reshuffled: self.reshuffled,
            settlement,
            bankruptcies,
            terminal,
        };
        if let Some(observer) = self.observer.as_mut() {
            observer.on_round(&RoundSnapshot {
                result: &result,
                chips: &self.chips,
                positions: &self.positions,
                blind_pool: self.blind_pool,
                fees: self.fees,
            });
        }
        Ok(result)
    }

    fn log_end(&self) {
        let outcome = self.outcome();
        if outcome.capped {
            warn!(
                rounds = self.round,
                survivors = outcome.survivors().count(),
                "round cap reached before a winner"
            );
        } else {
            info!(rounds = self.round, winner = ?outcome.winner(), "game over");
        }
    }

    fn collect_blind(&mut self) -> Option<PlayerId> {
        let payer = (self.round % self.num_players() as u64) as usize;
        if self.chips.is_bankrupt(payer) {
            trace!(round = self.round, payer, "bankrupt blind payer skipped");
            return None;
        }
        self.chips.adjust(Participant::Player(payer), -BLIND);
        self.blind_pool += BLIND;
        Some(payer)
    }

    fn action_phase(&mut self) -> Result<Vec<(PlayerId, Action)>, EngineError> {
        let players = self.num_players();
        let mut actions = Vec::new();
        for i in 0..players {
            let player = ((i as u64 + self.round) % players as u64) as usize;
            if self.chips.is_bankrupt(player) {
                continue;
            }
            let view = TableView {
                player,
                hand: &self.hands[player],
                positions: &self.positions,
                chips: &self.chips,
                order_book: &self.book,
                blind_pool: self.blind_pool,
            };
            let action = self.agents.decide(player, &view);
            if action.is_pass() {
                continue;
            }
            self.validate_action(player, &action)?;
            self.agents.observe_others(player, &action.cards());
            self.apply_action(player, &action)?;
            trace!(round = self.round, player, ?action, "applied action");
            actions.push((player, action));
        }
        Ok(actions)
    }

    fn position(&self, id: PositionId) -> Option<&Position> {
        self.positions.iter().find(|p| p.id() == id)
    }

    /// Check an action against the current table without changing anything.
    pub fn validate_action(&self, player: PlayerId, action: &Action) -> Result<(), ContractViolation> {
        let violation = |kind| ContractViolation { player, kind };
        if self.chips.is_bankrupt(player) {
            return Err(violation(ViolationKind::ActingWhileBankrupt));
        }
        let hand = self.hand(player);
        let cards = action.cards();
        if cards.len() > hand.len() {
            return Err(violation(ViolationKind::TooManyCards {
                held: hand.len(),
                played: cards.len(),
            }));
        }
        for (i, card) in cards.iter().enumerate() {
            if cards[..i].contains(card) {
                return Err(violation(ViolationKind::RepeatedCard(*card)));
            }
            if !hand.contains(card) {
                return Err(violation(ViolationKind::CardNotInHand(*card)));
            }
        }

        let me = Participant::Player(player);
        let balance = self.chips.player(player);
        let mut committed = 0;
        let mut closing: Vec<PositionId> = Vec::with_capacity(action.closes.len());
        for close in &action.closes {
            let position = self
                .position(close.position)
                .ok_or_else(|| violation(ViolationKind::UnknownPosition(close.position)))?;
            let side = position
                .side_of(me)
                .ok_or_else(|| violation(ViolationKind::NotAStakeholder(close.position)))?;
            if closing.contains(&close.position) {
                return Err(violation(ViolationKind::DuplicateClose(close.position)));
            }
            match close.payment {
                Payment::Card(card) if !position.accepts_close_card(side, card) => {
                    return Err(violation(ViolationKind::UnqualifiedCloseCard {
                        position: close.position,
                        card,
                    }));
                }
                Payment::Card(_) => {}
                Payment::Chips => {
                    let needed = position.close_cost();
                    let available = balance - committed;
                    if available <= needed {
                        return Err(violation(ViolationKind::InsufficientChips { needed, available }));
                    }
                    committed += needed;
                }
            }
            closing.push(close.position);
        }

        match action.open {
            Some(Open::Take { card, offer }) => {
                let resting = self
                    .book
                    .find(offer)
                    .ok_or_else(|| violation(ViolationKind::OfferUnavailable(offer)))?;
                if resting.player == player {
                    return Err(violation(ViolationKind::SelfTrade(offer)));
                }
                if card.side() == offer.side() {
                    return Err(violation(ViolationKind::SameColorTake { card, offer }));
                }
            }
            Some(Open::DoubleDown { position, card }) => {
                let eligible = self.position(position).is_some_and(|p| {
                    p.involves_house() && p.cards().len() == 1 && p.side_of(me) == Some(card.side())
                });
                if !eligible || closing.contains(&position) {
                    return Err(violation(ViolationKind::InvalidDoubleDown(position, card)));
                }
            }
            Some(Open::Make { .. }) | None => {}
        }
        Ok(())
    }

    /// Opens first, then closes. The action has been validated.
    fn apply_action(&mut self, player: PlayerId, action: &Action) -> Result<(), EngineError> {
        let hand = &mut self.hands[player];
        for card in action.cards() {
            if let Some(idx) = hand.iter().position(|c| *c == card) {
                hand.remove(idx);
            }
        }
        match action.open {
            Some(Open::Make { card }) => self.book.post(player, card),
            Some(Open::Take { card, offer }) => {
                if let Some(resting) = self.book.take(offer) {
                    let id = self.ids.next_id();
                    self.positions.push(pair_take(id, player, card, resting));
                }
            }
            Some(Open::DoubleDown { position, card }) => {
                if let Some(p) = self.positions.iter_mut().find(|p| p.id() == position) {
                    p.push_card(card);
                }
            }
            None => {}
        }
        for close in &action.closes {
            self.close_position(close.position, Closing::Player(player, close.payment))?;
        }
        Ok(())
    }

    /// Remove a position, discard its cards and deal replacements to the
    /// player parties: what each contributed, plus one for a card closer.
    fn close_position(&mut self, id: PositionId, closing: Closing) -> Result<(), EngineError> {
        let Some(idx) = self.positions.iter().position(|p| p.id() == id) else {
            return Ok(());
        };
        let position = self.positions.remove(idx);
        let mut deals: Vec<(PlayerId, usize)> = Vec::with_capacity(2);
        for who in [position.long(), position.short()] {
            let Some(player) = who.player() else { continue };
            let mut owed = position.contributed_by(player);
            match closing {
                Closing::Player(closer, Payment::Card(card)) if closer == player => {
                    self.discard.push(card);
                    owed += 1;
                }
                Closing::Player(closer, Payment::Chips) if closer == player => {
                    if let Some(counterparty) = position.counterparty(who) {
                        self.chips.transfer(who, counterparty, position.close_cost());
                    }
                }
                Closing::Forced if self.chips.is_bankrupt(player) => continue,
                _ => {}
            }
            deals.push((player, owed));
        }
        self.discard.extend_from_slice(position.cards());
        trace!(round = self.round, %position, ?closing, "closed position");

        let mut reshuffled = false;
        for (player, owed) in deals {
            reshuffled |= self.deal(player, owed)?;
        }
        if reshuffled {
            self.reshuffled = true;
            self.reset_beliefs(None);
        }
        Ok(())
    }

    /// Returns whether the deck had to be rebuilt from the discard pile.
    fn deal(&mut self, player: PlayerId, count: usize) -> Result<bool, InvariantViolation> {
        let mut reshuffled = false;
        let mut dealt = Vec::with_capacity(count);
        for _ in 0..count {
            if self.deck.is_empty() {
                self.deck.refill_from(&mut self.discard, &mut self.rng);
                reshuffled = true;
                debug!(round = self.round, deck = self.deck.len(), "reshuffled discard while dealing");
            }
            dealt.push(self.deck.draw().ok_or(InvariantViolation::DeckExhausted)?);
        }
        self.hands[player].extend_from_slice(&dealt);
        self.agents.observe(player, &dealt, false);
        Ok(reshuffled)
    }

    /// Every seat starts counting again from what is face up plus its own hand.
    fn reset_beliefs(&mut self, market: Option<Card>) {
        let mut table: Vec<Card> = self
            .positions
            .iter()
            .flat_map(|p| p.cards().iter().copied())
            .chain(self.book.cards())
            .collect();
        table.extend(market);
        for (seat, hand) in self.hands.iter().enumerate() {
            let mut seen = hand.clone();
            seen.extend_from_slice(&table);
            self.agents.observe(seat, &seen, true);
        }
    }

    fn reveal(&mut self) -> Result<Card, EngineError> {
        let reshuffle = self.deck.is_empty();
        if reshuffle {
            self.deck.refill_from(&mut self.discard, &mut self.rng);
        }
        let market = self.deck.draw().ok_or(InvariantViolation::DeckExhausted)?;
        self.discard.push(market);
        self.last_market = Some(market);
        if reshuffle {
            self.reshuffled = true;
            debug!(round = self.round, deck = self.deck.len(), "reshuffled discard at reveal");
            self.reset_beliefs(Some(market));
        } else {
            self.agents.observe_all(&[market]);
        }
        debug!(round = self.round, %market, "market card revealed");
        Ok(market)
    }

    fn settle(&mut self, market: Card) -> Settlement {
        let transfers = settle_positions(&self.positions, market, &mut self.chips);
        let jackpot = distribute_blinds(&self.positions, market, &mut self.chips, &mut self.blind_pool);
        let settlement = Settlement { transfers, jackpot };
        self.fees += settlement.fees();
        settlement
    }

    /// Liquidate every player who ran out of chips this round.
    fn sweep_bankrupt(&mut self) -> Result<Vec<PlayerId>, EngineError> {
        let broke: Vec<PlayerId> = self
            .chips
            .bankrupt()
            .filter(|&p| {
                !self.hands[p].is_empty() || self.positions.iter().any(|pos| pos.involves_player(p))
            })
            .collect();
        if broke.is_empty() {
            return Ok(broke);
        }
        let doomed: Vec<PositionId> = self
            .positions
            .iter()
            .filter(|p| broke.iter().any(|&b| p.involves_player(b)))
            .map(Position::id)
            .collect();
        for id in doomed {
            self.close_position(id, Closing::Forced)?;
        }
        for &player in &broke {
            let hand = std::mem::take(&mut self.hands[player]);
            self.discard.extend(hand);
            info!(round = self.round, player, chips = self.chips.player(player), "player bankrupt");
        }
        Ok(broke)
    }

    /// Card conservation, per-player card quota, distinct parties and chip
    /// conservation (players, house, blind pool and fees).
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let found = self.deck.len()
            + self.discard.len()
            + self.hands.iter().map(Vec::len).sum::<usize>()
            + self.positions.iter().map(|p| p.cards().len()).sum::<usize>()
            + self.book.len();
        if found != DECK_SIZE {
            return Err(InvariantViolation::CardCount { expected: DECK_SIZE, found });
        }
        for player in self.chips.solvent() {
            let found = self.hand(player).len()
                + self.positions.iter().map(|p| p.contributed_by(player)).sum::<usize>()
                + self.book.offers_by(player).count();
            if found != CARDS_PER_PLAYER {
                return Err(InvariantViolation::Quota { player, expected: CARDS_PER_PLAYER, found });
            }
        }
        if let Some(p) = self.positions.iter().find(|p| p.long() == p.short()) {
            return Err(InvariantViolation::SelfPosition(p.id()));
        }
        let found = self.chips.total() + self.blind_pool + self.fees;
        if found != self.initial_total {
            return Err(InvariantViolation::ChipLeak { expected: self.initial_total, found });
        }
        Ok(())
    }
}
