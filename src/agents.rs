//! Agents: pluggable decision providers, one per seat.
//!
//! The game asks the agent at each seat for an [`Action`] through the
//! [`PlayerAgent`] trait and keeps every agent informed of the cards revealed
//! around the table. Autonomous play lives in [`counting`]; [`QueuedAgent`]
//! replays actions handed to it by a front end or a test.

use crate::cards::Card;
use crate::matching::OrderBook;
use crate::position::{PlayerId, Position, PositionId};
use crate::settlement::Chips;
use core::fmt;
use std::collections::VecDeque;

mod counting;

pub use counting::{Belief, CountingAgent, CountingProfile, ThresholdMode};

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Human,
    Bot,
}

/// How a position is paid off when closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Payment {
    /// A card of the closer's expected color worth at least the position value, or any Ace.
    Card(Card),
    /// The position's closing cost in chips, paid to the counterparty.
    Chips,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Close {
    pub position: PositionId,
    pub payment: Payment,
}

/// Ways to put a card at risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Open {
    /// Add a same-colored card to one's own single-card house position.
    DoubleDown { position: PositionId, card: Card },
    /// Pair `card` with the resting offer of `offer` from another player.
    Take { card: Card, offer: Card },
    /// Post `card` to the order book.
    Make { card: Card },
}

impl Open {
    /// The card leaving the actor's hand.
    pub const fn card(&self) -> Card {
        match *self {
            Open::DoubleDown { card, .. } | Open::Take { card, .. } | Open::Make { card } => card,
        }
    }
}

/// Everything one player does in one turn: any number of closes and at most
/// one open. An empty action is a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Action {
    pub closes: Vec<Close>,
    pub open: Option<Open>,
}

impl Action {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn is_pass(&self) -> bool {
        self.closes.is_empty() && self.open.is_none()
    }

    /// Cards this action moves out of the hand, open card first.
    pub fn cards(&self) -> Vec<Card> {
        let closing = self.closes.iter().filter_map(|c| match c.payment {
            Payment::Card(card) => Some(card),
            Payment::Chips => None,
        });
        self.open.iter().map(Open::card).chain(closing).collect()
    }
}

/// What an acting player can see when deciding.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    pub player: PlayerId,
    pub hand: &'a [Card],
    pub positions: &'a [Position],
    pub chips: &'a Chips,
    pub order_book: &'a OrderBook,
    pub blind_pool: i64,
}

/// A seat controller. `decide` is called once per round on the seat's turn
/// and must return synchronously.
pub trait PlayerAgent: Send {
    fn decide(&mut self, view: &TableView<'_>) -> Action;
    /// Cards revealed to this seat. `reset` clears accumulated beliefs first.
    fn observe(&mut self, _cards: &[Card], _reset: bool) {}
    /// The kind of this agent (human, bot, etc.).
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    /// Optionally receive a queued action; default is to ignore and return false.
    fn receive(&mut self, _action: Action) -> bool {
        false
    }
    /// Current belief confidence, for agents that keep one.
    fn confidence(&self) -> Option<f64> {
        None
    }
}

/// Plays back actions in the order received; passes when none are queued.
#[derive(Debug, Default)]
pub struct QueuedAgent {
    pending: VecDeque<Action>,
}

impl QueuedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self { pending: actions.into_iter().collect() }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl PlayerAgent for QueuedAgent {
    fn decide(&mut self, _view: &TableView<'_>) -> Action {
        self.pending.pop_front().unwrap_or_default()
    }
    fn receive(&mut self, action: Action) -> bool {
        self.pending.push_back(action);
        true
    }
}

/// One agent per seat, owned by a single game.
pub struct AgentTable {
    seats: Vec<Box<dyn PlayerAgent>>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .iter()
            .map(|a| if matches!(a.kind(), AgentKind::Bot) { 'B' } else { 'H' })
            .collect();
        write!(f, "AgentTable({flags})")
    }
}

impl AgentTable {
    pub fn new(seats: Vec<Box<dyn PlayerAgent>>) -> Self {
        Self { seats }
    }

    /// A counting bot at every seat, each with an RNG derived from `seed`.
    pub fn counting(n: usize, profile: &CountingProfile, seed: u64) -> Self {
        let seats = (0..n)
            .map(|seat| {
                let agent = CountingAgent::new(profile.clone(), seat_seed(seed, seat));
                Box::new(agent) as Box<dyn PlayerAgent>
            })
            .collect();
        Self { seats }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Replace the agent at a seat.
    pub fn set_agent(&mut self, seat: usize, agent: Box<dyn PlayerAgent>) {
        if let Some(slot) = self.seats.get_mut(seat) {
            *slot = agent;
        }
    }

    pub fn agent(&self, seat: usize) -> Option<&dyn PlayerAgent> {
        self.seats.get(seat).map(|a| a.as_ref())
    }

    pub fn agent_kind(&self, seat: usize) -> Option<AgentKind> {
        self.agent(seat).map(|a| a.kind())
    }

    /// Send an action intent to a specific seat agent, if any.
    pub fn receive(&mut self, seat: usize, action: Action) -> bool {
        self.seats.get_mut(seat).map(|a| a.receive(action)).unwrap_or(false)
    }

    pub(crate) fn decide(&mut self, seat: usize, view: &TableView<'_>) -> Action {
        self.seats.get_mut(seat).map(|a| a.decide(view)).unwrap_or_default()
    }

    pub(crate) fn observe(&mut self, seat: usize, cards: &[Card], reset: bool) {
        if let Some(agent) = self.seats.get_mut(seat) {
            agent.observe(cards, reset);
        }
    }

    /// Show `cards` to every seat except `except`.
    pub(crate) fn observe_others(&mut self, except: PlayerId, cards: &[Card]) {
        for (seat, agent) in self.seats.iter_mut().enumerate() {
            if seat != except {
                agent.observe(cards, false);
            }
        }
    }

    pub(crate) fn observe_all(&mut self, cards: &[Card]) {
        for agent in &mut self.seats {
            agent.observe(cards, false);
        }
    }
}

/// Per-seat RNG seed; keeps seats independent while staying reproducible.
pub(crate) fn seat_seed(seed: u64, seat: usize) -> u64 {
    seed ^ (seat as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
