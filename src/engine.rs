// Read/drive boundary for front ends. The TUI talks to the game through this
// trait only; it is implemented for the core `Game` type.

use crate::cards::Card;
use crate::game::{EngineError, Game, Phase, RoundResult};
use crate::matching::OrderBook;
use crate::position::{PlayerId, Position};
use crate::settlement::Chips;

pub trait MarketEngine {
    // Round lifecycle
    fn run_round(&mut self) -> Result<RoundResult, EngineError>;
    fn is_over(&self) -> bool;

    // Queries
    fn round(&self) -> u64;
    fn phase(&self) -> Phase;
    fn num_players(&self) -> usize;
    fn chips(&self) -> &Chips;
    fn hand(&self, seat: PlayerId) -> &[Card];
    fn positions(&self) -> &[Position];
    fn order_book(&self) -> &OrderBook;
    fn blind_pool(&self) -> i64;
    fn fees(&self) -> i64;
    fn last_market(&self) -> Option<Card>;
    fn deck_len(&self) -> usize;
    /// Belief confidence of the agent at `seat`, when it keeps one.
    fn confidence(&self, seat: PlayerId) -> Option<f64>;
}

impl MarketEngine for Game {
    fn run_round(&mut self) -> Result<RoundResult, EngineError> {
        self.run_round()
    }
    fn is_over(&self) -> bool {
        self.is_over()
    }

    fn round(&self) -> u64 {
        self.round
    }
    fn phase(&self) -> Phase {
        self.phase
    }
    fn num_players(&self) -> usize {
        self.num_players()
    }
    fn chips(&self) -> &Chips {
        &self.chips
    }
    fn hand(&self, seat: PlayerId) -> &[Card] {
        self.hand(seat)
    }
    fn positions(&self) -> &[Position] {
        &self.positions
    }
    fn order_book(&self) -> &OrderBook {
        &self.book
    }
    fn blind_pool(&self) -> i64 {
        self.blind_pool
    }
    fn fees(&self) -> i64 {
        self.fees
    }
    fn last_market(&self) -> Option<Card> {
        self.last_market
    }
    fn deck_len(&self) -> usize {
        self.deck.len()
    }
    fn confidence(&self, seat: PlayerId) -> Option<f64> {
        self.agents().agent(seat).and_then(|a| a.confidence())
    }
}
