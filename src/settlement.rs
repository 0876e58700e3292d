//! Settlement: chip balances, per-position payouts against the market card,
//! the house fee, and the blind (jackpot) pool.

use crate::cards::Card;
use crate::position::{
    payout_tier, Participant, PayoutTier, PlayerId, Position, PositionId, MAX_POSITION_VALUE,
};

/// Fee the house takes from its counterparty on every settled house position.
pub const HOUSE_FEE: i64 = 1;

/// Signed chip balances for every player and the house.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chips {
    players: Vec<i64>,
    house: i64,
}

impl Chips {
    pub fn new(players: usize, starting: i64, house: i64) -> Self {
        Self { players: vec![starting; players], house }
    }

    pub fn get(&self, who: Participant) -> i64 {
        match who {
            Participant::Player(id) => self.player(id),
            Participant::House => self.house,
        }
    }

    pub fn player(&self, id: PlayerId) -> i64 {
        self.players.get(id).copied().unwrap_or(0)
    }

    pub fn players(&self) -> &[i64] {
        &self.players
    }

    pub fn house(&self) -> i64 {
        self.house
    }

    pub fn adjust(&mut self, who: Participant, delta: i64) {
        match who {
            Participant::Player(id) => {
                if let Some(c) = self.players.get_mut(id) {
                    *c += delta;
                }
            }
            Participant::House => self.house += delta,
        }
    }

    pub fn transfer(&mut self, from: Participant, to: Participant, amount: i64) {
        self.adjust(from, -amount);
        self.adjust(to, amount);
    }

    /// Players and house together.
    pub fn total(&self) -> i64 {
        self.players.iter().sum::<i64>() + self.house
    }

    pub fn is_bankrupt(&self, id: PlayerId) -> bool {
        self.player(id) <= 0
    }

    /// Players still holding a positive balance.
    pub fn solvent(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().enumerate().filter(|(_, c)| **c > 0).map(|(id, _)| id)
    }

    pub fn bankrupt(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().enumerate().filter(|(_, c)| **c <= 0).map(|(id, _)| id)
    }
}

/// Chips moved by one position at settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub position: PositionId,
    pub tier: PayoutTier,
    pub payee: Participant,
    pub payer: Participant,
    pub amount: i64,
    /// House fee charged to the non-house side; zero for peer positions.
    pub fee: i64,
}

/// One jackpot winner's cut of the blind pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JackpotShare {
    pub position: PositionId,
    pub winner: Participant,
    pub amount: i64,
}

/// Everything settlement did for one market card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settlement {
    pub transfers: Vec<Transfer>,
    pub jackpot: Vec<JackpotShare>,
}

impl Settlement {
    pub fn fees(&self) -> i64 {
        self.transfers.iter().map(|t| t.fee).sum()
    }
}

/// Pay every position out against `market`. Fees leave the chip economy and
/// are returned in each [`Transfer`].
pub fn settle_positions(positions: &[Position], market: Card, chips: &mut Chips) -> Vec<Transfer> {
    positions
        .iter()
        .map(|p| {
            let tier = payout_tier(p.value(), market);
            let amount = tier.chips();
            let payee = p.paid_side(market);
            let payer = p.participant(market.side().opposite());
            chips.transfer(payer, payee, amount);
            let fee = if p.involves_house() {
                let customer = if p.long().is_house() { p.short() } else { p.long() };
                chips.adjust(customer, -HOUSE_FEE);
                HOUSE_FEE
            } else {
                0
            };
            Transfer { position: p.id(), tier, payee, payer, amount, fee }
        })
        .collect()
}

/// Split the blind pool among the paid sides of every maximum-value position.
/// Shares are floored; the remainder stays in the pool. With no winners the
/// whole pool carries over.
pub fn distribute_blinds(
    positions: &[Position],
    market: Card,
    chips: &mut Chips,
    pool: &mut i64,
) -> Vec<JackpotShare> {
    let winners: Vec<(PositionId, Participant)> = positions
        .iter()
        .filter(|p| p.value() == MAX_POSITION_VALUE)
        .map(|p| (p.id(), p.paid_side(market)))
        .collect();
    if winners.is_empty() {
        return Vec::new();
    }
    let share = *pool / winners.len() as i64;
    winners
        .into_iter()
        .map(|(position, winner)| {
            chips.adjust(winner, share);
            *pool -= share;
            JackpotShare { position, winner, amount: share }
        })
        .collect()
}
