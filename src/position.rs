//! Positions: directional contracts between two participants, and the fixed
//! payout table they settle against.

use crate::cards::{Card, Side};
use std::fmt;

pub const SMALL_PAYOUT: i64 = 3;
pub const MID_PAYOUT: i64 = 5;
pub const BIG_PAYOUT: i64 = 10;
pub const STONK_PAYOUT: i64 = 20;

/// Position values above this are "big".
pub const BIG_SIZE_CUTOFF: u32 = 6;
/// Value of a single ten-valued card; positions at this value share the blind pool.
pub const MAX_POSITION_VALUE: u32 = 10;

/// Seat index of a player at the table.
pub type PlayerId = usize;

/// One side of a position: a seated player or the house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Participant {
    Player(PlayerId),
    House,
}

impl Participant {
    pub const fn player(self) -> Option<PlayerId> {
        match self {
            Participant::Player(id) => Some(id),
            Participant::House => None,
        }
    }

    pub const fn is_house(self) -> bool {
        matches!(self, Participant::House)
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Player(id) => write!(f, "P{}", id + 1),
            Participant::House => f.write_str("House"),
        }
    }
}

/// Stable handle of a position within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionId(pub u64);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An open contract: `long` gains when a long-colored market card is revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    id: PositionId,
    long: Participant,
    short: Participant,
    cards: Vec<Card>,
}

impl Position {
    /// Callers guarantee `long != short`; the game re-checks it after every round.
    pub fn new(id: PositionId, long: Participant, short: Participant, cards: Vec<Card>) -> Self {
        Self { id, long, short, cards }
    }

    pub fn id(&self) -> PositionId {
        self.id
    }
    pub fn long(&self) -> Participant {
        self.long
    }
    pub fn short(&self) -> Participant {
        self.short
    }
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub(crate) fn push_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn involves_house(&self) -> bool {
        self.long.is_house() || self.short.is_house()
    }

    pub fn involves(&self, who: Participant) -> bool {
        self.long == who || self.short == who
    }

    pub fn involves_player(&self, player: PlayerId) -> bool {
        self.involves(Participant::Player(player))
    }

    /// Which side `who` holds, `None` when not a party to the position.
    pub fn side_of(&self, who: Participant) -> Option<Side> {
        if self.long == who {
            Some(Side::Long)
        } else if self.short == who {
            Some(Side::Short)
        } else {
            None
        }
    }

    pub fn participant(&self, side: Side) -> Participant {
        match side {
            Side::Long => self.long,
            Side::Short => self.short,
        }
    }

    /// The participant across from `who`, if `who` is a party.
    pub fn counterparty(&self, who: Participant) -> Option<Participant> {
        self.side_of(who).map(|side| self.participant(side.opposite()))
    }

    /// Sum card values per color; house positions take the larger sum, peer
    /// positions the smaller.
    pub fn value(&self) -> u32 {
        let (long_sum, short_sum) =
            self.cards.iter().fold((0, 0), |(l, s), c| match c.side() {
                Side::Long => (l + c.value(), s),
                Side::Short => (l, s + c.value()),
            });
        if self.involves_house() {
            long_sum.max(short_sum)
        } else {
            long_sum.min(short_sum)
        }
    }

    /// Cards `player` put into this position: every card of a house
    /// position, one card of a peer position.
    pub fn contributed_by(&self, player: PlayerId) -> usize {
        if !self.involves_player(player) {
            0
        } else if self.involves_house() {
            self.cards.len()
        } else {
            1
        }
    }

    /// Participant collecting when `market` is revealed.
    pub fn paid_side(&self, market: Card) -> Participant {
        self.participant(market.side())
    }

    /// Chips needed to close this position without a card.
    pub fn close_cost(&self) -> i64 {
        close_cost_for(self.value())
    }

    /// Whether the holder of `holder` side may close with `card`: any Ace,
    /// or a card of the other color worth at least the position value.
    pub fn accepts_close_card(&self, holder: Side, card: Card) -> bool {
        card.is_ace() || (card.side() != holder && card.value() >= self.value())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(|c| c.to_string()).collect();
        write!(f, "{} L:{} S:{} [{}]", self.id, self.long, self.short, cards.join(" "))
    }
}

/// Payout tiers of the settlement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PayoutTier {
    Small,
    Mid,
    Big,
    Stonk,
}

impl PayoutTier {
    pub const fn chips(self) -> i64 {
        match self {
            PayoutTier::Small => SMALL_PAYOUT,
            PayoutTier::Mid => MID_PAYOUT,
            PayoutTier::Big => BIG_PAYOUT,
            PayoutTier::Stonk => STONK_PAYOUT,
        }
    }
}

pub const fn is_big_value(value: u32) -> bool {
    value > BIG_SIZE_CUTOFF
}

/// Tier for a position of `value` against `market`.
///
/// ```
/// use stonks_rs::cards::Card;
/// use stonks_rs::position::{payout_tier, PayoutTier};
///
/// let ks: Card = "Ks".parse().unwrap();
/// let h3: Card = "3h".parse().unwrap();
/// assert_eq!(payout_tier(10, ks), PayoutTier::Stonk);
/// assert_eq!(payout_tier(8, ks), PayoutTier::Big);
/// assert_eq!(payout_tier(4, h3), PayoutTier::Small);
/// ```
pub fn payout_tier(value: u32, market: Card) -> PayoutTier {
    let big_position = is_big_value(value);
    match (big_position, market.is_big()) {
        (true, true) if value >= MAX_POSITION_VALUE && market.is_face() => PayoutTier::Stonk,
        (true, true) => PayoutTier::Big,
        (true, false) | (false, true) => PayoutTier::Mid,
        (false, false) => PayoutTier::Small,
    }
}

pub fn payout_size(value: u32, market: Card) -> i64 {
    payout_tier(value, market).chips()
}

pub const fn close_cost_for(value: u32) -> i64 {
    if is_big_value(value) {
        BIG_PAYOUT
    } else {
        MID_PAYOUT
    }
}
