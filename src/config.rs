use crate::agents::CountingProfile;
use crate::position::BIG_PAYOUT;

/// Cards each seated player holds between hand, positions, and offers.
pub const CARDS_PER_PLAYER: usize = 6;
pub const DECK_SIZE: usize = 52;
pub const HOUSE_INIT_CHIPS: i64 = 999_999;
/// Paid into the blind pool every round by the rotating payer.
pub const BLIND: i64 = BIG_PAYOUT;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("at least two players are needed, got {0}")]
    TooFewPlayers(usize),
    #[error("too many players for one deck: max {max}, got {got}")]
    TooManyPlayers { max: usize, got: usize },
    #[error("starting chips must be positive, got {0}")]
    NonPositiveChips(i64),
    #[error("expected {expected} agents, got {got}")]
    AgentCount { expected: usize, got: usize },
}

/// Setup for one game.
///
/// ```
/// use stonks_rs::config::GameConfig;
///
/// let cfg = GameConfig::new(4, 500).with_seed(9).with_max_rounds(1_000);
/// assert!(cfg.validate().is_ok());
/// assert!(GameConfig::new(8, 500).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct GameConfig {
    pub players: usize,
    pub starting_chips: i64,
    /// Seeds the deck and every seat's agent; `None` draws a fresh seed.
    pub seed: Option<u64>,
    /// Stop after this many rounds even if several players remain solvent.
    pub max_rounds: Option<u64>,
    /// Profile for the counting bots seated by default.
    pub profile: CountingProfile,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(5, 500)
    }
}

impl GameConfig {
    pub fn new(players: usize, starting_chips: i64) -> Self {
        Self {
            players,
            starting_chips,
            seed: None,
            max_rounds: None,
            profile: CountingProfile::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_rounds(mut self, rounds: u64) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    pub fn with_profile(mut self, profile: CountingProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Largest table a single deck can deal full hands to, keeping one
    /// hand's worth of cards out of play.
    pub const fn max_players() -> usize {
        DECK_SIZE / CARDS_PER_PLAYER - 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players < 2 {
            return Err(ConfigError::TooFewPlayers(self.players));
        }
        if CARDS_PER_PLAYER * (self.players + 1) > DECK_SIZE {
            return Err(ConfigError::TooManyPlayers { max: Self::max_players(), got: self.players });
        }
        if self.starting_chips <= 0 {
            return Err(ConfigError::NonPositiveChips(self.starting_chips));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_players_is_the_limit() {
        assert_eq!(GameConfig::max_players(), 7);
        assert!(GameConfig::new(7, 100).validate().is_ok());
        assert_eq!(
            GameConfig::new(8, 100).validate(),
            Err(ConfigError::TooManyPlayers { max: 7, got: 8 })
        );
    }

    #[test]
    fn rejects_degenerate_tables() {
        assert_eq!(GameConfig::new(1, 100).validate(), Err(ConfigError::TooFewPlayers(1)));
        assert_eq!(GameConfig::new(3, 0).validate(), Err(ConfigError::NonPositiveChips(0)));
    }
}
