//! stonks-rs: a multiplayer card-trading game engine
//!
//! Players hold cards from one 52-card deck and trade directional positions
//! against each other or the house. Every round a market card is revealed and
//! settles every open position. Spades and clubs are long, diamonds and
//! hearts are short.
//!
//! Goals:
//! - Deterministic play from a single seed
//! - Card and chip conservation checked after every round
//! - No panics for invalid agent output; use `Result` for contract violations
//!
//! ## Quick start: play a seeded game of counting bots
//! ```
//! use stonks_rs::config::GameConfig;
//! use stonks_rs::game::Game;
//!
//! let config = GameConfig::new(3, 200).with_seed(7).with_max_rounds(2_000);
//! let mut game = Game::from_config(config).unwrap();
//! let outcome = game.run_to_completion().unwrap();
//! assert!(outcome.rounds > 0);
//! assert!(outcome.capped || outcome.survivors().count() <= 1);
//! ```
//!
//! ## TUI
//! Watch a table with:
//! ```sh
//! cargo run --bin stonks-rs
//! ```

pub mod agents;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod game;
pub mod matching;
pub mod position;
pub mod settlement;
pub mod study;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
