//! Spectator terminal UI: configure a table of counting bots, then watch it
//! trade round by round.

pub mod app;
pub mod controller;
pub mod ui;
