use crate::agents::{Action, Open, Payment};
use crate::config::GameConfig;
use crate::engine::MarketEngine;
use crate::game::{EngineError, Game, RoundResult};
use crate::position::{Participant, PlayerId};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    Step,
    ToggleAutoplay,
    LogUp,
    LogDown,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub started: Instant,
    pub game: Game,
    // Menu config being edited
    pub menu_index: usize,
    pub cfg_players: usize,
    pub cfg_starting_chips: i64,
    pub cfg_seed: u64,
    pub cfg_delay_ms: u64,
    pub autoplay_delay_ms: u64,
    pub(crate) menu_error: Option<String>,
    pub(crate) last_result: Option<RoundResult>,
    autoplay: bool,
    last_step: Instant,
    help_open: bool,
    log: Vec<String>,
    log_offset: usize,
    error: Option<String>,
}

impl AppState {
    pub const LOG_PAGE_SIZE: usize = 12;

    /// Opens on the menu with a default table of counting bots.
    pub fn new() -> Result<Self, EngineError> {
        let seed = 1;
        let config = GameConfig::default().with_seed(seed);
        let players = config.players;
        let starting_chips = config.starting_chips;
        let game = Game::from_config(config)?;
        let default_delay = 400;
        Ok(Self {
            scene: Scene::Menu,
            started: Instant::now(),
            game,
            menu_index: 0,
            cfg_players: players,
            cfg_starting_chips: starting_chips,
            cfg_seed: seed,
            cfg_delay_ms: default_delay,
            autoplay_delay_ms: default_delay,
            menu_error: None,
            last_result: None,
            autoplay: false,
            last_step: Instant::now(),
            help_open: false,
            log: Vec::new(),
            log_offset: 0,
            error: None,
        })
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub(crate) fn close_help(&mut self) {
        self.help_open = false;
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn menu_error(&self) -> Option<&str> {
        self.menu_error.as_deref()
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Up to `n` log lines ending `log_offset` lines before the newest.
    pub fn log_page(&self, n: usize) -> &[String] {
        let end = self.log.len().saturating_sub(self.log_offset);
        let start = end.saturating_sub(n);
        &self.log[start..end]
    }

    pub(crate) fn reset_table(&mut self, game: Game) {
        self.game = game;
        self.last_result = None;
        self.autoplay = false;
        self.log.clear();
        self.log_offset = 0;
        self.error = None;
        self.menu_error = None;
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if self.scene == Scene::Table {
                    self.help_open = !self.help_open;
                }
                false
            }
            InputAction::MenuNext => {
                if self.scene == Scene::Menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if self.scene == Scene::Menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if self.scene == Scene::Menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if self.scene == Scene::Menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => {
                if self.scene == Scene::Menu {
                    self.apply_menu();
                }
                false
            }
            InputAction::MenuCancel => {
                if self.scene == Scene::Menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::Step => self.scene == Scene::Table && self.step(),
            InputAction::ToggleAutoplay => {
                if self.scene == Scene::Table && !self.game.is_over() {
                    self.autoplay = !self.autoplay;
                    self.last_step = Instant::now();
                }
                false
            }
            InputAction::LogUp => {
                let max_offset = self.log.len().saturating_sub(Self::LOG_PAGE_SIZE);
                self.log_offset = (self.log_offset + 1).min(max_offset);
                false
            }
            InputAction::LogDown => {
                self.log_offset = self.log_offset.saturating_sub(1);
                false
            }
        }
    }

    /// Play one round. Returns whether a round was played.
    pub fn step(&mut self) -> bool {
        if self.game.is_over() || self.error.is_some() {
            return false;
        }
        match MarketEngine::run_round(&mut self.game) {
            Ok(result) => {
                self.log.extend(describe_round(&result));
                if result.terminal {
                    self.autoplay = false;
                }
                self.last_result = Some(result);
                self.log_offset = 0;
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.autoplay = false;
                false
            }
        }
    }

    /// Called by the controller on every tick.
    pub fn on_tick(&mut self) {
        if self.scene != Scene::Table || !self.autoplay {
            return;
        }
        if self.last_step.elapsed() >= Duration::from_millis(self.autoplay_delay_ms) {
            self.step();
            self.last_step = Instant::now();
        }
    }
}

fn describe_round(result: &RoundResult) -> Vec<String> {
    let mut lines = Vec::with_capacity(result.actions.len() + 3);
    let blind = result.blind.map(|p| format!("blind P{}", p + 1)).unwrap_or_else(|| "no blind".into());
    lines.push(format!("Round {}: {blind}", result.round));
    for (player, action) in &result.actions {
        lines.push(format!("  P{}: {}", player + 1, describe_action(action)));
    }
    for offer in &result.house_matched {
        lines.push(format!("  P{} {} vs House", offer.player + 1, offer.card));
    }
    let reshuffle = if result.reshuffled { " (reshuffled)" } else { "" };
    let jackpot: i64 = result.settlement.jackpot.iter().map(|j| j.amount).sum();
    lines.push(format!("  market {}{reshuffle}, jackpot {jackpot}", result.market));
    for player in &result.bankruptcies {
        lines.push(format!("  {} is bankrupt", Participant::Player(*player)));
    }
    if result.terminal {
        lines.push("Game over".to_string());
    }
    lines
}

pub(crate) fn describe_action(action: &Action) -> String {
    let mut parts = Vec::with_capacity(action.closes.len() + 1);
    match action.open {
        Some(Open::Make { card }) => parts.push(format!("make {card}")),
        Some(Open::Take { card, offer }) => parts.push(format!("take {offer} with {card}")),
        Some(Open::DoubleDown { position, card }) => parts.push(format!("double {position} +{card}")),
        None => {}
    }
    for close in &action.closes {
        match close.payment {
            Payment::Card(card) => parts.push(format!("close {} with {card}", close.position)),
            Payment::Chips => parts.push(format!("close {} for chips", close.position)),
        }
    }
    if parts.is_empty() {
        "pass".to_string()
    } else {
        parts.join(", ")
    }
}

/// Seat label with a bankrupt marker.
pub(crate) fn seat_label(game: &Game, seat: PlayerId) -> String {
    if game.chips().is_bankrupt(seat) {
        format!("P{} [OUT]", seat + 1)
    } else {
        format!("P{}", seat + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Close;
    use crate::position::PositionId;

    #[test]
    fn step_ignored_in_menu() {
        let mut app = AppState::new().unwrap();
        assert!(!app.handle_input(InputAction::Step));
        assert_eq!(app.game.round(), 0);
    }

    #[test]
    fn describes_compound_actions() {
        let card = "9c".parse().unwrap();
        let action = Action {
            closes: vec![Close { position: PositionId(2), payment: Payment::Chips }],
            open: Some(Open::Make { card }),
        };
        assert_eq!(describe_action(&action), "make 9c, close #2 for chips");
        assert_eq!(describe_action(&Action::pass()), "pass");
    }
}
