use crate::config::GameConfig;
use crate::game::Game;

use super::{AppState, Scene};

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Players,
    StartingChips,
    Seed,
    AutoplayDelayMs,
}

const MENU_ITEMS: [MenuItem; 4] =
    [MenuItem::Players, MenuItem::StartingChips, MenuItem::Seed, MenuItem::AutoplayDelayMs];

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        match self {
            MenuItem::Players => format!("Players: {}", app.cfg_players),
            MenuItem::StartingChips => format!("Starting Chips: {}", app.cfg_starting_chips),
            MenuItem::Seed => format!("Seed: {}", app.cfg_seed),
            MenuItem::AutoplayDelayMs => format!("Autoplay Delay (ms): {}", app.cfg_delay_ms),
        }
    }

    fn inc(self, app: &mut AppState) {
        match self {
            MenuItem::Players => {
                if app.cfg_players < GameConfig::max_players() {
                    app.cfg_players += 1;
                }
            }
            MenuItem::StartingChips => {
                app.cfg_starting_chips = app.cfg_starting_chips.saturating_add(100);
            }
            MenuItem::Seed => app.cfg_seed = app.cfg_seed.wrapping_add(1),
            MenuItem::AutoplayDelayMs => {
                app.cfg_delay_ms = app.cfg_delay_ms.saturating_add(100);
            }
        }
    }

    fn dec(self, app: &mut AppState) {
        match self {
            MenuItem::Players => {
                if app.cfg_players > 2 {
                    app.cfg_players -= 1;
                }
            }
            MenuItem::StartingChips => {
                app.cfg_starting_chips = app.cfg_starting_chips.saturating_sub(100).max(100);
            }
            MenuItem::Seed => app.cfg_seed = app.cfg_seed.wrapping_sub(1),
            MenuItem::AutoplayDelayMs => {
                app.cfg_delay_ms = app.cfg_delay_ms.saturating_sub(100);
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        self.close_help();
        self.scene = match self.scene {
            Scene::Menu => Scene::Table,
            _ => {
                self.open_menu();
                Scene::Menu
            }
        };
    }

    pub fn open_menu(&mut self) {
        self.close_help();
        self.menu_index = 0;
        let config = self.game.config();
        self.cfg_players = config.players;
        self.cfg_starting_chips = config.starting_chips;
        self.cfg_seed = self.game.seed();
        self.cfg_delay_ms = self.autoplay_delay_ms;
        self.scene = Scene::Menu;
    }

    /// Start a fresh table from the edited settings. An invalid table keeps
    /// the menu open with the error shown.
    pub fn apply_menu(&mut self) {
        self.autoplay_delay_ms = self.cfg_delay_ms;
        let config = GameConfig::new(self.cfg_players, self.cfg_starting_chips).with_seed(self.cfg_seed);
        match Game::from_config(config) {
            Ok(game) => {
                self.reset_table(game);
                self.scene = Scene::Table;
            }
            Err(err) => self.menu_error = Some(err.to_string()),
        }
    }

    pub fn cancel_menu(&mut self) {
        self.scene = Scene::Table;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.inc(self);
        self.menu_error = None;
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.dec(self);
        self.menu_error = None;
    }
}
