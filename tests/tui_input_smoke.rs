use crossterm::event::KeyCode;
use stonks_rs::tui::app::{AppState, InputAction, Scene};
use stonks_rs::tui::controller::handle_key;

fn setup_table_app() -> AppState {
    let mut app = AppState::new().unwrap();
    app.apply_menu();
    app
}

#[test]
fn menu_navigation_and_apply() {
    let mut app = AppState::new().unwrap();
    assert!(matches!(app.scene, Scene::Menu));
    let start = app.menu_index;
    let _ = app.handle_input(InputAction::MenuNext);
    assert_ne!(app.menu_index, start);
    let _ = app.handle_input(InputAction::MenuPrev);
    assert_eq!(app.menu_index, start);

    let players = app.cfg_players;
    let _ = app.handle_input(InputAction::MenuDec);
    assert_eq!(app.cfg_players, players - 1);
    let _ = app.handle_input(InputAction::MenuApply);
    assert!(matches!(app.scene, Scene::Table));
    assert_eq!(app.game.num_players(), players - 1);
}

#[test]
fn step_plays_rounds_and_logs_them() {
    let mut app = setup_table_app();
    assert!(app.handle_input(InputAction::Step));
    assert_eq!(app.game.round(), 1);
    assert!(app.log_len() > 0);
    assert_eq!(app.last_result().map(|r| r.round), Some(1));
    assert!(app.error().is_none());
}

#[test]
fn help_and_autoplay_toggle() {
    let mut app = setup_table_app();
    let _ = app.handle_input(InputAction::ToggleHelp);
    assert!(app.help_open());
    let _ = app.handle_input(InputAction::ToggleHelp);
    assert!(!app.help_open());

    let _ = app.handle_input(InputAction::ToggleAutoplay);
    assert!(app.autoplay());
    let _ = app.handle_input(InputAction::ToggleMenu);
    assert!(matches!(app.scene, Scene::Menu));
    let _ = app.handle_input(InputAction::ToggleAutoplay);
    assert!(app.autoplay(), "autoplay only toggles at the table");
}

#[test]
fn keys_drive_the_table() {
    let mut app = setup_table_app();
    assert!(!handle_key(&mut app, KeyCode::Char(' ')));
    assert_eq!(app.game.round(), 1);
    assert!(!handle_key(&mut app, KeyCode::Char('?')));
    assert!(app.help_open());
    // Only Esc or ? close the help overlay.
    assert!(!handle_key(&mut app, KeyCode::Char(' ')));
    assert_eq!(app.game.round(), 1);
    assert!(!handle_key(&mut app, KeyCode::Esc));
    assert!(!app.help_open());
    assert!(!handle_key(&mut app, KeyCode::Char('m')));
    assert!(matches!(app.scene, Scene::Menu));
    assert!(handle_key(&mut app, KeyCode::Char('q')));
}
