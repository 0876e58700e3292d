use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::error::Error;
use std::io::{self, IsTerminal, Stdout};
use std::time::Duration;
use stonks_rs::config::GameConfig;
use stonks_rs::study::run_batch;
use stonks_rs::tui::{app::AppState, controller};
use tracing_subscriber::EnvFilter;

const HEADLESS_GAMES: usize = 200;
const HEADLESS_ROUND_CAP: u64 = 100_000;

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// No TTY: run a batch of bot games and print how often each seat won.
fn headless() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let config = GameConfig::default().with_seed(0).with_max_rounds(HEADLESS_ROUND_CAP);
    let report = run_batch(&config, HEADLESS_GAMES)?;
    println!("stonks-rs {}: {} games of {} players", stonks_rs::VERSION, report.games, config.players);
    for (seat, wins) in report.wins.iter().enumerate() {
        println!("  P{}: {wins} wins", seat + 1);
    }
    println!("  undecided: {}", report.undecided);
    println!("  mean rounds: {:.1}", report.mean_rounds());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    if !io::stdout().is_terminal() {
        return headless();
    }
    let mut app = AppState::new()?;
    let mut terminal = setup_terminal()?;
    let tick_rate = Duration::from_millis(50);

    let res = controller::run(&mut terminal, &mut app, tick_rate);

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    Ok(res?)
}
