use crate::cards::{Card, Suit};
use crate::engine::MarketEngine;
use crate::position::Participant;
use crate::tui::app::{seat_label, AppState};
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let engine: &dyn MarketEngine = &app.game;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(7), // seats
            Constraint::Min(6),    // positions + log
            Constraint::Length(3), // status bar
        ])
        .split(f.area());

    let market = engine.last_market().map(card_span).unwrap_or_else(|| Span::raw("--"));
    let header_lines = vec![
        Line::from(format!(
            "Round {}  {}  Deck {}",
            engine.round(),
            engine.phase().label(),
            engine.deck_len()
        )),
        Line::from(vec![
            Span::raw(format!(
                "Blind pool {}  Fees {}  House {}  Market ",
                engine.blind_pool(),
                engine.fees(),
                engine.chips().house()
            )),
            market,
        ]),
    ];
    let header = Paragraph::new(header_lines)
        .block(Block::default().title("stonks-rs").borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    draw_seats(f, chunks[1], app, engine);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[2]);
    draw_positions(f, middle[0], app, engine);
    draw_log(f, middle[1], app);

    let mut status = vec![Span::raw(if app.autoplay() { "Autoplay ON  " } else { "Paused  " })];
    if let Some(err) = app.error() {
        status.push(Span::styled(format!("Error: {err}  "), Style::default().fg(Color::Red)));
    } else if engine.is_over() {
        status.push(Span::styled("Game over  ", Style::default().fg(Color::Green)));
    }
    status.push(Span::styled(
        "Space step • P autoplay • ↑/↓ log • ? help • M menu",
        Style::default().add_modifier(Modifier::DIM),
    ));
    let status_para = Paragraph::new(Line::from(status))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status_para, chunks[3]);
}

fn draw_seats(f: &mut Frame, area: Rect, app: &AppState, engine: &dyn MarketEngine) {
    let n = engine.num_players().max(1) as u32;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..n).map(|_| Constraint::Ratio(1, n)).collect::<Vec<_>>())
        .split(area);
    let blind_payer = app.last_result().and_then(|r| r.blind);
    for (seat, seat_area) in cols.iter().enumerate().take(engine.num_players()) {
        let me = Participant::Player(seat);
        let chips = engine.chips().player(seat);
        let held = engine.positions().iter().filter(|p| p.involves(me)).count();
        let mut title = seat_label(&app.game, seat);
        if blind_payer == Some(seat) {
            title.push_str(" [BLIND]");
        }
        let mut block = Block::default().title(title).borders(Borders::ALL);
        if engine.chips().is_bankrupt(seat) {
            block = block.border_style(Style::default().fg(Color::DarkGray));
        } else if blind_payer == Some(seat) {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        let hand: Vec<Span> = engine
            .hand(seat)
            .iter()
            .flat_map(|c| [card_span(*c), Span::raw(" ")])
            .collect();
        let confidence = engine
            .confidence(seat)
            .map(|c| format!("{c:.2}"))
            .unwrap_or_else(|| "--".to_string());
        let lines = vec![
            Line::from(format!("Chips: {chips}")),
            Line::from(hand),
            Line::from(format!("Positions: {held}")),
            Line::from(format!("Confidence: {confidence}")),
        ];
        f.render_widget(Paragraph::new(lines).block(block), *seat_area);
    }
}

fn draw_positions(f: &mut Frame, area: Rect, app: &AppState, engine: &dyn MarketEngine) {
    let mut lines: Vec<Line> = engine
        .positions()
        .iter()
        .map(|p| {
            let mut spans = vec![Span::raw(format!("{} {} / {} ", p.id(), p.long(), p.short()))];
            for card in p.cards() {
                spans.push(card_span(*card));
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(format!("= {}", p.value()), Style::default().add_modifier(Modifier::DIM)));
            Line::from(spans)
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from("No open positions."));
    }
    // The book is empty between rounds; show what last went to the house.
    if let Some(result) = app.last_result().filter(|r| !r.house_matched.is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Last book:", Style::default().add_modifier(Modifier::BOLD))));
        let offers: Vec<Span> = result
            .house_matched
            .iter()
            .flat_map(|o| [Span::raw(format!("P{} ", o.player + 1)), card_span(o.card), Span::raw("  ")])
            .collect();
        lines.push(Line::from(offers));
    }
    let title = format!("Positions ({})", engine.positions().len());
    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_log(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = inner(area).height as usize;
    let lines: Vec<Line> = app.log_page(rows).iter().map(|l| Line::from(l.as_str())).collect();
    let para = Paragraph::new(lines).block(Block::default().title("Log").borders(Borders::ALL));
    f.render_widget(para, area);
}

pub(super) fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let lines = vec![
        Line::from(Span::styled("Table:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("- Space: play one round"),
        Line::from("- P: toggle autoplay"),
        Line::from("- Up / Down: scroll log"),
        Line::from("- M: menu"),
        Line::from(""),
        Line::from(Span::styled("Rules:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("- Spades and clubs are long, diamonds and hearts short"),
        Line::from("- Each round one market card settles every position"),
        Line::from("- Value 10 positions share the blind pool"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

fn suit_glyph_and_style(s: Suit) -> (char, Style) {
    match s {
        Suit::Hearts => ('♥', Style::default().fg(Color::Red)),
        Suit::Diamonds => ('♦', Style::default().fg(Color::Red)),
        Suit::Spades => ('♠', Style::default().fg(Color::White)),
        Suit::Clubs => ('♣', Style::default().fg(Color::White)),
    }
}

fn card_span(c: Card) -> Span<'static> {
    let (glyph, style) = suit_glyph_and_style(c.suit());
    Span::styled(format!("{}{}", c.rank().to_char(), glyph), style)
}
