use ratatui::layout::Constraint;
use ratatui::prelude::{Direction, Layout, Rect};

/// Area inside a one-cell border.
pub(super) fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(centered(percent_y))
        .split(r);
    Layout::default().direction(Direction::Horizontal).constraints(centered(percent_x)).split(rows[1])[1]
}

fn centered(percent: u16) -> [Constraint; 3] {
    let margin = (100 - percent.min(100)) / 2;
    [Constraint::Percentage(margin), Constraint::Percentage(percent), Constraint::Percentage(margin)]
}
