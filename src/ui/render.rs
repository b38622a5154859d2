//! UI renderer implementation.
//!
//! Contains the top-level `render` entry point used by the terminal loop and the
//! layout helper that splits the screen into header, listing, preview and footer.
//!
//! This module should stay "pure rendering": it reads state and produces widgets,
//! without owning any bfm core logic.

use crate::app::AppState;
use crate::ui::{
    panes::{self, PaneStyles},
    widgets,
};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
};

/// Share of the body width taken by the listing, in percent.
const LISTING_PERCENT: u16 = 40;

/// Renders the entire terminal UI for bfm on each frame.
pub fn render(frame: &mut Frame, app: &AppState) {
    let chunks = layout_chunks(frame.area());
    let styles = PaneStyles::default();

    widgets::draw_header(frame, chunks[0], app);
    panes::draw_listing(frame, chunks[1], app, &styles);
    panes::draw_preview(frame, chunks[2], app);
    widgets::draw_footer(frame, chunks[3], app);

    widgets::draw_move_popup(frame, app, Style::default().fg(Color::Yellow));
}

/// Splits `size` into `[header, listing, preview, footer]`.
pub fn layout_chunks(size: Rect) -> Vec<Rect> {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(LISTING_PERCENT),
            Constraint::Percentage(100 - LISTING_PERCENT),
        ])
        .split(rows[1]);

    vec![rows[0], body[0], body[1], rows[2]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_has_header_body_and_footer() {
        let chunks = layout_chunks(Rect::new(0, 0, 100, 20));

        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].height, 1);
        assert_eq!(chunks[3].height, 1);
        assert_eq!(chunks[3].y, 19);
        assert_eq!(chunks[1].height, 18);
        assert_eq!(chunks[1].width, 40);
        assert_eq!(chunks[1].width + chunks[2].width, 100);
        assert_eq!(chunks[2].x, 40);
    }
}
