//! Header, footer and popup widgets for bfm.
//!
//! The header shows the current path, or the `:` command line while it is open.
//! The footer shows the status message or the metadata of the focused entry, plus the
//! keys of an unfinished sequence. The move prompt is drawn as a centered popup.

use crate::app::AppState;
use crate::app::actions::{ActionMode, InputMode};
use crate::app::state::Severity;
use crate::utils::shorten_home_path;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Draws the header line: the current folder, or the command line prompt.
pub fn draw_header(frame: &mut Frame, area: Rect, app: &AppState) {
    if let ActionMode::Input {
        mode: InputMode::CommandLine,
        prompt,
    } = app.actions().mode()
    {
        let visible_width = (area.width as usize).saturating_sub(prompt.width());
        let (display_input, cursor_offset) = input_field_view(
            app.actions().input_buffer(),
            app.actions().input_cursor_pos(),
            visible_width.saturating_sub(1),
        );
        let line = Line::from(vec![Span::raw(prompt.as_str()), Span::raw(display_input)]);
        frame.render_widget(Paragraph::new(line), area);
        frame.set_cursor_position((
            area.x + (prompt.width() + cursor_offset) as u16,
            area.y,
        ));
        return;
    }

    let path = shorten_home_path(app.folder().path());
    let line = Line::from(Span::styled(
        path,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draws the footer line: the status message if any, else the focused entry's metadata.
/// Pending sequence keys go to the right edge.
pub fn draw_footer(frame: &mut Frame, area: Rect, app: &AppState) {
    let left = match app.status() {
        Some(status) => {
            let style = match status.severity() {
                Severity::Error => Style::default().fg(Color::Red),
                Severity::Info => Style::default(),
            };
            Span::styled(status.text(), style)
        }
        None => Span::styled(
            app.preview().metadata(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(left)), area);

    let pending = app.pending_keys();
    if !pending.is_empty() {
        frame.render_widget(
            Paragraph::new(pending).alignment(Alignment::Right),
            area,
        );
    }
}

/// Draws the move prompt, if it is open.
pub fn draw_move_popup(frame: &mut Frame, app: &AppState, accent_style: Style) {
    let ActionMode::Input {
        mode: InputMode::Move,
        prompt,
    } = app.actions().mode()
    else {
        return;
    };

    let area = popup_area(frame.area(), 60, 3);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(accent_style)
        .title(Span::styled(format!(" {prompt} "), accent_style));
    let inner = block.inner(area);

    let (display_input, cursor_offset) = input_field_view(
        app.actions().input_buffer(),
        app.actions().input_cursor_pos(),
        inner.width as usize,
    );

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(display_input).block(block), area);
    frame.set_cursor_position((inner.x + cursor_offset as u16, inner.y));
}

/// A rectangle `percent_x` wide and `height` rows tall, centered in `area`.
pub fn popup_area(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = (area.width as u32 * percent_x.min(100) as u32 / 100) as u16;
    let width = width.max(area.width.min(20));
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// The part of `input_text` that fits into `visible_width` columns and the cursor column
/// inside it. Long input scrolls so the end stays visible.
pub fn input_field_view(input_text: &str, cursor_pos: usize, visible_width: usize) -> (&str, usize) {
    let cursor_pos = cursor_pos.min(input_text.len());
    if input_text.width() <= visible_width {
        return (input_text, input_text[..cursor_pos].width());
    }

    let mut current_w = 0;
    let mut start = input_text.len();
    for (idx, ch) in input_text.char_indices().rev() {
        current_w += ch.width().unwrap_or(0);
        if current_w > visible_width {
            break;
        }
        start = idx;
    }

    let cursor_offset = if cursor_pos < start {
        0
    } else {
        input_text[start..cursor_pos].width()
    };
    (&input_text[start..], cursor_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_shown_whole() {
        assert_eq!(input_field_view("abc", 1, 10), ("abc", 1));
        assert_eq!(input_field_view("", 0, 10), ("", 0));
    }

    #[test]
    fn long_input_keeps_the_tail() {
        let (view, cursor) = input_field_view("/home/user/some/long/path", 25, 10);
        assert_eq!(view, "/long/path");
        assert_eq!(cursor, 10);

        let (_, cursor) = input_field_view("/home/user/some/long/path", 0, 10);
        assert_eq!(cursor, 0);
    }

    #[test]
    fn popups_are_centered() {
        let area = Rect::new(0, 0, 100, 30);
        let popup = popup_area(area, 60, 3);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 3);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 13);

        let tiny = popup_area(Rect::new(0, 0, 10, 2), 60, 3);
        assert!(tiny.width <= 10 && tiny.height <= 2);
    }
}
