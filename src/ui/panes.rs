//! UI pane drawing module for bfm.
//!
//! Draws the listing of the current folder and the preview of the focused entry.
//!
//! Used internally by ui::render

use crate::app::AppState;
use crate::core::formatter::{display_name, size_label, truncate_to_width};
use crate::core::{DirectoryEntry, EntryKind};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// Styles used for rendering rows in the listing
pub struct PaneStyles {
    pub item: Style,
    pub dir: Style,
    pub symlink: Style,
    pub broken: Style,
    pub focus: Style,
    pub border: Style,
}

impl Default for PaneStyles {
    fn default() -> Self {
        Self {
            item: Style::default(),
            dir: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            symlink: Style::default().fg(Color::Cyan),
            broken: Style::default().fg(Color::Red),
            focus: Style::default().add_modifier(Modifier::REVERSED),
            border: Style::default().fg(Color::DarkGray),
        }
    }
}

impl PaneStyles {
    pub fn get_style(&self, entry: &DirectoryEntry, is_focused: bool) -> Style {
        let style = match entry.kind() {
            EntryKind::Directory => self.dir,
            EntryKind::Symlink if entry.is_broken_sym() => self.broken,
            EntryKind::Symlink => self.symlink,
            EntryKind::File | EntryKind::Unknown => self.item,
        };
        if is_focused {
            style.patch(self.focus)
        } else {
            style
        }
    }
}

/// Draws the listing of the current folder, with the focused row highlighted.
pub fn draw_listing(frame: &mut Frame, area: Rect, app: &AppState, styles: &PaneStyles) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(styles.border);
    let entries = app.folder().entries();

    if entries.is_empty() {
        let line = Line::from(Span::styled("[Empty]", styles.item.add_modifier(Modifier::DIM)));
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let width = block.inner(area).width as usize;
    let focus = app.folder().focus_index();
    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let style = styles.get_style(entry, Some(idx) == focus);
            ListItem::new(Line::from(Span::styled(row_text(entry, width), style)))
        })
        .collect();

    let mut state = ListState::default();
    state.select(focus);

    frame.render_stateful_widget(
        List::new(items)
            .block(block)
            .highlight_style(Style::default())
            .scroll_padding(2),
        area,
        &mut state,
    );
}

/// Draws whatever the preview command produced so far.
pub fn draw_preview(frame: &mut Frame, area: Rect, app: &AppState) {
    let preview = app.preview();
    let mut text = preview.text().clone();
    if preview.is_truncated() {
        text.push_line(Line::styled(
            "[output truncated]",
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), area);
}

/// One listing row padded to exactly `width` columns: the name on the left and the size
/// label right-aligned. Narrow rows drop the size first.
pub fn row_text(entry: &DirectoryEntry, width: usize) -> String {
    let size = truncate_to_width(&size_label(entry), width);
    let size_width = size.width();

    let mut row = if size_width + 2 > width {
        truncate_to_width(&display_name(entry), width)
    } else {
        let name = truncate_to_width(&display_name(entry), width - size_width - 1);
        let gap = width - name.width() - size_width;
        format!("{name}{}{size}", " ".repeat(gap))
    };

    let used = row.width();
    if used < width {
        row.push_str(&" ".repeat(width - used));
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn rows_fill_the_pane_width() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("notes.txt");
        fs::write(&file, vec![b'x'; 2048])?;
        let sub = dir.path().join("src");
        fs::create_dir(&sub)?;

        let file = DirectoryEntry::from_path(&file)?;
        let sub = DirectoryEntry::from_path(&sub)?;

        let row = row_text(&file, 30);
        assert_eq!(row.width(), 30);
        assert!(row.starts_with("notes.txt"));
        assert!(row.ends_with("2.0K"), "{row:?}");

        let row = row_text(&sub, 30);
        assert!(row.starts_with("src/"));
        assert_eq!(row.width(), 30);
        Ok(())
    }

    #[test]
    fn narrow_rows_keep_the_name() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("a_rather_long_file_name.txt");
        fs::write(&file, "")?;
        let entry = DirectoryEntry::from_path(&file)?;

        let row = row_text(&entry, 6);
        assert_eq!(row.width(), 6);
        assert!(row.starts_with("a_"));
        assert!(row_text(&entry, 0).is_empty());
        Ok(())
    }
}
