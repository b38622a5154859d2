//! UI-related tests for bfm
//!
//! These tests render the whole screen into a ratatui test backend and check what ends
//! up in the cells: header, listing rows, footer and the move popup.
//!
//! These tests create temporary directories and files which are cleaned up afterwards.

use bfm_tui::app::{AppState, CommandRegistry};
use bfm_tui::config::Config;
use bfm_tui::ui::render::{layout_chunks, render};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use std::error;
use std::fs;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn error::Error>>;

fn screen(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn config_with_preview(file_preview: &str) -> Result<Config, Box<dyn error::Error>> {
    let toml = format!(
        r#"
        [commands]
        file_preview = "{file_preview}"
        folder_preview = "true"
        "#
    );
    Ok(Config::parse(&toml)?)
}

#[test]
fn test_screen_shows_path_rows_and_metadata() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("notes.txt"), vec![b'x'; 2048])?;
    fs::create_dir(dir.path().join("src"))?;
    let config = config_with_preview("true")?;
    let registry = CommandRegistry::default();
    let app = AppState::from_dir(&config, &registry, dir.path());

    let mut terminal = Terminal::new(TestBackend::new(100, 12))?;
    terminal.draw(|f| render(f, &app))?;
    let out = screen(&terminal);

    let dir_name = dir
        .path()
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or("temp dir without a name")?;
    let first_line = out.lines().next().ok_or("empty screen")?;
    assert!(first_line.contains(dir_name), "{first_line}");

    assert!(out.contains("src/"), "{out}");
    assert!(out.contains("notes.txt"), "{out}");
    assert!(out.contains("2.0K"), "{out}");

    let footer = out.lines().last().ok_or("empty screen")?;
    assert!(footer.starts_with("drwx"), "{footer}");
    Ok(())
}

#[test]
fn test_empty_folder_is_marked() -> TestResult {
    let dir = tempdir()?;
    let config = config_with_preview("true")?;
    let registry = CommandRegistry::default();
    let app = AppState::from_dir(&config, &registry, dir.path());

    let mut terminal = Terminal::new(TestBackend::new(60, 6))?;
    terminal.draw(|f| render(f, &app))?;

    assert!(screen(&terminal).contains("[Empty]"));
    Ok(())
}

#[test]
fn test_preview_output_is_drawn() -> TestResult {
    if which::which("sh").is_err() {
        return Ok(());
    }
    let dir = tempdir()?;
    fs::write(dir.path().join("a.txt"), "")?;
    let config = config_with_preview("echo PREVIEW-OK")?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    let start = Instant::now();
    while app.preview().is_running() && start.elapsed() < Duration::from_secs(5) {
        app.tick();
        thread::sleep(Duration::from_millis(10));
    }

    let mut terminal = Terminal::new(TestBackend::new(80, 8))?;
    terminal.draw(|f| render(f, &app))?;
    assert!(screen(&terminal).contains("PREVIEW-OK"));
    Ok(())
}

#[test]
fn test_command_line_replaces_the_header() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.txt"), "")?;
    let config = config_with_preview("true")?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    app.handle_token(":");
    let mut terminal = Terminal::new(TestBackend::new(60, 6))?;
    terminal.draw(|f| render(f, &app))?;

    let out = screen(&terminal);
    let first_line = out.lines().next().ok_or("empty screen")?;
    assert!(first_line.starts_with(':'), "{first_line}");
    Ok(())
}

#[test]
fn test_move_popup_is_drawn() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.txt"), "")?;
    let config = config_with_preview("true")?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    app.handle_token("m");
    let mut terminal = Terminal::new(TestBackend::new(100, 12))?;
    terminal.draw(|f| render(f, &app))?;

    let out = screen(&terminal);
    assert!(out.contains("Move to"), "{out}");
    assert!(out.contains("a.txt"), "{out}");
    Ok(())
}

#[test]
fn test_pending_keys_show_in_the_footer() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.txt"), "")?;
    let config = config_with_preview("true")?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    app.handle_token("g");
    let mut terminal = Terminal::new(TestBackend::new(60, 6))?;
    terminal.draw(|f| render(f, &app))?;

    let out = screen(&terminal);
    let footer = out.lines().last().ok_or("empty screen")?;
    assert!(footer.trim_end().ends_with('g'), "{footer}");
    Ok(())
}

#[test]
fn test_layout_chunks_cover_the_screen() {
    let size = Rect::new(0, 0, 80, 24);
    let chunks = layout_chunks(size);

    assert_eq!(chunks.len(), 4);
    let body_width: u16 = chunks[1].width + chunks[2].width;
    assert_eq!(body_width, 80);
    let height: u16 = chunks[0].height + chunks[1].height + chunks[3].height;
    assert_eq!(height, 24);
}
