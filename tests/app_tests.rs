//! End to end tests for the bfm application state.
//!
//! Key tokens are fed through [AppState::handle_token] and prompt keys through
//! [AppState::handle_keypress], the same way the terminal loop does.
//! Deletions go to a throwaway trash directory instead of the desktop trash.
//!
//! These tests create temporary directories and files which are cleaned up afterwards.

use bfm_tui::app::{AppState, CommandRegistry, InputMode, KeypressResult, Severity};
use bfm_tui::config::Config;
use bfm_tui::core::{BfmError, ItemMutator, Trash};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

type TestResult = Result<(), Box<dyn error::Error>>;

struct BinTrash {
    bin: PathBuf,
}

impl Trash for BinTrash {
    fn trash(&self, path: &Path) -> bfm_tui::core::Result<()> {
        let name = path
            .file_name()
            .ok_or_else(|| BfmError::NotFound(path.to_path_buf()))?;
        fs::rename(path, self.bin.join(name))?;
        Ok(())
    }
}

fn quiet_config(key_timeout_ms: u64) -> Result<Config, Box<dyn error::Error>> {
    let toml = format!(
        r#"
        [general]
        key_timeout_ms = {key_timeout_ms}

        [commands]
        editor = "true"
        file_preview = "true"
        folder_preview = "true"
        "#
    );
    Ok(Config::parse(&toml)?)
}

fn app_with_bin<'a>(
    config: &'a Config,
    registry: &'a CommandRegistry,
    dir: &Path,
) -> std::io::Result<(AppState<'a>, TempDir)> {
    let bin = tempdir()?;
    let mutator = ItemMutator::new(Box::new(BinTrash {
        bin: bin.path().to_path_buf(),
    }));
    Ok((AppState::from_dir(config, registry, dir).with_mutator(mutator), bin))
}

fn names(app: &AppState) -> Vec<String> {
    app.folder()
        .entries()
        .iter()
        .map(|e| e.name().to_string_lossy().into_owned())
        .collect()
}

fn focused_name(app: &AppState) -> Option<String> {
    app.folder()
        .focused()
        .map(|e| e.name().to_string_lossy().into_owned())
}

fn press(app: &mut AppState, code: KeyCode) -> KeypressResult {
    app.handle_keypress(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn clear_input(app: &mut AppState) {
    press(app, KeyCode::End);
    for _ in 0..app.actions().input_buffer().chars().count() {
        press(app, KeyCode::Backspace);
    }
}

fn ten_files() -> std::io::Result<TempDir> {
    let dir = tempdir()?;
    for i in 0..10 {
        fs::write(dir.path().join(format!("file{i}.txt")), "")?;
    }
    Ok(dir)
}

#[test]
fn gg_and_shift_g_jump_to_the_ends() -> TestResult {
    let dir = ten_files()?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    assert_eq!(app.folder().focus_index(), Some(0));
    assert_eq!(app.handle_token("G"), KeypressResult::Consumed);
    assert_eq!(app.folder().focus_index(), Some(9));

    assert_eq!(app.handle_token("g"), KeypressResult::Consumed);
    assert_eq!(app.pending_keys(), "g");
    assert_eq!(app.folder().focus_index(), Some(9));
    app.handle_token("g");
    assert_eq!(app.folder().focus_index(), Some(0));
    assert_eq!(app.pending_keys(), "");
    Ok(())
}

#[test]
fn a_lone_g_is_dropped_after_the_timeout() -> TestResult {
    let dir = ten_files()?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    app.handle_token("G");
    app.handle_token("g");
    app.tick_at(Instant::now() + Duration::from_millis(10));
    assert_eq!(app.pending_keys(), "g");
    assert!(app.tick_at(Instant::now() + Duration::from_secs(2)));
    assert_eq!(app.pending_keys(), "");

    app.handle_token("k");
    assert_eq!(app.folder().focus_index(), Some(8));
    Ok(())
}

#[test]
fn unknown_keys_leave_no_pending_state() -> TestResult {
    let dir = ten_files()?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    assert_eq!(app.handle_token("z"), KeypressResult::Continue);
    assert_eq!(app.pending_keys(), "");

    app.handle_token("g");
    assert_eq!(app.handle_token("x"), KeypressResult::Continue);
    assert_eq!(app.pending_keys(), "");
    assert_eq!(app.folder().focus_index(), Some(0));
    Ok(())
}

#[test]
fn dd_trashes_the_focused_entry() -> TestResult {
    let dir = tempdir()?;
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(dir.path().join(name), name)?;
    }
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let (mut app, bin) = app_with_bin(&config, &registry, dir.path())?;

    app.handle_token("j");
    assert_eq!(focused_name(&app).as_deref(), Some("b.txt"));
    app.handle_token("d");
    app.handle_token("d");

    assert_eq!(names(&app), ["a.txt", "c.txt"]);
    assert!(bin.path().join("b.txt").exists());
    assert_eq!(app.folder().focus_index(), Some(1));
    let status = app.status().ok_or("expected a status message")?;
    assert_eq!(status.severity(), Severity::Info);
    assert!(status.text().contains("b.txt"), "{}", status.text());
    Ok(())
}

#[test]
fn deleting_a_vanished_entry_reports_it() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("gone.txt"), "")?;
    fs::write(dir.path().join("kept.txt"), "")?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let (mut app, bin) = app_with_bin(&config, &registry, dir.path())?;

    fs::remove_file(dir.path().join("gone.txt"))?;
    app.handle_token("d");
    app.handle_token("d");

    let status = app.status().ok_or("expected a status message")?;
    assert_eq!(status.severity(), Severity::Error);
    assert!(status.text().contains("No such file or directory"), "{}", status.text());
    assert_eq!(names(&app), ["kept.txt"]);
    assert!(fs::read_dir(bin.path())?.next().is_none());

    // the error goes away with the next key
    app.handle_keypress(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
    assert!(app.status().is_none());
    Ok(())
}

#[test]
fn command_line_focuses_by_number() -> TestResult {
    let dir = ten_files()?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    app.handle_token(":");
    assert_eq!(app.actions().input_mode(), Some(InputMode::CommandLine));
    type_text(&mut app, "4");
    press(&mut app, KeyCode::Enter);
    assert!(!app.actions().is_input_mode());
    assert_eq!(app.folder().focus_index(), Some(4));

    app.handle_token(":");
    type_text(&mut app, "42");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.folder().focus_index(), Some(4));
    let status = app.status().ok_or("expected an error")?;
    assert_eq!(status.severity(), Severity::Error);

    app.handle_token(":");
    type_text(&mut app, "q");
    assert_eq!(press(&mut app, KeyCode::Enter), KeypressResult::Quit);
    Ok(())
}

#[test]
fn escape_closes_the_command_line() -> TestResult {
    let dir = ten_files()?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    app.handle_token(":");
    type_text(&mut app, "3");
    press(&mut app, KeyCode::Esc);
    assert!(!app.actions().is_input_mode());
    assert_eq!(app.folder().focus_index(), Some(0));

    // prompt keys never reach the resolver
    app.handle_token(":");
    type_text(&mut app, "G");
    assert_eq!(app.folder().focus_index(), Some(0));
    assert_eq!(app.actions().input_buffer(), "G");
    Ok(())
}

#[test]
fn q_quits() -> TestResult {
    let dir = ten_files()?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    assert_eq!(app.handle_token("q"), KeypressResult::Quit);
    Ok(())
}

#[test]
fn move_prompt_renames_within_the_folder() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.txt"), "a")?;
    fs::write(dir.path().join("m.txt"), "m")?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    app.handle_token("m");
    assert_eq!(app.actions().input_mode(), Some(InputMode::Move));
    let prefilled = dir.path().join("a.txt");
    assert_eq!(app.actions().input_buffer(), prefilled.to_string_lossy());

    clear_input(&mut app);
    type_text(&mut app, "z.txt");
    press(&mut app, KeyCode::Enter);

    assert!(!dir.path().join("a.txt").exists());
    assert_eq!(fs::read_to_string(dir.path().join("z.txt"))?, "a");
    assert_eq!(names(&app), ["m.txt", "z.txt"]);
    assert_eq!(focused_name(&app).as_deref(), Some("z.txt"));
    Ok(())
}

#[test]
fn move_prompt_creates_parents_and_refuses_overwrites() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.txt"), "a")?;
    fs::write(dir.path().join("b.txt"), "b")?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    app.handle_token("m");
    clear_input(&mut app);
    type_text(&mut app, "b.txt");
    press(&mut app, KeyCode::Enter);
    assert_eq!(fs::read_to_string(dir.path().join("b.txt"))?, "b");
    let status = app.status().ok_or("expected an error")?;
    assert!(status.text().contains("File exists"), "{}", status.text());

    app.handle_token("m");
    clear_input(&mut app);
    type_text(&mut app, "nested/deeper/a.txt");
    press(&mut app, KeyCode::Enter);
    assert!(dir.path().join("nested/deeper/a.txt").exists());
    assert_eq!(names(&app), ["nested", "b.txt"]);
    Ok(())
}

#[test]
fn escape_aborts_a_move() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.txt"), "a")?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    app.handle_token("m");
    type_text(&mut app, ".bak");
    press(&mut app, KeyCode::Esc);

    assert!(app.actions().move_source().is_none());
    assert_eq!(names(&app), ["a.txt"]);
    Ok(())
}

#[test]
fn descend_and_ascend_restore_focus() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("a"))?;
    let b = dir.path().join("b");
    fs::create_dir(&b)?;
    for name in ["x", "y", "z"] {
        fs::write(b.join(name), "")?;
    }
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    app.handle_token("j");
    app.handle_token("l");
    assert_eq!(app.folder().path(), b.as_path());
    assert_eq!(focused_name(&app).as_deref(), Some("x"));
    app.handle_token("j");

    app.handle_token("h");
    assert_eq!(app.folder().path(), dir.path());
    assert_eq!(focused_name(&app).as_deref(), Some("b"));

    app.handle_token("<enter>");
    assert_eq!(app.folder().path(), b.as_path());
    assert_eq!(focused_name(&app).as_deref(), Some("y"));
    assert_eq!(app.preview().target(), Some(b.join("y").as_path()));
    Ok(())
}

#[test]
fn empty_folders_have_no_item_commands() -> TestResult {
    let dir = tempdir()?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let (mut app, _bin) = app_with_bin(&config, &registry, dir.path())?;

    assert!(app.folder().focused().is_none());
    assert_eq!(app.handle_token("l"), KeypressResult::Continue);
    assert_eq!(app.handle_token("m"), KeypressResult::Continue);
    app.handle_token("d");
    app.handle_token("d");
    assert!(app.status().is_none());
    assert!(app.preview().target().is_none());
    Ok(())
}

#[test]
fn refresh_picks_up_external_changes() -> TestResult {
    let dir = tempdir()?;
    fs::write(dir.path().join("b.txt"), "")?;
    fs::write(dir.path().join("d.txt"), "")?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, dir.path());

    app.handle_token("j");
    fs::write(dir.path().join("a.txt"), "")?;
    fs::write(dir.path().join("c.txt"), "")?;
    app.handle_token("r");

    assert_eq!(names(&app), ["a.txt", "b.txt", "c.txt", "d.txt"]);
    assert_eq!(focused_name(&app).as_deref(), Some("d.txt"));

    app.handle_token("r");
    assert_eq!(names(&app), ["a.txt", "b.txt", "c.txt", "d.txt"]);
    assert_eq!(focused_name(&app).as_deref(), Some("d.txt"));
    Ok(())
}

#[test]
fn a_vanished_folder_becomes_an_empty_listing() -> TestResult {
    let root = tempdir()?;
    let dir = root.path().join("doomed");
    fs::create_dir(&dir)?;
    fs::write(dir.join("a.txt"), "")?;
    let config = quiet_config(1000)?;
    let registry = CommandRegistry::default();
    let mut app = AppState::from_dir(&config, &registry, &dir);

    fs::remove_dir_all(&dir)?;
    app.handle_token("r");

    assert!(app.folder().entries().is_empty());
    assert!(app.folder().focused().is_none());
    let status = app.status().ok_or("expected a scan error")?;
    assert_eq!(status.severity(), Severity::Error);
    Ok(())
}
