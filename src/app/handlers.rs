//! Command and prompt handlers for bfm.
//!
//! This module implements the [AppState] methods that run resolved commands, the `:`
//! command line and the move prompt.

use crate::app::actions::InputMode;
use crate::app::folder::Refocus;
use crate::app::keymap::{Action, Command};
use crate::app::state::{AppState, KeypressResult};
use crate::core::DirectoryEntry;
use crate::utils::{expand_template, run_suspended};

use crossterm::event::{KeyCode::*, KeyEvent, KeyModifiers};

impl<'a> AppState<'a> {
    /// Runs a resolved command. Every command goes through here.
    pub fn dispatch(&mut self, command: Command) -> KeypressResult {
        let result = match command {
            Command::Motion(motion) => {
                self.folder.apply_motion(motion);
                KeypressResult::Consumed
            }
            Command::Action(action) => self.handle_action(action),
        };
        self.sync_folder_events();
        result
    }

    fn handle_action(&mut self, action: Action) -> KeypressResult {
        match action {
            Action::Select => return self.select_focused(),
            Action::Move => self.prompt_move(),
            Action::Ascend => {
                if let Err(err) = self.folder.ascend() {
                    self.set_status_error(err);
                }
            }
            Action::Delete => self.delete_focused(),
            Action::Refresh => self.refresh(Refocus::Keep),
            Action::CommandLine => self.actions.enter_mode(InputMode::CommandLine, ":", ""),
            Action::Quit => return KeypressResult::Quit,
        }
        KeypressResult::Consumed
    }

    /// Handles key events while a prompt is open.
    /// Returns a [KeypressResult] indicating how the key event was handled.
    pub(super) fn handle_input_mode(&mut self, key: KeyEvent) -> KeypressResult {
        let Some(mode) = self.actions.input_mode() else {
            return KeypressResult::Continue;
        };

        match key.code {
            Enter => {
                let (input, source) = self.actions.submit();
                let result = match mode {
                    InputMode::CommandLine => self.execute_command_line(&input),
                    InputMode::Move => {
                        if let Some(entry) = source {
                            self.move_entry(&entry, &input);
                        }
                        KeypressResult::Consumed
                    }
                };
                self.sync_folder_events();
                result
            }
            Esc => {
                self.actions.exit_mode();
                KeypressResult::Consumed
            }
            Left => {
                self.actions.action_move_cursor_left();
                KeypressResult::Consumed
            }
            Right => {
                self.actions.action_move_cursor_right();
                KeypressResult::Consumed
            }
            Home => {
                self.actions.action_cursor_home();
                KeypressResult::Consumed
            }
            End => {
                self.actions.action_cursor_end();
                KeypressResult::Consumed
            }
            Backspace => {
                self.actions.action_backspace_at_cursor();
                KeypressResult::Consumed
            }
            Delete => {
                self.actions.action_delete_at_cursor();
                KeypressResult::Consumed
            }
            Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.actions.action_insert_at_cursor(c);
                KeypressResult::Consumed
            }
            _ => KeypressResult::Consumed,
        }
    }

    /// Runs a line submitted from the `:` prompt.
    ///
    /// * `q` quits.
    /// * a number focuses that entry.
    /// * `!cmd` runs `cmd` in the current folder with the screen handed over.
    /// * anything else refreshes the listing.
    pub fn execute_command_line(&mut self, line: &str) -> KeypressResult {
        let line = line.trim();

        if line == "q" {
            return KeypressResult::Quit;
        }

        if let Ok(index) = line.parse::<usize>() {
            if let Err(err) = self.folder.set_focus(index) {
                self.set_status_error(err);
            }
            return KeypressResult::Consumed;
        }

        if let Some(command) = line.strip_prefix('!') {
            let cwd = self.folder.path().to_path_buf();
            match run_suspended(command, &cwd) {
                Ok(status) if !status.success() => {
                    self.set_status_info(format!("'{command}' exited with {status}"));
                }
                Ok(_) => {}
                Err(err) => self.set_status_error(err),
            }
            self.refresh(Refocus::Keep);
            return KeypressResult::OpenedEditor;
        }

        self.refresh(Refocus::Keep);
        KeypressResult::Consumed
    }

    /// Descends into a focused directory, or opens anything else in the editor.
    fn select_focused(&mut self) -> KeypressResult {
        let Some(entry) = self.folder.focused().cloned() else {
            return KeypressResult::Continue;
        };

        if entry.is_dir() {
            if let Err(err) = self.folder.descend(entry.name()) {
                self.set_status_error(err);
            }
            return KeypressResult::Consumed;
        }

        let command = expand_template(self.config.commands().editor(), entry.path());
        let cwd = self.folder.path().to_path_buf();
        match run_suspended(&command, &cwd) {
            Ok(status) if !status.success() => {
                self.set_status_info(format!("editor exited with {status}"));
            }
            Ok(_) => {}
            Err(err) => self.set_status_error(err),
        }
        self.refresh(Refocus::Keep);
        KeypressResult::OpenedEditor
    }

    fn prompt_move(&mut self) {
        if let Some(entry) = self.folder.focused().cloned() {
            self.actions.enter_move(entry);
        }
    }

    fn delete_focused(&mut self) {
        let Some(entry) = self.folder.focused().cloned() else {
            return;
        };
        match self.mutator.delete(&entry) {
            Ok(()) => {
                self.set_status_info(format!(
                    "moved '{}' to trash",
                    entry.name().to_string_lossy()
                ));
            }
            Err(err) => self.set_status_error(err),
        }
        self.refresh(Refocus::Keep);
    }

    fn move_entry(&mut self, entry: &DirectoryEntry, destination: &str) {
        let cwd = self.folder.path().to_path_buf();
        match self.mutator.move_to(entry, destination, &cwd) {
            Ok(dest) => {
                let refocus = if dest.parent() == Some(cwd.as_path()) {
                    Refocus::Target(dest)
                } else {
                    Refocus::Keep
                };
                self.refresh(refocus);
            }
            Err(err) if err.is_stale() => {
                self.set_status_error(err);
                self.refresh(Refocus::Keep);
            }
            Err(err) => self.set_status_error(err),
        }
    }
}
