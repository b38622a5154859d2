//! Prompt state for bfm.
//!
//! Contains the [ActionContext] struct, which tracks whether a prompt is open, its input
//! buffer and cursor, and the entry a move prompt was opened for.

use crate::core::DirectoryEntry;

/// Describes the current mode for action handling/input.
///
/// Variants:
/// * `Normal` - Default browsing mode, keys go to the sequence resolver.
/// * `Input` - A prompt of the given [InputMode] is open and takes every key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionMode {
    Normal,
    Input { mode: InputMode, prompt: String },
}

/// The prompts bfm can open.
///
/// * `CommandLine` - the `:` line in the header.
/// * `Move` - the "Move to" popup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    CommandLine,
    Move,
}

#[derive(Debug)]
pub struct ActionContext {
    mode: ActionMode,
    input_buffer: String,
    input_cursor_pos: usize,
    move_source: Option<DirectoryEntry>,
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            mode: ActionMode::Normal,
            input_buffer: String::new(),
            input_cursor_pos: 0,
            move_source: None,
        }
    }
}

impl ActionContext {
    // Getters / accessors

    pub fn mode(&self) -> &ActionMode {
        &self.mode
    }

    pub fn input_mode(&self) -> Option<InputMode> {
        match &self.mode {
            ActionMode::Input { mode, .. } => Some(*mode),
            ActionMode::Normal => None,
        }
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, ActionMode::Input { .. })
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    /// Byte offset of the cursor in the input buffer.
    pub fn input_cursor_pos(&self) -> usize {
        self.input_cursor_pos
    }

    pub fn move_source(&self) -> Option<&DirectoryEntry> {
        self.move_source.as_ref()
    }

    // Mode changes

    /// Opens a prompt pre-filled with `initial`, cursor at the end.
    pub fn enter_mode(&mut self, mode: InputMode, prompt: &str, initial: &str) {
        self.mode = ActionMode::Input {
            mode,
            prompt: prompt.to_string(),
        };
        self.input_buffer = initial.to_string();
        self.input_cursor_pos = self.input_buffer.len();
    }

    /// Opens the move prompt for `entry`, pre-filled with its path.
    pub fn enter_move(&mut self, entry: DirectoryEntry) {
        let initial = entry.path().to_string_lossy().into_owned();
        self.enter_mode(InputMode::Move, "Move to", &initial);
        self.move_source = Some(entry);
    }

    pub fn exit_mode(&mut self) {
        self.mode = ActionMode::Normal;
        self.input_buffer.clear();
        self.input_cursor_pos = 0;
        self.move_source = None;
    }

    /// Closes the prompt and hands back what was typed and the move source, if any.
    pub fn submit(&mut self) -> (String, Option<DirectoryEntry>) {
        let input = std::mem::take(&mut self.input_buffer);
        let source = self.move_source.take();
        self.exit_mode();
        (input, source)
    }

    // Cursor actions

    /// Moves the input cursor one character to the left, if possible.
    pub fn action_move_cursor_left(&mut self) {
        if let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_cursor_pos = previous;
        }
    }

    /// Moves the input cursor one character to the right, if possible.
    pub fn action_move_cursor_right(&mut self) {
        if let Some(ch) = self.input_buffer[self.input_cursor_pos..].chars().next() {
            self.input_cursor_pos += ch.len_utf8();
        }
    }

    /// Inserts a character at the current cursor position in the input buffer.
    pub fn action_insert_at_cursor(&mut self, ch: char) {
        self.input_buffer.insert(self.input_cursor_pos, ch);
        self.input_cursor_pos += ch.len_utf8();
    }

    /// Deletes the character before the cursor and moves the cursor back.
    pub fn action_backspace_at_cursor(&mut self) {
        if let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_buffer.remove(previous);
            self.input_cursor_pos = previous;
        }
    }

    /// Deletes the character under the cursor.
    pub fn action_delete_at_cursor(&mut self) {
        if self.input_cursor_pos < self.input_buffer.len() {
            self.input_buffer.remove(self.input_cursor_pos);
        }
    }

    pub fn action_cursor_home(&mut self) {
        self.input_cursor_pos = 0;
    }

    pub fn action_cursor_end(&mut self) {
        self.input_cursor_pos = self.input_buffer.len();
    }
}
