//! Key tokens and per-widget command tables for bfm.
//!
//! Key presses are turned into string tokens ([key_token]) which are concatenated into
//! sequences such as `gg` or `dd`. Each widget class owns a [CommandTable] mapping
//! canonical sequences to a [Command], plus aliases from other sequences
//! (`<down>` → `j`). The [CommandRegistry] holds every table and is built once at startup.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::{HashMap, HashSet};

/// Cursor operations handled by the listing itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Motion {
    Up,
    Down,
    Top,
    Bottom,
}

/// Operations that act on the focused entry, the folder or the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Select,
    Move,
    Ascend,
    Delete,
    Refresh,
    CommandLine,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Motion(Motion),
    Action(Action),
}

/// Widget classes that own a command table, innermost first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WidgetClass {
    Item,
    Folder,
    Root,
}

/// Escapes a key name into its token.
///
/// A single character is its own token (`<` and `>` get a backslash), anything longer is
/// a named key and gets wrapped: `enter` → `<enter>`.
pub fn escape_name(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => escape_char(c),
        _ => format!("<{name}>"),
    }
}

fn escape_char(c: char) -> String {
    match c {
        '<' | '>' => format!("\\{c}"),
        c => c.to_string(),
    }
}

/// Token for a crossterm key event, or `None` for keys bfm never binds.
///
/// Shifted letters arrive as their uppercase char, so `G` is just `G`.
pub fn key_token(key: &KeyEvent) -> Option<String> {
    let name = match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(format!("<c-{}>", c.to_ascii_lowercase()));
        }
        KeyCode::Char(c) => return Some(escape_char(c)),
        KeyCode::Enter => "enter",
        KeyCode::Esc => "esc",
        KeyCode::Backspace => "backspace",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Tab => "tab",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Delete => "delete",
        KeyCode::Insert => "insert",
        KeyCode::F(n) => return Some(format!("<f{n}>")),
        _ => return None,
    };
    Some(escape_name(name))
}

/// Sequence → command bindings of one widget class.
#[derive(Debug, Default, Clone)]
pub struct CommandTable {
    bindings: HashMap<String, Command>,
    aliases: HashMap<String, String>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, keys: &str, command: Command) -> Self {
        self.bindings.insert(keys.to_string(), command);
        self
    }

    /// Makes `from` resolve like `to` in this table.
    pub fn alias(mut self, from: &str, to: &str) -> Self {
        self.aliases.insert(from.to_string(), to.to_string());
        self
    }

    /// Applies this table's aliases to `sequence`.
    pub fn canonical<'a>(&'a self, sequence: &'a str) -> &'a str {
        self.aliases.get(sequence).map_or(sequence, String::as_str)
    }

    pub fn lookup(&self, sequence: &str) -> Option<Command> {
        self.bindings.get(self.canonical(sequence)).copied()
    }

    /// Every sequence this table reacts to, bound keys and aliases alike.
    pub fn sequences(&self) -> impl Iterator<Item = &str> {
        self.bindings
            .keys()
            .chain(self.aliases.keys())
            .map(String::as_str)
    }
}

/// All command tables of the application.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    item: CommandTable,
    folder: CommandTable,
    root: CommandTable,
    known: HashSet<String>,
}

impl Default for CommandRegistry {
    #[rustfmt::skip]
    fn default() -> Self {
        use Action as A;
        use Command::{Action as Act, Motion as Mot};

        let item = CommandTable::new()
            .bind("l",  Act(A::Select))
            .bind("m",  Act(A::Move))
            .alias("<enter>", "l")
            .alias("<right>", "l");

        let folder = CommandTable::new()
            .bind("j",  Mot(Motion::Down))
            .bind("k",  Mot(Motion::Up))
            .bind("gg", Mot(Motion::Top))
            .bind("G",  Mot(Motion::Bottom))
            .bind("h",  Act(A::Ascend))
            .bind("dd", Act(A::Delete))
            .bind("r",  Act(A::Refresh))
            .alias("<down>", "j")
            .alias("<up>", "k")
            .alias("<left>", "h")
            .alias("<backspace>", "h");

        let root = CommandTable::new()
            .bind(":",  Act(A::CommandLine))
            .bind("q",  Act(A::Quit));

        Self::new(item, folder, root)
    }
}

impl CommandRegistry {
    pub fn new(item: CommandTable, folder: CommandTable, root: CommandTable) -> Self {
        let known = [&item, &folder, &root]
            .into_iter()
            .flat_map(CommandTable::sequences)
            .map(str::to_string)
            .collect();
        Self {
            item,
            folder,
            root,
            known,
        }
    }

    pub fn table(&self, class: WidgetClass) -> &CommandTable {
        match class {
            WidgetClass::Item => &self.item,
            WidgetClass::Folder => &self.folder,
            WidgetClass::Root => &self.root,
        }
    }

    /// True if some sequence in any table is strictly longer than `candidate` and starts
    /// with it.
    pub fn is_strict_prefix(&self, candidate: &str) -> bool {
        !candidate.is_empty()
            && self
                .known
                .iter()
                .any(|k| k.len() > candidate.len() && k.starts_with(candidate))
    }
}
