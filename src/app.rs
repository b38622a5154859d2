//! Application layer for bfm.
//!
//! - [keymap]: key tokens, commands and the per-widget command tables.
//! - [resolver]: turns key tokens into commands, including multi-key sequences.
//! - [folder]: the listing with its focus and per-directory focus memory.
//! - [preview]: the streaming preview process.
//! - [actions]: prompt state for the command line and the move popup.
//! - [state] and [handlers]: [AppState], which ties everything together.

pub mod actions;
pub mod folder;
pub mod handlers;
pub mod keymap;
pub mod preview;
pub mod resolver;
pub mod state;

pub use actions::{ActionContext, ActionMode, InputMode};
pub use folder::{FolderController, FolderEvent, Refocus};
pub use keymap::{Action, Command, CommandRegistry, CommandTable, Motion, WidgetClass};
pub use preview::PreviewManager;
pub use resolver::{KeySequenceResolver, Resolution};
pub use state::{AppState, KeypressResult, Severity, Status};
