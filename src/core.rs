//! Core runtime logic for bfm.
//!
//! This module contains the non-UI "engine" pieces used by the application:
//! - [fm]: directory scanning and the [DirectoryEntry] snapshot.
//! - [listing]: the sorted, reconcilable [EntryList].
//! - [formatter]: mode strings, sizes, times and owner names for display.
//! - [proc]: process groups for previews and interactive commands.
//! - [mutator]: delete to trash and move.
//! - [terminal]: terminal setup/teardown and the main crossterm/ratatui event loop.
//! - [error]: the [BfmError] type.

pub mod error;
pub mod fm;
pub mod formatter;
pub mod listing;
pub mod mutator;
pub mod proc;
pub mod terminal;

pub use error::{BfmError, Result};
pub use fm::{DirectoryEntry, EntryKind, scan_dir};
pub use listing::{EntryList, ReconcileStats};
pub use mutator::{ItemMutator, SystemTrash, Trash};
