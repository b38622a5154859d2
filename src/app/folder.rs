//! Folder listing and navigation.
//!
//! [FolderController] owns the current path, its [EntryList] and the focus. It remembers per
//! directory which child was focused last, so coming back to a directory restores the cursor.
//! Changes are reported as [FolderEvent]s which the application drains after every command.

use crate::app::keymap::Motion;
use crate::core::{BfmError, DirectoryEntry, EntryList, ReconcileStats, Result, scan_dir};

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::mem;
use std::path::{Path, PathBuf};

/// Where the focus goes after a rescan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refocus {
    /// Stay on the focused entry. If it vanished, stay on the same row.
    Keep,
    /// Use the focus remembered for the current path.
    Restore,
    /// Focus this path.
    Target(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderEvent {
    PathChanged { old: PathBuf, new: PathBuf },
    /// The focused entry after a motion or refresh, `None` for an empty listing.
    FocusChanged(Option<PathBuf>),
}

#[derive(Debug)]
pub struct FolderController {
    path: PathBuf,
    entries: EntryList,
    focus: Option<usize>,
    focus_memory: HashMap<PathBuf, PathBuf>,
    events: Vec<FolderEvent>,
}

impl FolderController {
    /// A controller for `path`. Nothing is scanned until the first refresh.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: EntryList::new(),
            focus: None,
            focus_memory: HashMap::new(),
            events: Vec::new(),
        }
    }

    // Accessors

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn entries(&self) -> &EntryList {
        &self.entries
    }

    #[inline]
    pub fn focus_index(&self) -> Option<usize> {
        self.focus
    }

    pub fn focused(&self) -> Option<&DirectoryEntry> {
        self.focus.and_then(|idx| self.entries.get(idx))
    }

    pub fn focused_path(&self) -> Option<&Path> {
        self.focused().map(DirectoryEntry::path)
    }

    /// The child last focused in `dir`, if any.
    pub fn remembered_focus(&self, dir: &Path) -> Option<&Path> {
        self.focus_memory.get(dir).map(PathBuf::as_path)
    }

    /// Takes the events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<FolderEvent> {
        mem::take(&mut self.events)
    }

    // Navigation

    /// Switches to `new_path` and rescans it, restoring the remembered focus.
    ///
    /// The path changes even if the scan fails; the listing is then empty.
    pub fn change_path(&mut self, new_path: PathBuf) -> Result<ReconcileStats> {
        let old = mem::replace(&mut self.path, new_path);
        self.entries.clear();
        self.focus = None;
        tracing::debug!(old = %old.display(), new = %self.path.display(), "change path");
        self.events.push(FolderEvent::PathChanged {
            old,
            new: self.path.clone(),
        });
        self.refresh(Refocus::Restore)
    }

    /// Moves to the parent directory with the cursor on the directory just left.
    ///
    /// Returns the name of the directory left, or `None` at the filesystem root.
    pub fn ascend(&mut self) -> Result<Option<OsString>> {
        let Some(parent) = self.path.parent().map(Path::to_path_buf) else {
            return Ok(None);
        };
        let left = self.path.file_name().map(OsString::from);
        self.focus_memory.insert(parent.clone(), self.path.clone());
        self.change_path(parent)?;
        Ok(left)
    }

    pub fn descend(&mut self, child: &OsStr) -> Result<ReconcileStats> {
        let target = self.path.join(child);
        self.change_path(target)
    }

    /// Rescans the current path and merges the result into the listing.
    ///
    /// A failed scan empties the listing and drops the focus before returning the error.
    pub fn refresh(&mut self, refocus: Refocus) -> Result<ReconcileStats> {
        let previous = self.focused_path().map(Path::to_path_buf);
        let previous_idx = self.focus;

        let scanned = match scan_dir(&self.path) {
            Ok(scanned) => scanned,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "scan failed");
                self.entries.clear();
                self.apply_focus(None);
                return Err(err);
            }
        };
        let stats = self.entries.reconcile(scanned);

        let found = match &refocus {
            Refocus::Keep => previous
                .and_then(|p| self.entries.position(&p))
                .or_else(|| previous_idx.map(|idx| idx.min(self.entries.len().saturating_sub(1)))),
            Refocus::Restore => self
                .remembered_focus(&self.path)
                .and_then(|p| self.entries.position(p)),
            Refocus::Target(path) => self.entries.position(path),
        };
        let focus = if self.entries.is_empty() {
            None
        } else {
            Some(found.unwrap_or(0))
        };
        self.apply_focus(focus);
        Ok(stats)
    }

    /// Moves the focus. Motions stop at the ends of the list.
    ///
    /// Returns true if the focus moved.
    pub fn apply_motion(&mut self, motion: Motion) -> bool {
        let len = self.entries.len();
        if len == 0 {
            return false;
        }
        let current = self.focus.unwrap_or(0);
        let next = match motion {
            Motion::Up => current.saturating_sub(1),
            Motion::Down => (current + 1).min(len - 1),
            Motion::Top => 0,
            Motion::Bottom => len - 1,
        };
        if self.focus == Some(next) {
            return false;
        }
        self.apply_focus(Some(next));
        true
    }

    /// Focuses the entry at `line`.
    pub fn set_focus(&mut self, line: usize) -> Result<()> {
        let len = self.entries.len();
        if line >= len {
            return Err(BfmError::LineOutOfRange { line, len });
        }
        if self.focus != Some(line) {
            self.apply_focus(Some(line));
        }
        Ok(())
    }

    fn apply_focus(&mut self, focus: Option<usize>) {
        self.focus = focus;
        let focused = self.focused_path().map(Path::to_path_buf);
        if let Some(child) = &focused {
            self.focus_memory.insert(self.path.clone(), child.clone());
        }
        self.events.push(FolderEvent::FocusChanged(focused));
    }
}
