//! Delete and move operations on a single entry.
//!
//! Both operations re-check that the entry still exists before touching it, since the
//! snapshot in the listing may be older than the filesystem. Refreshing the listing
//! afterwards is the caller's job.

use crate::core::error::{BfmError, Result};
use crate::core::fm::DirectoryEntry;

use std::fs;
use std::path::{Path, PathBuf};

/// Backend that moves a path to the trash.
pub trait Trash {
    fn trash(&self, path: &Path) -> Result<()>;
}

/// The desktop trash, through the `trash` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTrash;

impl Trash for SystemTrash {
    fn trash(&self, path: &Path) -> Result<()> {
        trash::delete(path).map_err(|e| BfmError::Trash {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

pub struct ItemMutator {
    trash: Box<dyn Trash>,
}

impl Default for ItemMutator {
    fn default() -> Self {
        Self::new(Box::new(SystemTrash))
    }
}

impl ItemMutator {
    pub fn new(trash: Box<dyn Trash>) -> Self {
        Self { trash }
    }

    /// Sends the entry to the trash.
    pub fn delete(&self, entry: &DirectoryEntry) -> Result<()> {
        let path = entry.path();
        verify_exists(path)?;
        self.trash.trash(path)?;
        tracing::info!(path = %path.display(), "moved to trash");
        Ok(())
    }

    /// Renames the entry to `destination`, resolved against `cwd` when relative.
    ///
    /// Missing parent directories of the destination are created, and removed again when
    /// the rename fails. An existing destination is refused. Returns the new absolute path.
    pub fn move_to(&self, entry: &DirectoryEntry, destination: &str, cwd: &Path) -> Result<PathBuf> {
        let src = entry.path();
        verify_exists(src)?;
        let dest = resolve_destination(destination, cwd)?;

        if fs::symlink_metadata(&dest).is_ok() {
            return Err(BfmError::AlreadyExists(dest));
        }
        let created = dest.parent().map(missing_ancestors).unwrap_or_default();
        let renamed = match dest.parent() {
            Some(parent) => fs::create_dir_all(parent).and_then(|()| fs::rename(src, &dest)),
            None => fs::rename(src, &dest),
        };
        if let Err(err) = renamed {
            remove_created(&created);
            return Err(err.into());
        }

        tracing::info!(from = %src.display(), to = %dest.display(), "moved entry");
        Ok(dest)
    }
}

/// Checks that `path` still exists. A dangling symlink counts as existing.
pub fn verify_exists(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(BfmError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Ancestors of `dir` (itself included) that do not exist yet, deepest first.
fn missing_ancestors(dir: &Path) -> Vec<PathBuf> {
    dir.ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && fs::symlink_metadata(p).is_err())
        .map(Path::to_path_buf)
        .collect()
}

/// Removes directories made for a failed move. Only empty ones go.
fn remove_created(created: &[PathBuf]) {
    for dir in created {
        if let Err(err) = fs::remove_dir(dir) {
            tracing::debug!(dir = %dir.display(), %err, "left directory in place");
        }
    }
}

/// Turns the text typed into the move prompt into an absolute path.
pub fn resolve_destination(input: &str, cwd: &Path) -> Result<PathBuf> {
    if input.trim().is_empty() {
        return Err(BfmError::EmptyDestination);
    }
    let path = Path::new(input);
    Ok(if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    })
}
