//! Directory scanning for bfm.
//!
//! Provides the [DirectoryEntry] snapshot used by the listing, the preview and the mutator.
//! A snapshot is immutable: rescanning produces new snapshots which the
//! [EntryList](crate::core::EntryList) swaps in place.

use crate::core::error::{BfmError, Result};

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Classification used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Unknown,
}

/// A metadata snapshot of one filesystem object.
///
/// Identity is the absolute `path`. Two snapshots with the same path are the same logical
/// entry even when the rest of the metadata differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    path: PathBuf,
    lower_name: Box<str>,
    flags: u8,
    size: u64,
    mode: u32,
    nlink: u64,
    uid: u32,
    gid: u32,
    mtime: Option<SystemTime>,
    symlink: Option<PathBuf>,
}

impl DirectoryEntry {
    // Flag bit definitions
    pub(crate) const IS_DIR: u8 = 1 << 0;
    pub(crate) const IS_SYMLINK: u8 = 1 << 1;
    pub(crate) const IS_BROKEN_SYM: u8 = 1 << 2;
    pub(crate) const IS_FILE: u8 = 1 << 3;

    /// Builds a snapshot from `lstat` of `path`.
    ///
    /// Symlinks are classified as symlinks. [is_dir](Self::is_dir) follows them so a link
    /// to a directory can be descended into, while ordering and the preview choice use
    /// [is_real_dir](Self::is_real_dir).
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let md = fs::symlink_metadata(path)?;
        let ft = md.file_type();

        let mut flags = 0u8;
        if ft.is_symlink() {
            flags |= Self::IS_SYMLINK;
            match fs::metadata(path) {
                Ok(target) if target.is_dir() => flags |= Self::IS_DIR,
                Ok(_) => {}
                Err(_) => flags |= Self::IS_BROKEN_SYM,
            }
        } else if ft.is_dir() {
            flags |= Self::IS_DIR;
        } else if ft.is_file() {
            flags |= Self::IS_FILE;
        }

        let symlink = if ft.is_symlink() {
            fs::read_link(path).ok()
        } else {
            None
        };

        let name = path.file_name().unwrap_or(path.as_os_str());

        Ok(Self {
            path: path.to_path_buf(),
            lower_name: name.to_string_lossy().to_lowercase().into_boxed_str(),
            flags,
            size: md.len(),
            mode: md.mode(),
            nlink: md.nlink(),
            uid: md.uid(),
            gid: md.gid(),
            mtime: md.modified().ok(),
            symlink,
        })
    }

    // Accessors

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn name(&self) -> &OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }

    #[inline]
    pub fn lowercase_name(&self) -> &str {
        &self.lower_name
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.flags & Self::IS_DIR != 0
    }

    /// A directory itself, not a link to one.
    #[inline]
    pub fn is_real_dir(&self) -> bool {
        self.is_dir() && !self.is_symlink()
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.flags & Self::IS_SYMLINK != 0
    }

    #[inline]
    pub fn is_broken_sym(&self) -> bool {
        self.flags & Self::IS_BROKEN_SYM != 0
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn mode(&self) -> u32 {
        self.mode
    }

    #[inline]
    pub fn nlink(&self) -> u64 {
        self.nlink
    }

    #[inline]
    pub fn uid(&self) -> u32 {
        self.uid
    }

    #[inline]
    pub fn gid(&self) -> u32 {
        self.gid
    }

    #[inline]
    pub fn mtime(&self) -> Option<SystemTime> {
        self.mtime
    }

    #[inline]
    pub fn symlink_target(&self) -> Option<&Path> {
        self.symlink.as_deref()
    }

    pub fn kind(&self) -> EntryKind {
        if self.is_symlink() {
            EntryKind::Symlink
        } else if self.is_dir() {
            EntryKind::Directory
        } else if self.flags & Self::IS_FILE != 0 {
            EntryKind::File
        } else {
            EntryKind::Unknown
        }
    }

    /// Listing order: directories first, then case-insensitive name. Links to
    /// directories sort with the files. The raw name breaks ties so the order is total.
    pub fn listing_cmp(&self, other: &Self) -> Ordering {
        (!self.is_real_dir())
            .cmp(&!other.is_real_dir())
            .then_with(|| self.lower_name.cmp(&other.lower_name))
            .then_with(|| self.name().cmp(other.name()))
    }
}

/// Reads the contents of `path` and returns one snapshot per child.
///
/// The result is unsorted. Children that vanish while the scan runs are skipped.
pub fn scan_dir(path: &Path) -> Result<Vec<DirectoryEntry>> {
    let read = fs::read_dir(path).map_err(|source| BfmError::Scan {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::with_capacity(64);
    for entry in read {
        let Ok(entry) = entry else { continue };
        match DirectoryEntry::from_path(&entry.path()) {
            Ok(e) => entries.push(e),
            Err(err) => tracing::debug!(path = %entry.path().display(), %err, "skipping entry"),
        }
    }
    Ok(entries)
}
