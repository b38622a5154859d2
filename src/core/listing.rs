//! Sorted, reconcilable directory listing.
//!
//! [EntryList] keeps its entries in listing order (see [DirectoryEntry::listing_cmp]) at all
//! times. A rescan is merged with [EntryList::reconcile] instead of replacing the list, so
//! entries that survive a refresh keep their relative position.

use crate::core::fm::DirectoryEntry;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EntryList {
    entries: Vec<DirectoryEntry>,
}

/// What a reconcile pass changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub updated: usize,
    pub removed: usize,
    pub inserted: usize,
}

impl ReconcileStats {
    pub fn is_noop(&self) -> bool {
        self.removed == 0 && self.inserted == 0
    }
}

impl EntryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from an unsorted scan.
    pub fn from_scan(mut scanned: Vec<DirectoryEntry>) -> Self {
        scanned.sort_by(DirectoryEntry::listing_cmp);
        Self { entries: scanned }
    }

    #[inline]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&DirectoryEntry> {
        self.entries.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DirectoryEntry> {
        self.entries.iter()
    }

    pub fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.path() == path)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Inserts `entry` at its sorted position and returns the index.
    pub fn insert_sorted(&mut self, entry: DirectoryEntry) -> usize {
        let idx = self
            .entries
            .partition_point(|e| e.listing_cmp(&entry) == Ordering::Less);
        self.entries.insert(idx, entry);
        idx
    }

    /// Merges a fresh scan of the same directory into the list.
    ///
    /// 1. Entries still present get their snapshot replaced in the same slot.
    /// 2. Entries missing from the scan are dropped.
    /// 3. New paths are inserted at their sorted position.
    ///
    /// An entry whose directory-ness flipped (file replaced by a directory of the same name)
    /// no longer fits its slot and is re-inserted instead.
    pub fn reconcile(&mut self, scanned: Vec<DirectoryEntry>) -> ReconcileStats {
        let mut fresh: HashMap<PathBuf, DirectoryEntry> = scanned
            .into_iter()
            .map(|e| (e.path().to_path_buf(), e))
            .collect();

        let mut stats = ReconcileStats::default();
        let mut displaced = Vec::new();

        self.entries.retain_mut(|slot| match fresh.remove(slot.path()) {
            Some(snapshot) if snapshot.is_real_dir() == slot.is_real_dir() => {
                *slot = snapshot;
                stats.updated += 1;
                true
            }
            Some(snapshot) => {
                displaced.push(snapshot);
                stats.updated += 1;
                false
            }
            None => {
                stats.removed += 1;
                false
            }
        });

        let mut added: Vec<DirectoryEntry> = fresh.into_values().collect();
        stats.inserted = added.len();
        added.extend(displaced);
        // HashMap order is random, sort so equal inputs give equal lists.
        added.sort_by(DirectoryEntry::listing_cmp);
        for entry in added {
            self.insert_sorted(entry);
        }
        stats
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a DirectoryEntry;
    type IntoIter = std::slice::Iter<'a, DirectoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
