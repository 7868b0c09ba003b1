//! Staging index
//!
//! The index records how the next commit will differ from HEAD's tree. It
//! holds two disjoint sets of pending entries, each keyed by path and carrying
//! the file content at staging time:
//!
//! - `additions`: files whose working copy differs from HEAD or is new
//! - `removals`: tracked files marked for deletion
//!
//! ## On-disk layout
//!
//! Every pending entry is an individually named file holding the staged bytes:
//!
//! ```text
//! staging/add/<path>
//! staging/remove/<path>
//! ```

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::CommitTree;
use crate::errors::Error;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const ADDITIONS_DIR: &str = "add";
const REMOVALS_DIR: &str = "remove";

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the staging directory (typically `.gitlet/staging`)
    path: Box<Path>,
    additions: BTreeMap<PathBuf, Bytes>,
    removals: BTreeMap<PathBuf, Bytes>,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn additions_path(&self) -> PathBuf {
        self.path.join(ADDITIONS_DIR)
    }

    pub fn removals_path(&self) -> PathBuf {
        self.path.join(REMOVALS_DIR)
    }

    /// Load both pending sets from disk, discarding in-memory state.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions = Self::read_entries(&self.additions_path())?;
        self.removals = Self::read_entries(&self.removals_path())?;
        self.changed = false;

        Ok(())
    }

    fn read_entries(dir: &Path) -> anyhow::Result<BTreeMap<PathBuf, Bytes>> {
        let mut entries = BTreeMap::new();
        if !dir.exists() {
            return Ok(entries);
        }

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.with_context(|| format!("failed to scan {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let content = std::fs::read(entry.path())
                .with_context(|| format!("failed to read staged entry {:?}", entry.path()))?;
            let relative_path = entry.path().strip_prefix(dir)?.to_path_buf();
            entries.insert(relative_path, Bytes::from(content));
        }

        Ok(entries)
    }

    /// Stage the working copy of `path` for the next commit.
    ///
    /// A pending removal of the path is dropped. Content identical to what HEAD
    /// already tracks un-stages the path instead of staging it.
    pub fn stage_add(&mut self, path: &Path, content: Bytes, head_tree: &CommitTree) {
        self.removals.remove(path);

        let blob_oid = Blob::id_for(path, &content);
        if head_tree.get(path) == Some(&blob_oid) {
            self.additions.remove(path);
        } else {
            self.additions.insert(path.to_path_buf(), content);
        }

        self.changed = true;
    }

    /// Mark `path` for removal.
    ///
    /// `tracked_content` is HEAD's content for the path, if HEAD tracks it.
    /// Fails with `NothingToRemove` when the path is neither staged for addition
    /// nor tracked. Deleting the working copy is left to the caller.
    pub fn stage_remove(
        &mut self,
        path: &Path,
        tracked_content: Option<Bytes>,
    ) -> anyhow::Result<()> {
        let staged = self.additions.contains_key(path);
        if !staged && tracked_content.is_none() {
            return Err(Error::NothingToRemove(path.to_path_buf()).into());
        }

        self.additions.remove(path);
        if let Some(content) = tracked_content {
            self.removals.insert(path.to_path_buf(), content);
        }

        self.changed = true;
        Ok(())
    }

    pub fn is_staged_for_addition(&self, path: &Path) -> bool {
        self.additions.contains_key(path)
    }

    pub fn is_staged_for_removal(&self, path: &Path) -> bool {
        self.removals.contains_key(path)
    }

    pub fn addition(&self, path: &Path) -> Option<&Bytes> {
        self.additions.get(path)
    }

    pub fn additions(&self) -> impl Iterator<Item = (&PathBuf, &Bytes)> {
        self.additions.iter()
    }

    pub fn removals(&self) -> impl Iterator<Item = (&PathBuf, &Bytes)> {
        self.removals.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Drop every pending entry in both sets.
    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
        self.changed = true;
    }

    /// Tree HEAD would have after committing the pending entries.
    ///
    /// Blob ids are computed but nothing is written to the object store.
    pub fn apply_to(&self, head_tree: &CommitTree) -> CommitTree {
        let mut tree = head_tree.clone();
        for (path, content) in &self.additions {
            tree.insert(path.clone(), Blob::id_for(path, content));
        }
        for path in self.removals.keys() {
            tree.remove(path);
        }

        tree
    }

    /// Persist both sets, replacing whatever is on disk.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        Self::write_entries(&self.additions_path(), &self.additions)?;
        Self::write_entries(&self.removals_path(), &self.removals)?;
        self.changed = false;

        Ok(())
    }

    fn write_entries(dir: &Path, entries: &BTreeMap<PathBuf, Bytes>) -> anyhow::Result<()> {
        if dir.exists() {
            std::fs::remove_dir_all(dir)
                .with_context(|| format!("failed to reset staging directory {:?}", dir))?;
        }
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create staging directory {:?}", dir))?;

        for (path, content) in entries {
            let entry_path = dir.join(path);
            if let Some(parent) = entry_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&entry_path, content)
                .with_context(|| format!("failed to write staged entry {:?}", entry_path))?;
        }

        Ok(())
    }
}
