//! Working tree migration between two commit trees
//!
//! Moving HEAD from one commit to another rewrites the working tree so it holds
//! exactly the files the target tree records. Planning happens in two passes:
//!
//! 1. Validation: every physical file is checked against both trees. A file
//!    the current tree does not track but the target tree would write, or one
//!    sitting where a target file or its directory must go, is a conflict.
//!    Any conflict aborts the plan before a single action is recorded.
//! 2. Planning: each path is assigned an action (add, delete, modify).
//!
//! Files untracked by both trees are never touched. The plan itself is pure;
//! `Workspace::apply_migration` carries it out.

use crate::artifacts::objects::commit::CommitTree;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Error;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Type of file system action required for migration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Rewrite existing file
    Modify,
}

/// Planned actions grouped by type; deletions carry no blob
pub type ActionsSet = HashMap<ActionType, Vec<(PathBuf, Option<ObjectId>)>>;

#[derive(Debug, Default)]
pub struct Migration {
    actions: ActionsSet,
}

impl Migration {
    /// Plan the migration of `workspace_files` from `current` to `target`.
    ///
    /// Fails with `UntrackedFileConflict`, listing every offending path, when
    /// carrying out the plan would overwrite or remove an untracked file.
    pub fn plan(
        current: &CommitTree,
        target: &CommitTree,
        workspace_files: &BTreeSet<PathBuf>,
    ) -> anyhow::Result<Self> {
        let conflicts = Self::find_conflicts(current, target, workspace_files);
        if !conflicts.is_empty() {
            tracing::debug!(count = conflicts.len(), "untracked files block the migration");
            return Err(Error::UntrackedFileConflict(conflicts).into());
        }

        let mut migration = Migration::default();

        for path in workspace_files {
            match (current.contains_key(path), target.get(path)) {
                (true, None) => migration.record(ActionType::Delete, path, None),
                (true, Some(blob_oid)) => {
                    migration.record(ActionType::Modify, path, Some(blob_oid))
                }
                // untracked by both; untracked-but-targeted was rejected above
                (false, _) => {}
            }
        }

        for (path, blob_oid) in target {
            if !workspace_files.contains(path) {
                migration.record(ActionType::Add, path, Some(blob_oid));
            }
        }

        Ok(migration)
    }

    fn find_conflicts(
        current: &CommitTree,
        target: &CommitTree,
        workspace_files: &BTreeSet<PathBuf>,
    ) -> Vec<PathBuf> {
        let is_untracked = |path: &Path| !current.contains_key(path);

        workspace_files
            .iter()
            .filter(|path| is_untracked(path))
            .filter(|path| {
                target.contains_key(*path)
                    || Self::is_parent_of_target(path, target)
                    || Self::is_inside_target_file(path, target)
            })
            .cloned()
            .collect()
    }

    /// An untracked file at `a` blocks a target entry at `a/b`.
    fn is_parent_of_target(path: &Path, target: &CommitTree) -> bool {
        target
            .range(path.to_path_buf()..)
            .take_while(|(target_path, _)| target_path.starts_with(path))
            .any(|(target_path, _)| target_path.as_path() != path)
    }

    /// An untracked file at `a/b` would be wiped when writing a target entry at `a`.
    fn is_inside_target_file(path: &Path, target: &CommitTree) -> bool {
        path.ancestors()
            .skip(1)
            .filter(|ancestor| !ancestor.as_os_str().is_empty())
            .any(|ancestor| target.contains_key(ancestor))
    }

    fn record(&mut self, action: ActionType, path: &Path, blob_oid: Option<&ObjectId>) {
        self.actions
            .entry(action)
            .or_default()
            .push((path.to_path_buf(), blob_oid.cloned()));
    }

    pub fn actions(&self, action: &ActionType) -> impl Iterator<Item = (&PathBuf, Option<&ObjectId>)> {
        self.actions
            .get(action)
            .into_iter()
            .flatten()
            .map(|(path, blob_oid)| (path, blob_oid.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        self.actions.values().all(Vec::is_empty)
    }
}
