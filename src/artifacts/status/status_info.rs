use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::CommitTree;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::PathBuf;

pub type FileSet = BTreeSet<PathBuf>;
pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) branches: Vec<BranchName>,
    pub(crate) current_branch: BranchName,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

impl StatusInfo {
    pub fn inspect(
        branches: Vec<BranchName>,
        current_branch: BranchName,
        head_tree: &CommitTree,
        index: &Index,
        workspace: &Workspace,
    ) -> anyhow::Result<Self> {
        let workspace_files = workspace.list_files(None)?;

        let staged_files = index.additions().map(|(path, _)| path.clone()).collect();
        let removed_files = index.removals().map(|(path, _)| path.clone()).collect();

        let mut workspace_changeset = ChangeSet::new();

        for (path, blob_oid) in head_tree {
            if index.is_staged_for_addition(path) || index.is_staged_for_removal(path) {
                continue;
            }

            if !workspace_files.contains(path) {
                workspace_changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
            } else if &Blob::id_for(path, &workspace.read_file(path)?) != blob_oid {
                workspace_changeset.insert(path.clone(), WorkspaceChangeType::Modified);
            }
        }

        for (path, staged_content) in index.additions() {
            if !workspace_files.contains(path) {
                workspace_changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
            } else if &workspace.read_file(path)? != staged_content {
                workspace_changeset.insert(path.clone(), WorkspaceChangeType::Modified);
            }
        }

        let untracked_files = workspace_files
            .into_iter()
            .filter(|path| !index.is_staged_for_addition(path))
            .filter(|path| !head_tree.contains_key(path) || index.is_staged_for_removal(path))
            .collect();

        Ok(StatusInfo {
            branches,
            current_branch,
            staged_files,
            removed_files,
            workspace_changeset,
            untracked_files,
        })
    }

    pub fn staged_files(&self) -> &FileSet {
        &self.staged_files
    }

    pub fn removed_files(&self) -> &FileSet {
        &self.removed_files
    }

    pub fn workspace_changeset(&self) -> &ChangeSet {
        &self.workspace_changeset
    }

    pub fn untracked_files(&self) -> &FileSet {
        &self.untracked_files
    }

    pub fn write_report(&self, writer: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(writer, "=== Branches ===")?;
        for branch in &self.branches {
            if branch == &self.current_branch {
                writeln!(writer, "*{}", branch.as_ref().green())?;
            } else {
                writeln!(writer, "{}", branch)?;
            }
        }
        writeln!(writer)?;

        writeln!(writer, "=== Staged Files ===")?;
        for path in &self.staged_files {
            writeln!(writer, "{}", path.display().to_string().green())?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Removed Files ===")?;
        for path in &self.removed_files {
            writeln!(writer, "{}", path.display().to_string().red())?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Modifications Not Staged For Commit ===")?;
        for (path, change) in &self.workspace_changeset {
            writeln!(writer, "{} {}", path.display(), change)?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Untracked Files ===")?;
        for path in &self.untracked_files {
            writeln!(writer, "{}", path.display().to_string().red())?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
