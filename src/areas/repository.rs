use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::{Head, Refs};
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::{Commit, CommitTree};
use crate::errors::Error;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::io::Write;
use std::path::Path;

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Set up a handle on the work tree at `path` without requiring `.gitlet`.
    pub fn new(path: &Path, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Failed to create work tree at {:?}", path))?;
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve work tree at {:?}", path))?;
        let git_path = path.join(METADATA_DIR);

        Ok(Repository {
            writer: RefCell::new(writer),
            index: RefCell::new(Index::new(git_path.join("staging").into_boxed_path())),
            database: Database::new(git_path.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(git_path.into_boxed_path()),
            path: path.into_boxed_path(),
        })
    }

    /// Open an initialized repository, loading its staging index.
    pub fn open(path: &Path, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        let repository = Self::new(path, writer)?;
        if !repository.is_initialized() {
            return Err(Error::NotInitialized.into());
        }

        repository.index.borrow_mut().rehydrate()?;
        tracing::debug!(path = %repository.path.display(), "opened repository");

        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> Box<Path> {
        self.path.join(METADATA_DIR).into_boxed_path()
    }

    pub fn is_initialized(&self) -> bool {
        self.git_path().is_dir()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        let head = self.refs.read_head()?;
        self.database.load_commit(&head.commit)
    }

    pub fn history(&'_ self, start: &Commit) -> RevList<'_> {
        RevList::new(&self.database, start.oid().clone())
    }

    /// Load a commit from a full or abbreviated id.
    pub fn resolve_commit(&self, commit_id: &str) -> anyhow::Result<Commit> {
        let commit_oid = self.database.resolve_commit_prefix(commit_id)?;
        self.database.load_commit(&commit_oid)
    }

    /// Move HEAD to `branch` at `target`, rewriting the working tree first.
    ///
    /// Nothing changes when an untracked file is in the way. The staging index
    /// is emptied after the working tree is migrated; the refs move last.
    pub(crate) fn move_head(&self, branch: BranchName, target: &Commit) -> anyhow::Result<()> {
        let current_tree = self.head_tree()?;
        let workspace_files = self.workspace.list_files(None)?;

        let migration = Migration::plan(&current_tree, target.tree(), &workspace_files)?;
        tracing::debug!(commit = %target.oid(), unchanged = migration.is_empty(), "planned migration");
        self.workspace.apply_migration(&migration, &self.database)?;

        let mut index = self.index();
        index.clear();
        index.write_updates()?;

        self.refs
            .update_head(&Head::new(branch, target.oid().clone()))?;

        Ok(())
    }

    fn head_tree(&self) -> anyhow::Result<CommitTree> {
        Ok(self.head_commit()?.tree().clone())
    }
}
