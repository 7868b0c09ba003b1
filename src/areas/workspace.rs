use crate::areas::database::Database;
use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::errors::Error;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Name of the repository metadata directory inside the work tree
pub const METADATA_DIR: &str = ".gitlet";

const IGNORED_PATHS: [&str; 3] = [METADATA_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every file under `root` (the whole work tree when `None`), relative to
    /// the work tree, in sorted order.
    pub fn list_files(&self, root: Option<&Path>) -> anyhow::Result<BTreeSet<PathBuf>> {
        let root_path = match root {
            Some(p) => self.path.join(p),
            None => self.path.to_path_buf(),
        };

        if !root_path.exists() {
            let relative = root.map(Path::to_path_buf).unwrap_or_default();
            return Err(Error::FileNotFound(relative).into());
        }

        if root_path.is_file() {
            return Ok(BTreeSet::from([root
                .map(Path::to_path_buf)
                .unwrap_or_default()]));
        }

        Ok(WalkDir::new(&root_path)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.file_name().to_string_lossy().as_ref()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect())
    }

    /// Express a user-supplied path relative to the work tree.
    ///
    /// Absolute paths inside the work tree lose the work tree prefix and `.`
    /// components are dropped, so `./a.txt` and `a.txt` name the same file.
    /// Fails with `InvalidPath` for anything `check_trackable` rejects.
    pub fn relative_path(&self, file_path: &Path) -> anyhow::Result<PathBuf> {
        let stripped = file_path.strip_prefix(&self.path).unwrap_or(file_path);

        let relative = stripped
            .components()
            .filter(|component| !matches!(component, Component::CurDir))
            .collect::<PathBuf>();
        Self::check_trackable(&relative)?;

        Ok(relative)
    }

    /// Reject paths that leave the work tree, point into `.gitlet`, or cannot
    /// be written as one line of a commit record.
    pub fn check_trackable(path: &Path) -> anyhow::Result<()> {
        let escapes = path
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
        let is_metadata = path
            .components()
            .next()
            .is_some_and(|component| component.as_os_str() == METADATA_DIR);
        let is_unrecordable = path
            .to_str()
            .is_none_or(|path| path.contains(['\n', '\r']));

        if escapes || is_metadata || is_unrecordable {
            return Err(Error::InvalidPath(path.to_path_buf()).into());
        }

        Ok(())
    }

    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);
        if !full_path.is_file() {
            return Err(Error::FileNotFound(file_path.to_path_buf()).into());
        }

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    /// Create or overwrite a file, creating missing parent directories.
    pub fn write_file(&self, file_path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path).with_context(|| {
                format!("Failed to remove existing directory: {:?}", file_path)
            })?;
        }
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create parent of: {:?}", file_path))?;
        }

        std::fs::write(&full_path, content)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a file if present and prune parent directories it leaves empty.
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        self.prune_empty_parent_dirs(file_path)
    }

    fn prune_empty_parent_dirs(&self, file_path: &Path) -> anyhow::Result<()> {
        for ancestor in file_path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }

            let dir_path = self.path.join(ancestor);
            if !dir_path.is_dir() || dir_path.read_dir()?.next().is_some() {
                break;
            }

            std::fs::remove_dir(&dir_path)
                .with_context(|| format!("Failed to remove empty directory: {:?}", ancestor))?;
        }

        Ok(())
    }

    // The order of applying migrations is important: deletions run first so a
    // path freed by a deleted file can be reused by an added one.
    pub fn apply_migration(&self, migration: &Migration, database: &Database) -> anyhow::Result<()> {
        for action in [ActionType::Delete, ActionType::Modify, ActionType::Add] {
            self.apply_migration_action_set(migration, database, action)?;
        }

        Ok(())
    }

    fn apply_migration_action_set(
        &self,
        migration: &Migration,
        database: &Database,
        action: ActionType,
    ) -> anyhow::Result<()> {
        for (file_path, blob_oid) in migration.actions(&action) {
            match (&action, blob_oid) {
                (ActionType::Delete, _) => {
                    tracing::debug!(path = ?file_path, "deleting tracked file");
                    self.remove_file(file_path)?;
                }
                (ActionType::Add | ActionType::Modify, Some(blob_oid)) => {
                    tracing::debug!(path = ?file_path, blob = %blob_oid, action = ?action, "writing tracked file");
                    let data = database.load_blob(blob_oid)?;
                    self.write_file(file_path, &data)?;
                }
                _ => anyhow::bail!("Invalid action and entry combination for {:?}", file_path),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn listing_skips_metadata_directory() {
        let dir = TempDir::new().unwrap();
        dir.child("a.txt").write_str("a").unwrap();
        dir.child("nested/b.txt").write_str("b").unwrap();
        dir.child(".gitlet/HEAD").write_str("ref: refs/heads/main").unwrap();

        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        assert_eq!(
            workspace.list_files(None).unwrap(),
            BTreeSet::from([PathBuf::from("a.txt"), PathBuf::from("nested/b.txt")])
        );
        assert_eq!(
            workspace.list_files(Some(Path::new("nested"))).unwrap(),
            BTreeSet::from([PathBuf::from("nested/b.txt")])
        );
    }

    #[test]
    fn missing_file_is_reported_by_kind() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        let error = workspace.read_file(Path::new("ghost.txt")).unwrap_err();
        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::FileNotFound(PathBuf::from("ghost.txt")))
        );
    }

    #[test]
    fn removing_last_file_prunes_its_directories() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        workspace
            .write_file(Path::new("x/y/z.txt"), b"content")
            .unwrap();
        assert_eq!(
            workspace.read_file(Path::new("x/y/z.txt")).unwrap().as_ref(),
            b"content"
        );

        workspace.remove_file(Path::new("x/y/z.txt")).unwrap();
        assert!(!dir.path().join("x").exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn user_paths_are_made_relative_to_the_work_tree() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        assert_eq!(
            workspace.relative_path(Path::new("./nested/./a.txt")).unwrap(),
            PathBuf::from("nested/a.txt")
        );
        assert_eq!(
            workspace.relative_path(&dir.path().join("b.txt")).unwrap(),
            PathBuf::from("b.txt")
        );
    }

    #[rstest]
    #[case::parent_dir("../outside.txt")]
    #[case::nested_parent_dir("nested/../../outside.txt")]
    #[case::absolute_outside("/etc/hostname")]
    #[case::metadata(".gitlet/HEAD")]
    #[case::dotted_metadata("./.gitlet/refs/heads/main")]
    #[case::line_break("a\nb.txt")]
    fn paths_that_cannot_be_tracked_are_rejected(#[case] path: &str) {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        let error = workspace.relative_path(Path::new(path)).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::InvalidPath(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"bad\xff.txt"));

        let error = Workspace::check_trackable(path).unwrap_err();
        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::InvalidPath(path.to_path_buf()))
        );
    }
}
