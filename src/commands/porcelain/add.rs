use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use std::collections::BTreeSet;
use std::path::PathBuf;

impl Repository {
    /// Stage every file named by `paths`, expanding directories.
    ///
    /// All paths are resolved before anything is staged, so a missing path
    /// leaves the index untouched.
    pub fn add(&mut self, paths: &[PathBuf]) -> anyhow::Result<()> {
        let head_commit = self.head_commit()?;

        let mut files = BTreeSet::new();
        for path in paths {
            let path = self.workspace().relative_path(path)?;
            for file in self.workspace().list_files(Some(&path))? {
                // names found while expanding a directory are skipped, not fatal
                if let Err(error) = Workspace::check_trackable(&file) {
                    tracing::warn!(path = ?file, "skipping file: {}", error);
                    continue;
                }
                files.insert(file);
            }
        }

        let mut index = self.index();
        for file in &files {
            let content = self.workspace().read_file(file)?;
            index.stage_add(file, content, head_commit.tree());
            tracing::debug!(path = ?file, staged = index.is_staged_for_addition(file), "added file");
        }

        index.write_updates()
    }
}
