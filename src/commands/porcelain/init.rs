use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::errors::Error;
use anyhow::Context;
use std::fs;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(Error::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gitlet/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .gitlet/refs/heads directory")?;

        {
            let index = self.index();
            fs::create_dir_all(index.additions_path())
                .context("Failed to create .gitlet/staging/add directory")?;
            fs::create_dir_all(index.removals_path())
                .context("Failed to create .gitlet/staging/remove directory")?;
        }

        let root = Commit::root()?;
        self.database().store(&root)?;

        self.refs()
            .update_head(&Head::new(BranchName::default_branch(), root.oid().clone()))
            .context("Failed to create initial HEAD reference")?;

        tracing::info!(path = %self.git_path().display(), "initialized repository");

        Ok(())
    }
}
