use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::Error;

impl Repository {
    /// Delete a branch pointer; the commits it reached are kept.
    pub fn remove_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(name.to_string())
            .map_err(|_| Error::BranchNotFound(name.to_string()))?;

        self.refs().delete_branch(&branch_name)?;

        Ok(())
    }
}
