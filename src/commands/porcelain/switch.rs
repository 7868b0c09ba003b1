use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::Error;

impl Repository {
    /// Make `name` the current branch and check out its tip commit.
    pub fn switch(&mut self, name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(name.to_string())
            .map_err(|_| Error::BranchNotFound(name.to_string()))?;

        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or_else(|| Error::BranchNotFound(name.to_string()))?;

        if self.refs().current_branch()? == branch_name {
            return Err(Error::AlreadySwitched(name.to_string()).into());
        }

        let target = self.database().load_commit(&target_oid)?;
        self.move_head(branch_name, &target)
    }
}
