use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;

impl Repository {
    /// Create a branch pointing at HEAD's commit without switching to it.
    pub fn branch(&mut self, name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(name.to_string())?;
        let head = self.refs().read_head()?;

        self.refs().create_branch(&branch_name, &head.commit)
    }
}
