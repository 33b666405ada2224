//! `update` subcommand.

use crate::{ctx::ArkContext, git::RepositoryExt, host::ReviewHost, prompt::Chooser};
use anyhow::Result;
use clap::Args;

/// CLI arguments for the `update` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct UpdateCmd {
    /// The commit the pull request to update was created from.
    #[clap(index = 1, required_unless_present = "list")]
    commit: Option<String>,
    /// Select the pull request's commit from the stack.
    #[clap(short, long, conflicts_with = "commit")]
    list: bool,
}

impl UpdateCmd {
    /// Run the `update` subcommand.
    pub fn run<R: RepositoryExt, H: ReviewHost, C: Chooser>(
        self,
        ctx: ArkContext<'_, R, H>,
        chooser: &C,
    ) -> Result<()> {
        let commit = match self.commit {
            Some(rev) => ctx.repository.resolve_commit(&rev)?,
            None => ctx.select_commit(chooser, "Select commit to update PR with")?,
        };

        ctx.update_pull_request(&commit)?;
        Ok(())
    }
}
