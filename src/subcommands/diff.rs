//! `diff` subcommand.

use crate::{
    ctx::{ArkContext, CreateOptions},
    git::RepositoryExt,
    host::ReviewHost,
    prompt::Chooser,
};
use anyhow::Result;
use clap::Args;

/// CLI arguments for the `diff` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct DiffCmd {
    /// Select the commit to create the pull request from.
    #[clap(short, long)]
    list: bool,
    /// Always create a new pull request targeting the trunk branch, instead of adding the
    /// commit to the pull request of its parent.
    #[clap(short, long)]
    create: bool,
}

impl DiffCmd {
    /// Run the `diff` subcommand.
    pub fn run<R: RepositoryExt, H: ReviewHost, C: Chooser>(
        self,
        ctx: ArkContext<'_, R, H>,
        chooser: &C,
    ) -> Result<()> {
        let commit = if self.list {
            ctx.select_commit(chooser, "Select commit to create PR from")?
        } else {
            ctx.repository.latest_commit()?
        };

        let opts = CreateOptions {
            force_create: self.create,
        };
        ctx.create_pull_request(&commit, opts)?;
        Ok(())
    }
}
