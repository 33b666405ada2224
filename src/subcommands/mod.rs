//! The subcommands for the `gh-ark` application.

use crate::{ctx::ArkContext, git::RepositoryExt, host::ReviewHost, prompt::Chooser};
use anyhow::Result;
use clap::Subcommand;

mod diff;
pub use diff::DiffCmd;

mod update;
pub use update::UpdateCmd;

mod show;
pub use show::ShowCmd;

#[derive(Debug, Clone, Eq, PartialEq, Subcommand)]
pub enum Subcommands {
    /// Create a pull request from the latest commit, targeting the trunk branch.
    #[clap(alias = "pr")]
    Diff(DiffCmd),
    /// Fold the latest commit into an existing pull request, squashing it into the commit that
    /// pull request was created from.
    #[clap(alias = "upr")]
    Update(UpdateCmd),
    /// Show the current stack of commits and their pull requests.
    #[clap(aliases = ["log", "ls"])]
    Show(ShowCmd),
}

impl Subcommands {
    /// Run the subcommand with the given context.
    pub fn run<R, H, C>(self, ctx: ArkContext<'_, R, H>, chooser: &C) -> Result<()>
    where
        R: RepositoryExt,
        H: ReviewHost,
        C: Chooser,
    {
        match self {
            Self::Diff(args) => args.run(ctx, chooser),
            Self::Update(args) => args.run(ctx, chooser),
            Self::Show(args) => args.run(ctx),
        }
    }
}
