//! `show` subcommand.

use crate::{ctx::ArkContext, git::RepositoryExt, host::ReviewHost};
use anyhow::Result;
use clap::Args;

/// CLI arguments for the `show` subcommand.
#[derive(Debug, Clone, Eq, PartialEq, Args)]
pub struct ShowCmd;

impl ShowCmd {
    /// Run the `show` subcommand.
    pub fn run<R: RepositoryExt, H: ReviewHost>(self, ctx: ArkContext<'_, R, H>) -> Result<()> {
        ctx.print_stack()
    }
}
