//! The in-memory context of a single `gh-ark` invocation.

use crate::{
    config::ArkConfig,
    errors::{ArkError, ArkResult},
    git::{LogEntry, RepositoryExt},
    host::ReviewHost,
    prompt::Chooser,
};
use itertools::Itertools;

mod actions;
pub use actions::CreateOptions;

mod fmt;
pub use fmt::StackEntry;

#[cfg(test)]
pub(crate) mod mock;

/// The in-memory context of a single `gh-ark` invocation.
///
/// Holds the repository driver and review host the workflows run against, and the trunk
/// branch, which is resolved once when the context is built.
pub struct ArkContext<'a, R, H> {
    /// The repository the stack lives in.
    pub repository: &'a R,
    /// The host pull requests are opened on.
    pub host: &'a H,
    /// The user configuration.
    pub config: &'a ArkConfig,
    /// The trunk branch, `master` or `main`.
    pub trunk: String,
}

impl<'a, R: RepositoryExt, H: ReviewHost> ArkContext<'a, R, H> {
    /// Creates a new [ArkContext], resolving the trunk branch.
    pub fn new(repository: &'a R, host: &'a H, config: &'a ArkConfig) -> ArkResult<Self> {
        let trunk = repository.trunk_branch()?;
        tracing::debug!(%trunk, "Resolved trunk branch");
        Ok(Self {
            repository,
            host,
            config,
            trunk,
        })
    }

    /// Returns the stack branch name for `commit`, including the configured prefix.
    pub fn branch_name_for(&self, commit: &str) -> ArkResult<String> {
        Ok(format!(
            "{}{}",
            self.config.branch_prefix,
            self.repository.branch_name_for(commit)?
        ))
    }

    /// Returns the commits ahead of `origin/<trunk>`, newest first.
    pub fn stack(&self) -> ArkResult<Vec<LogEntry>> {
        self.repository.log_since(&self.trunk)
    }

    /// Asks the user to pick a commit from the stack.
    ///
    /// ## Takes
    /// - `chooser` - The [Chooser] to present the stack with.
    /// - `prompt` - The question to ask.
    ///
    /// ## Returns
    /// - `Ok(String)` - The full hash of the chosen commit.
    /// - `Err(ArkError::EmptyStack)` - There is nothing to choose from.
    pub fn select_commit<C: Chooser>(&self, chooser: &C, prompt: &str) -> ArkResult<String> {
        let stack = self.stack()?;
        if stack.is_empty() {
            return Err(ArkError::EmptyStack(self.trunk.clone()));
        }

        let options = stack.iter().map(ToString::to_string).collect_vec();
        let index = chooser.choose(prompt, &options, 0)?;
        stack
            .into_iter()
            .nth(index)
            .map(|entry| entry.sha)
            .ok_or(ArkError::InvalidSelection(index))
    }

    /// Refuses to continue if a previous run left a sequencer operation unfinished.
    pub fn preflight(&self) -> ArkResult<()> {
        if !self.config.preflight {
            return Ok(());
        }
        match self.repository.operation_in_progress()? {
            Some(operation) => Err(ArkError::OperationInProgress(operation)),
            None => Ok(()),
        }
    }
}
