//! The review host that pull requests are opened against.

use crate::errors::ArkResult;
use serde::Deserialize;

mod gh;
pub use gh::GhCli;

/// An open pull request, as reported by the review host.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct PullRequest {
    /// The number of the pull request.
    pub number: u64,
    /// The branch the pull request merges into.
    #[serde(rename = "baseRefName")]
    pub base_branch: String,
    /// The branch the pull request merges from.
    #[serde(rename = "headRefName")]
    pub head_branch: String,
    /// The web URL of the pull request.
    pub url: String,
}

/// The pull request operations the stack workflows need from a review host.
pub trait ReviewHost {
    /// Lists the open pull requests authored by the current user.
    fn pull_requests(&self) -> ArkResult<Vec<PullRequest>>;

    /// Returns the open pull request authored by the current user whose head is exactly
    /// `branch`, if any.
    fn pull_request_for_branch(&self, branch: &str) -> ArkResult<Option<PullRequest>> {
        Ok(self
            .pull_requests()?
            .into_iter()
            .find(|pr| pr.head_branch == branch))
    }

    /// Interactively opens a pull request from the current branch into `base`.
    ///
    /// ## Returns
    /// - `Ok(())` - The pull request was created.
    /// - `Err(ArkError::Cancelled)` - The user backed out.
    fn create_pull_request(&self, base: &str, draft: bool) -> ArkResult<()>;
}
