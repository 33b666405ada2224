//! [ReviewHost] backed by the GitHub CLI.

use super::{PullRequest, ReviewHost};
use crate::{
    constants::{GH_CANCEL_EXIT_CODE, GH_PR_LIST_LIMIT},
    errors::{ArkError, ArkResult},
    process,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::{path::PathBuf, process::Command, time::Duration};
use tracing::debug;

const PR_FIELDS: &str = "number,baseRefName,headRefName,url";

/// Talks to GitHub through `gh`, which owns authentication and repository detection.
#[derive(Debug, Clone)]
pub struct GhCli {
    /// Directory `gh` runs in, so that it picks up the right repository.
    workdir: PathBuf,
}

impl GhCli {
    /// Creates a new [GhCli] rooted at the given working directory.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn gh(&self) -> Command {
        let mut command = Command::new("gh");
        command.current_dir(&self.workdir);
        command
    }

    /// `gh pr list` over the user's open pull requests, optionally narrowed to one head branch.
    fn list_command(&self, head: Option<&str>) -> Command {
        let mut command = self.gh();
        command.args([
            "pr",
            "list",
            "--author",
            "@me",
            "--state",
            "open",
            "--limit",
            GH_PR_LIST_LIMIT,
            "--json",
            PR_FIELDS,
        ]);
        if let Some(head) = head {
            command.args(["--head", head]);
        }
        command
    }

    fn list(&self, head: Option<&str>) -> ArkResult<Vec<PullRequest>> {
        let mut command = self.list_command(head);
        let spinner = spinner("Fetching pull requests");
        let output = process::run(&mut command);
        spinner.finish_and_clear();

        let pulls = parse_pull_requests(&output?.stdout)?;
        debug!(count = pulls.len(), "Fetched pull requests");
        Ok(pulls)
    }
}

impl ReviewHost for GhCli {
    fn pull_requests(&self) -> ArkResult<Vec<PullRequest>> {
        self.list(None)
    }

    fn pull_request_for_branch(&self, branch: &str) -> ArkResult<Option<PullRequest>> {
        Ok(self
            .list(Some(branch))?
            .into_iter()
            .find(|pr| pr.head_branch == branch))
    }

    fn create_pull_request(&self, base: &str, draft: bool) -> ArkResult<()> {
        let mut command = self.gh();
        command.args(["pr", "create", "--base", base]);
        if draft {
            command.arg("--draft");
        }

        let status = process::interactive(&mut command)?;
        match status.code() {
            Some(0) => Ok(()),
            Some(GH_CANCEL_EXIT_CODE) => Err(ArkError::Cancelled),
            code => Err(ArkError::Command {
                program: "gh".to_string(),
                args: vec!["pr".to_string(), "create".to_string()],
                code,
                stderr: String::new(),
            }),
        }
    }
}

/// Parses the JSON array printed by `gh pr list --json`.
fn parse_pull_requests(raw: &[u8]) -> ArkResult<Vec<PullRequest>> {
    Ok(serde_json::from_slice(raw)?)
}

/// Starts a spinner on stderr. It stays hidden when stderr is not a terminal.
fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
