//! Error types for the `gh-ark` application.

use nu_ansi_term::Color;
use thiserror::Error;

/// The error type shared by the repository driver, the review host and the stack workflows.
#[derive(Error, Debug)]
pub enum ArkError {
    /// No open pull request has the given head branch.
    #[error("No pull request found for stack: `{}`", Color::Green.paint(.0))]
    PullRequestNotFound(String),
    /// The branch exists neither locally nor on `origin`.
    #[error("Branch `{}` does not exist locally or on `origin`.", Color::Green.paint(.0))]
    BranchNotFound(String),
    /// A revision did not resolve to a commit.
    #[error("Could not resolve `{}` to a commit.", Color::Yellow.paint(.0))]
    CommitNotFound(String),
    /// There are no commits ahead of `origin/<trunk>`.
    #[error("No commits ahead of `origin/{}`.", Color::Green.paint(.0))]
    EmptyStack(String),
    /// The commit is not ahead of `origin/<trunk>` on the current branch.
    #[error("Commit `{}` is not in the stack ahead of `origin/{}`.", Color::Yellow.paint(.commit), Color::Green.paint(.trunk))]
    NotInStack { commit: String, trunk: String },
    /// The chooser returned an index outside of the presented list.
    #[error("Selection {0} is out of range.")]
    InvalidSelection(usize),
    /// HEAD does not point at a branch.
    #[error("HEAD is detached. Check out a branch first.")]
    DetachedHead,
    /// A sequencer operation was left unfinished by a previous run.
    #[error("A {0} is in progress. Finish or abort it before running `gh-ark`.")]
    OperationInProgress(String),
    /// The user backed out of an interactive step.
    #[error("Cancelled by user.")]
    Cancelled,

    /// Cherry-picking a commit onto a stack branch failed.
    #[error("Cherry-pick of `{}` failed: {detail}", Color::Yellow.paint(.commit))]
    CherryPickConflict { commit: String, detail: String },
    /// The autosquash rebase stopped; it is left in progress for manual resolution.
    #[error("Autosquash rebase onto `{}^` failed, resolve it manually: {detail}", Color::Yellow.paint(.commit))]
    RebaseConflict { commit: String, detail: String },

    /// An external program exited unsuccessfully.
    #[error("`{program} {}` failed{}: {stderr}", .args.join(" "), status_suffix(.code))]
    Command {
        program: String,
        args: Vec<String>,
        code: Option<i32>,
        stderr: String,
    },
    /// An external program could not be started.
    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// A [git2::Error] occurred.
    #[error("libgit2 error: {0}")]
    Git(#[from] git2::Error),
    /// The review host answered with something that is not the expected JSON.
    #[error("Unexpected review host response: {0}")]
    HostResponse(#[from] serde_json::Error),
    /// An [std::io::Error] occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Switching back to the starting branch failed after the workflow succeeded.
    #[error("Switching back to `{}` failed: {source}", Color::Green.paint(.branch))]
    StateRestoration {
        branch: String,
        #[source]
        source: Box<ArkError>,
    },

    /// The configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// An [inquire::InquireError] occurred.
    #[error("inquire error: {0}")]
    Prompt(inquire::InquireError),
}

impl From<inquire::InquireError> for ArkError {
    fn from(e: inquire::InquireError) -> Self {
        match e {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => Self::Cancelled,
            e => Self::Prompt(e),
        }
    }
}

impl ArkError {
    /// Returns what the user should do next, for errors that leave work to them.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CherryPickConflict { .. } => {
                Some("The cherry-pick was aborted. Rebase the stack onto the trunk and try again.")
            }
            Self::RebaseConflict { .. } => Some(
                "The rebase is still in progress. Resolve it and run `git rebase --continue`, or `git rebase --abort`.",
            ),
            Self::NotInStack { .. } => Some(
                "Pass the commit from your local stack (see `gh ark show`), not its copy on the pull request's branch.",
            ),
            Self::OperationInProgress(_) => Some("Run `git status` to see what is in progress."),
            _ => None,
        }
    }
}

fn status_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" with status {c}")).unwrap_or_default()
}

/// Result alias for [ArkError].
pub type ArkResult<T> = Result<T, ArkError>;
