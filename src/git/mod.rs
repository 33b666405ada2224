//! Utilities for interacting with `git` repositories for the `gh-ark` application.

use crate::{
    constants::{MAIN, MASTER, REMOTE, SHORT_SHA_LEN},
    errors::{ArkError, ArkResult},
    process,
};
use git2::{BranchType, ErrorCode, Repository, RepositoryState, Sort};
use std::{env, fmt::Display, path::Path, process::Command};
use tracing::{debug, warn};

pub mod slug;

/// Returns the repository for the current working directory, and [None] if
/// the current working directory is not within a git repository or an error
/// occurs.
pub fn active_repository() -> Option<Repository> {
    Repository::discover(env::current_dir().ok()?).ok()
}

/// A commit that is ahead of `origin/<trunk>`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LogEntry {
    /// The full hash of the commit.
    pub sha: String,
    /// The subject line of the commit.
    pub message: String,
}

impl LogEntry {
    /// Creates a new [LogEntry].
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
        }
    }

    /// Returns the abbreviated hash of the commit.
    pub fn short_sha(&self) -> &str {
        short_sha(&self.sha)
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.short_sha(), self.message)
    }
}

/// Abbreviates a commit hash for display.
pub fn short_sha(sha: &str) -> &str {
    &sha[..sha.len().min(SHORT_SHA_LEN)]
}

/// Extension trait for the [Repository] type to expose the git capabilities used by the
/// stack workflows.
///
/// Reads go through `libgit2`. Operations whose semantics must match the `git` porcelain
/// (switching over a dirty tree, cherry-picking, pushing and interactive rebasing) shell out
/// to `git`.
pub trait RepositoryExt {
    /// Returns the name of the checked out branch.
    ///
    /// ## Returns
    /// - `Ok(String)` - The name of the current branch.
    /// - `Err(ArkError::DetachedHead)` - If HEAD does not point at a branch.
    fn current_branch(&self) -> ArkResult<String>;

    /// Returns the full hash of `HEAD`.
    fn latest_commit(&self) -> ArkResult<String>;

    /// Returns the full hash of `HEAD~1`, or [None] if `HEAD` is a root commit.
    fn previous_commit(&self) -> ArkResult<Option<String>>;

    /// Resolves any revision (`abc123`, `HEAD~2`, ...) to the full hash of a commit.
    fn resolve_commit(&self, rev: &str) -> ArkResult<String>;

    /// Returns `master` if a local branch by that name exists, and `main` otherwise.
    fn trunk_branch(&self) -> ArkResult<String> {
        Ok(if self.local_branch_exists(MASTER)? {
            MASTER.to_string()
        } else {
            MAIN.to_string()
        })
    }

    /// Derives the branch name for a commit from its subject line. See [slug::branch_name].
    fn branch_name_for(&self, commit: &str) -> ArkResult<String>;

    /// Checks whether a local branch named exactly `name` exists.
    fn local_branch_exists(&self, name: &str) -> ArkResult<bool>;

    /// Checks whether `origin` has a branch named exactly `name`.
    fn remote_branch_exists(&self, name: &str) -> ArkResult<bool>;

    /// Creates the branch `name` from `origin/<trunk>`, without upstream tracking.
    fn create_branch(&self, name: &str, trunk: &str) -> ArkResult<()>;

    /// Checks out `branch`. Fails if local changes would be overwritten.
    fn switch(&self, branch: &str) -> ArkResult<()>;

    /// Applies `commit` onto `HEAD` as a new commit.
    ///
    /// On failure the cherry-pick is left in progress; see [RepositoryExt::abort_cherry_pick].
    fn cherry_pick(&self, commit: &str) -> ArkResult<()>;

    /// Aborts an in-progress cherry-pick. Does nothing if none is in progress.
    fn abort_cherry_pick(&self) -> ArkResult<()>;

    /// Pushes the current branch to its configured upstream.
    fn push(&self) -> ArkResult<()>;

    /// Pushes the current branch to `origin` under the same name, setting it as upstream.
    fn push_new_branch(&self) -> ArkResult<()>;

    /// Rewrites `HEAD` into a fixup commit targeting `target`.
    fn amend_commit_with_fixup(&self, target: &str) -> ArkResult<()>;

    /// Replays history from `target^`, folding fixup commits into their targets without
    /// opening an editor.
    fn rebase_autosquash(&self, target: &str) -> ArkResult<()>;

    /// Returns the commits on `HEAD` that are not on `origin/<trunk>`, newest first.
    fn log_since(&self, trunk: &str) -> ArkResult<Vec<LogEntry>>;

    /// Returns the name of a sequencer operation left in progress, if any.
    fn operation_in_progress(&self) -> ArkResult<Option<String>>;
}

impl RepositoryExt for Repository {
    fn current_branch(&self) -> ArkResult<String> {
        if self.head_detached()? {
            return Err(ArkError::DetachedHead);
        }
        let head = self.head()?;
        head.shorthand()
            .map(ToOwned::to_owned)
            .ok_or(ArkError::DetachedHead)
    }

    fn latest_commit(&self) -> ArkResult<String> {
        Ok(self.head()?.peel_to_commit()?.id().to_string())
    }

    fn previous_commit(&self) -> ArkResult<Option<String>> {
        let head = self.head()?.peel_to_commit()?;
        if head.parent_count() == 0 {
            return Ok(None);
        }
        Ok(Some(head.parent_id(0)?.to_string()))
    }

    fn resolve_commit(&self, rev: &str) -> ArkResult<String> {
        self.revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| commit.id().to_string())
            .map_err(|e| match e.code() {
                ErrorCode::NotFound | ErrorCode::Ambiguous | ErrorCode::InvalidSpec => {
                    ArkError::CommitNotFound(rev.to_string())
                }
                _ => e.into(),
            })
    }

    fn branch_name_for(&self, commit: &str) -> ArkResult<String> {
        let commit = self.revparse_single(commit)?.peel_to_commit()?;
        let message = String::from_utf8_lossy(commit.message_bytes());
        Ok(slug::branch_name(&commit.id().to_string(), &message))
    }

    fn local_branch_exists(&self, name: &str) -> ArkResult<bool> {
        match self.find_branch(name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn remote_branch_exists(&self, name: &str) -> ArkResult<bool> {
        // `--exit-code` makes ls-remote exit with 2 when no ref matches.
        let mut command = git(self)?;
        command.args(["ls-remote", "--exit-code", "--heads", REMOTE, name]);
        let output = process::output(&mut command)?;
        match output.status.code() {
            Some(0) => Ok(process::stdout(&output)
                .lines()
                .any(|line| line.ends_with(&format!("refs/heads/{name}")))),
            Some(2) => Ok(false),
            _ => Err(process::failure(&command, &output)),
        }
    }

    fn create_branch(&self, name: &str, trunk: &str) -> ArkResult<()> {
        let base = self
            .find_reference(&format!("refs/remotes/{REMOTE}/{trunk}"))
            .map_err(|e| match e.code() {
                ErrorCode::NotFound => ArkError::BranchNotFound(format!("{REMOTE}/{trunk}")),
                _ => e.into(),
            })?
            .peel_to_commit()?;
        debug!(branch = name, base = %base.id(), "Creating branch");
        self.branch(name, &base, false)?;
        Ok(())
    }

    fn switch(&self, branch: &str) -> ArkResult<()> {
        process::run(git(self)?.args(["switch", branch]))?;
        Ok(())
    }

    fn cherry_pick(&self, commit: &str) -> ArkResult<()> {
        let mut command = git(self)?;
        command.args(["cherry-pick", commit]);
        let output = process::output(&mut command)?;
        if !output.status.success() {
            let detail = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ArkError::CherryPickConflict {
                commit: commit.to_string(),
                detail,
            });
        }
        Ok(())
    }

    fn abort_cherry_pick(&self) -> ArkResult<()> {
        if !matches!(
            self.state(),
            RepositoryState::CherryPick | RepositoryState::CherryPickSequence
        ) {
            debug!("No cherry-pick in progress, nothing to abort");
            return Ok(());
        }
        process::run(git(self)?.args(["cherry-pick", "--abort"]))?;
        Ok(())
    }

    fn push(&self) -> ArkResult<()> {
        process::run(git(self)?.arg("push"))?;
        Ok(())
    }

    fn push_new_branch(&self) -> ArkResult<()> {
        process::run(git(self)?.args(["push", "--set-upstream", REMOTE, "HEAD"]))?;
        Ok(())
    }

    fn amend_commit_with_fixup(&self, target: &str) -> ArkResult<()> {
        let target = self.resolve_commit(target)?;
        let head = self.head()?.peel_to_commit()?;
        let message = format!("fixup! {target}");
        let amended = head.amend(Some("HEAD"), None, None, None, Some(&message), None)?;
        debug!(from = %head.id(), to = %amended, "Amended HEAD into fixup");
        Ok(())
    }

    fn rebase_autosquash(&self, target: &str) -> ArkResult<()> {
        let mut command = git(self)?;
        command
            .args(["rebase", "--interactive", "--autosquash"])
            .arg(format!("{target}^"))
            .env("GIT_SEQUENCE_EDITOR", "true");
        let output = process::output(&mut command)?;
        if !output.status.success() {
            let detail = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(target, "Autosquash rebase stopped");
            return Err(ArkError::RebaseConflict {
                commit: target.to_string(),
                detail,
            });
        }
        Ok(())
    }

    fn log_since(&self, trunk: &str) -> ArkResult<Vec<LogEntry>> {
        let upstream = self
            .find_reference(&format!("refs/remotes/{REMOTE}/{trunk}"))
            .map_err(|e| match e.code() {
                ErrorCode::NotFound => ArkError::BranchNotFound(format!("{REMOTE}/{trunk}")),
                _ => e.into(),
            })?
            .peel_to_commit()?;

        let mut walk = self.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push_head()?;
        walk.hide(upstream.id())?;

        walk.map(|oid| -> ArkResult<LogEntry> {
            let commit = self.find_commit(oid?)?;
            let message = String::from_utf8_lossy(commit.message_bytes());
            Ok(LogEntry::new(commit.id().to_string(), slug::subject(&message)))
        })
        .collect()
    }

    fn operation_in_progress(&self) -> ArkResult<Option<String>> {
        let operation = match self.state() {
            RepositoryState::Clean => return Ok(None),
            RepositoryState::Merge => "merge",
            RepositoryState::Revert | RepositoryState::RevertSequence => "revert",
            RepositoryState::CherryPick | RepositoryState::CherryPickSequence => "cherry-pick",
            RepositoryState::Bisect => "bisect",
            RepositoryState::Rebase
            | RepositoryState::RebaseInteractive
            | RepositoryState::RebaseMerge => "rebase",
            RepositoryState::ApplyMailbox | RepositoryState::ApplyMailboxOrRebase => "git am",
        };
        Ok(Some(operation.to_string()))
    }
}

/// Returns a `git` [Command] rooted at the repository's working directory.
fn git(repository: &Repository) -> ArkResult<Command> {
    let workdir = repository
        .workdir()
        .ok_or_else(|| git2::Error::from_str("repository has no working directory"))?;
    Ok(git_in(workdir))
}

/// Returns a `git` [Command] rooted at `dir`.
pub fn git_in(dir: &Path) -> Command {
    let mut command = Command::new("git");
    command.current_dir(dir);
    command
}
