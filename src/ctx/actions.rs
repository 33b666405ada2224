//! The stack workflows: creating, updating and listing pull requests.

use super::{ArkContext, StackEntry};
use crate::{
    constants::{BRANCH_COLOR, SHA_COLOR, URL_COLOR},
    errors::{ArkError, ArkResult},
    git::{short_sha, RepositoryExt},
    host::{PullRequest, ReviewHost},
};
use nu_ansi_term::Color;
use tracing::{debug, info, warn};

/// Options for [ArkContext::create_pull_request].
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct CreateOptions {
    /// Open a new pull request even if the commit could be folded into an existing one.
    pub force_create: bool,
}

/// Where a request to open a pull request for a commit is routed.
#[derive(Debug, Clone, Eq, PartialEq)]
enum Route {
    /// Open a new pull request.
    Create,
    /// Fold `HEAD` into the pull request seeded by `commit`.
    Update {
        commit: String,
        pull_request: PullRequest,
    },
    /// The commit already has an open pull request.
    Published(PullRequest),
}

impl<'a, R: RepositoryExt, H: ReviewHost> ArkContext<'a, R, H> {
    /// Opens a pull request containing `commit`, on a branch of its own based on
    /// `origin/<trunk>`.
    ///
    /// Unless [CreateOptions::force_create] is set, a new `HEAD` commit whose parent already
    /// has an open pull request is folded into that pull request instead.
    ///
    /// Once the stack branch is checked out, the starting branch is checked out again on every
    /// exit: success, conflict, failed push and cancelled pull request alike.
    pub fn create_pull_request(&self, commit: &str, opts: CreateOptions) -> ArkResult<()> {
        self.preflight()?;

        if !opts.force_create {
            match self.route(commit)? {
                Route::Create => {}
                Route::Update {
                    commit: pr_commit,
                    pull_request,
                } => {
                    self.ensure_in_stack(&pr_commit)?;
                    let branch = self.branch_name_for(&pr_commit)?;
                    println!(
                        "Updating PR ({}) with commit {}",
                        BRANCH_COLOR.paint(&branch),
                        SHA_COLOR.paint(short_sha(commit))
                    );
                    return self.fold_into(&pr_commit, branch, pull_request);
                }
                Route::Published(pr) => {
                    println!(
                        "Commit {} already has an open pull request:\n{}",
                        SHA_COLOR.paint(short_sha(commit)),
                        URL_COLOR.paint(pr.url)
                    );
                    return Ok(());
                }
            }
        }

        let home = self.repository.current_branch()?;
        let branch = self.branch_name_for(commit)?;
        println!(
            "Creating PR from commit {}",
            SHA_COLOR.paint(short_sha(commit))
        );

        if !self.repository.local_branch_exists(&branch)? {
            info!(%branch, trunk = %self.trunk, "Creating stack branch");
            self.repository.create_branch(&branch, &self.trunk)?;
        }

        self.on_branch(&branch, &home, || {
            self.cherry_pick_or_abort(commit)?;
            info!(%branch, "Publishing stack branch");
            self.repository.push_new_branch()?;
            self.host.create_pull_request(&self.trunk, self.config.draft)
        })
    }

    /// Folds `HEAD` into the pull request seeded by `pr_commit`.
    ///
    /// `HEAD` is cherry-picked onto the pull request's branch and pushed. Back on the starting
    /// branch, `HEAD` is then squashed into `pr_commit` so that its changes only live in the
    /// pull request's commit. `pr_commit` must be part of the local stack; the copy of it on
    /// the pull request's branch is rejected.
    ///
    /// The pull request is looked up before anything is mutated. Failures of the final
    /// fixup and rebase are handed back as-is, since history is mid-rewrite at that point.
    pub fn update_pull_request(&self, pr_commit: &str) -> ArkResult<()> {
        self.preflight()?;
        self.ensure_in_stack(pr_commit)?;

        let branch = self.branch_name_for(pr_commit)?;
        println!(
            "Attempting to update pull request for branch: {}",
            BRANCH_COLOR.paint(&branch)
        );
        let pr = self
            .host
            .pull_request_for_branch(&branch)?
            .ok_or_else(|| ArkError::PullRequestNotFound(branch.clone()))?;

        self.fold_into(pr_commit, branch, pr)
    }

    /// Folds `HEAD` into `pr`, whose branch `branch` is seeded by `pr_commit`.
    fn fold_into(&self, pr_commit: &str, branch: String, pr: PullRequest) -> ArkResult<()> {
        let home = self.repository.current_branch()?;
        let latest = self.repository.latest_commit()?;
        println!(
            "Updating pull request:\n{} <- {}\n{}",
            BRANCH_COLOR.paint(&pr.base_branch),
            SHA_COLOR.paint(&pr.head_branch),
            URL_COLOR.paint(&pr.url)
        );

        if latest == pr_commit {
            println!(
                "Nothing to fold in, {} is the pull request's own commit. Commit on top of it and run `update` again.",
                SHA_COLOR.paint(short_sha(&latest))
            );
            return Ok(());
        }

        if !self.repository.local_branch_exists(&branch)?
            && !self.repository.remote_branch_exists(&branch)?
        {
            return Err(ArkError::BranchNotFound(branch));
        }

        self.on_branch(&branch, &home, || {
            self.cherry_pick_or_abort(&latest)?;
            self.repository.push()
        })?;

        info!(commit = %latest, target = %pr_commit, "Squashing commit into its pull request");
        self.repository.amend_commit_with_fixup(pr_commit)?;
        self.repository.rebase_autosquash(pr_commit)?;

        println!("Pull request successfully updated.");
        Ok(())
    }

    /// Pairs every commit of the stack with its branch and open pull request, newest first.
    ///
    /// Pull requests are listed once and joined on the head branch in memory.
    pub fn stack_entries(&self) -> ArkResult<Vec<StackEntry>> {
        let stack = self.stack()?;
        let pulls = self.host.pull_requests()?;

        stack
            .into_iter()
            .map(|entry| {
                let branch_name = self.branch_name_for(&entry.sha)?;
                let pull_request = pulls
                    .iter()
                    .find(|pr| pr.head_branch == branch_name)
                    .cloned();
                Ok(StackEntry {
                    sha: entry.sha,
                    message: entry.message,
                    branch_name,
                    pull_request,
                })
            })
            .collect()
    }

    /// Decides whether `commit` gets a new pull request or goes into an existing one.
    fn route(&self, commit: &str) -> ArkResult<Route> {
        let latest = self.repository.latest_commit()?;
        let pulls = self.host.pull_requests()?;
        let pull_for = |sha: &str| -> ArkResult<Option<PullRequest>> {
            let branch = self.branch_name_for(sha)?;
            Ok(pulls.iter().find(|pr| pr.head_branch == branch).cloned())
        };

        if let Some(pr) = pull_for(commit)? {
            return Ok(if commit == latest {
                Route::Update {
                    commit: commit.to_string(),
                    pull_request: pr,
                }
            } else {
                Route::Published(pr)
            });
        }

        // Only a new `HEAD` is stacked onto its parent's pull request.
        if commit != latest {
            return Ok(Route::Create);
        }
        let Some(previous) = self.repository.previous_commit()? else {
            return Ok(Route::Create);
        };
        if !self.stack()?.iter().any(|entry| entry.sha == previous) {
            debug!(%previous, "Parent is already on trunk");
            return Ok(Route::Create);
        }

        Ok(match pull_for(&previous)? {
            Some(pull_request) => Route::Update {
                commit: previous,
                pull_request,
            },
            None => Route::Create,
        })
    }

    /// Fails unless `commit` is ahead of `origin/<trunk>` on the current branch.
    fn ensure_in_stack(&self, commit: &str) -> ArkResult<()> {
        if self.stack()?.iter().any(|entry| entry.sha == commit) {
            Ok(())
        } else {
            Err(ArkError::NotInStack {
                commit: commit.to_string(),
                trunk: self.trunk.clone(),
            })
        }
    }

    /// Runs `f` with `branch` checked out, then checks `home` out again.
    ///
    /// If `f` fails, its error is returned even if switching back fails too; the latter is
    /// only reported. If `f` succeeds, failing to switch back is an
    /// [ArkError::StateRestoration].
    fn on_branch<T>(
        &self,
        branch: &str,
        home: &str,
        f: impl FnOnce() -> ArkResult<T>,
    ) -> ArkResult<T> {
        self.repository.switch(branch)?;
        let result = f();

        debug!(%home, "Switching back");
        match (result, self.repository.switch(home)) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(ArkError::StateRestoration {
                branch: home.to_string(),
                source: Box::new(e),
            }),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(restore)) => {
                warn!(%home, error = %restore, "Failed to switch back");
                eprintln!(
                    "{} switching back to {} failed: {}",
                    Color::Yellow.bold().paint("warning:"),
                    BRANCH_COLOR.paint(home),
                    restore
                );
                Err(e)
            }
        }
    }

    /// Cherry-picks `commit` onto `HEAD`, aborting the cherry-pick if it fails.
    fn cherry_pick_or_abort(&self, commit: &str) -> ArkResult<()> {
        self.repository.cherry_pick(commit).map_err(|e| {
            println!("Cherry-pick failed, aborting...");
            if let Err(abort) = self.repository.abort_cherry_pick() {
                warn!(error = %abort, "Failed to abort cherry-pick");
                eprintln!(
                    "{} aborting the cherry-pick failed: {}",
                    Color::Yellow.bold().paint("warning:"),
                    abort
                );
            }
            e
        })
    }
}
