//! In-memory fakes of the capabilities the workflows drive, recording every mutation.

use crate::{
    errors::{ArkError, ArkResult},
    git::{slug, LogEntry, RepositoryExt},
    host::{PullRequest, ReviewHost},
    prompt::Chooser,
};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeSet,
};

#[derive(Debug)]
struct RepoState {
    current: String,
    local: BTreeSet<String>,
    remote: BTreeSet<String>,
    /// Commits ahead of `origin/<trunk>`, oldest first. The last one is `HEAD`.
    commits: Vec<(String, String)>,
    /// Commits that resolve but are not ahead of `origin/<trunk>` on the current branch.
    off_stack: Vec<(String, String)>,
    operation: Option<String>,
    calls: Vec<String>,
}

/// A fake repository. Every commit added is ahead of `origin/main`.
#[derive(Debug)]
pub struct MockRepository {
    state: RefCell<RepoState>,
    fail_cherry_pick: bool,
    fail_push: bool,
    fail_rebase: bool,
    fail_switch_to: Option<String>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(RepoState {
                current: "main".to_string(),
                local: BTreeSet::from(["main".to_string()]),
                remote: BTreeSet::from(["main".to_string()]),
                commits: Vec::new(),
                off_stack: Vec::new(),
                operation: None,
                calls: Vec::new(),
            }),
            fail_cherry_pick: false,
            fail_push: false,
            fail_rebase: false,
            fail_switch_to: None,
        }
    }

    pub fn with_commit(self, sha: &str, message: &str) -> Self {
        self.state
            .borrow_mut()
            .commits
            .push((sha.to_string(), message.to_string()));
        self
    }

    pub fn with_off_stack_commit(self, sha: &str, message: &str) -> Self {
        self.state
            .borrow_mut()
            .off_stack
            .push((sha.to_string(), message.to_string()));
        self
    }

    pub fn with_local_branch(self, name: &str) -> Self {
        self.state.borrow_mut().local.insert(name.to_string());
        self
    }

    pub fn with_remote_branch(self, name: &str) -> Self {
        self.state.borrow_mut().remote.insert(name.to_string());
        self
    }

    pub fn with_operation_in_progress(self, operation: &str) -> Self {
        self.state.borrow_mut().operation = Some(operation.to_string());
        self
    }

    pub fn failing_cherry_pick(mut self) -> Self {
        self.fail_cherry_pick = true;
        self
    }

    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    pub fn failing_rebase(mut self) -> Self {
        self.fail_rebase = true;
        self
    }

    pub fn failing_switch_to(mut self, branch: &str) -> Self {
        self.fail_switch_to = Some(branch.to_string());
        self
    }

    /// The mutations performed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn current(&self) -> String {
        self.state.borrow().current.clone()
    }

    pub fn has_local_branch(&self, name: &str) -> bool {
        self.state.borrow().local.contains(name)
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }

    fn message_of(&self, commit: &str) -> ArkResult<String> {
        let state = self.state.borrow();
        state
            .commits
            .iter()
            .chain(&state.off_stack)
            .find(|(sha, _)| sha == commit)
            .map(|(_, message)| message.clone())
            .ok_or_else(|| ArkError::CommitNotFound(commit.to_string()))
    }

    fn failure(args: &str) -> ArkError {
        ArkError::Command {
            program: "git".to_string(),
            args: args.split(' ').map(ToOwned::to_owned).collect(),
            code: Some(1),
            stderr: "mock failure".to_string(),
        }
    }
}

impl RepositoryExt for MockRepository {
    fn current_branch(&self) -> ArkResult<String> {
        Ok(self.current())
    }

    fn latest_commit(&self) -> ArkResult<String> {
        self.state
            .borrow()
            .commits
            .last()
            .map(|(sha, _)| sha.clone())
            .ok_or_else(|| ArkError::CommitNotFound("HEAD".to_string()))
    }

    fn previous_commit(&self) -> ArkResult<Option<String>> {
        let state = self.state.borrow();
        let n = state.commits.len();
        Ok((n >= 2).then(|| state.commits[n - 2].0.clone()))
    }

    fn resolve_commit(&self, rev: &str) -> ArkResult<String> {
        if rev == "HEAD" {
            return self.latest_commit();
        }
        let state = self.state.borrow();
        state
            .commits
            .iter()
            .chain(&state.off_stack)
            .find(|(sha, _)| sha.starts_with(rev))
            .map(|(sha, _)| sha.clone())
            .ok_or_else(|| ArkError::CommitNotFound(rev.to_string()))
    }

    fn branch_name_for(&self, commit: &str) -> ArkResult<String> {
        Ok(slug::branch_name(commit, &self.message_of(commit)?))
    }

    fn local_branch_exists(&self, name: &str) -> ArkResult<bool> {
        Ok(self.has_local_branch(name))
    }

    fn remote_branch_exists(&self, name: &str) -> ArkResult<bool> {
        Ok(self.state.borrow().remote.contains(name))
    }

    fn create_branch(&self, name: &str, trunk: &str) -> ArkResult<()> {
        self.record(format!("create_branch {name} {trunk}"));
        self.state.borrow_mut().local.insert(name.to_string());
        Ok(())
    }

    fn switch(&self, branch: &str) -> ArkResult<()> {
        self.record(format!("switch {branch}"));
        if self.fail_switch_to.as_deref() == Some(branch) {
            return Err(Self::failure(&format!("switch {branch}")));
        }
        let mut state = self.state.borrow_mut();
        if !state.local.contains(branch) {
            if !state.remote.contains(branch) {
                return Err(Self::failure(&format!("switch {branch}")));
            }
            state.local.insert(branch.to_string());
        }
        state.current = branch.to_string();
        Ok(())
    }

    fn cherry_pick(&self, commit: &str) -> ArkResult<()> {
        self.record(format!("cherry_pick {commit}"));
        if self.fail_cherry_pick {
            self.state.borrow_mut().operation = Some("cherry-pick".to_string());
            return Err(ArkError::CherryPickConflict {
                commit: commit.to_string(),
                detail: "CONFLICT (content)".to_string(),
            });
        }
        Ok(())
    }

    fn abort_cherry_pick(&self) -> ArkResult<()> {
        self.record("abort_cherry_pick".to_string());
        self.state.borrow_mut().operation = None;
        Ok(())
    }

    fn push(&self) -> ArkResult<()> {
        self.record("push".to_string());
        if self.fail_push {
            return Err(Self::failure("push"));
        }
        Ok(())
    }

    fn push_new_branch(&self) -> ArkResult<()> {
        self.record("push_new_branch".to_string());
        if self.fail_push {
            return Err(Self::failure("push --set-upstream origin HEAD"));
        }
        let mut state = self.state.borrow_mut();
        let current = state.current.clone();
        state.remote.insert(current);
        Ok(())
    }

    fn amend_commit_with_fixup(&self, target: &str) -> ArkResult<()> {
        self.record(format!("amend_commit_with_fixup {target}"));
        Ok(())
    }

    fn rebase_autosquash(&self, target: &str) -> ArkResult<()> {
        self.record(format!("rebase_autosquash {target}"));
        if self.fail_rebase {
            self.state.borrow_mut().operation = Some("rebase".to_string());
            return Err(ArkError::RebaseConflict {
                commit: target.to_string(),
                detail: "CONFLICT (content)".to_string(),
            });
        }
        Ok(())
    }

    fn log_since(&self, _trunk: &str) -> ArkResult<Vec<LogEntry>> {
        Ok(self
            .state
            .borrow()
            .commits
            .iter()
            .rev()
            .map(|(sha, message)| LogEntry::new(sha.as_str(), slug::subject(message)))
            .collect())
    }

    fn operation_in_progress(&self) -> ArkResult<Option<String>> {
        Ok(self.state.borrow().operation.clone())
    }
}

/// How [MockHost::create_pull_request] behaves.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum CreateOutcome {
    #[default]
    Created,
    Cancelled,
    Failed,
}

/// A fake review host holding a fixed set of open pull requests.
#[derive(Debug, Default)]
pub struct MockHost {
    pulls: Vec<PullRequest>,
    outcome: CreateOutcome,
    created: RefCell<Vec<String>>,
    listings: Cell<usize>,
}

impl MockHost {
    pub fn with_pull(mut self, number: u64, head: &str) -> Self {
        self.pulls.push(PullRequest {
            number,
            base_branch: "main".to_string(),
            head_branch: head.to_string(),
            url: format!("https://github.com/o/r/pull/{number}"),
        });
        self
    }

    pub fn with_outcome(mut self, outcome: CreateOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// The bases of the pull requests created so far.
    pub fn created(&self) -> Vec<String> {
        self.created.borrow().clone()
    }

    /// How many times the pull requests were listed.
    pub fn listings(&self) -> usize {
        self.listings.get()
    }
}

impl ReviewHost for MockHost {
    fn pull_requests(&self) -> ArkResult<Vec<PullRequest>> {
        self.listings.set(self.listings.get() + 1);
        Ok(self.pulls.clone())
    }

    fn create_pull_request(&self, base: &str, draft: bool) -> ArkResult<()> {
        match self.outcome {
            CreateOutcome::Created => {
                let suffix = if draft { " (draft)" } else { "" };
                self.created.borrow_mut().push(format!("{base}{suffix}"));
                Ok(())
            }
            CreateOutcome::Cancelled => Err(ArkError::Cancelled),
            CreateOutcome::Failed => Err(ArkError::Command {
                program: "gh".to_string(),
                args: vec!["pr".to_string(), "create".to_string()],
                code: Some(1),
                stderr: String::new(),
            }),
        }
    }
}

/// A chooser that always picks the same index and remembers what it was shown.
#[derive(Debug, Default)]
pub struct MockChooser {
    index: usize,
    presented: RefCell<Vec<String>>,
}

impl MockChooser {
    pub fn picking(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn presented(&self) -> Vec<String> {
        self.presented.borrow().clone()
    }
}

impl Chooser for MockChooser {
    fn choose(&self, _prompt: &str, options: &[String], _default: usize) -> ArkResult<usize> {
        *self.presented.borrow_mut() = options.to_vec();
        Ok(self.index)
    }
}
