//! Contains the formatting logic for the `show` view of a stack.

use super::ArkContext;
use crate::{
    constants::{
        BOTTOM_TEE_BOX, BRANCH_COLOR, EMPTY_CIRCLE, FILLED_CIRCLE, SHA_COLOR, TOP_TEE_BOX,
        URL_COLOR, VERTICAL_BOX,
    },
    git::{short_sha, RepositoryExt},
    host::{PullRequest, ReviewHost},
};
use anyhow::Result;
use std::fmt::Write;

/// A commit of the stack, paired with its branch and open pull request.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StackEntry {
    /// The full hash of the commit.
    pub sha: String,
    /// The subject of the commit.
    pub message: String,
    /// The branch the commit is published on.
    pub branch_name: String,
    /// The open pull request for [StackEntry::branch_name], if any.
    pub pull_request: Option<PullRequest>,
}

impl<'a, R: RepositoryExt, H: ReviewHost> ArkContext<'a, R, H> {
    /// Prints the stack, newest commit on top.
    pub fn print_stack(&self) -> Result<()> {
        let entries = self.stack_entries()?;
        let mut buf = String::new();
        write_stack(&mut buf, &entries, &self.trunk)?;
        print!("{}", buf);
        Ok(())
    }
}

/// Writes the stack to the given [Write]r, newest entry on top and trunk at the base.
///
/// Entries with an open pull request are marked with a filled circle and followed by the
/// pull request's URL; the rest get an empty circle.
pub fn write_stack<W: Write>(w: &mut W, entries: &[StackEntry], trunk: &str) -> Result<()> {
    writeln!(w, "{} head", TOP_TEE_BOX)?;
    writeln!(w, "{}", VERTICAL_BOX)?;

    for entry in entries {
        let marker = entry
            .pull_request
            .as_ref()
            .map_or(EMPTY_CIRCLE, |_| FILLED_CIRCLE);
        writeln!(
            w,
            "{} {} {}",
            marker,
            BRANCH_COLOR.paint(&entry.branch_name),
            SHA_COLOR.paint(format!("({})", short_sha(&entry.sha)))
        )?;
        if let Some(pr) = entry.pull_request.as_ref() {
            writeln!(w, "{} - {}", VERTICAL_BOX, URL_COLOR.paint(&pr.url))?;
        }
        writeln!(w, "{}", VERTICAL_BOX)?;
    }

    writeln!(w, "{} {}", BOTTOM_TEE_BOX, BRANCH_COLOR.paint(trunk))?;
    Ok(())
}
