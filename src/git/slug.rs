//! Derivation of ref-safe branch names from commit messages.

use super::short_sha;

/// Returns the subject of a commit message: its first paragraph, with line breaks folded
/// into single spaces.
pub fn subject(message: &str) -> String {
    message
        .trim_start()
        .lines()
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sanitizes a commit subject into a token usable as a branch name.
///
/// Mirrors git's `%f` placeholder: characters outside of `[A-Za-z0-9._]` are dropped, and any
/// run of them between two kept characters becomes a single `-`. Runs of `.` collapse, and
/// leading and trailing `.`/`-` are trimmed so that the result is a valid ref component.
///
/// Distinct subjects may sanitize to the same name. Such collisions are not resolved.
pub fn sanitize(subject: &str) -> String {
    let mut out = String::with_capacity(subject.len());
    let mut pending_separator = false;

    for c in subject.chars() {
        let keep = c.is_ascii_alphanumeric() || c == '.' || c == '_';
        if !keep {
            pending_separator = !out.is_empty();
            continue;
        }
        if c == '.' && out.ends_with('.') && !pending_separator {
            continue;
        }
        if pending_separator {
            out.push('-');
            pending_separator = false;
        }
        out.push(c);
    }

    let mut slug = out.trim_matches(|c| c == '.' || c == '-').to_string();
    while let Some(stripped) = slug.strip_suffix(".lock") {
        slug = stripped.trim_end_matches(|c| c == '.' || c == '-').to_string();
    }
    slug
}

/// Returns the branch name for a commit, given its hash and full message.
///
/// ## Takes
/// - `sha` - The full hash of the commit.
/// - `message` - The full commit message.
///
/// ## Returns
/// - The sanitized subject, or `commit-<short sha>` when nothing of the subject survives
///   sanitization.
pub fn branch_name(sha: &str, message: &str) -> String {
    let slug = sanitize(&subject(message));
    if slug.is_empty() {
        format!("commit-{}", short_sha(sha))
    } else {
        slug
    }
}
