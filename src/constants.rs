//! Constants for the `gh-ark` application.

use nu_ansi_term::Color;

/// Name of the optional configuration file, resolved relative to the home directory.
pub(crate) const ARK_CFG_FILE_NAME: &str = ".gh-ark.toml";

/// The only remote `gh-ark` publishes to and bases stacks on.
pub(crate) const REMOTE: &str = "origin";

/// Trunk candidates, in order of preference.
pub(crate) const MASTER: &str = "master";
pub(crate) const MAIN: &str = "main";

/// Number of hex characters shown for abbreviated commit hashes.
pub(crate) const SHORT_SHA_LEN: usize = 7;

/// Exit status `gh` reports when the user cancels an interactive prompt.
pub(crate) const GH_CANCEL_EXIT_CODE: i32 = 2;

/// Upper bound on the pull requests `gh pr list` returns. `gh` stops at 30 otherwise.
pub(crate) const GH_PR_LIST_LIMIT: &str = "1000";

pub(crate) const BRANCH_COLOR: Color = Color::Green;
pub(crate) const SHA_COLOR: Color = Color::Yellow;
pub(crate) const URL_COLOR: Color = Color::Blue;

pub(crate) const FILLED_CIRCLE: char = '●';
pub(crate) const EMPTY_CIRCLE: char = '○';
pub(crate) const VERTICAL_BOX: char = '│';
pub(crate) const TOP_TEE_BOX: char = '┬';
pub(crate) const BOTTOM_TEE_BOX: char = '┴';
