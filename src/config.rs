//! User configuration for `gh-ark`.

use crate::{constants::ARK_CFG_FILE_NAME, errors::ArkResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The `gh-ark` configuration, read from `~/.gh-ark.toml` by default.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ArkConfig {
    /// Prefix for every stack branch name, e.g. `feature/`.
    pub branch_prefix: String,
    /// Open new pull requests as drafts.
    pub draft: bool,
    /// Refuse to start while a cherry-pick, rebase or similar is in progress.
    pub preflight: bool,
}

impl Default for ArkConfig {
    fn default() -> Self {
        Self {
            branch_prefix: String::new(),
            draft: false,
            preflight: true,
        }
    }
}

impl ArkConfig {
    /// Loads the configuration from `path`, or from the default location if [None].
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: Option<&Path>) -> ArkResult<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "Loading configuration");
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Parses a configuration from TOML.
    pub fn parse(raw: &str) -> ArkResult<Self> {
        Ok(toml::from_str(raw)?)
    }
}

/// Returns the default configuration path, `~/.gh-ark.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(ARK_CFG_FILE_NAME))
}

#[cfg(test)]
mod test {
    use super::ArkConfig;
    use crate::errors::ArkError;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(ArkConfig::parse("").unwrap(), ArkConfig::default());
        assert!(ArkConfig::default().preflight);
    }

    #[test]
    fn reads_kebab_case_keys() {
        let cfg = ArkConfig::parse(
            r#"
            branch-prefix = "feature/"
            draft = true
            preflight = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.branch_prefix, "feature/");
        assert!(cfg.draft);
        assert!(!cfg.preflight);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            ArkConfig::parse("trunk = \"develop\""),
            Err(ArkError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ArkConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg, ArkConfig::default());
    }

    #[test]
    fn loads_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ark.toml");
        std::fs::write(&path, "draft = true\n").unwrap();
        assert!(ArkConfig::load(Some(&path)).unwrap().draft);
    }
}
