use std::fs;
use std::path::Path;

use depsync_diff::DEFAULT_PACKAGES_DIR;
use depsync_operations::operations::{DEFAULT_BASE, DEFAULT_CONTEXT_LINES};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, Result};

pub(crate) const CONFIG_FILE: &str = "depsync.toml";

/// Settings read from `depsync.toml` at the repository root. Every key is
/// optional; command-line flags take precedence over file values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct DepsyncConfig {
    base_branch: Option<String>,
    repository_url: Option<String>,
    packages_dir: Option<String>,
    diff_context_lines: Option<u32>,
}

impl DepsyncConfig {
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub(crate) fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| CliError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let config = toml::from_str(&content)
            .map_err(|source| CliError::ConfigParse { path, source })?;
        Ok(config)
    }

    pub(crate) fn base_branch(&self) -> &str {
        self.base_branch.as_deref().unwrap_or(DEFAULT_BASE)
    }

    pub(crate) fn repository_url(&self) -> Option<&str> {
        self.repository_url.as_deref()
    }

    pub(crate) fn packages_dir(&self) -> &str {
        self.packages_dir.as_deref().unwrap_or(DEFAULT_PACKAGES_DIR)
    }

    pub(crate) fn diff_context_lines(&self) -> u32 {
        self.diff_context_lines.unwrap_or(DEFAULT_CONTEXT_LINES)
    }
}
