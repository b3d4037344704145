mod check;

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Check that package changelogs document every dependency bump
    Check(CheckArgs),
}

#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Branch the changes will merge into (default: `base-branch` from depsync.toml, then `main`)
    #[arg(long)]
    pub base: Option<String>,

    /// Revision holding the changes (default: the working tree)
    #[arg(long)]
    pub head: Option<String>,

    /// Add or update missing changelog entries instead of only reporting them
    #[arg(long)]
    pub fix: bool,

    /// Pull request number referenced by new entries
    #[arg(long = "pr", env = "DEPSYNC_PR_NUMBER", value_parser = parse_pr_number)]
    pub pr: Option<String>,

    /// Repository URL used for pull request links (default: `repository-url`, then the origin remote)
    #[arg(long = "repo-url")]
    pub repo_url: Option<String>,

    /// Read the manifest diff from a file instead of git
    #[arg(long = "diff-file")]
    pub diff_file: Option<PathBuf>,

    /// Print the validation report as JSON
    #[arg(long, conflicts_with = "fix")]
    pub json: bool,

    /// Suppress all output, only set the exit code
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

fn parse_pr_number(value: &str) -> std::result::Result<String, String> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(format!("'{value}' is not a pull request number"))
    }
}

impl Commands {
    pub(crate) fn quiet(&self) -> bool {
        match self {
            Self::Check(args) => args.quiet,
        }
    }

    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Check(args) => check::run(args, start_path),
        }
    }
}
