use std::fs;
use std::path::{Path, PathBuf};

use depsync_changelog::RepositoryInfo;
use depsync_git::Repository;
use depsync_operations::ProjectLayout;
use depsync_operations::operations::{
    PackageUpdate, ScanInput, ScanOperation, UpdateInput, UpdateOperation, ValidateOperation,
};
use depsync_operations::providers::{
    FileSystemChangelogIo, FileSystemManifestProvider, Git2Provider,
};
use depsync_operations::traits::GitProvider;
use tracing::debug;

use super::CheckArgs;
use crate::config::DepsyncConfig;
use crate::error::{CliError, Result};
use crate::output::{format_update, format_validation};

pub(crate) fn run(args: CheckArgs, start_path: &Path) -> Result<()> {
    let root = project_root(start_path);
    let config = DepsyncConfig::load(&root)?;
    let layout = ProjectLayout::new(&root).with_packages_dir(config.packages_dir());

    let diff = args.diff_file.as_deref().map(read_diff_file).transpose()?;
    let input = ScanInput {
        base: args
            .base
            .clone()
            .unwrap_or_else(|| config.base_branch().to_string()),
        head: args.head.clone(),
        diff,
        context_lines: config.diff_context_lines(),
    };

    let scan = ScanOperation::new(Git2Provider::new(), FileSystemManifestProvider::new());
    let changes = scan.execute(&layout, &input)?;

    if changes.is_empty() {
        if args.json {
            println!("[]");
        } else if !args.quiet {
            println!("No dependency changes found");
        }
        return Ok(());
    }

    let results = ValidateOperation::new(FileSystemChangelogIo::new()).execute(&layout, &changes);
    let incomplete = results.iter().filter(|result| !result.is_complete()).count();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if !args.quiet {
        format_validation(&results, args.fix).print();
    }

    if incomplete == 0 {
        return Ok(());
    }
    if !args.fix {
        return Err(CliError::MissingEntries {
            packages: incomplete,
        });
    }

    let repository = resolve_repository(&args, &config, &root)?;
    let mut update_input = UpdateInput::new(repository);
    if let Some(pr) = args.pr {
        update_input = update_input.with_pr_number(pr);
    }

    let output = UpdateOperation::new(FileSystemChangelogIo::new()).execute(
        &layout,
        &changes,
        &update_input,
    );
    if !args.quiet {
        format_update(&output).print();
    }

    let failed = output
        .packages
        .iter()
        .filter(|report| matches!(report.outcome, PackageUpdate::Failed(_)))
        .count();
    if failed > 0 {
        return Err(CliError::UpdateFailed { packages: failed });
    }
    Ok(())
}

/// Repository working directory containing `start_path`, or `start_path`
/// itself when it is not inside a repository.
fn project_root(start_path: &Path) -> PathBuf {
    match Repository::open(start_path) {
        Ok(repository) => repository.root().to_path_buf(),
        Err(err) => {
            debug!(error = %err, "not inside a git repository, using start path as root");
            start_path.to_path_buf()
        }
    }
}

fn read_diff_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CliError::DiffFileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// `--repo-url`, then `repository-url` from the configuration, then the
/// `origin` remote.
fn resolve_repository(
    args: &CheckArgs,
    config: &DepsyncConfig,
    root: &Path,
) -> Result<RepositoryInfo> {
    let url = match args.repo_url.as_deref().or(config.repository_url()) {
        Some(url) => url.to_string(),
        None => origin_url(root).ok_or(CliError::MissingRepositoryUrl)?,
    };

    RepositoryInfo::from_url(&url).map_err(CliError::RepositoryUrl)
}

fn origin_url(root: &Path) -> Option<String> {
    match Git2Provider::new().remote_url(root) {
        Ok(url) => url,
        Err(err) => {
            debug!(error = %err, "could not read origin remote");
            None
        }
    }
}
