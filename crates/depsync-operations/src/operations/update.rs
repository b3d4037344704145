use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use depsync_changelog::{
    Changelog, ChangelogError, PLACEHOLDER, RepositoryInfo, find_section_start, format_reference,
    merge_reference,
};
use depsync_core::{ChangeCategory, ChangelogSection, DependencyChange, PackageChangeSet};
use depsync_diff::PackageChanges;
use regex::Regex;
use semver::Version;
use tracing::{debug, info, warn};

use crate::matcher::{matches_change, references_dependency};
use crate::traits::ChangelogIo;
use crate::{OperationError, ProjectLayout, Result};

pub const BREAKING_PREFIX: &str = "**BREAKING:** ";

static TARGET_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"to `[^`]*`").expect("target version pattern is valid"));

pub struct UpdateInput {
    pub repository: RepositoryInfo,
    pub pr_number: Option<String>,
}

impl UpdateInput {
    #[must_use]
    pub fn new(repository: RepositoryInfo) -> Self {
        Self {
            repository,
            pr_number: None,
        }
    }

    #[must_use]
    pub fn with_pr_number(mut self, pr_number: impl Into<String>) -> Self {
        self.pr_number = Some(pr_number.into());
        self
    }

    /// Pull request token written into references, `XXXXX` when unknown.
    #[must_use]
    pub fn reference_token(&self) -> &str {
        self.pr_number.as_deref().unwrap_or(PLACEHOLDER)
    }
}

#[derive(Debug)]
pub enum PackageUpdate {
    NoChangelog,
    Applied { updated: usize, added: usize },
    Failed(OperationError),
}

impl PackageUpdate {
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self, Self::Applied { updated, added } if updated + added > 0)
    }
}

#[derive(Debug)]
pub struct PackageUpdateReport {
    pub package: String,
    pub changelog_path: PathBuf,
    pub outcome: PackageUpdate,
}

#[derive(Debug)]
pub struct UpdateOutput {
    pub packages: Vec<PackageUpdateReport>,
    /// The placeholder token was written into at least one entry.
    pub used_placeholder: bool,
}

impl UpdateOutput {
    /// Number of packages whose changelog was modified.
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.packages
            .iter()
            .filter(|report| report.outcome.changed())
            .count()
    }
}

/// One outdated entry and every bump that resolves to it. A dependency bumped
/// in both `dependencies` and `peerDependencies` yields two claimants.
#[derive(Debug)]
struct StaleEntry<'a> {
    entry: String,
    claimants: Vec<&'a DependencyChange>,
}

impl StaleEntry<'_> {
    fn breaking(&self) -> bool {
        self.claimants.iter().any(|change| change.kind.is_breaking())
    }

    fn new_version(&self) -> &str {
        self.claimants
            .first()
            .map_or("", |change| change.new_version.as_str())
    }
}

/// How an existing changelog relates to one dependency bump.
#[derive(Debug, Default)]
struct UpdatePlan<'a> {
    /// Entries naming the dependency with an outdated version.
    stale: Vec<StaleEntry<'a>>,
    /// Bumps with no entry at all.
    absent: Vec<&'a DependencyChange>,
}

impl<'a> UpdatePlan<'a> {
    fn classify(changes: &'a [DependencyChange], entries: &[&str]) -> Self {
        let mut plan = Self::default();

        for change in changes {
            if entries.iter().any(|entry| matches_change(entry, change)) {
                debug!(dependency = %change.dependency, "entry up to date");
                continue;
            }

            let Some(entry) = entries
                .iter()
                .find(|entry| references_dependency(entry, &change.dependency))
            else {
                plan.absent.push(change);
                continue;
            };

            match plan.stale.iter_mut().find(|stale| stale.entry == *entry) {
                Some(stale) => {
                    debug!(dependency = %change.dependency, "entry shared with another bump");
                    stale.claimants.push(change);
                }
                None => plan.stale.push(StaleEntry {
                    entry: (*entry).to_string(),
                    claimants: vec![change],
                }),
            }
        }

        plan
    }

    fn updated_count(&self) -> usize {
        self.stale.iter().map(|stale| stale.claimants.len()).sum()
    }
}

pub struct UpdateOperation<C> {
    changelog_io: C,
}

impl<C> UpdateOperation<C>
where
    C: ChangelogIo,
{
    pub fn new(changelog_io: C) -> Self {
        Self { changelog_io }
    }

    /// Brings every package's changelog in line with its dependency bumps.
    /// Failures are recorded per package and never stop the remaining packages.
    pub fn execute(
        &self,
        layout: &ProjectLayout,
        changes: &PackageChanges,
        input: &UpdateInput,
    ) -> UpdateOutput {
        let packages: Vec<PackageUpdateReport> = changes
            .values()
            .map(|change_set| {
                let changelog_path = layout.changelog_path(&change_set.package);
                let outcome = self.update_package(&changelog_path, change_set, input);
                PackageUpdateReport {
                    package: change_set.package.clone(),
                    changelog_path,
                    outcome,
                }
            })
            .collect();

        let used_placeholder = input.pr_number.is_none()
            && packages.iter().any(|report| report.outcome.changed());

        UpdateOutput {
            packages,
            used_placeholder,
        }
    }

    fn update_package(
        &self,
        path: &Path,
        change_set: &PackageChangeSet,
        input: &UpdateInput,
    ) -> PackageUpdate {
        if !self.changelog_io.changelog_exists(path) {
            warn!(package = %change_set.package, "no changelog to update");
            return PackageUpdate::NoChangelog;
        }

        match self.apply(path, change_set, input) {
            Ok((updated, added)) => {
                info!(package = %change_set.package, updated, added, "updated changelog");
                PackageUpdate::Applied { updated, added }
            }
            Err(err) => {
                warn!(package = %change_set.package, error = %err, "failed to update changelog");
                PackageUpdate::Failed(err)
            }
        }
    }

    fn apply(
        &self,
        path: &Path,
        change_set: &PackageChangeSet,
        input: &UpdateInput,
    ) -> Result<(usize, usize)> {
        let tag_prefix = change_set.tag_prefix();
        let section = change_set.target_section();
        let token = input.reference_token();

        let content = self.changelog_io.read_changelog(path)?;
        let changelog = Changelog::parse(&content, &tag_prefix)?;
        let entries = changelog.section_entries(&section)?.unwrap_or_default();
        let plan = UpdatePlan::classify(&change_set.changes, &entries);

        let mut changelog = if plan.stale.is_empty() {
            changelog
        } else {
            let patched =
                patch_entries(&content, &section, &plan.stale, &input.repository, token)?;
            self.changelog_io.write_changelog(path, &patched)?;
            let reread = self.changelog_io.read_changelog(path)?;
            Changelog::parse(&reread, &tag_prefix)?
        };

        if !plan.absent.is_empty() {
            let version = release_version(&section)?;

            let mut ordered = plan.absent.clone();
            ordered.sort_by_key(|change| change.kind.is_breaking());

            for change in ordered {
                changelog.add_change(
                    ChangeCategory::Changed,
                    describe_bump(change, &input.repository, token),
                    version.as_ref(),
                )?;
            }
            self.changelog_io
                .write_changelog(path, &changelog.to_string())?;
        }

        Ok((plan.updated_count(), plan.absent.len()))
    }
}

/// ``Bump `<dep>` from `<old>` to `<new>` ([#N](...))``, marked breaking for peer bumps.
#[must_use]
pub fn describe_bump(change: &DependencyChange, repository: &RepositoryInfo, token: &str) -> String {
    let prefix = if change.kind.is_breaking() {
        BREAKING_PREFIX
    } else {
        ""
    };
    format!(
        "{prefix}Bump `{}` from `{}` to `{}` ({})",
        change.dependency,
        change.old_version,
        change.new_version,
        format_reference(repository, token)
    )
}

/// Points an outdated entry line at the new version and adds the run's
/// pull request reference.
fn patch_entry(
    line: &str,
    new_version: &str,
    breaking: bool,
    repository: &RepositoryInfo,
    token: &str,
) -> String {
    let retargeted = match TARGET_VERSION.find_iter(line).last() {
        Some(found) => format!(
            "{}to `{new_version}`{}",
            &line[..found.start()],
            &line[found.end()..]
        ),
        None => line.to_string(),
    };

    let retargeted = if breaking && !retargeted.starts_with(BREAKING_PREFIX) {
        format!("{BREAKING_PREFIX}{retargeted}")
    } else {
        retargeted
    };

    merge_reference(&retargeted, repository, token)
}

/// Rewrites stale entries directly in the raw document, leaving every other
/// byte untouched. Only the body of `section` is searched.
fn patch_entries(
    content: &str,
    section: &ChangelogSection,
    stale: &[StaleEntry<'_>],
    repository: &RepositoryInfo,
    token: &str,
) -> Result<String> {
    let not_found = |entry: &str| OperationError::EntryNotFound {
        section: section.to_string(),
        entry: entry.to_string(),
    };

    let heading = find_section_start(content, section)
        .ok_or_else(|| not_found(stale.first().map_or("", |stale| stale.entry.as_str())))?;
    let body_start = content[heading..]
        .find('\n')
        .map_or(content.len(), |offset| heading + offset + 1);
    let body_end = if content[body_start..].starts_with("## ") {
        body_start
    } else {
        content[body_start..]
            .find("\n## ")
            .map_or(content.len(), |offset| body_start + offset + 1)
    };

    let mut body = content[body_start..body_end].to_string();

    for entry in stale {
        let first_line = entry.entry.lines().next().unwrap_or_default();
        let needle = format!("- {first_line}");
        let position = find_line(&body, &needle).ok_or_else(|| not_found(first_line))?;

        let patched = patch_entry(
            first_line,
            entry.new_version(),
            entry.breaking(),
            repository,
            token,
        );
        body.replace_range(position..position + needle.len(), &format!("- {patched}"));
    }

    Ok(format!(
        "{}{body}{}",
        &content[..body_start],
        &content[body_end..]
    ))
}

fn find_line(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .match_indices(needle)
        .map(|(index, _)| index)
        .find(|&index| index == 0 || haystack[..index].ends_with('\n'))
}

fn release_version(section: &ChangelogSection) -> Result<Option<Version>> {
    match section {
        ChangelogSection::Unreleased => Ok(None),
        ChangelogSection::Release(version) => Version::parse(version)
            .map(Some)
            .map_err(|source| {
                ChangelogError::VersionParse {
                    version: version.clone(),
                    source,
                }
                .into()
            }),
    }
}
