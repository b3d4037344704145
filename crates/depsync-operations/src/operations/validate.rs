use std::path::Path;

use depsync_changelog::Changelog;
use depsync_core::{ChangelogSection, DependencyChange, PackageChangeSet};
use depsync_diff::PackageChanges;
use serde::Serialize;
use tracing::{debug, warn};

use crate::matcher::is_documented;
use crate::traits::ChangelogIo;
use crate::{ProjectLayout, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub package: String,
    pub target_section: ChangelogSection,
    pub has_changelog_file: bool,
    pub has_target_section: bool,
    pub missing_entries: Vec<DependencyChange>,
    pub matched_dependency_names: Vec<String>,
    /// Why the changelog could not be read, when it exists but is unusable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    fn undocumented(
        change_set: &PackageChangeSet,
        has_changelog_file: bool,
        error: Option<String>,
    ) -> Self {
        Self {
            package: change_set.package.clone(),
            target_section: change_set.target_section(),
            has_changelog_file,
            has_target_section: false,
            missing_entries: change_set.changes.clone(),
            matched_dependency_names: Vec::new(),
            error,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.has_changelog_file && self.has_target_section && self.missing_entries.is_empty()
    }
}

pub struct ValidateOperation<C> {
    changelog_io: C,
}

impl<C> ValidateOperation<C>
where
    C: ChangelogIo,
{
    pub fn new(changelog_io: C) -> Self {
        Self { changelog_io }
    }

    /// Checks every package's changelog for the bumps it introduced. A package
    /// whose changelog is missing or unreadable is reported with all of its
    /// bumps missing; it never prevents the other packages from being checked.
    pub fn execute(&self, layout: &ProjectLayout, changes: &PackageChanges) -> Vec<ValidationResult> {
        changes
            .values()
            .map(|change_set| self.validate_package(layout, change_set))
            .collect()
    }

    fn validate_package(
        &self,
        layout: &ProjectLayout,
        change_set: &PackageChangeSet,
    ) -> ValidationResult {
        let path = layout.changelog_path(&change_set.package);

        if !self.changelog_io.changelog_exists(&path) {
            debug!(package = %change_set.package, path = %path.display(), "no changelog");
            return ValidationResult::undocumented(change_set, false, None);
        }

        let section = change_set.target_section();
        let entries = match self.section_entries(&path, change_set, &section) {
            Ok(Some(entries)) => entries,
            Ok(None) => return ValidationResult::undocumented(change_set, true, None),
            Err(err) => {
                warn!(package = %change_set.package, error = %err, "failed to read changelog");
                return ValidationResult::undocumented(change_set, true, Some(err.to_string()));
            }
        };

        let (matched, missing): (Vec<_>, Vec<_>) = change_set
            .changes
            .iter()
            .partition(|change| is_documented(entries.iter().map(String::as_str), change));

        ValidationResult {
            package: change_set.package.clone(),
            target_section: section,
            has_changelog_file: true,
            has_target_section: true,
            missing_entries: missing.into_iter().cloned().collect(),
            matched_dependency_names: matched
                .into_iter()
                .map(|change| change.dependency.clone())
                .collect(),
            error: None,
        }
    }

    fn section_entries(
        &self,
        path: &Path,
        change_set: &PackageChangeSet,
        section: &ChangelogSection,
    ) -> Result<Option<Vec<String>>> {
        let content = self.changelog_io.read_changelog(path)?;
        let changelog = Changelog::parse(&content, &change_set.tag_prefix())?;
        Ok(changelog
            .section_entries(section)?
            .map(|entries| entries.into_iter().map(String::from).collect()))
    }
}
