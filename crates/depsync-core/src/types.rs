use std::fmt;

use serde::Serialize;

/// Manifest field a dependency bump was found in.
///
/// `devDependencies` has no variant: dev-only bumps are never surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Direct,
    Peer,
}

impl DependencyKind {
    /// Peer dependency bumps are documented as breaking changes.
    #[must_use]
    pub fn is_breaking(self) -> bool {
        matches!(self, Self::Peer)
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Peer => write!(f, "peer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyChange {
    pub package: String,
    pub dependency: String,
    pub kind: DependencyKind,
    pub old_version: String,
    pub new_version: String,
}

impl DependencyChange {
    #[must_use]
    pub fn new(
        package: impl Into<String>,
        dependency: impl Into<String>,
        kind: DependencyKind,
        old_version: impl Into<String>,
        new_version: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            dependency: dependency.into(),
            kind,
            old_version: old_version.into(),
            new_version: new_version.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageChangeSet {
    /// Directory name under `packages/`.
    pub package: String,
    /// `name` field of the package manifest. Empty until resolved.
    pub published_name: String,
    pub changes: Vec<DependencyChange>,
    /// Set when the package's own `version` changed in the same diff.
    pub new_version: Option<String>,
}

impl PackageChangeSet {
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            published_name: String::new(),
            changes: Vec::new(),
            new_version: None,
        }
    }

    #[must_use]
    pub fn with_published_name(mut self, name: impl Into<String>) -> Self {
        self.published_name = name.into();
        self
    }

    #[must_use]
    pub fn with_new_version(mut self, version: impl Into<String>) -> Self {
        self.new_version = Some(version.into());
        self
    }

    /// Release tags of this package look like `<published_name>@<version>`.
    #[must_use]
    pub fn tag_prefix(&self) -> String {
        let name = if self.published_name.is_empty() {
            &self.package
        } else {
            &self.published_name
        };
        format!("{name}@")
    }

    #[must_use]
    pub fn target_section(&self) -> ChangelogSection {
        match &self.new_version {
            Some(version) => ChangelogSection::Release(version.clone()),
            None => ChangelogSection::Unreleased,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "version")]
pub enum ChangelogSection {
    Unreleased,
    Release(String),
}

impl fmt::Display for ChangelogSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreleased => write!(f, "[Unreleased]"),
            Self::Release(version) => write!(f, "[{version}]"),
        }
    }
}
