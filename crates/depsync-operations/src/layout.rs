use std::path::{Path, PathBuf};

use depsync_diff::DEFAULT_PACKAGES_DIR;

pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Where packages and their changelogs live inside the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub packages_dir: String,
}

impl ProjectLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            packages_dir: DEFAULT_PACKAGES_DIR.to_string(),
        }
    }

    #[must_use]
    pub fn with_packages_dir(mut self, packages_dir: impl Into<String>) -> Self {
        self.packages_dir = packages_dir.into();
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.root.join(&self.packages_dir).join(package)
    }

    #[must_use]
    pub fn changelog_path(&self, package: &str) -> PathBuf {
        self.package_dir(package).join(CHANGELOG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changelog_lives_in_package_dir() {
        let layout = ProjectLayout::new("/repo");
        assert_eq!(
            layout.changelog_path("controller-utils"),
            PathBuf::from("/repo/packages/controller-utils/CHANGELOG.md")
        );
    }

    #[test]
    fn custom_packages_dir() {
        let layout = ProjectLayout::new("/repo").with_packages_dir("libs");
        assert_eq!(layout.package_dir("core"), PathBuf::from("/repo/libs/core"));
    }
}
