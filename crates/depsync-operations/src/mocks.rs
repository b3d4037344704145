use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use depsync_changelog::ChangelogError;
use depsync_git::{GitError, ManifestDiffOptions};
use depsync_manifest::ManifestError;

use crate::traits::{ChangelogIo, GitProvider, ManifestProvider};
use crate::{ProjectLayout, Result};

pub struct MockGitProvider {
    merge_base: String,
    diff: String,
    remote_url: Option<String>,
    unknown_refs: HashSet<String>,
    diff_requests: Mutex<Vec<(String, Option<String>, ManifestDiffOptions)>>,
}

impl MockGitProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            merge_base: "abc123".to_string(),
            diff: String::new(),
            remote_url: None,
            unknown_refs: HashSet::new(),
            diff_requests: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = diff.into();
        self
    }

    #[must_use]
    pub fn with_merge_base(mut self, sha: impl Into<String>) -> Self {
        self.merge_base = sha.into();
        self
    }

    #[must_use]
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_unknown_ref(mut self, refspec: impl Into<String>) -> Self {
        self.unknown_refs.insert(refspec.into());
        self
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn diff_requests(&self) -> Vec<(String, Option<String>, ManifestDiffOptions)> {
        self.diff_requests.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockGitProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for MockGitProvider {
    fn merge_base(&self, _project_root: &Path, base: &str, head: &str) -> Result<String> {
        for refspec in [base, head] {
            if self.unknown_refs.contains(refspec) {
                return Err(GitError::RefNotFound {
                    refspec: refspec.to_string(),
                }
                .into());
            }
        }
        Ok(self.merge_base.clone())
    }

    fn manifest_diff(
        &self,
        _project_root: &Path,
        base: &str,
        head: Option<&str>,
        options: &ManifestDiffOptions,
    ) -> Result<String> {
        self.diff_requests.lock().expect("lock poisoned").push((
            base.to_string(),
            head.map(String::from),
            options.clone(),
        ));
        Ok(self.diff.clone())
    }

    fn remote_url(&self, _project_root: &Path) -> Result<Option<String>> {
        Ok(self.remote_url.clone())
    }
}

pub struct MockManifestProvider {
    names: HashMap<String, String>,
}

impl MockManifestProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_package(mut self, package: &str, published_name: &str) -> Self {
        self.names
            .insert(package.to_string(), published_name.to_string());
        self
    }
}

impl Default for MockManifestProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestProvider for MockManifestProvider {
    fn published_name(&self, layout: &ProjectLayout, package: &str) -> Result<String> {
        self.names.get(package).cloned().ok_or_else(|| {
            ManifestError::MissingField {
                path: layout.package_dir(package).join("package.json"),
                field: "name",
            }
            .into()
        })
    }
}

pub struct MockChangelogIo {
    files: Mutex<HashMap<PathBuf, String>>,
    writes: Mutex<Vec<(PathBuf, String)>>,
    read_only: HashSet<PathBuf>,
}

impl MockChangelogIo {
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            read_only: HashSet::new(),
        }
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn with_changelog(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files
            .lock()
            .expect("lock poisoned")
            .insert(path.into(), content.to_string());
        self
    }

    #[must_use]
    pub fn with_read_only(mut self, path: impl Into<PathBuf>) -> Self {
        self.read_only.insert(path.into());
        self
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn content(&self, path: &Path) -> Option<String> {
        self.files.lock().expect("lock poisoned").get(path).cloned()
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        self.writes.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockChangelogIo {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogIo for MockChangelogIo {
    fn changelog_exists(&self, path: &Path) -> bool {
        self.files.lock().expect("lock poisoned").contains_key(path)
    }

    fn read_changelog(&self, path: &Path) -> Result<String> {
        self.content(path).ok_or_else(|| {
            ChangelogError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }
            .into()
        })
    }

    fn write_changelog(&self, path: &Path, content: &str) -> Result<()> {
        if self.read_only.contains(path) {
            return Err(ChangelogError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            }
            .into());
        }

        self.files
            .lock()
            .expect("lock poisoned")
            .insert(path.to_path_buf(), content.to_string());
        self.writes
            .lock()
            .expect("lock poisoned")
            .push((path.to_path_buf(), content.to_string()));
        Ok(())
    }
}
