use indexmap::IndexMap;
use tracing::debug;

use depsync_core::{DependencyChange, DependencyKind, PackageChangeSet};

use crate::context::Cursor;
use crate::line::{DiffLine, object_key, version_entry};

pub const DEFAULT_PACKAGES_DIR: &str = "packages";

/// Changed packages keyed by their directory name, in the order they appear in the diff.
pub type PackageChanges = IndexMap<String, PackageChangeSet>;

/// Scans a diff of `packages/*/package.json` files using the default packages directory.
#[must_use]
pub fn scan_diff(diff: &str) -> PackageChanges {
    ManifestDiffScanner::default().scan(diff)
}

#[derive(Debug, Clone)]
pub struct ManifestDiffScanner {
    packages_dir: String,
}

impl Default for ManifestDiffScanner {
    fn default() -> Self {
        Self::new(DEFAULT_PACKAGES_DIR)
    }
}

impl ManifestDiffScanner {
    #[must_use]
    pub fn new(packages_dir: impl Into<String>) -> Self {
        let packages_dir = packages_dir.into();
        Self {
            packages_dir: packages_dir.trim_matches('/').to_string(),
        }
    }

    /// Extracts dependency bumps from unified diff text.
    ///
    /// This is a textual scan, not a JSON parser: lines that do not look like
    /// manifest entries are skipped. Only packages with at least one bump are
    /// returned; `published_name` is left empty for the caller to resolve.
    #[must_use]
    pub fn scan(&self, diff: &str) -> PackageChanges {
        let mut collector = Collector::default();
        let mut package: Option<String> = None;
        let mut hunk: Option<HunkScan> = None;

        for line in diff.lines() {
            match DiffLine::classify(line, hunk.is_some()) {
                DiffLine::FileHeader { path } => {
                    if let (Some(pkg), Some(done)) = (&package, hunk.take()) {
                        done.finish(pkg, &mut collector);
                    }
                    package = self.package_for_path(path).map(str::to_string);
                    if package.is_none() {
                        debug!(path, "skipping file outside the packages directory");
                    }
                }
                DiffLine::HunkHeader {
                    old_start,
                    new_start,
                } => {
                    if let (Some(pkg), Some(done)) = (&package, hunk.take()) {
                        done.finish(pkg, &mut collector);
                    }
                    if package.is_some() {
                        hunk = Some(HunkScan::new(old_start, new_start));
                    }
                }
                DiffLine::Context(content) => {
                    if let Some(scan) = hunk.as_mut() {
                        scan.context(content);
                    }
                }
                DiffLine::Removed(content) => {
                    if let Some(scan) = hunk.as_mut() {
                        scan.removed(content);
                    }
                }
                DiffLine::Added(content) => {
                    if let Some(scan) = hunk.as_mut() {
                        scan.added(content);
                    }
                }
                DiffLine::Other => {}
            }
        }

        if let (Some(pkg), Some(done)) = (&package, hunk.take()) {
            done.finish(pkg, &mut collector);
        }

        collector.into_changes()
    }

    fn package_for_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path
            .strip_prefix(self.packages_dir.as_str())?
            .strip_prefix('/')?;
        let name = rest.strip_suffix("/package.json")?;
        (!name.is_empty() && !name.contains('/')).then_some(name)
    }
}

type DependencyKey = (DependencyKind, String);

/// Pending removals and additions for one hunk of one package manifest.
struct HunkScan {
    old: Cursor,
    new: Cursor,
    removed: IndexMap<DependencyKey, String>,
    added: IndexMap<DependencyKey, String>,
    old_version: Option<String>,
    new_version: Option<String>,
}

impl HunkScan {
    fn new(old_start: Option<usize>, new_start: Option<usize>) -> Self {
        Self {
            old: Cursor::at_hunk_start(old_start),
            new: Cursor::at_hunk_start(new_start),
            removed: IndexMap::new(),
            added: IndexMap::new(),
            old_version: None,
            new_version: None,
        }
    }

    fn context(&mut self, content: &str) {
        self.old.advance(content);
        self.new.advance(content);
    }

    fn removed(&mut self, content: &str) {
        record_side(
            &self.old,
            content,
            &mut self.removed,
            &mut self.old_version,
        );
        self.old.advance(content);
    }

    fn added(&mut self, content: &str) {
        record_side(&self.new, content, &mut self.added, &mut self.new_version);
        self.new.advance(content);
    }

    fn finish(self, package: &str, collector: &mut Collector) {
        for ((kind, dependency), old_version) in self.removed {
            let Some(new_version) = self.added.get(&(kind, dependency.clone())) else {
                debug!(package, %dependency, "dependency removed without replacement");
                continue;
            };
            if *new_version == old_version {
                continue;
            }
            collector.record(DependencyChange::new(
                package,
                dependency,
                kind,
                old_version,
                new_version.clone(),
            ));
        }

        if let (Some(old), Some(new)) = (self.old_version, self.new_version) {
            if old != new {
                collector.record_version(package, new);
            }
        }
    }
}

fn record_side(
    cursor: &Cursor,
    content: &str,
    entries: &mut IndexMap<DependencyKey, String>,
    version: &mut Option<String>,
) {
    if let Some(kind) = cursor.field().dependency_kind() {
        if let Some((name, value)) = version_entry(content) {
            entries
                .entry((kind, name.to_string()))
                .or_insert_with(|| value.to_string());
        }
        return;
    }

    if cursor.is_top_level() && version.is_none() {
        if let Some(("version", false)) = object_key(content) {
            if let Some((_, value)) = version_entry(content) {
                *version = Some(value.to_string());
            }
        }
    }
}

#[derive(Default)]
struct Collector {
    packages: PackageChanges,
    versions: IndexMap<String, String>,
}

impl Collector {
    fn record(&mut self, change: DependencyChange) {
        let set = self
            .packages
            .entry(change.package.clone())
            .or_insert_with(|| PackageChangeSet::new(change.package.clone()));

        let duplicate = set
            .changes
            .iter()
            .any(|existing| existing.dependency == change.dependency && existing.kind == change.kind);
        if duplicate {
            debug!(
                package = %change.package,
                dependency = %change.dependency,
                "ignoring repeated bump, first occurrence wins"
            );
            return;
        }

        set.changes.push(change);
    }

    fn record_version(&mut self, package: &str, version: String) {
        self.versions.entry(package.to_string()).or_insert(version);
    }

    fn into_changes(mut self) -> PackageChanges {
        for (package, set) in &mut self.packages {
            set.new_version = self.versions.swap_remove(package);
        }
        self.packages
    }
}
