use std::fs;
use std::path::Path;

use depsync_changelog::RepositoryInfo;
use depsync_operations::ProjectLayout;
use depsync_operations::operations::{
    PackageUpdate, ScanInput, ScanOperation, UpdateInput, UpdateOperation, ValidateOperation,
};
use depsync_operations::providers::{
    FileSystemChangelogIo, FileSystemManifestProvider, Git2Provider,
};
use tempfile::TempDir;

const DIFF: &str = r#"diff --git a/packages/controller-utils/package.json b/packages/controller-utils/package.json
index 1111111..2222222 100644
--- a/packages/controller-utils/package.json
+++ b/packages/controller-utils/package.json
@@ -1,10 +1,10 @@
 {
   "name": "@metamask/controller-utils",
   "version": "11.4.0",
   "dependencies": {
-    "@metamask/transaction-controller": "^61.0.0"
+    "@metamask/transaction-controller": "^62.0.0"
   },
   "peerDependencies": {
-    "@metamask/network-controller": "^21.0.0"
+    "@metamask/network-controller": "^22.0.0"
   }
 }
"#;

const CHANGELOG: &str = "# Changelog
All notable changes to this project will be documented in this file.

## [Unreleased]

## [11.4.0]

### Added

- Initial release ([#100](https://github.com/MetaMask/core/pull/100))

[Unreleased]: https://github.com/MetaMask/core/compare/@metamask/controller-utils@11.4.0...HEAD
[11.4.0]: https://github.com/MetaMask/core/releases/tag/@metamask/controller-utils@11.4.0
";

fn create_repo(changelog: Option<&str>) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let package_dir = dir.path().join("packages/controller-utils");
    fs::create_dir_all(&package_dir).expect("create package dir");
    fs::write(
        package_dir.join("package.json"),
        r#"{"name": "@metamask/controller-utils", "version": "11.4.0"}"#,
    )
    .expect("write manifest");
    if let Some(content) = changelog {
        fs::write(package_dir.join("CHANGELOG.md"), content).expect("write changelog");
    }
    dir
}

fn scan(root: &Path) -> depsync_diff::PackageChanges {
    let operation = ScanOperation::new(Git2Provider::new(), FileSystemManifestProvider::new());
    let input = ScanInput {
        diff: Some(DIFF.to_string()),
        ..ScanInput::default()
    };
    operation
        .execute(&ProjectLayout::new(root), &input)
        .expect("scan succeeds")
}

fn update_input() -> UpdateInput {
    UpdateInput::new(RepositoryInfo::from_url("https://github.com/MetaMask/core").expect("valid url"))
        .with_pr_number("1234")
}

#[test]
fn fix_then_validate_reports_everything_present() {
    let dir = create_repo(Some(CHANGELOG));
    let layout = ProjectLayout::new(dir.path());
    let changes = scan(dir.path());
    assert_eq!(changes["controller-utils"].published_name, "@metamask/controller-utils");

    let validate = ValidateOperation::new(FileSystemChangelogIo::new());
    let before = validate.execute(&layout, &changes);
    assert_eq!(before[0].missing_entries.len(), 2);

    let update = UpdateOperation::new(FileSystemChangelogIo::new());
    let output = update.execute(&layout, &changes, &update_input());
    assert_eq!(output.changed_count(), 1);
    assert!(matches!(
        output.packages[0].outcome,
        PackageUpdate::Applied {
            updated: 0,
            added: 2
        }
    ));

    let after = validate.execute(&layout, &changes);
    assert!(after[0].is_complete());
    assert_eq!(
        after[0].matched_dependency_names,
        ["@metamask/transaction-controller", "@metamask/network-controller"]
    );

    let written = fs::read_to_string(layout.changelog_path("controller-utils")).expect("read");
    let breaking = written
        .find("- **BREAKING:** Bump `@metamask/network-controller` from `^21.0.0` to `^22.0.0` ([#1234](https://github.com/MetaMask/core/pull/1234))")
        .expect("peer entry");
    let direct = written
        .find("- Bump `@metamask/transaction-controller` from `^61.0.0` to `^62.0.0` ([#1234](https://github.com/MetaMask/core/pull/1234))")
        .expect("direct entry");
    assert!(breaking < direct);
    assert!(written.ends_with(
        "[11.4.0]: https://github.com/MetaMask/core/releases/tag/@metamask/controller-utils@11.4.0\n"
    ));
}

#[test]
fn second_fix_is_a_no_op() {
    let dir = create_repo(Some(CHANGELOG));
    let layout = ProjectLayout::new(dir.path());
    let changes = scan(dir.path());
    let update = UpdateOperation::new(FileSystemChangelogIo::new());

    update.execute(&layout, &changes, &update_input());
    let first = fs::read_to_string(layout.changelog_path("controller-utils")).expect("read");

    let output = update.execute(&layout, &changes, &update_input());
    let second = fs::read_to_string(layout.changelog_path("controller-utils")).expect("read");

    assert_eq!(output.changed_count(), 0);
    assert_eq!(first, second);
}

#[test]
fn missing_changelog_is_reported_not_created() {
    let dir = create_repo(None);
    let layout = ProjectLayout::new(dir.path());
    let changes = scan(dir.path());

    let results = ValidateOperation::new(FileSystemChangelogIo::new()).execute(&layout, &changes);
    assert!(!results[0].has_changelog_file);

    let output =
        UpdateOperation::new(FileSystemChangelogIo::new()).execute(&layout, &changes, &update_input());
    assert!(matches!(output.packages[0].outcome, PackageUpdate::NoChangelog));
    assert!(!layout.changelog_path("controller-utils").exists());
}
