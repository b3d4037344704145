use std::fs;
use std::path::Path;
use std::process::Command;

use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

const MANIFEST_BEFORE: &str = r#"{
  "name": "@metamask/controller-utils",
  "version": "11.4.0",
  "dependencies": {
    "@metamask/transaction-controller": "^61.0.0"
  }
}
"#;

const MANIFEST_AFTER: &str = r#"{
  "name": "@metamask/controller-utils",
  "version": "11.4.0",
  "dependencies": {
    "@metamask/transaction-controller": "^62.0.0"
  }
}
"#;

const DIFF: &str = r#"diff --git a/packages/controller-utils/package.json b/packages/controller-utils/package.json
index 1111111..2222222 100644
--- a/packages/controller-utils/package.json
+++ b/packages/controller-utils/package.json
@@ -1,7 +1,7 @@
 {
   "name": "@metamask/controller-utils",
   "version": "11.4.0",
   "dependencies": {
-    "@metamask/transaction-controller": "^61.0.0"
+    "@metamask/transaction-controller": "^62.0.0"
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

const ENTRY_WITH_PR: &str = "- Bump `@metamask/transaction-controller` from `^61.0.0` to `^62.0.0` ([#1234](https://github.com/MetaMask/core/pull/1234))";

const ENTRY_WITH_PLACEHOLDER: &str = "- Bump `@metamask/transaction-controller` from `^61.0.0` to `^62.0.0` ([#XXXXX](https://github.com/MetaMask/core/pull/XXXXX))";

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(output.status.success(), "git {args:?} failed");
}

fn create_package(dir: &Path, manifest: &str, changelog: Option<&str>) {
    let package_dir = dir.join("packages/controller-utils");
    fs::create_dir_all(&package_dir).expect("failed to create package dir");
    fs::write(package_dir.join("package.json"), manifest).expect("failed to write manifest");
    if let Some(changelog) = changelog {
        fs::write(package_dir.join("CHANGELOG.md"), changelog).expect("failed to write changelog");
    }
}

fn changelog(dir: &Path) -> String {
    fs::read_to_string(dir.join("packages/controller-utils/CHANGELOG.md"))
        .expect("failed to read changelog")
}

/// Plain directory with a package and a diff file, no git repository.
fn create_diff_workspace(changelog: Option<&str>) -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    create_package(dir.path(), MANIFEST_AFTER, changelog);
    fs::write(dir.path().join("changes.diff"), DIFF).expect("failed to write diff");
    dir
}

/// Repository whose `feature` branch bumps a dependency of `controller-utils`.
fn create_git_workspace() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    git(dir.path(), &["init", "--initial-branch=main"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    git(dir.path(), &["config", "user.name", "Test"]);

    create_package(dir.path(), MANIFEST_BEFORE, Some(CHANGELOG));
    git(dir.path(), &["add", "-A"]);
    git(dir.path(), &["commit", "-m", "Initial commit"]);

    git(dir.path(), &["checkout", "-b", "feature"]);
    create_package(dir.path(), MANIFEST_AFTER, None);
    git(dir.path(), &["add", "-A"]);
    git(dir.path(), &["commit", "-m", "Bump transaction-controller"]);

    dir
}

fn depsync(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("depsync");
    cmd.current_dir(dir).env_remove("DEPSYNC_PR_NUMBER");
    cmd
}

#[test]
fn missing_entry_fails_with_hint() {
    let workspace = create_diff_workspace(Some(CHANGELOG));

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff"])
        .assert()
        .failure()
        .stderr(contains("❌ controller-utils: Missing 1 changelog entry:"))
        .stderr(contains("  - @metamask/transaction-controller"))
        .stderr(contains("💡 Run with --fix to automatically update changelogs"))
        .stderr(contains("error: 1 package(s) have missing changelog entries"));
}

#[test]
fn fix_adds_entry_with_pr_reference() {
    let workspace = create_diff_workspace(Some(CHANGELOG));

    depsync(workspace.path())
        .args([
            "check",
            "--diff-file",
            "changes.diff",
            "--fix",
            "--pr",
            "1234",
            "--repo-url",
            "https://github.com/MetaMask/core",
        ])
        .assert()
        .success()
        .stdout(contains("controller-utils: Added 1 changelog entry"))
        .stderr(contains("XXXXX").not());

    let written = changelog(workspace.path());
    assert!(written.contains("### Changed"));
    assert!(written.contains(ENTRY_WITH_PR));
}

#[test]
fn fixed_changelog_passes_validation() {
    let workspace = create_diff_workspace(Some(CHANGELOG));

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff", "--fix"])
        .args(["--repo-url", "https://github.com/MetaMask/core"])
        .assert()
        .success();

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff"])
        .assert()
        .success()
        .stdout(contains("✅ controller-utils: All entries present"));
}

#[test]
fn fix_without_pr_uses_placeholder() {
    let workspace = create_diff_workspace(Some(CHANGELOG));

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff", "--fix"])
        .args(["--repo-url", "https://github.com/MetaMask/core"])
        .assert()
        .success()
        .stderr(contains("#XXXXX"));

    assert!(changelog(workspace.path()).contains(ENTRY_WITH_PLACEHOLDER));
}

#[test]
fn pr_number_from_environment() {
    let workspace = create_diff_workspace(Some(CHANGELOG));

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff", "--fix"])
        .args(["--repo-url", "https://github.com/MetaMask/core"])
        .env("DEPSYNC_PR_NUMBER", "1234")
        .assert()
        .success();

    assert!(changelog(workspace.path()).contains(ENTRY_WITH_PR));
}

#[test]
fn repository_url_from_config_file() {
    let workspace = create_diff_workspace(Some(CHANGELOG));
    fs::write(
        workspace.path().join("depsync.toml"),
        "repository-url = \"git@github.com:MetaMask/core.git\"\n",
    )
    .expect("failed to write config");

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff", "--fix", "--pr", "1234"])
        .assert()
        .success();

    assert!(changelog(workspace.path()).contains(ENTRY_WITH_PR));
}

#[test]
fn fix_without_repository_url_is_error() {
    let workspace = create_diff_workspace(Some(CHANGELOG));

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff", "--fix"])
        .assert()
        .failure()
        .stderr(contains("no repository URL found"));

    assert_eq!(changelog(workspace.path()), CHANGELOG);
}

#[test]
fn missing_changelog_is_reported() {
    let workspace = create_diff_workspace(None);

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff"])
        .assert()
        .failure()
        .stderr(contains("No CHANGELOG.md found for controller-utils"))
        .stderr(contains("❌ controller-utils: CHANGELOG.md not found"));
}

#[test]
fn missing_unreleased_section_is_reported() {
    let workspace = create_diff_workspace(Some("# Changelog\n\n## [11.4.0]\n\n### Added\n\n- Initial release\n"));

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff"])
        .assert()
        .failure()
        .stderr(contains("❌ controller-utils: No [Unreleased] section found"));
}

#[test]
fn empty_diff_reports_no_changes() {
    let workspace = create_diff_workspace(Some(CHANGELOG));
    fs::write(workspace.path().join("empty.diff"), "").expect("failed to write diff");

    depsync(workspace.path())
        .args(["check", "--diff-file", "empty.diff"])
        .assert()
        .success()
        .stdout(contains("No dependency changes found"));
}

#[test]
fn json_report() {
    let workspace = create_diff_workspace(Some(CHANGELOG));

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff", "--json"])
        .assert()
        .failure()
        .stdout(contains("\"package\": \"controller-utils\""))
        .stdout(contains("\"hasChangelogFile\": true"))
        .stdout(contains("\"missingEntries\""));
}

#[test]
fn quiet_suppresses_output() {
    let workspace = create_diff_workspace(Some(CHANGELOG));

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff", "--quiet"])
        .assert()
        .failure()
        .stdout("")
        .stderr("");
}

#[test]
fn missing_diff_file_is_error() {
    let workspace = create_diff_workspace(Some(CHANGELOG));

    depsync(workspace.path())
        .args(["check", "--diff-file", "nope.diff"])
        .assert()
        .failure()
        .stderr(contains("failed to read diff file"));
}

#[test]
fn non_numeric_pr_is_rejected() {
    let workspace = create_diff_workspace(Some(CHANGELOG));

    depsync(workspace.path())
        .args(["check", "--diff-file", "changes.diff", "--pr", "abc"])
        .assert()
        .failure()
        .stderr(contains("not a pull request number"));
}

#[test]
fn git_branch_changes_are_detected() {
    let workspace = create_git_workspace();

    depsync(workspace.path())
        .args(["check", "--base", "main"])
        .assert()
        .failure()
        .stderr(contains("❌ controller-utils: Missing 1 changelog entry:"))
        .stderr(contains("  - @metamask/transaction-controller"));
}

#[test]
fn uncommitted_changes_are_detected() {
    let workspace = create_git_workspace();
    git(workspace.path(), &["checkout", "main"]);
    create_package(workspace.path(), MANIFEST_AFTER, None);

    depsync(workspace.path())
        .args(["check"])
        .assert()
        .failure()
        .stderr(contains("@metamask/transaction-controller"));
}

#[test]
fn git_fix_uses_origin_remote() {
    let workspace = create_git_workspace();
    git(
        workspace.path(),
        &["remote", "add", "origin", "git@github.com:MetaMask/core.git"],
    );

    depsync(workspace.path())
        .args(["check", "--fix", "--pr", "1234"])
        .assert()
        .success()
        .stdout(contains("controller-utils: Added 1 changelog entry"));

    assert!(changelog(workspace.path()).contains(ENTRY_WITH_PR));
}

#[test]
fn runs_from_subdirectory_with_path_flag() {
    let workspace = create_git_workspace();
    let package_dir = workspace.path().join("packages/controller-utils");

    depsync(workspace.path())
        .args(["-C"])
        .arg(&package_dir)
        .args(["check"])
        .assert()
        .failure()
        .stderr(contains("Missing 1 changelog entry"));
}

#[test]
fn unknown_base_branch_is_error() {
    let workspace = create_git_workspace();

    depsync(workspace.path())
        .args(["check", "--base", "release"])
        .assert()
        .failure()
        .stderr(contains("error: operation failed"))
        .stderr(contains("caused by: failed to resolve reference 'release'"));
}
