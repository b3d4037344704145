use depsync_changelog::PLACEHOLDER;
use depsync_operations::operations::{PackageUpdate, UpdateOutput, ValidationResult};

/// Rendered report text, split by the stream each line belongs on.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Report {
    pub stdout: String,
    pub stderr: String,
}

impl Report {
    fn out(&mut self, line: &str) {
        self.stdout.push_str(line);
        self.stdout.push('\n');
    }

    fn err(&mut self, line: &str) {
        self.stderr.push_str(line);
        self.stderr.push('\n');
    }

    pub(crate) fn print(&self) {
        print!("{}", self.stdout);
        eprint!("{}", self.stderr);
    }
}

fn entries(count: usize) -> &'static str {
    if count == 1 { "entry" } else { "entries" }
}

pub(crate) fn format_validation(results: &[ValidationResult], fix: bool) -> Report {
    let mut report = Report::default();

    for result in results {
        let package = &result.package;

        if !result.has_changelog_file {
            report.err(&format!("No CHANGELOG.md found for {package}"));
            report.err(&format!("❌ {package}: CHANGELOG.md not found"));
        } else if !result.has_target_section {
            report.err(&format!(
                "❌ {package}: No {} section found",
                result.target_section
            ));
            if let Some(error) = &result.error {
                report.err(&format!("  caused by: {error}"));
            }
        } else if !result.missing_entries.is_empty() {
            let count = result.missing_entries.len();
            report.err(&format!(
                "❌ {package}: Missing {count} changelog {}:",
                entries(count)
            ));
            for change in &result.missing_entries {
                report.err(&format!("  - {}", change.dependency));
            }
        } else {
            report.out(&format!("✅ {package}: All entries present"));
        }
    }

    if !fix && results.iter().any(|result| !result.is_complete()) {
        report.err("💡 Run with --fix to automatically update changelogs");
    }

    report
}

pub(crate) fn format_update(output: &UpdateOutput) -> Report {
    let mut report = Report::default();

    for package_report in &output.packages {
        let package = &package_report.package;

        match &package_report.outcome {
            PackageUpdate::NoChangelog => {
                report.err(&format!("No CHANGELOG.md found for {package}"));
            }
            PackageUpdate::Applied {
                updated: 0,
                added: 0,
            } => report.out(&format!("{package}: All entries already exist")),
            PackageUpdate::Applied { updated: 0, added } => report.out(&format!(
                "{package}: Added {added} changelog {}",
                entries(*added)
            )),
            PackageUpdate::Applied { updated, added: 0 } => report.out(&format!(
                "{package}: Updated {updated} existing {}",
                entries(*updated)
            )),
            PackageUpdate::Applied { updated, added } => report.out(&format!(
                "{package}: Updated {updated} and added {added} changelog entries"
            )),
            PackageUpdate::Failed(error) => {
                let mut message = format!("❌ {package}: Error updating CHANGELOG.md\n  {error}");
                let mut source = std::error::Error::source(error);
                while let Some(cause) = source {
                    message.push_str(&format!("\n  caused by: {cause}"));
                    source = cause.source();
                }
                report.err(&message);
            }
        }
    }

    let changed = output.changed_count();
    if changed > 0 {
        report.out(&format!(
            "Updated {changed} {}",
            if changed == 1 { "changelog" } else { "changelogs" }
        ));
    }

    if output.used_placeholder {
        report.err(&format!(
            "⚠️  No PR number supplied, new references use #{PLACEHOLDER}. Re-run with --pr <number> once the pull request exists."
        ));
    }

    report
}
