//! CLI output formatting.
//!
//! Output leads with what was rendered (locale, data kind, entry count) and
//! puts file paths and errors on indented context lines underneath.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! nl → index.html
//!     experience: 4 entries
//!     academic: 2 entries
//!     skills: error: skills.json answered HTTP 404
//!     ui text: 18 labels
//! en → en/index.html (unchanged)
//!     ...
//!
//! Copied 3 assets
//! Built 2 pages, 1 failure
//! ```
//!
//! ## Check
//!
//! Same per-locale block as build, headed by the locale and fixture root,
//! followed by `All fixtures OK` or the number of failures.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::app::{KindOutcome, LoadReport};
use crate::page::CommitStatus;
use crate::site::{BuildReport, PageReport, WriteStatus};
use crate::theme::Theme;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

fn kind_line(outcome: &KindOutcome) -> String {
    let body = match &outcome.result {
        Ok(entries) => plural(*entries, "entry", "entries"),
        Err(err) => format!("error: {err}"),
    };
    let stale = match outcome.status {
        CommitStatus::Stale => " (stale, dropped)",
        CommitStatus::Applied => "",
    };
    format!("{}{}: {}{}", indent(1), outcome.kind, body, stale)
}

/// Per-fixture lines for one loaded locale.
pub fn format_load_report(report: &LoadReport) -> Vec<String> {
    let mut lines: Vec<String> = report.kinds.iter().map(kind_line).collect();
    lines.push(match &report.ui_text {
        Ok(bound) => format!("{}ui text: {}", indent(1), plural(*bound, "label", "labels")),
        Err(err) => format!("{}ui text: defaults kept ({err})", indent(1)),
    });
    lines
}

fn page_header(page: &PageReport) -> String {
    let unchanged = match page.status {
        WriteStatus::Unchanged => " (unchanged)",
        WriteStatus::Written => "",
    };
    format!("{} → {}{}", page.locale, page.path.display(), unchanged)
}

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut failures = 0;
    for page in &report.pages {
        lines.push(page_header(page));
        lines.extend(format_load_report(&page.load));
        failures += page.load.failures().count();
    }
    lines.push(String::new());
    if report.assets_copied > 0 {
        lines.push(format!(
            "Copied {}",
            plural(report.assets_copied, "asset", "assets")
        ));
    }
    let mut summary = format!("Built {}", plural(report.pages.len(), "page", "pages"));
    if failures > 0 {
        summary.push_str(&format!(", {}", plural(failures, "failure", "failures")));
    }
    lines.push(summary);
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

/// `reports` pairs each locale's load report with the fixture root it used.
pub fn format_check_output(reports: &[(String, LoadReport)]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut failures = 0;
    for (root, report) in reports {
        lines.push(format!("{} ({})", report.locale, root));
        lines.extend(format_load_report(report));
        failures += report.failures().count();
    }
    lines.push(String::new());
    if failures == 0 {
        lines.push("All fixtures OK".to_string());
    } else {
        lines.push(format!(
            "{} failed",
            plural(failures, "fixture", "fixtures")
        ));
    }
    lines
}

pub fn print_check_output(reports: &[(String, LoadReport)]) {
    for line in format_check_output(reports) {
        println!("{}", line);
    }
}

pub fn format_theme(theme: Theme, persisted: bool) -> String {
    if persisted {
        format!("Theme: {}", theme.as_str())
    } else {
        format!("Theme: {} (not persisted)", theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DataKind;
    use crate::fetch::FetchError;
    use crate::page::Locale;
    use crate::pipeline::RenderError;
    use std::path::PathBuf;

    fn load(skills_fail: bool) -> LoadReport {
        let skills = if skills_fail {
            Err(RenderError::HttpStatus {
                locator: "skills.json".to_string(),
                status: 404,
            })
        } else {
            Ok(5)
        };
        LoadReport {
            locale: Locale::Nl,
            kinds: vec![
                KindOutcome {
                    kind: DataKind::Experience,
                    result: Ok(1),
                    status: CommitStatus::Applied,
                },
                KindOutcome {
                    kind: DataKind::Skills,
                    result: skills,
                    status: CommitStatus::Applied,
                },
            ],
            ui_text: Ok(18),
        }
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "entry", "entries"), "1 entry");
        assert_eq!(plural(0, "entry", "entries"), "0 entries");
    }

    #[test]
    fn load_report_lines() {
        let lines = format_load_report(&load(true));
        assert_eq!(
            lines,
            vec![
                "    experience: 1 entry",
                "    skills: error: skills.json answered HTTP 404",
                "    ui text: 18 labels",
            ]
        );
    }

    #[test]
    fn stale_outcome_is_marked() {
        let outcome = KindOutcome {
            kind: DataKind::Academic,
            result: Ok(2),
            status: CommitStatus::Stale,
        };
        assert_eq!(kind_line(&outcome), "    academic: 2 entries (stale, dropped)");
    }

    #[test]
    fn ui_text_failure_line() {
        let mut report = load(false);
        report.ui_text = Err(RenderError::Fetch(FetchError::transport(
            "ui-text.json",
            "refused",
        )));
        let lines = format_load_report(&report);
        assert!(lines.last().unwrap().starts_with("    ui text: defaults kept ("));
    }

    #[test]
    fn build_output_summarises() {
        let report = BuildReport {
            pages: vec![
                PageReport {
                    locale: Locale::Nl,
                    path: PathBuf::from("index.html"),
                    status: WriteStatus::Written,
                    load: load(true),
                },
                PageReport {
                    locale: Locale::En,
                    path: PathBuf::from("en/index.html"),
                    status: WriteStatus::Unchanged,
                    load: load(false),
                },
            ],
            assets_copied: 3,
        };
        let lines = format_build_output(&report);
        assert_eq!(lines[0], "nl → index.html");
        assert!(lines.contains(&"en → en/index.html (unchanged)".to_string()));
        assert!(lines.contains(&"Copied 3 assets".to_string()));
        assert_eq!(lines.last().unwrap(), "Built 2 pages, 1 failure");
    }

    #[test]
    fn check_output_all_ok() {
        let lines = format_check_output(&[("data".to_string(), load(false))]);
        assert_eq!(lines[0], "nl (data)");
        assert_eq!(lines.last().unwrap(), "All fixtures OK");
    }

    #[test]
    fn check_output_counts_failures() {
        let lines = format_check_output(&[("data".to_string(), load(true))]);
        assert_eq!(lines.last().unwrap(), "1 fixture failed");
    }

    #[test]
    fn theme_line() {
        assert_eq!(format_theme(Theme::Dark, true), "Theme: dark");
        assert_eq!(
            format_theme(Theme::Light, false),
            "Theme: light (not persisted)"
        );
    }
}
