//! CLI output formatting.
//!
//! Output is information-centric: every entity line leads with a positional
//! index and its title, with secondary context on indented lines.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Sections
//! 001 Overview (active)
//! 002 World
//! 003 Characters
//! 004 Lore
//!     Placeholder: Unknown page template "scrapbook".
//!
//! Assets
//!     assets/backgrounds/parchment.jpg: copied
//!     textures/paper-fibers.png: missing from library
//!
//! Saved sunken-coast → projects/sunken-coast/index.html (previous kept as backup)
//! ```
//!
//! ## Themes
//!
//! ```text
//! Cards (cardStyle)
//!     bordered: Bordered. Thin outline, no shadow
//!     current: Current (default). Soft surface with rounded corners
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::assemble::{AssemblyReport, SectionStatus};
use crate::assets::AssetCopy;
use crate::storage::SaveReceipt;
use crate::templates::PageViolation;
use crate::theme::{Catalogs, StyleDimension};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Sections in document order, assets, then where the artifact went.
pub fn format_build_output(
    project: &str,
    receipt: &SaveReceipt,
    report: &AssemblyReport,
    retried: bool,
) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];
    for (i, section) in report.sections.iter().enumerate() {
        let active = if section.id == report.active_section {
            " (active)"
        } else {
            ""
        };
        lines.push(format!("{} {}{}", format_index(i + 1), section.title, active));
        if let SectionStatus::Placeholder { reason } = &section.status {
            lines.push(format!("{}Placeholder: {}", indent(1), reason));
        }
    }

    if !receipt.copied_assets.is_empty() || !receipt.missing_assets.is_empty() {
        lines.push(String::new());
        lines.push("Assets".to_string());
        for path in &receipt.copied_assets {
            lines.push(format!("{}{}: copied", indent(1), path.display()));
        }
        for path in &receipt.missing_assets {
            lines.push(format!("{}{}: missing from library", indent(1), path.display()));
        }
    }

    lines.push(String::new());
    let mut saved = format!("Saved {} → {}", project, receipt.path.display());
    if receipt.backed_up {
        saved.push_str(" (previous kept as backup)");
    }
    lines.push(saved);
    if retried {
        lines.push(format!(
            "{}First write failed verification; regenerated once",
            indent(1)
        ));
    }
    lines
}

pub fn print_build_output(
    project: &str,
    receipt: &SaveReceipt,
    report: &AssemblyReport,
    retried: bool,
) {
    print_lines(&format_build_output(project, receipt, report, retried));
}

// ============================================================================
// Themes
// ============================================================================

/// Every style dimension with its catalog keys, the default marked.
pub fn format_theme_catalog(catalogs: &Catalogs) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, dimension) in StyleDimension::ALL.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{} ({})", dimension.label(), dimension.field_name()));
        for key in catalogs.keys(*dimension) {
            let (name, description) = catalogs.describe(*dimension, key).unwrap_or((key, ""));
            let default = if key == dimension.default_key() {
                " (default)"
            } else {
                ""
            };
            let mut line = format!("{}{}: {}{}", indent(1), key, name, default);
            if !description.is_empty() {
                line.push_str(&format!(". {}", truncate_desc(description, 60)));
            }
            lines.push(line);
        }
    }
    lines
}

pub fn print_theme_catalog(catalogs: &Catalogs) {
    print_lines(&format_theme_catalog(catalogs));
}

// ============================================================================
// Assets
// ============================================================================

pub fn format_assets(assets: &[AssetCopy], library: &Path) -> Vec<String> {
    if assets.is_empty() {
        return vec!["No theme assets required".to_string()];
    }
    let mut lines = vec!["Assets".to_string()];
    for (i, asset) in assets.iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            asset.destination.display()
        ));
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            library.join(&asset.source).display()
        ));
    }
    lines
}

pub fn print_assets(assets: &[AssetCopy], library: &Path) {
    print_lines(&format_assets(assets, library));
}

// ============================================================================
// Check
// ============================================================================

/// One custom page's validation result.
#[derive(Debug, Clone)]
pub struct PageCheck {
    pub name: String,
    pub template: String,
    pub violations: Vec<PageViolation>,
}

pub fn format_check_report(pages: &[PageCheck]) -> Vec<String> {
    if pages.is_empty() {
        return vec!["No custom pages".to_string()];
    }
    let mut lines = vec!["Custom pages".to_string()];
    for (i, page) in pages.iter().enumerate() {
        lines.push(format!(
            "{} {} [{}]",
            format_index(i + 1),
            page.name,
            page.template
        ));
        if page.violations.is_empty() {
            lines.push(format!("{}ok", indent(1)));
        }
        for violation in &page.violations {
            lines.push(format!("{}{}", indent(1), violation));
        }
    }
    let failing = pages.iter().filter(|p| !p.violations.is_empty()).count();
    lines.push(String::new());
    lines.push(format!(
        "Checked {} page{}, {} with violations",
        pages.len(),
        if pages.len() == 1 { "" } else { "s" },
        failing
    ));
    lines
}

pub fn print_check_report(pages: &[PageCheck]) {
    print_lines(&format_check_report(pages));
}

// ============================================================================
// Projects
// ============================================================================

pub fn format_project_list(projects: &[String]) -> Vec<String> {
    if projects.is_empty() {
        return vec!["No projects".to_string()];
    }
    projects
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {}", format_index(i + 1), p))
        .collect()
}

pub fn print_project_list(projects: &[String]) {
    print_lines(&format_project_list(projects));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::SectionReport;
    use std::path::PathBuf;

    fn report() -> AssemblyReport {
        AssemblyReport {
            sections: vec![
                SectionReport {
                    id: "overview".into(),
                    title: "Overview".into(),
                    status: SectionStatus::Rendered,
                },
                SectionReport {
                    id: "lore".into(),
                    title: "Lore".into(),
                    status: SectionStatus::Placeholder {
                        reason: "Unknown page template \"scrapbook\".".into(),
                    },
                },
            ],
            active_section: "overview".into(),
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn truncate_desc_is_char_safe() {
        assert_eq!(truncate_desc("short", 10), "short");
        assert_eq!(truncate_desc("ééééé", 3), "ééé...");
    }

    #[test]
    fn build_output_lists_sections_and_placeholders() {
        let receipt = SaveReceipt {
            path: PathBuf::from("projects/coast/index.html"),
            backed_up: true,
            ..Default::default()
        };
        let lines = format_build_output("coast", &receipt, &report(), false);
        assert_eq!(lines[0], "Sections");
        assert_eq!(lines[1], "001 Overview (active)");
        assert_eq!(lines[2], "002 Lore");
        assert_eq!(lines[3], "    Placeholder: Unknown page template \"scrapbook\".");
        assert_eq!(
            lines.last().unwrap(),
            "Saved coast → projects/coast/index.html (previous kept as backup)"
        );
    }

    #[test]
    fn build_output_lists_assets() {
        let receipt = SaveReceipt {
            path: PathBuf::from("p/index.html"),
            copied_assets: vec![PathBuf::from("assets/icons/compass.svg")],
            missing_assets: vec![PathBuf::from("textures/grain.png")],
            ..Default::default()
        };
        let lines = format_build_output("p", &receipt, &report(), true);
        assert!(lines.contains(&"    assets/icons/compass.svg: copied".to_string()));
        assert!(lines.contains(&"    textures/grain.png: missing from library".to_string()));
        assert!(lines.last().unwrap().contains("regenerated once"));
    }

    #[test]
    fn theme_catalog_marks_defaults() {
        let lines = format_theme_catalog(&Catalogs::builtin());
        assert!(lines.contains(&"Cards (cardStyle)".to_string()));
        assert!(
            lines
                .iter()
                .any(|l| l.starts_with("    current: ") && l.contains("(default)"))
        );
        assert!(lines.iter().any(|l| l.starts_with("    serif: ") && l.contains("(default)")));
    }

    #[test]
    fn assets_output_shows_source() {
        let assets = vec![AssetCopy {
            source: "icons/compass.svg".into(),
            destination: "assets/icons/compass.svg".into(),
        }];
        let lines = format_assets(&assets, &PathBuf::from("lib"));
        assert_eq!(lines[1], "001 assets/icons/compass.svg");
        assert_eq!(lines[2], "    Source: lib/icons/compass.svg");
        assert_eq!(format_assets(&[], &PathBuf::from("lib")), vec!["No theme assets required"]);
    }

    #[test]
    fn check_report_counts_failures() {
        let pages = vec![
            PageCheck {
                name: "Lore".into(),
                template: "standard".into(),
                violations: vec![],
            },
            PageCheck {
                name: "Scraps".into(),
                template: "ghost".into(),
                violations: vec![PageViolation::UnknownTemplate("ghost".into())],
            },
        ];
        let lines = format_check_report(&pages);
        assert_eq!(lines[1], "001 Lore [standard]");
        assert_eq!(lines[2], "    ok");
        assert_eq!(lines[4], "    template `ghost` is not registered");
        assert_eq!(lines.last().unwrap(), "Checked 2 pages, 1 with violations");
    }

    #[test]
    fn project_list_is_indexed() {
        let projects = vec!["alpha".to_string(), "zeta".to_string()];
        assert_eq!(format_project_list(&projects), vec!["001 alpha", "002 zeta"]);
        assert_eq!(format_project_list(&[]), vec!["No projects"]);
    }
}
