//! CLI output formatting for the load and build stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every post leads with
//! its position in the collection and its title; the source file and publish
//! date follow as indented context lines. The listing reads as a content
//! inventory while still tracing every entry back to a file.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Posts
//! 001 Choose boring technology
//!     Date: 2024-02-10
//!     Source: 2024-02-10-boring-technology.md
//! 002 (untitled)
//!     Date: 2023-09-01
//!     Source: 2023-09-01-notes.md
//!
//! Skipped
//!     draft.md: filename shorter than the 10-character date prefix
//!
//! Config
//!     config.toml
//!     style.css
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 Choose boring technology → 2024-02-10-boring-technology.html
//! Sitemap → sitemap.xml
//! Feed → feed.xml
//!
//! Wrote 3 files, 2 unchanged
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::scan::Manifest;
use crate::types::{Post, PostCollection};
use crate::{BuildReport, generate};
use serde::Serialize;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Post header line: positional index + title, `(untitled)` when empty.
fn post_header(index: usize, post: &Post) -> String {
    if post.title.is_empty() {
        format!("{} (untitled)", format_index(index))
    } else {
        format!("{} {}", format_index(index), post.title)
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the loaded post collection, skipped files and config sources.
pub fn format_check_output(manifest: &Manifest, config_path: &Path, stylesheet: &Path) -> Vec<String> {
    let mut lines = vec!["Posts".to_string()];

    if manifest.posts.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(post_header(i + 1, post));
        lines.push(format!("    Date: {}", post.publish_date.format("%Y-%m-%d")));
        lines.push(format!("    Source: {}.md", post.slug));
    }

    if !manifest.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skipped in &manifest.skipped {
            lines.push(format!("    {}: {}", skipped.file_name, skipped.reason));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    for source in [config_path, stylesheet] {
        if source.is_file() {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            lines.push(format!("    {name}"));
        }
    }

    lines
}

/// Print check output to stdout.
pub fn print_check_output(manifest: &Manifest, config_path: &Path, stylesheet: &Path) {
    for line in format_check_output(manifest, config_path, stylesheet) {
        println!("{}", line);
    }
}

#[derive(Serialize)]
struct CheckSummary<'a> {
    posts: &'a PostCollection,
    skipped: Vec<SkippedSummary<'a>>,
}

#[derive(Serialize)]
struct SkippedSummary<'a> {
    file: &'a str,
    reason: String,
}

/// Machine-readable form of the check output.
pub fn format_check_json(manifest: &Manifest) -> Result<String, serde_json::Error> {
    let summary = CheckSummary {
        posts: &manifest.posts,
        skipped: manifest
            .skipped
            .iter()
            .map(|s| SkippedSummary {
                file: &s.file_name,
                reason: s.reason.to_string(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&summary)
}

// ============================================================================
// Build output
// ============================================================================

/// Format build output: every generated page followed by a summary line.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Home \u{2192} index.html".to_string()];

    for (i, post) in report.posts.iter().enumerate() {
        lines.push(format!(
            "{} \u{2192} {}",
            post_header(i + 1, post),
            generate::post_file_name(post)
        ));
    }

    lines.push("Sitemap \u{2192} sitemap.xml".to_string());
    lines.push("Feed \u{2192} feed.xml".to_string());

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Skipped {}",
            plural(report.skipped.len(), "article")
        ));
        for skipped in &report.skipped {
            lines.push(format!("    {}: {}", skipped.file_name, skipped.reason));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Wrote {}, {} unchanged",
        plural(report.files.written.len(), "file"),
        report.files.unchanged.len()
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
