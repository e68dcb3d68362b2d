//! Output formatting for partscope results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analysis::FileError;
use crate::detect::{DocException, ExceptionReport};
use crate::processor::PartInfo;

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report for `partscope check`.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub files_scanned: usize,
    pub partial: bool,
    pub exceptions: Vec<JsonException>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parse_errors: Vec<FileError>,
    pub summary: Vec<SummaryEntry>,
}

/// One documentation violation.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonException {
    pub file: String,
    #[serde(rename = "type")]
    pub label: String,
    pub code: String,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    pub multi_name: bool,
    pub element: String,
}

/// Violation count for one label.
#[derive(Serialize, Deserialize)]
pub struct SummaryEntry {
    #[serde(rename = "type")]
    pub label: String,
    pub count: usize,
}

pub fn exception_to_json(e: &DocException) -> JsonException {
    JsonException {
        file: e.file.clone(),
        label: e.kind.label().to_string(),
        code: e.kind.code().to_string(),
        line: e.line,
        end_line: e.end_line,
        multi_name: e.multi_name,
        element: e.element.clone(),
    }
}

pub fn build_json_report(path: &str, report: &ExceptionReport) -> JsonReport {
    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        files_scanned: report.files_scanned,
        partial: report.is_partial(),
        exceptions: report.exceptions.iter().map(exception_to_json).collect(),
        parse_errors: report.parse_errors.clone(),
        summary: report
            .counts_by_label()
            .into_iter()
            .map(|(label, count)| SummaryEntry {
                label: label.to_string(),
                count,
            })
            .collect(),
    }
}

/// Write a check report in JSON format.
pub fn write_json(path: &str, report: &ExceptionReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&build_json_report(path, report))?;
    println!("{}", json);
    Ok(())
}

/// Write a located part in JSON format.
pub fn write_part_json(info: &PartInfo) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(info)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a check report for a terminal.
pub fn write_pretty(path: &str, report: &ExceptionReport) {
    println!();
    print!("  ");
    print!("{}", "partscope".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Checking: ".dimmed());
    println!("{}", path);
    print!("  {}", "Files:    ".dimmed());
    println!("{}", report.files_scanned);
    println!();

    if !report.parse_errors.is_empty() {
        write_parse_errors(&report.parse_errors);
        println!();
    }

    if !report.exceptions.is_empty() {
        write_exceptions(&report.exceptions);
        println!();
        write_summary(report);
        println!();
    }

    write_final_status(report);
    println!();
}

fn write_exceptions(exceptions: &[DocException]) {
    println!("  {} ({}):", "Exceptions".bold(), exceptions.len());
    println!();

    for e in exceptions {
        print!("    {:<34}", e.kind.label().yellow());
        print!("{}", e.file.blue());
        if e.line > 0 {
            print!("{}", format!(":{}", e.line).dimmed());
        }
        if let Some(end) = e.end_line {
            print!("{}", format!("-{}", end).dimmed());
        }
        println!();

        if !e.element.is_empty() {
            let suffix = if e.multi_name { " (multiple names)" } else { "" };
            println!("            {}{}", e.element, suffix.dimmed());
        }
    }
}

fn write_parse_errors(errors: &[FileError]) {
    println!("  {} ({}):", "Skipped files".yellow().bold(), errors.len());
    for err in errors {
        println!("    {}", err.path.blue());
        println!("            {}", err.message.dimmed());
    }
}

fn write_summary(report: &ExceptionReport) {
    println!("  {}", "Summary:".bold());
    for (label, count) in report.counts_by_label() {
        println!("    {:<34} {:>4}", label, count);
    }
}

fn write_final_status(report: &ExceptionReport) {
    if report.has_exceptions() {
        let count = report.exceptions.len();
        let plural = if count != 1 { "s" } else { "" };
        print!("  {}", "✗ FAIL".red());
        print!("  {} exception{}", count, plural);
    } else {
        print!("  {}", "✓ PASS".green());
        print!("  no exceptions");
    }
    if report.is_partial() {
        print!(
            "  {}",
            format!("(partial: {} file(s) skipped)", report.parse_errors.len()).yellow()
        );
    }
    println!();
}

/// Write a located part for a terminal.
pub fn write_part_pretty(kind: &str, name: &str, info: &PartInfo) {
    if !info.found {
        println!("  {} {} {}", kind, name.bold(), "not found".yellow());
        return;
    }
    println!(
        "  {} {} {}",
        kind,
        name.bold(),
        format!(
            "lines {}-{}, bytes {}..{}",
            info.start_line, info.end_line, info.start_offset, info.end_offset
        )
        .dimmed()
    );
    println!();
    println!("{}", info.content);
}
