//! JSON report implementation.
//!
//! Emits lint results in JSON format for machine-readable output.

use super::Reporter;
use crate::lint::ProjectReport;
use crate::rule::Violation;
use serde::Serialize;
use std::io::{self, Write};

/// JSON reporter implementation.
pub struct JsonReporter;

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    files_scanned: usize,
    files_with_violations: usize,
    violations: usize,
    fixable: usize,
    fixes_applied: usize,
}

/// One violation with its location and message.
#[derive(Serialize)]
struct JsonViolation<'a> {
    line: usize,
    message: String,
    fixable: bool,
    #[serde(flatten)]
    violation: &'a Violation,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    violations: Vec<JsonViolation<'a>>,
    #[serde(skip_serializing_if = "is_zero")]
    fixes_applied: usize,
}

#[derive(Serialize)]
struct JsonSkipped<'a> {
    path: String,
    reason: &'a str,
}

/// Root JSON report structure.
#[derive(Serialize)]
struct JsonReport<'a> {
    summary: JsonSummary,
    files: Vec<JsonFile<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<JsonSkipped<'a>>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl Reporter for JsonReporter {
    fn write<W: Write>(&self, report: &ProjectReport, writer: &mut W) -> io::Result<()> {
        let files: Vec<JsonFile> = report
            .files
            .iter()
            .map(|file| JsonFile {
                path: file.path.display().to_string(),
                violations: file
                    .findings
                    .iter()
                    .flat_map(|finding| {
                        finding.violations.iter().map(move |violation| JsonViolation {
                            line: finding.line,
                            message: violation.to_string(),
                            fixable: finding.is_fixable(),
                            violation,
                        })
                    })
                    .collect(),
                fixes_applied: file.fixes_applied,
            })
            .collect();

        let fixable = files
            .iter()
            .flat_map(|f| f.violations.iter())
            .filter(|v| v.fixable)
            .count();

        let output = JsonReport {
            summary: JsonSummary {
                files_scanned: report.files_scanned,
                files_with_violations: report.files.iter().filter(|f| !f.is_clean()).count(),
                violations: report.violation_count(),
                fixable,
                fixes_applied: report.fixes_applied(),
            },
            files,
            skipped: report
                .skipped
                .iter()
                .map(|s| JsonSkipped {
                    path: s.path.display().to_string(),
                    reason: &s.reason,
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
