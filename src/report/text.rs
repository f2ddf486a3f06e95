//! Human-readable text report.

use super::Reporter;
use crate::lint::ProjectReport;
use std::io::{self, Write};

/// Text reporter implementation.
pub struct TextReporter;

impl Reporter for TextReporter {
    fn write<W: Write>(&self, report: &ProjectReport, writer: &mut W) -> io::Result<()> {
        let mut fixable = 0;

        for file in &report.files {
            if file.is_clean() {
                continue;
            }
            writeln!(writer, "{}", file.path.display())?;
            for finding in &file.findings {
                for violation in &finding.violations {
                    let tag = if finding.is_fixable() { " (fixable)" } else { "" };
                    writeln!(writer, "  {:>4}  {}{}", finding.line, violation, tag)?;
                }
                if finding.is_fixable() {
                    fixable += finding.violations.len();
                }
            }
            writeln!(writer)?;
        }

        for skipped in &report.skipped {
            writeln!(
                writer,
                "Skipped {}: {}",
                skipped.path.display(),
                skipped.reason
            )?;
        }

        let fixed = report.fixes_applied();
        if fixed > 0 {
            writeln!(writer, "Fixed {} import(s)", fixed)?;
        }

        let violations = report.violation_count();
        if violations == 0 {
            writeln!(
                writer,
                "No restricted imports in {} file(s)",
                report.files_scanned
            )
        } else {
            writeln!(
                writer,
                "{} restricted import(s) in {} file(s), {} fixable with --fix",
                violations,
                report.files.iter().filter(|f| !f.is_clean()).count(),
                fixable
            )
        }
    }
}
