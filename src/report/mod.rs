//! Report output for lint results.
//!
//! This module provides reporters for printing a [`ProjectReport`] as
//! human-readable text or as JSON.

pub mod json;
pub mod text;

use std::io::{self, Write};

use crate::lint::ProjectReport;

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Text format - one line per violation, grouped by file
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!(
                "Unknown report format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for reporters.
pub trait Reporter {
    /// Write the report to the given writer.
    fn write<W: Write>(&self, report: &ProjectReport, writer: &mut W) -> io::Result<()>;
}

/// Write a report in the specified format.
pub fn write_report<W: Write>(
    format: ReportFormat,
    report: &ProjectReport,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => text::TextReporter.write(report, writer),
        ReportFormat::Json => json::JsonReporter.write(report, writer),
    }
}

/// Render a report to a string.
pub fn report_to_string(format: ReportFormat, report: &ProjectReport) -> io::Result<String> {
    let mut buffer = Vec::new();
    write_report(format, report, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("csv".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_report_format_display() {
        assert_eq!(format!("{}", ReportFormat::Text), "text");
        assert_eq!(format!("{}", ReportFormat::Json), "json");
    }

    #[test]
    fn test_report_to_string_dispatches() {
        let report = fixtures::sample_report();
        let json = report_to_string(ReportFormat::Json, &report).unwrap();
        assert!(json.trim_start().starts_with('{'));
        let text = report_to_string(ReportFormat::Text, &report).unwrap();
        assert!(text.contains("src/app.js"));
    }
}
