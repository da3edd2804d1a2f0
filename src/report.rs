//! Summary report persistence.
//!
//! Every backend accepts exactly the seven [`REPORT_COLUMNS`] in order, and
//! every report written here can be read back into the same rows.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::analysis::SummaryRow;
use crate::state::{REPORT_COLUMNS, REPORT_FILE_PREFIX};

/// Errors from writing or reading a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported report file: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("unexpected report columns: {0:?}")]
    Columns(Vec<String>),
}

/// On-disk report format
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumString,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    /// Per-line sub-folder reports of this format are collected in
    pub fn folder_name(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "CsvReports",
            ReportFormat::Json => "JsonReports",
        }
    }

    /// Detect the format of an existing report from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(ReportFormat::Csv),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Where a new report for `line` goes: `<base>/<Line_Name>/<Format>Reports/Summary_<stamp>.<ext>`
pub fn report_path(base: &Path, line: &str, format: ReportFormat, now: NaiveDateTime) -> PathBuf {
    base.join(line.trim().replace(' ', "_"))
        .join(format.folder_name())
        .join(format!(
            "{}_{}.{}",
            REPORT_FILE_PREFIX,
            now.format("%Y%m%d_%H%M%S"),
            format.extension()
        ))
}

/// Write rows to `path`, creating parent folders as needed
pub fn write_report(path: &Path, rows: &[SummaryRow], format: ReportFormat) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    match format {
        ReportFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(path)?;
            writer.write_record(REPORT_COLUMNS)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        ReportFormat::Json => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writer.flush()?;
        }
    }

    tracing::info!(path = %path.display(), rows = rows.len(), "Saved {} report", format);
    Ok(())
}

/// Read a report written by [`write_report`], detecting the format from the extension
pub fn read_report(path: &Path) -> Result<Vec<SummaryRow>, ReportError> {
    let format = ReportFormat::from_path(path)
        .ok_or_else(|| ReportError::UnsupportedFormat(path.to_path_buf()))?;

    match format {
        ReportFormat::Csv => {
            let mut reader = csv::Reader::from_path(path)?;
            let headers = reader.headers()?;
            if !headers.iter().eq(REPORT_COLUMNS.iter().copied()) {
                return Err(ReportError::Columns(
                    headers.iter().map(str::to_string).collect(),
                ));
            }
            let rows = reader
                .deserialize::<SummaryRow>()
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        }
        ReportFormat::Json => {
            let reader = BufReader::new(File::open(path)?);
            Ok(serde_json::from_reader(reader)?)
        }
    }
}

/// Render rows as a fixed-width text table, absent values left blank
pub fn render_table(rows: &[SummaryRow]) -> String {
    let cells: Vec<[String; 7]> = rows.iter().map(SummaryRow::cells).collect();

    let mut widths = REPORT_COLUMNS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |values: &[&str]| -> String {
        values
            .iter()
            .zip(widths.iter())
            .map(|(v, w)| format!("{:<w$}", v, w = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format_line(&REPORT_COLUMNS));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule_refs: Vec<&str> = rule.iter().map(String::as_str).collect();
    out.push_str(&format_line(&rule_refs));
    out.push('\n');
    for row in &cells {
        let refs: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&format_line(&refs));
        out.push('\n');
    }
    out
}
