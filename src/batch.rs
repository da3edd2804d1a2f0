//! Batch processing of SMT log files.
//!
//! Files are read in the order supplied and each line is fed through the parser
//! into one shared [`CycleAggregator`]. A file that cannot be opened or read is
//! recorded in its [`FileOutcome`] and the batch moves on; nothing short of a
//! panic aborts a run.

use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::{CycleAggregator, SummaryRow};
use crate::parsers::smt::decode_line;
use crate::parsers::{Parseable, SmtPrinter};
use crate::state::{DOWNTIME_THRESHOLD_SECS, SUPPORTED_EXTENSIONS};

/// Why a file contributed nothing (or only part of itself) to a batch
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors from scanning a folder for log files
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("not a readable folder: {}", .0.display())]
    NotAFolder(PathBuf),
    #[error("invalid folder pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Receives coarse progress updates, once per processed file
pub trait ProgressSink {
    fn update(&mut self, percent: u8, message: &str);
}

impl<F: FnMut(u8, &str)> ProgressSink for F {
    fn update(&mut self, percent: u8, message: &str) {
        self(percent, message)
    }
}

/// Progress sink that drops every update
pub fn no_progress(_percent: u8, _message: &str) {}

/// What happened to one input file
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Lines read from the file
    pub lines: usize,
    /// Lines that changed aggregator state
    pub events: usize,
    /// Lines skipped for a missing or invalid timestamp
    pub skipped_lines: usize,
    /// Set when the file could not be opened or was cut short by a read error
    pub error: Option<FileError>,
}

impl FileOutcome {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: 0,
            events: 0,
            skipped_lines: 0,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Summary rows in first-seen stencil order
    pub rows: Vec<SummaryRow>,
    /// One outcome per input file, in input order
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    /// Outcomes of files that failed to open or read
    pub fn failed_files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| !f.is_ok())
    }

    pub fn total_skipped_lines(&self) -> usize {
        self.files.iter().map(|f| f.skipped_lines).sum()
    }
}

/// Process log files in order and summarize cycle times per stencil.
///
/// Progress is reported after every file as `(done * 100 / total, message)`.
pub fn process_logs<P, S>(files: &[P], threshold_secs: i64, progress: &mut S) -> BatchReport
where
    P: AsRef<Path>,
    S: ProgressSink + ?Sized,
{
    let mut aggregator = CycleAggregator::with_threshold(threshold_secs);
    let mut outcomes = Vec::with_capacity(files.len());
    let total = files.len().max(1);

    for (i, path) in files.iter().enumerate() {
        let path = path.as_ref();
        aggregator.begin_stream();

        let mut outcome = FileOutcome::new(path);
        if let Err(e) = feed_file(path, &mut aggregator, &mut outcome) {
            tracing::warn!("Skipping rest of log file: {}", e);
            outcome.error = Some(e);
        }
        tracing::debug!(
            path = %path.display(),
            lines = outcome.lines,
            events = outcome.events,
            skipped = outcome.skipped_lines,
            "Processed log file"
        );
        outcomes.push(outcome);

        let percent = ((i + 1) * 100 / total) as u8;
        progress.update(percent, &format!("Parsing {}...", display_name(path)));
    }

    let rows = aggregator.summarize();
    tracing::info!(
        files = files.len(),
        stencils = aggregator.stencils().len(),
        rows = rows.len(),
        "Batch complete"
    );

    BatchReport {
        rows,
        files: outcomes,
    }
}

/// Summarize files with the default threshold and no progress reporting
pub fn analyze_files<P: AsRef<Path>>(files: &[P]) -> Vec<SummaryRow> {
    process_logs(files, DOWNTIME_THRESHOLD_SECS, &mut no_progress).rows
}

/// Stream one file's lines into the aggregator, dropping invalid UTF-8 bytes
fn feed_file(
    path: &Path,
    aggregator: &mut CycleAggregator,
    outcome: &mut FileOutcome,
) -> Result<(), FileError> {
    let file = File::open(path).map_err(|source| FileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| FileError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }

        outcome.lines += 1;
        let line = decode_line(&buf);
        match SmtPrinter.parse_line(&line) {
            Ok(parsed) => {
                if aggregator.apply(&parsed) {
                    outcome.events += 1;
                }
            }
            Err(_) => outcome.skipped_lines += 1,
        }
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Find the log files directly inside `folder`, sorted by path.
///
/// Extension matching is case-insensitive.
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !folder.is_dir() {
        return Err(ScanError::NotAFolder(folder.to_path_buf()));
    }

    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::default()
    };
    let base = Pattern::escape(&folder.to_string_lossy());

    let mut files = vec![];
    for ext in SUPPORTED_EXTENSIONS {
        let pattern = format!("{}/*.{}", base, ext);
        for entry in glob::glob_with(&pattern, options)? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => tracing::warn!("Failed to read folder entry: {}", e),
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Drop repeated paths, keeping the first occurrence of each
pub fn unique_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen: HashSet<PathBuf> = HashSet::with_capacity(paths.len());
    let mut unique = Vec::with_capacity(paths.len());
    for path in paths {
        if seen.insert(path.clone()) {
            unique.push(path);
        }
    }
    unique
}
