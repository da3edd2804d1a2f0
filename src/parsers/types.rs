use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

/// Reasons a log line cannot be used. Both are recoverable: the line is skipped.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("line has fewer than two whitespace-separated tokens")]
    TooFewTokens,
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}

/// What a timestamped log line means to the cycle aggregator
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum LogEvent {
    /// A new product was loaded; carries the stencil name
    ProductLoaded { stencil: String },
    /// The printer finished a board
    BoardPrinted,
    /// Any other line, ignored by the aggregator
    Other,
}

/// A log line reduced to its timestamp and event
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedLine {
    pub timestamp: NaiveDateTime,
    pub event: LogEvent,
}

/// A line-oriented log dialect
pub trait Parseable {
    /// Parse a single raw line into its timestamp and event
    fn parse_line(&self, line: &str) -> Result<ParsedLine, LineError>;
}
