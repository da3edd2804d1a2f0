//! SMT stencil printer log parser.
//!
//! Lines look like
//!
//! ```text
//! 2024-01-01 08:00:00.123 [INFO] Product Loaded: StencilA
//! 2024-01-01 08:00:10.456 [INFO] Printing board 1
//! ```
//!
//! Only the leading `date time` pair and two marker phrases matter; everything
//! else on the line is free-form and ignored.

use chrono::{NaiveDateTime, Timelike};
use std::borrow::Cow;

use super::types::{LineError, LogEvent, ParsedLine, Parseable};
use crate::state::{BOARD_PRINTED_MARKER, PRODUCT_LOADED_MARKER, TIMESTAMP_FORMAT};

/// Parse the timestamp carried by the first two tokens of a line.
///
/// Fractional seconds on the time token are truncated, not rounded.
pub fn parse_timestamp(line: &str) -> Result<NaiveDateTime, LineError> {
    let mut tokens = line.split_whitespace();
    let (date, time) = match (tokens.next(), tokens.next()) {
        (Some(date), Some(time)) => (date, time),
        _ => return Err(LineError::TooFewTokens),
    };

    let whole_seconds = time.split('.').next().unwrap_or(time);
    let candidate = format!("{} {}", date, whole_seconds);

    match NaiveDateTime::parse_from_str(&candidate, TIMESTAMP_FORMAT) {
        // chrono accepts a `:60` leap second, which is not a calendar time
        Ok(ts) if ts.nanosecond() < 1_000_000_000 => Ok(ts),
        _ => Err(LineError::InvalidTimestamp(candidate)),
    }
}

/// Decode a raw line as UTF-8, dropping invalid byte sequences.
pub fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(line) => Cow::Borrowed(line),
        Err(_) => {
            let mut line = String::with_capacity(bytes.len());
            for chunk in bytes.utf8_chunks() {
                line.push_str(chunk.valid());
            }
            Cow::Owned(line)
        }
    }
}

/// Classify a line by its marker text.
///
/// A product change wins over a board print when a line carries both. The
/// stencil name is whatever follows the last product marker, trimmed.
pub fn classify(line: &str) -> LogEvent {
    if let Some(idx) = line.rfind(PRODUCT_LOADED_MARKER) {
        let stencil = line[idx + PRODUCT_LOADED_MARKER.len()..].trim();
        LogEvent::ProductLoaded {
            stencil: stencil.to_string(),
        }
    } else if line.contains(BOARD_PRINTED_MARKER) {
        LogEvent::BoardPrinted
    } else {
        LogEvent::Other
    }
}

/// SMT printer log parser
pub struct SmtPrinter;

impl Parseable for SmtPrinter {
    fn parse_line(&self, line: &str) -> Result<ParsedLine, LineError> {
        let timestamp = parse_timestamp(line)?;
        Ok(ParsedLine {
            timestamp,
            event: classify(line),
        })
    }
}
