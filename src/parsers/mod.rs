pub mod smt;
pub mod types;

pub use smt::SmtPrinter;
pub use types::{LineError, LogEvent, ParsedLine, Parseable};
